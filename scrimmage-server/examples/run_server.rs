//! Example to run the scrimmage server standalone
//!
//! Run with: cargo run -p scrimmage-server --example run_server

use scrimmage_server::{run_server, ServerConfig};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig {
        port: 8002,
        generation_timeout: Duration::from_secs(5),
    };

    println!("Starting scrimmage server on port {}", config.port);
    println!(
        "Try: curl -X POST localhost:{}/api/events/demo/schedule -H 'content-type: application/json' \\",
        config.port
    );
    println!("  -d '{{\"participants\":[\"A\",\"B\",\"C\",\"D\",\"E\"],\"totalRounds\":5,\"playersPerTeam\":1}}'");

    run_server(config).await
}
