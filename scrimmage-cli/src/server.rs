//! Server command - check the flags, then block on `scrimmage_server::run_server`

use std::time::Duration;

use anyhow::Result;
use clap::Args;

use scrimmage_server::{run_server, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8002")]
    pub port: u16,

    /// Longest a single schedule generation may run, in milliseconds
    #[arg(long, default_value = "10000")]
    pub timeout_ms: u64,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!("Starting scrimmage server on port {}", config.port);

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    if args.timeout_ms == 0 {
        anyhow::bail!("--timeout-ms must be greater than zero");
    }

    Ok(ServerConfig {
        port: args.port,
        generation_timeout: Duration::from_millis(args.timeout_ms),
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// TESTS
// ============================================================================
