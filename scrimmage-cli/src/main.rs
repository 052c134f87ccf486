//! Scrimmage CLI - Command-line interface
//!
//! Commands:
//! - generate: Build a schedule from a config file
//! - analyze: Sweep many seeds and summarise fairness
//! - serve: Start the HTTP server

mod analyze;
mod generate;
mod server;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "scrimmage")]
#[command(about = "Fair round-robin scrimmage scheduler")]
struct Cli {
    /// Random seed for reproducible schedules
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a schedule
    Generate(generate::GenerateArgs),
    /// Generate under many seeds and report fairness
    Analyze(analyze::AnalyzeArgs),
    /// Start the HTTP server
    Serve(server::ServerArgs),
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output on stdout stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate(args) => generate::run(args, cli.seed),
        Commands::Analyze(args) => analyze::run(args, cli.seed),
        Commands::Serve(args) => server::run(args),
    }
}
