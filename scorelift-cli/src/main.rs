//! Scorelift CLI
//!
//! Command-line interface for the gradebook's bulk score import service.

mod commands;
mod config;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "scorelift")]
#[command(about = "Bulk score import CLI", long_about = None)]
struct Cli {
    /// Gradebook service URL
    #[arg(
        long,
        env = "SCORELIFT_GRADEBOOK_URL",
        default_value = "http://localhost:8000"
    )]
    gradebook_url: String,

    /// Anti-forgery token the import endpoint requires
    #[arg(long, env = "SCORELIFT_CSRF_TOKEN", default_value = "")]
    csrf_token: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "scorelift_cli=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let config = Config {
        gradebook_url: cli.gradebook_url,
        csrf_token: cli.csrf_token,
    };

    handle_command(cli.command, &config).await
}
