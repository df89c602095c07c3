//! Commands module
//!
//! Defines all CLI commands and their handlers.

mod export;
mod import;

use anyhow::Result;
use clap::Subcommand;

use crate::config::Config;

/// Top-level CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Submit a score CSV and wait for the import to finish
    Import {
        /// Path to the CSV file to import
        file: String,

        /// Give up after this many seconds of polling
        #[arg(long, conflicts_with = "no_deadline")]
        timeout: Option<u64>,

        /// Keep polling until the job finishes, however long that takes
        #[arg(long)]
        no_deadline: bool,
    },
    /// Download the current scores as CSV
    Export {
        /// Restrict the export to one track
        #[arg(long)]
        track: Option<String>,

        /// Restrict the export to one cohort
        #[arg(long)]
        cohort: Option<String>,

        /// Write the CSV here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Handle a CLI command
///
/// Routes the command to the appropriate handler module.
///
/// # Arguments
/// * `command` - The command to execute
/// * `config` - The CLI configuration
///
/// # Returns
/// Result indicating success or failure
pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Import {
            file,
            timeout,
            no_deadline,
        } => import::handle_import_command(&file, timeout, no_deadline, config).await,
        Commands::Export {
            track,
            cohort,
            output,
        } => export::handle_export_command(track, cohort, output, config).await,
    }
}
