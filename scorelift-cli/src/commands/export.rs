//! Export command handler
//!
//! Downloads the current scores as CSV, to a file or stdout.

use anyhow::{Context, Result};
use colored::*;
use tracing::info;

use scorelift_client::ImportClient;
use scorelift_core::dto::export::ExportFilter;

use crate::config::Config;

/// Handle the export command
///
/// # Arguments
/// * `track` - Optional track restriction
/// * `cohort` - Optional cohort restriction
/// * `output` - Destination file; stdout when unset
/// * `config` - The CLI configuration
pub async fn handle_export_command(
    track: Option<String>,
    cohort: Option<String>,
    output: Option<String>,
    config: &Config,
) -> Result<()> {
    let client = ImportClient::new(&config.gradebook_url, &config.csrf_token);
    let filter = ExportFilter { track, cohort };
    info!(
        "Exporting scores from {} (track={:?}, cohort={:?})",
        config.gradebook_url, filter.track, filter.cohort
    );

    let csv = client
        .export_scores(&filter)
        .await
        .context("Export request failed")?;

    match output {
        Some(path) => {
            std::fs::write(&path, &csv).with_context(|| format!("Failed to write {}", path))?;
            println!(
                "{} Wrote {} bytes to {}",
                "✓".green(),
                csv.len(),
                path.cyan()
            );
        }
        None => print!("{}", csv),
    }

    Ok(())
}
