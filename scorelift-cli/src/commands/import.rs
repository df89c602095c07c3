//! Import command handler
//!
//! Reads a score CSV from disk, runs one watched submission through to its
//! terminal report, and prints the rendered status lines.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use colored::*;
use tokio_util::sync::CancellationToken;
use tracing::info;

use scorelift_client::{
    ClientError, CsvUpload, ImportClient, ImportJob, ImportOutcome, PollLimit, PollPolicy,
};
use scorelift_core::domain::message::{EnglishCatalog, render_status};
use scorelift_core::domain::progress::ImportPhase;
use scorelift_core::domain::report::ImportReport;

use crate::config::Config;

/// Handle the import command
///
/// # Arguments
/// * `file` - Path to the CSV file to submit
/// * `timeout` - Optional polling deadline in seconds
/// * `no_deadline` - Poll without any limit
/// * `config` - The CLI configuration
pub async fn handle_import_command(
    file: &str,
    timeout: Option<u64>,
    no_deadline: bool,
    config: &Config,
) -> Result<()> {
    let path = Path::new(file);
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", file))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.to_string());

    let upload = CsvUpload::new(file_name, data);
    info!(
        "Importing {} ({} bytes) against {}",
        upload.file_name,
        upload.size(),
        config.gradebook_url
    );

    let mut policy = PollPolicy::default();
    if no_deadline {
        policy = PollPolicy::unbounded();
    } else if let Some(seconds) = timeout {
        policy.limit = PollLimit::Deadline(Duration::from_secs(seconds));
    }

    let client = ImportClient::new(&config.gradebook_url, &config.csrf_token);

    // Ctrl-C stops the polling loop at the next iteration boundary
    let cancel = CancellationToken::new();
    let canceller = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    let job = ImportJob::new(client)
        .with_policy(policy)
        .with_cancellation(cancel)
        .with_observer(|event| match event.phase {
            ImportPhase::Submitting => {
                println!("{} Submitting score file...", "▸".cyan());
            }
            ImportPhase::Waiting { attempt } => {
                println!(
                    "{}",
                    format!("  Import still running (check {})...", attempt).dimmed()
                );
            }
            ImportPhase::Done | ImportPhase::Rejected => {}
        });

    match job.run(upload).await {
        Ok(ImportOutcome::Finished(report)) => {
            print_report(&report);
            if report.has_errors() {
                anyhow::bail!("import finished with errors");
            }
            Ok(())
        }
        Ok(ImportOutcome::Rejected(rejection)) => {
            println!("{}", rejection.to_string().yellow());
            anyhow::bail!("upload rejected before submission");
        }
        Err(ClientError::TimedOut { attempts, waited }) => {
            println!(
                "{}",
                format!(
                    "⚠ Import still running after {} check(s) over {}s; gave up waiting.",
                    attempts,
                    waited.as_secs()
                )
                .yellow()
            );
            println!("{}", "  Re-run with --no-deadline to wait it out.".dimmed());
            anyhow::bail!("timed out waiting for the import to finish");
        }
        Err(ClientError::Cancelled) => {
            println!("{}", "✗ Import polling cancelled.".dimmed());
            anyhow::bail!("cancelled");
        }
        Err(error) => Err(error).context("Import request failed"),
    }
}

/// Print the rendered status lines for a terminal report
fn print_report(report: &ImportReport) {
    let lines = render_status(report, &EnglishCatalog);

    if report.has_errors() {
        for line in lines {
            println!("{}", line.trim_end().red());
        }
    } else {
        println!("{} {}", "✓".green(), "Import finished.".bold());
        for line in lines {
            println!("  {}", line.trim_end());
        }
    }
}
