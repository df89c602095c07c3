//! Status message composition for terminal import reports
//!
//! Splits presentation into two steps: [`status_fragments`] decides which
//! semantically tagged fragments a report warrants, and [`StatusFragment::render`]
//! turns each fragment into text through a pluralizing [`Catalog`]. Hosts that
//! need other languages or markup swap the catalog or render the fragments
//! themselves; selection logic stays untouched.

use serde::{Deserialize, Serialize};

use crate::domain::report::ImportReport;

/// One semantically tagged piece of a status message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusFragment {
    /// Count of rows that failed, leading the error branch
    ErrorSummary { errors: u64 },
    /// Job-level error message, reproduced verbatim
    Note(String),
    /// Count of rows the server processed
    RowsProcessed(u64),
    /// Count of learners whose scores were updated
    ScoresSaved(u64),
}

/// Singular/plural template selection, in the style of gettext's `ngettext`
///
/// Stands in for the host's localization service. Templates interpolate the
/// count through a `{count}` placeholder.
pub trait Catalog {
    /// Picks the `singular` or `plural` template based on `count`.
    fn ngettext(&self, singular: &str, plural: &str, count: u64) -> String;
}

/// Built-in English catalog: singular for exactly one, plural otherwise
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishCatalog;

impl Catalog for EnglishCatalog {
    fn ngettext(&self, singular: &str, plural: &str, count: u64) -> String {
        if count == 1 {
            singular.to_string()
        } else {
            plural.to_string()
        }
    }
}

impl StatusFragment {
    /// Renders this fragment through `catalog`.
    pub fn render(&self, catalog: &dyn Catalog) -> String {
        match self {
            StatusFragment::ErrorSummary { errors } => interpolate(
                &catalog.ngettext(
                    "{count} error. Please try again. ",
                    "{count} errors. Please try again. ",
                    *errors,
                ),
                *errors,
            ),
            StatusFragment::Note(text) => text.clone(),
            StatusFragment::RowsProcessed(total) => interpolate(
                &catalog.ngettext(
                    "Processed {count} row. ",
                    "Processed {count} rows. ",
                    *total,
                ),
                *total,
            ),
            StatusFragment::ScoresSaved(saved) => interpolate(
                &catalog.ngettext(
                    "Updated scores for {count} learner.",
                    "Updated scores for {count} learners.",
                    *saved,
                ),
                *saved,
            ),
        }
    }
}

fn interpolate(template: &str, count: u64) -> String {
    template.replace("{count}", &count.to_string())
}

/// Selects the fragments a terminal report warrants.
///
/// Error presence preempts success messaging entirely: a report carrying any
/// row-level or job-level errors yields only the error branch. Within it, the
/// row-error summary is keyed on the number of failed rows and omitted when
/// only job-level messages are present; each message follows as its own
/// fragment, in report order.
pub fn status_fragments(report: &ImportReport) -> Vec<StatusFragment> {
    if report.has_errors() {
        let mut fragments = Vec::new();
        if !report.error_rows.is_empty() {
            fragments.push(StatusFragment::ErrorSummary {
                errors: report.error_rows.len() as u64,
            });
        }
        for message in &report.error_messages {
            fragments.push(StatusFragment::Note(message.clone()));
        }
        fragments
    } else {
        vec![
            StatusFragment::RowsProcessed(report.total),
            StatusFragment::ScoresSaved(report.saved),
        ]
    }
}

/// Renders the full status for a terminal report, one string per fragment.
///
/// Pure function of the report and catalog: re-rendering the same report
/// always produces identical output.
pub fn render_status(report: &ImportReport, catalog: &dyn Catalog) -> Vec<String> {
    status_fragments(report)
        .iter()
        .map(|fragment| fragment.render(catalog))
        .collect()
}
