//! One-shot import watcher
//!
//! Drives one submission from upload to terminal report as an explicit state
//! machine (submitting, waiting per poll attempt, done or rejected), emitting
//! a progress event on every transition. Each watcher owns its own handle,
//! attempt counter and timers, so concurrent imports never share state.

use tokio::time;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use uuid::Uuid;

use crate::ImportApi;
use crate::error::{ClientError, Result};
use crate::poll::{PollPolicy, poll_until_complete};
use crate::submit::SubmitOutcome;
use crate::upload::{CsvUpload, UploadRejection};
use scorelift_core::domain::progress::{ImportEvent, ImportPhase};
use scorelift_core::domain::report::ImportReport;

/// Terminal outcome of one watched submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// The upload failed a local precondition; nothing was sent
    Rejected(UploadRejection),
    /// The job finished and produced a report
    Finished(ImportReport),
}

/// Watches one submission through to its terminal report
///
/// The watcher generates a submission id up front and tags every progress
/// event with it, so callers running several imports can route updates
/// without sharing any identifier state. [`ImportJob::run`] consumes the
/// watcher: one instance drives at most one sequence.
///
/// # Example
/// ```no_run
/// use scorelift_client::{CsvUpload, ImportClient, ImportJob, ImportOutcome};
///
/// # async fn example() -> anyhow::Result<()> {
/// let client = ImportClient::new("http://localhost:8000", "csrf-token");
/// let job = ImportJob::new(client).with_observer(|event| {
///     println!("{:?}", event.phase);
/// });
///
/// let upload = CsvUpload::new("scores.csv", b"user,score\nalice,90\n".to_vec());
/// match job.run(upload).await? {
///     ImportOutcome::Rejected(reason) => println!("{}", reason),
///     ImportOutcome::Finished(report) => println!("saved {} rows", report.saved),
/// }
/// # Ok(())
/// # }
/// ```
pub struct ImportJob<A: ImportApi> {
    api: A,
    submission_id: Uuid,
    policy: PollPolicy,
    cancel: CancellationToken,
    on_event: Option<Box<dyn Fn(ImportEvent) + Send + Sync>>,
}

impl<A: ImportApi> ImportJob<A> {
    /// Creates a watcher with the default polling policy.
    pub fn new(api: A) -> Self {
        Self {
            api,
            submission_id: Uuid::new_v4(),
            policy: PollPolicy::default(),
            cancel: CancellationToken::new(),
            on_event: None,
        }
    }

    /// Replaces the polling policy.
    pub fn with_policy(mut self, policy: PollPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Attaches a cancellation token, honored between poll iterations.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Attaches a callback invoked on every phase transition.
    pub fn with_observer<F>(mut self, observer: F) -> Self
    where
        F: Fn(ImportEvent) + Send + Sync + 'static,
    {
        self.on_event = Some(Box::new(observer));
        self
    }

    /// The id stamped on every event this watcher emits.
    pub fn submission_id(&self) -> Uuid {
        self.submission_id
    }

    /// Run the submission through to its terminal outcome
    ///
    /// Submits the upload, and when the server answers with a job handle,
    /// waits one poll interval before the first status check and then polls
    /// at that cadence until the report arrives. Cancellation and poll-limit
    /// exhaustion surface as [`ClientError::Cancelled`] and
    /// [`ClientError::TimedOut`]; neither emits a `Done` event nor yields a
    /// report.
    ///
    /// # Arguments
    /// * `upload` - The score file; consumed by the submission
    pub async fn run(self, upload: CsvUpload) -> Result<ImportOutcome> {
        if self.cancel.is_cancelled() {
            return Err(ClientError::Cancelled);
        }

        self.emit(ImportPhase::Submitting);

        match self.api.submit(upload).await? {
            SubmitOutcome::Rejected(rejection) => {
                warn!("Submission {} rejected: {}", self.submission_id, rejection);
                self.emit(ImportPhase::Rejected);
                Ok(ImportOutcome::Rejected(rejection))
            }
            SubmitOutcome::Completed(report) => {
                info!("Submission {} completed synchronously", self.submission_id);
                self.emit(ImportPhase::Done);
                Ok(ImportOutcome::Finished(report))
            }
            SubmitOutcome::Pending(handle) => {
                info!(
                    "Submission {} pending as result {}",
                    self.submission_id, handle
                );

                // First status check happens one interval after the pending
                // reply, matching the cadence of the checks that follow
                tokio::select! {
                    _ = self.cancel.cancelled() => return Err(ClientError::Cancelled),
                    _ = time::sleep(self.policy.interval) => {}
                }

                let report = poll_until_complete(
                    &self.api,
                    &handle,
                    &self.policy,
                    &self.cancel,
                    |attempt| self.emit(ImportPhase::Waiting { attempt }),
                )
                .await?;

                self.emit(ImportPhase::Done);
                Ok(ImportOutcome::Finished(report))
            }
        }
    }

    fn emit(&self, phase: ImportPhase) {
        if let Some(ref on_event) = self.on_event {
            on_event(ImportEvent::now(self.submission_id, phase));
        }
    }
}
