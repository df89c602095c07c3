//! Status polling for pending import jobs
//!
//! One poll is a single POST carrying the job handle. The waiting loop issues
//! polls strictly sequentially, sleeping a fixed interval between them, and
//! loops only on the explicit waiting signal: transport and HTTP failures
//! propagate immediately instead of being retried here.

use tokio::time::{self, Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::{ImportApi, ImportClient};
use scorelift_core::domain::report::ImportReport;
use scorelift_core::dto::import::{ImportStatus, PollRequest, ResultId};

/// Delay between consecutive status checks
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Default cap on how long one job is polled before giving up
pub const DEFAULT_POLL_DEADLINE: Duration = Duration::from_secs(10 * 60);

/// Cap on one polling sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollLimit {
    /// Keep polling until a terminal reply arrives, however long that takes
    Unbounded,
    /// Give up after this many poll requests
    Attempts(u32),
    /// Give up once this much time has elapsed since the first poll
    Deadline(Duration),
}

/// How a polling sequence paces itself and when it gives up
///
/// The default pairs the service's 1000 ms cadence with a ten minute
/// deadline. Waiting forever is available only by explicit request through
/// [`PollPolicy::unbounded`]; exhausting the limit surfaces as the distinct
/// [`ClientError::TimedOut`] instead of an ordinary failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub limit: PollLimit,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            limit: PollLimit::Deadline(DEFAULT_POLL_DEADLINE),
        }
    }
}

impl PollPolicy {
    /// A policy that never gives up, at the default cadence.
    pub fn unbounded() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            limit: PollLimit::Unbounded,
        }
    }
}

fn limit_reached(limit: &PollLimit, attempts: u32, waited: Duration) -> bool {
    match limit {
        PollLimit::Unbounded => false,
        PollLimit::Attempts(max) => attempts >= *max,
        PollLimit::Deadline(deadline) => waited >= *deadline,
    }
}

impl ImportClient {
    /// Ask the service once whether the job behind `id` has finished
    ///
    /// # Arguments
    /// * `id` - The handle issued by a pending submission
    ///
    /// # Returns
    /// The raw reply: still waiting, or the terminal report
    pub async fn poll_status(&self, id: &ResultId) -> Result<ImportStatus> {
        let url = format!("{}/results", self.base_url);
        debug!("Checking import status for result {}", id);

        let response = self
            .client
            .post(&url)
            .form(&PollRequest {
                result_id: id.clone(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Poll until the job behind `id` finishes, then yield its report
    ///
    /// Issues one status check immediately, then one per `policy.interval`
    /// for as long as the service keeps answering with the waiting signal.
    /// Exceeding `policy.limit` yields [`ClientError::TimedOut`]; transport
    /// and HTTP failures propagate after the request that hit them.
    ///
    /// # Arguments
    /// * `id` - The handle issued by a pending submission
    /// * `policy` - Pacing and limit for this sequence
    pub async fn await_report(&self, id: &ResultId, policy: &PollPolicy) -> Result<ImportReport> {
        let cancel = CancellationToken::new();
        poll_until_complete(self, id, policy, &cancel, |attempt| {
            debug!("Result {} still pending, poll attempt {}", id, attempt);
        })
        .await
    }
}

// =============================================================================
// Waiting Loop
// =============================================================================

/// Shared polling loop behind [`ImportClient::await_report`] and the watcher.
///
/// Requests for a handle are strictly sequential; a new poll is never issued
/// before the previous reply has been observed. `observe` runs with the
/// 1-based attempt number right before each request. Cancellation is honored
/// between iterations and never interrupts an in-flight request.
pub(crate) async fn poll_until_complete<A, F>(
    api: &A,
    id: &ResultId,
    policy: &PollPolicy,
    cancel: &CancellationToken,
    mut observe: F,
) -> Result<ImportReport>
where
    A: ImportApi,
    F: FnMut(u32),
{
    let started = Instant::now();
    let mut attempt: u32 = 0;

    loop {
        attempt += 1;
        observe(attempt);

        match api.poll_status(id).await? {
            ImportStatus::Complete(report) => {
                debug!("Result {} completed after {} poll(s)", id, attempt);
                return Ok(report);
            }
            ImportStatus::Pending { waiting: true, .. } => {
                let waited = started.elapsed();
                if limit_reached(&policy.limit, attempt, waited) {
                    warn!(
                        "Giving up on result {} after {} poll(s) over {:?}",
                        id, attempt, waited
                    );
                    return Err(ClientError::TimedOut {
                        attempts: attempt,
                        waited,
                    });
                }

                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("Polling for result {} cancelled", id);
                        return Err(ClientError::Cancelled);
                    }
                    _ = time::sleep(policy.interval) => {}
                }
            }
            ImportStatus::Pending { waiting: false, .. } => {
                return Err(ClientError::ParseError(
                    "reply set waiting to false".to_string(),
                ));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::submit::SubmitOutcome;
    use crate::upload::CsvUpload;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;
    use wiremock::matchers::{body_string_contains, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn waiting() -> ImportStatus {
        ImportStatus::Pending {
            waiting: true,
            result_id: None,
        }
    }

    fn done(total: u64, saved: u64) -> ImportStatus {
        ImportStatus::Complete(ImportReport {
            total,
            saved,
            error_rows: vec![],
            error_messages: vec![],
        })
    }

    /// Fake API that replays scripted poll replies, answering "waiting" once
    /// the script runs out.
    struct ScriptedApi {
        replies: Mutex<VecDeque<Result<ImportStatus>>>,
        polled: Mutex<Vec<ResultId>>,
    }

    impl ScriptedApi {
        fn new(replies: Vec<Result<ImportStatus>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().collect()),
                polled: Mutex::new(Vec::new()),
            }
        }

        async fn poll_count(&self) -> usize {
            self.polled.lock().await.len()
        }
    }

    #[async_trait]
    impl ImportApi for ScriptedApi {
        async fn submit(&self, _upload: CsvUpload) -> Result<SubmitOutcome> {
            unreachable!("polling tests never submit")
        }

        async fn poll_status(&self, id: &ResultId) -> Result<ImportStatus> {
            self.polled.lock().await.push(id.clone());
            self.replies
                .lock()
                .await
                .pop_front()
                .unwrap_or(Ok(waiting()))
        }
    }

    #[tokio::test]
    async fn test_poll_status_sends_form_encoded_handle() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({ "waiting": true, "result_id": "abc123" });

        Mock::given(method("POST"))
            .and(path("/results"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .and(body_string_contains("result_id=abc123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ImportClient::new(mock_server.uri(), "test-token");

        let status = client.poll_status(&ResultId::from("abc123")).await.unwrap();
        assert_eq!(
            status,
            ImportStatus::Pending {
                waiting: true,
                result_id: Some(ResultId::from("abc123")),
            }
        );
    }

    #[tokio::test]
    async fn test_poll_status_returns_terminal_report() {
        let mock_server = MockServer::start().await;

        let response_body = serde_json::json!({
            "total": 10,
            "saved": 8,
            "error_rows": [],
            "error_messages": []
        });

        Mock::given(method("POST"))
            .and(path("/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&response_body))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ImportClient::new(mock_server.uri(), "test-token");

        match client.poll_status(&ResultId::from("abc123")).await.unwrap() {
            ImportStatus::Complete(report) => {
                assert_eq!(report.total, 10);
                assert_eq!(report.saved, 8);
            }
            other => panic!("expected Complete, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_poll_status_http_error_maps_to_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/results"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ImportClient::new(mock_server.uri(), "test-token");

        let error = client
            .poll_status(&ResultId::from("abc123"))
            .await
            .unwrap_err();
        assert!(error.is_server_error());
    }

    #[tokio::test]
    async fn test_await_report_requests_until_terminal_over_http() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/results"))
            .and(body_string_contains("result_id=abc123"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "waiting": true, "result_id": "abc123" })),
            )
            .up_to_n_times(2)
            .expect(2)
            .mount(&mock_server)
            .await;

        Mock::given(method("POST"))
            .and(path("/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "total": 4,
                "saved": 4,
                "error_rows": [],
                "error_messages": []
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = ImportClient::new(mock_server.uri(), "test-token");
        let policy = PollPolicy {
            interval: Duration::from_millis(20),
            limit: PollLimit::Deadline(Duration::from_secs(5)),
        };

        let report = client
            .await_report(&ResultId::from("abc123"), &policy)
            .await
            .unwrap();
        assert_eq!(report.total, 4);
        assert_eq!(report.saved, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_spaces_requests_by_interval() {
        let api = ScriptedApi::new(vec![Ok(waiting()), Ok(waiting()), Ok(done(10, 8))]);
        let id = ResultId::from("abc123");
        let policy = PollPolicy::default();
        let cancel = CancellationToken::new();

        let started = Instant::now();
        let report = poll_until_complete(&api, &id, &policy, &cancel, |_| {})
            .await
            .unwrap();

        assert_eq!(report.total, 10);
        assert_eq!(api.poll_count().await, 3);
        // Two waiting replies, so exactly two inter-poll sleeps
        assert_eq!(started.elapsed(), Duration::from_millis(2000));
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_polls_with_the_given_handle() {
        let api = ScriptedApi::new(vec![Ok(waiting()), Ok(done(1, 1))]);
        let id = ResultId::from("abc123");
        let policy = PollPolicy::default();
        let cancel = CancellationToken::new();

        poll_until_complete(&api, &id, &policy, &cancel, |_| {})
            .await
            .unwrap();

        let polled = api.polled.lock().await;
        assert_eq!(polled.as_slice(), &[id.clone(), id.clone()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_attempts_limit_yields_timeout() {
        let api = ScriptedApi::new(vec![]);
        let id = ResultId::from("abc123");
        let policy = PollPolicy {
            interval: DEFAULT_POLL_INTERVAL,
            limit: PollLimit::Attempts(3),
        };
        let cancel = CancellationToken::new();

        let error = poll_until_complete(&api, &id, &policy, &cancel, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(error, ClientError::TimedOut { attempts: 3, .. }));
        assert_eq!(api.poll_count().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deadline_limit_yields_timeout() {
        let api = ScriptedApi::new(vec![]);
        let id = ResultId::from("abc123");
        let policy = PollPolicy {
            interval: DEFAULT_POLL_INTERVAL,
            limit: PollLimit::Deadline(Duration::from_millis(2500)),
        };
        let cancel = CancellationToken::new();

        let error = poll_until_complete(&api, &id, &policy, &cancel, |_| {})
            .await
            .unwrap_err();

        match error {
            ClientError::TimedOut { attempts, waited } => {
                // Polls at 0 ms, 1000 ms, 2000 ms and 3000 ms; the fourth
                // lands past the deadline
                assert_eq!(attempts, 4);
                assert!(waited >= Duration::from_millis(2500));
            }
            other => panic!("expected TimedOut, got {:?}", other),
        }
        assert_eq!(api.poll_count().await, 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unbounded_policy_outlives_the_default_deadline() {
        let mut replies: Vec<Result<ImportStatus>> = Vec::new();
        for _ in 0..15 {
            replies.push(Ok(waiting()));
        }
        replies.push(Ok(done(2, 2)));

        let api = ScriptedApi::new(replies);
        let id = ResultId::from("abc123");
        let policy = PollPolicy {
            interval: Duration::from_secs(60),
            limit: PollLimit::Unbounded,
        };
        let cancel = CancellationToken::new();

        let report = poll_until_complete(&api, &id, &policy, &cancel, |_| {})
            .await
            .unwrap();

        // 15 minutes of virtual waiting, past the default ten minute cap
        assert_eq!(report.saved, 2);
        assert_eq!(api.poll_count().await, 16);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancellation_aborts_between_polls() {
        let api = ScriptedApi::new(vec![]);
        let id = ResultId::from("abc123");
        let policy = PollPolicy::default();
        let cancel = CancellationToken::new();

        let canceller = cancel.clone();
        tokio::spawn(async move {
            time::sleep(Duration::from_millis(500)).await;
            canceller.cancel();
        });

        let error = poll_until_complete(&api, &id, &policy, &cancel, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(error, ClientError::Cancelled));
        assert_eq!(api.poll_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_transport_error_propagates_without_retry() {
        let api = ScriptedApi::new(vec![
            Ok(waiting()),
            Err(ClientError::api_error(503, "unavailable")),
        ]);
        let id = ResultId::from("abc123");
        let policy = PollPolicy::default();
        let cancel = CancellationToken::new();

        let error = poll_until_complete(&api, &id, &policy, &cancel, |_| {})
            .await
            .unwrap_err();

        assert!(error.is_server_error());
        assert_eq!(api.poll_count().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_waiting_false_reply_is_protocol_error() {
        let api = ScriptedApi::new(vec![Ok(ImportStatus::Pending {
            waiting: false,
            result_id: None,
        })]);
        let id = ResultId::from("abc123");
        let policy = PollPolicy::default();
        let cancel = CancellationToken::new();

        let error = poll_until_complete(&api, &id, &policy, &cancel, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(error, ClientError::ParseError(_)));
        assert_eq!(api.poll_count().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_one_based_attempts() {
        let api = ScriptedApi::new(vec![Ok(waiting()), Ok(waiting()), Ok(done(1, 1))]);
        let id = ResultId::from("abc123");
        let policy = PollPolicy::default();
        let cancel = CancellationToken::new();

        let mut attempts = Vec::new();
        poll_until_complete(&api, &id, &policy, &cancel, |attempt| {
            attempts.push(attempt);
        })
        .await
        .unwrap();

        assert_eq!(attempts, vec![1, 2, 3]);
    }
}
