//! Import progress types

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Phase of one import submission sequence
///
/// A sequence starts in `Submitting` and moves to `Done` (synchronous
/// completion), `Rejected` (local validation failure, no request made), or
/// through one `Waiting` per poll attempt until the terminal report arrives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ImportPhase {
    Submitting,
    Waiting { attempt: u32 },
    Done,
    Rejected,
}

/// Progress notification emitted on each phase transition
///
/// Tagged with the client-generated submission id so concurrent callers can
/// route events to the right surface without sharing any identifier state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportEvent {
    pub submission_id: Uuid,
    pub phase: ImportPhase,
    pub at: chrono::DateTime<chrono::Utc>,
}

impl ImportEvent {
    /// Creates an event for `phase` stamped with the current time.
    pub fn now(submission_id: Uuid, phase: ImportPhase) -> Self {
        Self {
            submission_id,
            phase,
            at: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_carries_submission_id() {
        let submission_id = Uuid::new_v4();
        let event = ImportEvent::now(submission_id, ImportPhase::Submitting);
        assert_eq!(event.submission_id, submission_id);
        assert_eq!(event.phase, ImportPhase::Submitting);
    }

    #[test]
    fn test_waiting_phases_compare_by_attempt() {
        assert_eq!(
            ImportPhase::Waiting { attempt: 2 },
            ImportPhase::Waiting { attempt: 2 }
        );
        assert_ne!(
            ImportPhase::Waiting { attempt: 1 },
            ImportPhase::Waiting { attempt: 2 }
        );
    }
}
