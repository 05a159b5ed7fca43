//! Task status state machine.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Task status.
///
/// State transitions:
/// - Accepted -> Processing -> Processed
///
/// No loops, no regressions. Absence of a status record in the store means
/// "unknown": the task never existed, or its result was already fetched and
/// the task deleted.
///
/// Stored on the wire as the lowercase strings `accepted` / `processing` /
/// `processed`.
///
/// Design note: Using an enum ensures exhaustive matching and prevents
/// invalid states; transitions are validated at the task-store boundary
/// instead of trusting callers to set the string correctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    /// Created and enqueued, not yet picked up by a worker.
    Accepted,

    /// A worker is resolving the batch.
    Processing,

    /// All results written back; ready to be fetched (and deleted).
    Processed,
}

impl TaskStatus {
    /// Wire representation (the store holds statuses as plain strings).
    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Accepted => "accepted",
            TaskStatus::Processing => "processing",
            TaskStatus::Processed => "processed",
        }
    }

    /// Is `next` a legal successor of `self`?
    pub fn can_advance_to(self, next: TaskStatus) -> bool {
        matches!(
            (self, next),
            (TaskStatus::Accepted, TaskStatus::Processing)
                | (TaskStatus::Processing, TaskStatus::Processed)
        )
    }

    /// Is the task still in flight (caller should poll again)?
    pub fn is_pending(self) -> bool {
        matches!(self, TaskStatus::Accepted | TaskStatus::Processing)
    }

    /// Is this a terminal status (no further transitions)?
    pub fn is_terminal(self) -> bool {
        matches!(self, TaskStatus::Processed)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a stored status string is not one of the known values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown task status: {0:?}")]
pub struct UnknownStatus(pub String);

impl FromStr for TaskStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "accepted" => Ok(TaskStatus::Accepted),
            "processing" => Ok(TaskStatus::Processing),
            "processed" => Ok(TaskStatus::Processed),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TaskStatus::Accepted, TaskStatus::Processing, true)]
    #[case(TaskStatus::Processing, TaskStatus::Processed, true)]
    #[case(TaskStatus::Accepted, TaskStatus::Processed, false)] // no skipping
    #[case(TaskStatus::Processing, TaskStatus::Accepted, false)] // no regression
    #[case(TaskStatus::Processed, TaskStatus::Processing, false)]
    #[case(TaskStatus::Processed, TaskStatus::Accepted, false)]
    #[case(TaskStatus::Accepted, TaskStatus::Accepted, false)] // no self-loops
    #[case(TaskStatus::Processing, TaskStatus::Processing, false)]
    #[case(TaskStatus::Processed, TaskStatus::Processed, false)]
    fn transition_table(
        #[case] from: TaskStatus,
        #[case] to: TaskStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_advance_to(to), allowed);
    }

    #[rstest]
    #[case(TaskStatus::Accepted, "accepted")]
    #[case(TaskStatus::Processing, "processing")]
    #[case(TaskStatus::Processed, "processed")]
    fn wire_strings_round_trip(#[case] status: TaskStatus, #[case] wire: &str) {
        assert_eq!(status.as_str(), wire);
        assert_eq!(wire.parse::<TaskStatus>().unwrap(), status);
    }

    #[test]
    fn unknown_wire_string_is_rejected() {
        let err = "done".parse::<TaskStatus>().unwrap_err();
        assert_eq!(err, UnknownStatus("done".to_string()));
    }

    #[test]
    fn pending_and_terminal_predicates() {
        assert!(TaskStatus::Accepted.is_pending());
        assert!(TaskStatus::Processing.is_pending());
        assert!(!TaskStatus::Processed.is_pending());
        assert!(TaskStatus::Processed.is_terminal());
    }
}
