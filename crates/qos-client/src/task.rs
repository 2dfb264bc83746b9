// SPDX-License-Identifier: Apache-2.0
//! Task identifier and lifecycle state.
//!
//! The state machine as the driver reports it:
//!
//! ```text
//!   submit() ──→ Received ──→ Queued ──→ Running ──→ Success
//!                                          │   ↑
//!                                          │   └── Merging (split tasks)
//!                                          ├──→ Failed
//!                                          └──→ Cancelled
//! ```
//!
//! **Invariants:**
//! - Identifiers are driver-assigned positive integers; the client never
//!   invents one.
//! - `Success`, `Failed` and `Cancelled` are permanent.
//! - While a split task is in `Merging`, status queries may transiently
//!   report `Unknown` between polls. That flicker is expected, not an error.

use serde::{Deserialize, Serialize};

use crate::ffi;

/// Identifier of one submitted task, assigned by the driver at submission.
///
/// Opaque beyond equality and ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i32);

impl TaskId {
    /// Wrap a driver-reported identifier. Returns `None` unless positive.
    pub fn new(qid: i32) -> Option<Self> {
        (qid > 0).then_some(Self(qid))
    }

    /// The raw integer the driver knows this task by.
    pub fn raw(&self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a task, as reported by a status query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskState {
    /// The driver has no (current) record of the identifier. Transient
    /// during split/merge, fatal after repeated observations.
    Unknown,
    /// Accepted, not yet scheduled.
    Received,
    /// Waiting for a backend.
    Queued,
    /// Executing on one or more backends.
    Running,
    /// Terminal: completed with results.
    Success,
    /// Terminal: completed with a diagnostic error record.
    Failed,
    /// Terminal: cancelled before completion; no retrievable result.
    Cancelled,
    /// The driver is recombining sub-circuit results of a split task.
    Merging,
}

impl TaskState {
    /// Decode a driver state code. Out-of-range and negative codes fold into
    /// `Unknown`, which the poller treats as a not-found observation.
    pub fn from_code(code: i32) -> Self {
        match code {
            ffi::QOS_STATE_RECEIVED => TaskState::Received,
            ffi::QOS_STATE_QUEUED => TaskState::Queued,
            ffi::QOS_STATE_RUNNING => TaskState::Running,
            ffi::QOS_STATE_SUCCESS => TaskState::Success,
            ffi::QOS_STATE_FAILED => TaskState::Failed,
            ffi::QOS_STATE_CANCELLED => TaskState::Cancelled,
            ffi::QOS_STATE_MERGING => TaskState::Merging,
            _ => TaskState::Unknown,
        }
    }

    /// Whether this state ends the task's lifecycle.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskState::Success | TaskState::Failed | TaskState::Cancelled
        )
    }

    /// Whether the task is actively executing (and will refuse cancellation).
    pub fn is_active(&self) -> bool {
        matches!(self, TaskState::Running | TaskState::Merging)
    }

    /// Uppercase label matching the original tooling output.
    pub fn name(&self) -> &'static str {
        match self {
            TaskState::Unknown => "UNKNOWN",
            TaskState::Received => "RECEIVED",
            TaskState::Queued => "QUEUED",
            TaskState::Running => "RUNNING",
            TaskState::Success => "SUCCESS",
            TaskState::Failed => "FAILED",
            TaskState::Cancelled => "CANCELLED",
            TaskState::Merging => "MERGING",
        }
    }
}

impl std::fmt::Display for TaskState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_id_must_be_positive() {
        assert!(TaskId::new(1).is_some());
        assert!(TaskId::new(0).is_none());
        assert!(TaskId::new(-3).is_none());
    }

    #[test]
    fn test_state_codes_round_trip() {
        for code in 0..=7 {
            let state = TaskState::from_code(code);
            if code == ffi::QOS_STATE_UNKNOWN {
                assert_eq!(state, TaskState::Unknown);
            } else {
                assert_ne!(state, TaskState::Unknown);
            }
        }
    }

    #[test]
    fn test_out_of_range_codes_fold_to_unknown() {
        assert_eq!(TaskState::from_code(-1), TaskState::Unknown);
        assert_eq!(TaskState::from_code(99), TaskState::Unknown);
    }

    #[test]
    fn test_terminal_states() {
        assert!(TaskState::Success.is_terminal());
        assert!(TaskState::Failed.is_terminal());
        assert!(TaskState::Cancelled.is_terminal());
        assert!(!TaskState::Merging.is_terminal());
        assert!(!TaskState::Unknown.is_terminal());
    }

    #[test]
    fn test_active_states_refuse_cancel() {
        assert!(TaskState::Running.is_active());
        assert!(TaskState::Merging.is_active());
        assert!(!TaskState::Queued.is_active());
    }
}
