// SPDX-License-Identifier: Apache-2.0
//! Adaptive-backoff polling until a task reaches a terminal state.
//!
//! The state machine:
//!
//! - the interval starts at 50ms and doubles after every unsuccessful
//!   iteration, capped at 500ms — the cap bounds driver load, the small
//!   start bounds perceived latency for fast tasks;
//! - elapsed time accumulates by the *requested* interval, independent of
//!   actual sleep jitter;
//! - `Success` and `Failed` end the loop successfully (a failed task is
//!   still terminal — the caller inspects the result's diagnostic fields);
//! - `Cancelled` ends the loop with `NotFound`: a cancelled task has no
//!   retrievable result;
//! - every `Unknown` observation increments a counter that is **never
//!   reset**, even if a later poll reports a known state. Three observations
//!   anywhere in one poll session are fatal (`NotFound`). The tolerance
//!   exists because split tasks flicker to `Unknown` while the driver merges
//!   sub-circuit results.

use std::time::Duration;

use tracing::debug;

use crate::error::{QosError, Result};
use crate::task::TaskState;

/// Default deadline for a standalone wait.
pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(60);
/// Default deadline for the wait preceding a result fetch.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

const INITIAL_INTERVAL: Duration = Duration::from_millis(50);
const MAX_INTERVAL: Duration = Duration::from_millis(500);

/// Unknown observations tolerated per poll session before the identifier is
/// declared gone.
const UNKNOWN_TOLERANCE: u32 = 3;

/// Doubling backoff with a ceiling: 50, 100, 200, 400, 500, 500, ...
#[derive(Debug)]
pub(crate) struct Backoff {
    next: Duration,
}

impl Backoff {
    pub(crate) fn new() -> Self {
        Self {
            next: INITIAL_INTERVAL,
        }
    }
}

impl Iterator for Backoff {
    type Item = Duration;

    fn next(&mut self) -> Option<Duration> {
        let current = self.next;
        self.next = (current * 2).min(MAX_INTERVAL);
        Some(current)
    }
}

/// Poll `query` until a terminal state, a timeout, or a not-found
/// determination.
///
/// `timeout` of zero means unbounded. `progress`, when given, is invoked
/// once per iteration with the observed state and the accumulated elapsed
/// seconds; it is purely observational. `sleep` is injected so tests can
/// drive the machine without real delays.
pub(crate) fn wait_for_terminal(
    qid: i32,
    timeout: Duration,
    mut query: impl FnMut() -> Result<TaskState>,
    mut progress: Option<&mut dyn FnMut(TaskState, u64)>,
    mut sleep: impl FnMut(Duration),
) -> Result<TaskState> {
    let mut backoff = Backoff::new();
    let mut elapsed = Duration::ZERO;
    let mut unknown_seen: u32 = 0;

    loop {
        let state = query()?;
        debug!(qid, %state, elapsed_ms = elapsed.as_millis() as u64, "poll");

        if let Some(report) = progress.as_deref_mut() {
            report(state, elapsed.as_secs());
        }

        match state {
            TaskState::Success | TaskState::Failed => return Ok(state),
            TaskState::Cancelled => return Err(QosError::NotFound(qid)),
            TaskState::Unknown => {
                unknown_seen += 1;
                if unknown_seen >= UNKNOWN_TOLERANCE {
                    return Err(QosError::NotFound(qid));
                }
            }
            // Pending states; the unknown counter deliberately stays put.
            _ => {}
        }

        if !timeout.is_zero() && elapsed >= timeout {
            return Err(QosError::Timeout {
                qid,
                elapsed_secs: elapsed.as_secs(),
            });
        }

        let interval = backoff.next().unwrap_or(MAX_INTERVAL);
        sleep(interval);
        elapsed += interval;
    }
}
