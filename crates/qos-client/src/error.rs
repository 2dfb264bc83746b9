// SPDX-License-Identifier: Apache-2.0
//! Error taxonomy and transport-failure translation.
//!
//! Every operation funnels its low-level failures through [`Transport`],
//! which classifies the errno the driver hands back. The public [`QosError`]
//! keeps "the task failed" strictly apart from "the client could not find
//! out" — callers must never have to guess which of the two happened.

use std::io;

use thiserror::Error;

use crate::result::TaskResult;
use crate::task::TaskState;

/// Errors surfaced by the QuantumOS client.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QosError {
    /// The device node could not be opened (driver absent, permissions).
    #[error("cannot open quantum device at '{path}': {cause}")]
    DeviceUnavailable { path: String, cause: io::Error },

    /// Malformed or oversized input, rejected before any I/O.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// The submission write or the identifier read-back failed.
    #[error("submission failed: {0}")]
    SubmissionFailed(String),

    /// A status/result/resource request failed for a reason other than
    /// not-found.
    #[error("control request failed: {0}")]
    ControlRequestFailed(String),

    /// Polling exceeded the caller's deadline.
    #[error("timed out after {elapsed_secs}s waiting for task {qid}")]
    Timeout { qid: i32, elapsed_secs: u64 },

    /// The identifier is unknown to the driver, or the task was cancelled.
    #[error("task {0} not found")]
    NotFound(i32),

    /// A request or response buffer could not be allocated.
    #[error("out of memory allocating a request buffer")]
    OutOfMemory,

    /// The task reached the FAILED state. This is a successful *retrieval*
    /// of a failed *task*: the carried result has the diagnostic
    /// `error_code`/`error_info` fully populated.
    #[error("task {qid} failed (code {code}): {info}", qid = .0.id.raw(), code = .0.error_code, info = .0.error_info)]
    KernelReportedFailure(Box<TaskResult>),

    /// The driver refused to cancel because the task is actively executing.
    /// Produced by the follow-up status query after an EBUSY cancel reply.
    #[error("task {qid} is {state} and cannot be cancelled")]
    CancelRefused { qid: i32, state: TaskState },
}

/// Result alias for client operations.
pub type Result<T> = std::result::Result<T, QosError>;

/// Transport-level failure classes, decoded from the errno of a failed
/// device request.
#[derive(Debug)]
pub(crate) enum Transport {
    /// ENOENT — the driver has no entry for the identifier.
    NoSuchEntry,
    /// EBUSY — the driver refused because the entry is in use.
    Busy,
    /// ENOMEM — the driver could not allocate.
    OutOfMemory,
    /// Anything else.
    Other(io::Error),
}

impl Transport {
    /// Classify a failed request by its raw OS error.
    pub(crate) fn classify(err: io::Error) -> Self {
        match err.raw_os_error() {
            Some(libc::ENOENT) => Transport::NoSuchEntry,
            Some(libc::EBUSY) => Transport::Busy,
            Some(libc::ENOMEM) => Transport::OutOfMemory,
            _ => Transport::Other(err),
        }
    }

    /// Default mapping into the domain taxonomy, for operations that do not
    /// give the failure class its own meaning.
    pub(crate) fn into_error(self, qid: i32, what: &str) -> QosError {
        match self {
            Transport::NoSuchEntry => QosError::NotFound(qid),
            Transport::Busy => {
                QosError::ControlRequestFailed(format!("{what}: device busy (qid={qid})"))
            }
            Transport::OutOfMemory => QosError::OutOfMemory,
            Transport::Other(e) => QosError::ControlRequestFailed(format!("{what}: {e}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os_err(code: i32) -> io::Error {
        io::Error::from_raw_os_error(code)
    }

    #[test]
    fn test_classify_known_errnos() {
        assert!(matches!(
            Transport::classify(os_err(libc::ENOENT)),
            Transport::NoSuchEntry
        ));
        assert!(matches!(
            Transport::classify(os_err(libc::EBUSY)),
            Transport::Busy
        ));
        assert!(matches!(
            Transport::classify(os_err(libc::ENOMEM)),
            Transport::OutOfMemory
        ));
        assert!(matches!(
            Transport::classify(os_err(libc::EIO)),
            Transport::Other(_)
        ));
    }

    #[test]
    fn test_default_mapping() {
        let err = Transport::classify(os_err(libc::ENOENT)).into_error(7, "status");
        assert!(matches!(err, QosError::NotFound(7)));

        let err = Transport::classify(os_err(libc::ENOMEM)).into_error(7, "status");
        assert!(matches!(err, QosError::OutOfMemory));

        let err = Transport::classify(os_err(libc::EIO)).into_error(7, "status");
        assert!(matches!(err, QosError::ControlRequestFailed(_)));
    }
}
