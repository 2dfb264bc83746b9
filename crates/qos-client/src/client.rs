// SPDX-License-Identifier: Apache-2.0
//! Public operations against the QuantumOS driver.
//!
//! # Contract
//!
//! - Every operation is blocking and self-contained: it acquires one device
//!   channel, performs its request(s), and releases the channel before
//!   returning — no handle is held across a wait.
//! - [`QuantumDevice`] holds only immutable configuration (device path, ABI
//!   profile). No state outlives a call, so concurrent calls from multiple
//!   threads or processes are safe with respect to the client; serializing
//!   access to a given task identifier is the driver's business.
//! - Timeouts are cooperative and enforced by the polling loop; a blocked
//!   channel request cannot be interrupted mid-flight.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::channel::DeviceChannel;
use crate::config::{AbiProfile, TaskConfig};
use crate::error::{QosError, Result, Transport};
use crate::ffi::{self, RawBackendPool, RawResult};
use crate::poll::{self, DEFAULT_FETCH_TIMEOUT, DEFAULT_WAIT_TIMEOUT};
use crate::resource::BackendPool;
use crate::result::TaskResult;
use crate::task::{TaskId, TaskState};

/// Handle to the QuantumOS scheduler, bound to a device node path and an
/// ABI profile. Cheap to clone; carries no connection.
#[derive(Debug, Clone)]
pub struct QuantumDevice {
    path: PathBuf,
    profile: AbiProfile,
}

impl Default for QuantumDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl QuantumDevice {
    /// Client for the standard device node with the current ABI profile.
    pub fn new() -> Self {
        Self {
            path: PathBuf::from(ffi::QUANTUM_DEV_PATH),
            profile: AbiProfile::default(),
        }
    }

    /// Use a non-standard device node (test rigs, namespaced devices).
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Select the driver ABI generation to speak.
    pub fn with_profile(mut self, profile: AbiProfile) -> Self {
        self.profile = profile;
        self
    }

    /// The device node this client talks to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The ABI profile in effect.
    pub fn profile(&self) -> AbiProfile {
        self.profile
    }

    /// Submit a circuit for execution and return the driver-assigned
    /// identifier.
    ///
    /// The submission is one write of `header + circuit` followed by one
    /// 4-byte read of the assigned qid. Oversized or empty input is rejected
    /// with [`QosError::InvalidArguments`] before any I/O: the driver's
    /// submission buffer is fixed at [`ffi::QOS_QIR_SIZE`] bytes and cannot
    /// accept a partial circuit.
    pub fn submit(&self, circuit: &str, config: &TaskConfig) -> Result<TaskId> {
        if circuit.is_empty() {
            return Err(QosError::InvalidArguments("empty circuit".into()));
        }

        let header = config.encode_header(self.profile);
        let total = header.len() + circuit.len();
        if total >= ffi::QOS_QIR_SIZE {
            return Err(QosError::InvalidArguments(format!(
                "submission is {total} bytes; header + circuit must stay below {}",
                ffi::QOS_QIR_SIZE
            )));
        }

        let mut buf = Vec::with_capacity(total);
        buf.extend_from_slice(header.as_bytes());
        buf.extend_from_slice(circuit.as_bytes());

        let mut channel = DeviceChannel::open(&self.path)?;
        channel.write_submission(&buf)?;
        let id = channel.read_assigned_id()?;

        info!(qid = id.raw(), shots = config.shots, bytes = total, "task submitted");
        Ok(id)
    }

    /// Query the current state of a task. A single request, no polling.
    ///
    /// A "no such entry" reply is state [`TaskState::Unknown`], not an
    /// error: during internal split/merge the driver transiently forgets an
    /// identifier it will remember again.
    pub fn status(&self, id: TaskId) -> Result<TaskState> {
        let channel = DeviceChannel::open(&self.path)?;
        let mut qid = id.raw();
        match channel.request(ffi::QIOC_STATUS, &mut qid) {
            Ok(code) => Ok(TaskState::from_code(code)),
            Err(err) => match Transport::classify(err) {
                Transport::NoSuchEntry => Ok(TaskState::Unknown),
                other => Err(other.into_error(id.raw(), "status query")),
            },
        }
    }

    /// Block until the task reaches a terminal state.
    ///
    /// `timeout` of `None` applies the 60-second default;
    /// `Some(Duration::ZERO)` waits without bound. Returns the terminal
    /// state — `Failed` is a normal return here, the task's own failure is
    /// reported by [`fetch`](Self::fetch).
    pub fn wait(&self, id: TaskId, timeout: Option<Duration>) -> Result<TaskState> {
        poll::wait_for_terminal(
            id.raw(),
            timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT),
            || self.status(id),
            None,
            std::thread::sleep,
        )
    }

    /// [`wait`](Self::wait) with a per-iteration observer receiving the
    /// polled state and the accumulated elapsed seconds. Purely
    /// observational; the observer cannot influence the wait.
    pub fn wait_with_progress(
        &self,
        id: TaskId,
        timeout: Option<Duration>,
        mut progress: impl FnMut(TaskState, u64),
    ) -> Result<TaskState> {
        poll::wait_for_terminal(
            id.raw(),
            timeout.unwrap_or(DEFAULT_WAIT_TIMEOUT),
            || self.status(id),
            Some(&mut progress),
            std::thread::sleep,
        )
    }

    /// Wait for completion, then fetch and decode the detailed result.
    ///
    /// `timeout` of `None` applies the 30-second default;
    /// `Some(Duration::ZERO)` waits without bound. A task that terminated in
    /// `Failed` yields [`QosError::KernelReportedFailure`] carrying the
    /// fully decoded diagnostic record — retrieval succeeded, the task did
    /// not. Never returns a partially populated result.
    pub fn fetch(&self, id: TaskId, timeout: Option<Duration>) -> Result<TaskResult> {
        let state = poll::wait_for_terminal(
            id.raw(),
            timeout.unwrap_or(DEFAULT_FETCH_TIMEOUT),
            || self.status(id),
            None,
            std::thread::sleep,
        )?;
        self.retrieve(id, state)
    }

    /// [`fetch`](Self::fetch) with a per-iteration observer, as in
    /// [`wait_with_progress`](Self::wait_with_progress). The whole
    /// wait-then-retrieve sequence spends a single timeout budget.
    pub fn fetch_with_progress(
        &self,
        id: TaskId,
        timeout: Option<Duration>,
        mut progress: impl FnMut(TaskState, u64),
    ) -> Result<TaskResult> {
        let state = poll::wait_for_terminal(
            id.raw(),
            timeout.unwrap_or(DEFAULT_FETCH_TIMEOUT),
            || self.status(id),
            Some(&mut progress),
            std::thread::sleep,
        )?;
        self.retrieve(id, state)
    }

    fn retrieve(&self, id: TaskId, state: TaskState) -> Result<TaskResult> {
        let mut raw = RawResult::for_qid(id.raw());
        {
            let channel = DeviceChannel::open(&self.path)?;
            channel
                .request(ffi::QIOC_RESULT, &mut *raw)
                .map_err(|e| Transport::classify(e).into_error(id.raw(), "result fetch"))?;
        }

        let result = TaskResult::decode(&raw, self.profile)?;
        debug!(qid = id.raw(), outcomes = result.outcomes.len(), %state, "result decoded");

        if state == TaskState::Failed || result.failed() {
            return Err(QosError::KernelReportedFailure(Box::new(result)));
        }
        Ok(result)
    }

    /// Request cancellation of a task.
    ///
    /// The driver answers "resource busy" for a task it is actively
    /// executing; that reply is ambiguous at the transport level, so it is
    /// resolved here with a follow-up status query. An actively
    /// running/merging task yields the specific [`QosError::CancelRefused`];
    /// any other state behind a busy reply is an unexpected failure.
    pub fn cancel(&self, id: TaskId) -> Result<()> {
        let outcome = {
            let channel = DeviceChannel::open(&self.path)?;
            let mut qid = id.raw();
            channel.request(ffi::QIOC_CANCEL, &mut qid).map(|_| ())
        };

        match outcome {
            Ok(()) => {
                info!(qid = id.raw(), "task cancelled");
                Ok(())
            }
            Err(err) => match Transport::classify(err) {
                Transport::NoSuchEntry => Err(QosError::NotFound(id.raw())),
                Transport::Busy => {
                    let state = self.status(id)?;
                    if state.is_active() {
                        Err(QosError::CancelRefused {
                            qid: id.raw(),
                            state,
                        })
                    } else {
                        Err(QosError::ControlRequestFailed(format!(
                            "cancel refused as busy, but task {id} reports {state}"
                        )))
                    }
                }
                Transport::OutOfMemory => Err(QosError::OutOfMemory),
                Transport::Other(e) => {
                    Err(QosError::ControlRequestFailed(format!("cancel: {e}")))
                }
            },
        }
    }

    /// Snapshot the driver's backend pool.
    pub fn resources(&self) -> Result<BackendPool> {
        let mut raw = RawBackendPool::zeroed();
        {
            let channel = DeviceChannel::open(&self.path)?;
            channel
                .request(ffi::QIOC_RESOURCE, &mut *raw)
                .map_err(|e| snapshot_error(Transport::classify(e)))?;
        }
        Ok(BackendPool::decode(&raw, self.profile))
    }
}

/// Map a failed pool request. The snapshot names no task, so there is no
/// not-found outcome here; an ENOENT reply is just a failed request.
fn snapshot_error(failure: Transport) -> QosError {
    match failure {
        Transport::OutOfMemory => QosError::OutOfMemory,
        Transport::NoSuchEntry => {
            QosError::ControlRequestFailed("resource snapshot: driver reported no entry".into())
        }
        Transport::Busy => {
            QosError::ControlRequestFailed("resource snapshot: device busy".into())
        }
        Transport::Other(e) => QosError::ControlRequestFailed(format!("resource snapshot: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn offline_device() -> QuantumDevice {
        QuantumDevice::new().with_path("/nonexistent/quantum-test-node")
    }

    #[test]
    fn test_empty_circuit_rejected_before_io() {
        // A missing device node would produce DeviceUnavailable; getting
        // InvalidArguments proves validation runs before any open().
        let err = offline_device()
            .submit("", &TaskConfig::default())
            .unwrap_err();
        assert!(matches!(err, QosError::InvalidArguments(_)));
    }

    #[test]
    fn test_oversized_submission_rejected_before_io() {
        let header = TaskConfig::default().encode_header(AbiProfile::Full);
        let circuit = "x".repeat(ffi::QOS_QIR_SIZE - header.len());
        // header + circuit == QOS_QIR_SIZE exactly: still too big.
        let err = offline_device()
            .submit(&circuit, &TaskConfig::default())
            .unwrap_err();
        assert!(matches!(err, QosError::InvalidArguments(_)));
    }

    #[test]
    fn test_largest_accepted_submission_reaches_device() {
        let header = TaskConfig::default().encode_header(AbiProfile::Full);
        let circuit = "x".repeat(ffi::QOS_QIR_SIZE - header.len() - 1);
        // One byte below the bound passes validation and fails only at open().
        let err = offline_device()
            .submit(&circuit, &TaskConfig::default())
            .unwrap_err();
        assert!(matches!(err, QosError::DeviceUnavailable { .. }));
    }

    #[test]
    fn test_operations_report_device_unavailable() {
        let dev = offline_device();
        let id = TaskId::new(1).unwrap();
        assert!(matches!(
            dev.status(id).unwrap_err(),
            QosError::DeviceUnavailable { .. }
        ));
        assert!(matches!(
            dev.cancel(id).unwrap_err(),
            QosError::DeviceUnavailable { .. }
        ));
        assert!(matches!(
            dev.resources().unwrap_err(),
            QosError::DeviceUnavailable { .. }
        ));
    }

    #[test]
    fn test_fetch_with_progress_shares_the_error_surface() {
        let mut calls = 0u32;
        let err = offline_device()
            .fetch_with_progress(
                TaskId::new(2).unwrap(),
                Some(Duration::from_secs(1)),
                |_, _| calls += 1,
            )
            .unwrap_err();
        assert!(matches!(err, QosError::DeviceUnavailable { .. }));
        // The observer only fires on successful polls.
        assert_eq!(calls, 0);
    }

    #[test]
    fn test_snapshot_errors_never_claim_not_found() {
        // The pool request carries no task identifier; ENOENT must not
        // surface as NotFound(0).
        let err = snapshot_error(Transport::classify(std::io::Error::from_raw_os_error(
            libc::ENOENT,
        )));
        assert!(matches!(err, QosError::ControlRequestFailed(_)));

        let err = snapshot_error(Transport::classify(std::io::Error::from_raw_os_error(
            libc::EBUSY,
        )));
        assert!(matches!(err, QosError::ControlRequestFailed(_)));

        let err = snapshot_error(Transport::classify(std::io::Error::from_raw_os_error(
            libc::ENOMEM,
        )));
        assert!(matches!(err, QosError::OutOfMemory));
    }

    #[test]
    fn test_builder_configuration() {
        let dev = QuantumDevice::new()
            .with_path("/dev/quantum0")
            .with_profile(AbiProfile::Reduced);
        assert_eq!(dev.path(), Path::new("/dev/quantum0"));
        assert_eq!(dev.profile(), AbiProfile::Reduced);
    }
}
