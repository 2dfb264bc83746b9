// SPDX-License-Identifier: Apache-2.0
//! Public backend-pool records and the decode from the driver's private
//! layout. Same defensive copying rules as the result decode, applied per
//! pool entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AbiProfile;
use crate::ffi::{self, RawBackend, RawBackendPool};
use crate::result::bounded_text;
use crate::task::TaskId;

/// Operational state of one backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendState {
    Idle,
    Busy,
    Calibrating,
    Offline,
    /// A state code this client version does not know.
    Other(i32),
}

impl BackendState {
    pub fn from_code(code: i32) -> Self {
        match code {
            ffi::QOS_BACKEND_IDLE => BackendState::Idle,
            ffi::QOS_BACKEND_BUSY => BackendState::Busy,
            ffi::QOS_BACKEND_CALIBRATING => BackendState::Calibrating,
            ffi::QOS_BACKEND_OFFLINE => BackendState::Offline,
            other => BackendState::Other(other),
        }
    }

    /// Uppercase label matching the original tooling output.
    pub fn name(&self) -> &'static str {
        match self {
            BackendState::Idle => "IDLE",
            BackendState::Busy => "BUSY",
            BackendState::Calibrating => "CALIBRATING",
            BackendState::Offline => "OFFLINE",
            BackendState::Other(_) => "UNKNOWN",
        }
    }
}

impl std::fmt::Display for BackendState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Qubit connectivity topology class of a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Connectivity {
    Linear,
    Grid,
    HeavyHex,
    AllToAll,
    Other(i32),
}

impl Connectivity {
    pub fn from_code(code: i32) -> Self {
        match code {
            ffi::QOS_CONN_LINEAR => Connectivity::Linear,
            ffi::QOS_CONN_GRID => Connectivity::Grid,
            ffi::QOS_CONN_HEAVY_HEX => Connectivity::HeavyHex,
            ffi::QOS_CONN_ALL_TO_ALL => Connectivity::AllToAll,
            other => Connectivity::Other(other),
        }
    }
}

/// One execution resource in the driver's pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Backend {
    /// Driver-assigned backend id.
    pub id: i32,
    /// Short name, at most 31 bytes.
    pub name: String,
    /// Total qubit capacity.
    pub total_qubits: u32,
    /// Qubits not currently allocated to a task.
    pub qubits_available: u32,
    /// Operational state.
    pub state: BackendState,
    /// Connectivity topology class.
    pub connectivity: Connectivity,
    /// Task currently bound to this backend, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_task: Option<TaskId>,
    /// Driver-reported fidelity score.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<u32>,
    /// When the backend was last calibrated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_calibrated_at: Option<DateTime<Utc>>,
}

impl Backend {
    fn decode(raw: &RawBackend, profile: AbiProfile) -> Self {
        let (fidelity, last_calibrated_at) = match profile {
            AbiProfile::Full => (
                (raw.fidelity_score > 0).then_some(raw.fidelity_score as u32),
                (raw.calibration.last_calibrated_ns > 0).then(|| {
                    DateTime::from_timestamp_nanos(raw.calibration.last_calibrated_ns as i64)
                }),
            ),
            AbiProfile::Reduced => (None, None),
        };

        Self {
            id: raw.id,
            name: bounded_text(&raw.name),
            total_qubits: raw.total_qubits.max(0) as u32,
            qubits_available: raw.qubits_available.max(0) as u32,
            state: BackendState::from_code(raw.state),
            connectivity: Connectivity::from_code(raw.connectivity),
            current_task: TaskId::new(raw.current_qid),
            fidelity,
            last_calibrated_at,
        }
    }
}

/// Snapshot of the driver's backend pool. Freshly allocated per call, fully
/// owned by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendPool {
    /// At most [`ffi::QOS_MAX_BACKENDS`] entries, in driver order.
    pub backends: Vec<Backend>,
}

impl BackendPool {
    /// Translate the driver's private pool record, clamping the reported
    /// entry count to the fixed maximum.
    pub(crate) fn decode(raw: &RawBackendPool, profile: AbiProfile) -> Self {
        let num = raw.num_backends.clamp(0, ffi::QOS_MAX_BACKENDS as i32) as usize;
        Self {
            backends: raw.backends[..num]
                .iter()
                .map(|b| Backend::decode(b, profile))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.backends.is_empty()
    }

    pub fn len(&self) -> usize {
        self.backends.len()
    }
}
