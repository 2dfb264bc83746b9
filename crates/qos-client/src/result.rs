// SPDX-License-Identifier: Apache-2.0
//! Public result record and the decode from the driver's private layout.
//!
//! The decode is defensive throughout: the driver is trusted, but the client
//! never reads past its own fixed-capacity buffers regardless of what the
//! record claims. Reported counts are clamped, fixed-size text fields are
//! truncated at their bound and at the first NUL, whichever comes first.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AbiProfile;
use crate::error::{QosError, Result};
use crate::ffi::{self, RawResult};
use crate::task::TaskId;

/// One observed measurement outcome: a bitstring label and how many of the
/// requested shots produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    /// Short text label (bitstring) identifying the measurement result.
    pub key: String,
    /// Number of shots that produced this outcome.
    pub count: u32,
}

/// Execution result of one task. A snapshot: freshly allocated per fetch,
/// fully owned by the caller, never mutated by the client after return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskResult {
    /// The task this result belongs to.
    pub id: TaskId,
    /// Shots the driver actually executed.
    pub shots: u32,
    /// Ordered outcome histogram, at most [`ffi::QOS_MAX_OUTCOMES`] entries.
    /// The driver guarantees the counts sum to at most `shots`.
    pub outcomes: Vec<Outcome>,
    /// Driver error code; zero for a successful task.
    pub error_code: i32,
    /// Free-text diagnostic, empty unless the task failed.
    #[serde(skip_serializing_if = "String::is_empty", default)]
    pub error_info: String,
    /// Driver-reported fidelity score for the completed task.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fidelity: Option<u32>,
    /// Number of sub-circuits, when the driver split the task internally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_circuits: Option<u32>,
    /// Completion time, when the driver reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl TaskResult {
    /// Whether the task terminated in the FAILED state.
    pub fn failed(&self) -> bool {
        self.error_code != 0
    }

    /// Sum of all outcome counts. Driver-enforced to be at most `shots`.
    pub fn total_counts(&self) -> u64 {
        self.outcomes.iter().map(|o| u64::from(o.count)).sum()
    }

    /// Translate the driver's private record into the stable public one.
    pub(crate) fn decode(raw: &RawResult, profile: AbiProfile) -> Result<Self> {
        let id = TaskId::new(raw.qid).ok_or_else(|| {
            QosError::ControlRequestFailed(format!(
                "result record carries invalid qid {}",
                raw.qid
            ))
        })?;

        let num = raw.num_outcomes.clamp(0, ffi::QOS_MAX_OUTCOMES as i32) as usize;
        let outcomes = (0..num)
            .map(|i| Outcome {
                key: bounded_text(&raw.keys[i]),
                count: raw.counts[i].max(0) as u32,
            })
            .collect();

        let (fidelity, sub_circuits, completed_at) = match profile {
            AbiProfile::Full => (
                (raw.fidelity_score > 0).then_some(raw.fidelity_score as u32),
                (raw.num_sub_circuits > 0).then_some(raw.num_sub_circuits as u32),
                (raw.completed_ns > 0)
                    .then(|| DateTime::from_timestamp_nanos(raw.completed_ns as i64)),
            ),
            AbiProfile::Reduced => (None, None, None),
        };

        Ok(Self {
            id,
            shots: raw.shots.max(0) as u32,
            outcomes,
            error_code: raw.error_code,
            error_info: bounded_text(&raw.error_info),
            fidelity,
            sub_circuits,
            completed_at,
        })
    }
}

/// Copy a fixed-size driver text field, stopping at the first NUL and never
/// reading the final byte of the buffer (the terminator slot). Non-UTF-8
/// bytes are replaced rather than rejected.
pub(crate) fn bounded_text(field: &[u8]) -> String {
    let bound = field.len().saturating_sub(1);
    let end = field[..bound]
        .iter()
        .position(|&b| b == 0)
        .unwrap_or(bound);
    String::from_utf8_lossy(&field[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_key(raw: &mut RawResult, i: usize, key: &str, count: i32) {
        raw.keys[i][..key.len()].copy_from_slice(key.as_bytes());
        raw.counts[i] = count;
    }

    fn sample_raw() -> Box<RawResult> {
        let mut raw = RawResult::for_qid(11);
        raw.shots = 1000;
        raw.num_outcomes = 2;
        put_key(&mut raw, 0, "00", 512);
        put_key(&mut raw, 1, "11", 488);
        raw.fidelity_score = 87;
        raw.num_sub_circuits = 2;
        raw.completed_ns = 1_700_000_000_000_000_000;
        raw
    }

    #[test]
    fn test_decode_success_record() {
        let result = TaskResult::decode(&sample_raw(), AbiProfile::Full).unwrap();
        assert_eq!(result.id.raw(), 11);
        assert_eq!(result.shots, 1000);
        assert_eq!(result.outcomes.len(), 2);
        assert_eq!(result.outcomes[0].key, "00");
        assert_eq!(result.outcomes[0].count, 512);
        assert_eq!(result.total_counts(), 1000);
        assert!(!result.failed());
        assert_eq!(result.fidelity, Some(87));
        assert_eq!(result.sub_circuits, Some(2));
        assert!(result.completed_at.is_some());
    }

    #[test]
    fn test_decode_is_deterministic() {
        let raw = sample_raw();
        let a = TaskResult::decode(&raw, AbiProfile::Full).unwrap();
        let b = TaskResult::decode(&raw, AbiProfile::Full).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_decode_failed_record() {
        let mut raw = RawResult::for_qid(5);
        raw.shots = 100;
        raw.error_code = 6;
        raw.error_info[..11].copy_from_slice(b"backend I/O");
        let result = TaskResult::decode(&raw, AbiProfile::Full).unwrap();
        assert!(result.failed());
        assert_eq!(result.error_code, 6);
        assert_eq!(result.error_info, "backend I/O");
        assert!(result.outcomes.is_empty());
    }

    #[test]
    fn test_outcome_count_clamped() {
        let mut raw = sample_raw();
        raw.num_outcomes = 100;
        let result = TaskResult::decode(&raw, AbiProfile::Full).unwrap();
        assert_eq!(result.outcomes.len(), ffi::QOS_MAX_OUTCOMES);

        raw.num_outcomes = -4;
        let result = TaskResult::decode(&raw, AbiProfile::Full).unwrap();
        assert!(result.outcomes.is_empty());
    }

    #[test]
    fn test_unterminated_key_is_truncated_at_bound() {
        let mut raw = RawResult::for_qid(3);
        raw.num_outcomes = 1;
        raw.keys[0] = [b'1'; ffi::QOS_KEY_LEN];
        raw.counts[0] = 1;
        let result = TaskResult::decode(&raw, AbiProfile::Full).unwrap();
        // Never reads the terminator slot, even when the driver filled it.
        assert_eq!(result.outcomes[0].key.len(), ffi::QOS_KEY_LEN - 1);
    }

    #[test]
    fn test_negative_counts_clamped_to_zero() {
        let mut raw = RawResult::for_qid(3);
        raw.num_outcomes = 1;
        put_key(&mut raw, 0, "0", -17);
        let result = TaskResult::decode(&raw, AbiProfile::Full).unwrap();
        assert_eq!(result.outcomes[0].count, 0);
    }

    #[test]
    fn test_reduced_profile_drops_extension_fields() {
        let result = TaskResult::decode(&sample_raw(), AbiProfile::Reduced).unwrap();
        assert_eq!(result.fidelity, None);
        assert_eq!(result.sub_circuits, None);
        assert_eq!(result.completed_at, None);
        // The base fields are unaffected.
        assert_eq!(result.outcomes.len(), 2);
    }

    #[test]
    fn test_invalid_qid_rejected() {
        let raw = RawResult::for_qid(1);
        let mut raw = raw;
        raw.qid = 0;
        assert!(TaskResult::decode(&raw, AbiProfile::Full).is_err());
    }

    #[test]
    fn test_json_omits_absent_optionals() {
        let mut raw = RawResult::for_qid(2);
        raw.shots = 10;
        let result = TaskResult::decode(&raw, AbiProfile::Reduced).unwrap();
        let json = serde_json::to_string(&result).unwrap();
        assert!(!json.contains("fidelity"));
        assert!(!json.contains("completed_at"));
        assert!(!json.contains("error_info"));
    }
}
