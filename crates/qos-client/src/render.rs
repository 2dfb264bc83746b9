// SPDX-License-Identifier: Apache-2.0
//! Human-readable and JSON rendering of the public records.
//!
//! Pure functions over already-fetched [`TaskResult`]/[`BackendPool`]
//! snapshots: no I/O, no terminal styling. Callers that want color apply it
//! on top.

use crate::resource::BackendPool;
use crate::result::TaskResult;

const HISTOGRAM_WIDTH: usize = 40;
const MIN_KEY_COLUMN: usize = 16;

/// Outcome table with count and probability columns.
pub fn result_table(result: &TaskResult) -> String {
    let mut out = format!(
        "qid={}  shots={}  outcomes={}\n",
        result.id,
        result.shots,
        result.outcomes.len()
    );

    let key_width = result
        .outcomes
        .iter()
        .map(|o| o.key.len() + 2) // |...>
        .max()
        .unwrap_or(0)
        .max(MIN_KEY_COLUMN);

    out.push_str(&format!(
        "{:<key_width$}  {:>8}  {:>8}\n",
        "state", "count", "prob"
    ));
    out.push_str(&format!("{}\n", "-".repeat(key_width + 22)));

    let total = result.total_counts().max(1);
    for outcome in &result.outcomes {
        let pct = outcome.count as f64 * 100.0 / total as f64;
        out.push_str(&format!(
            "{:<key_width$}  {:>8}  {:>7.1}%\n",
            format!("|{}>", outcome.key),
            outcome.count,
            pct
        ));
    }
    out
}

/// ASCII bar histogram of the outcome distribution.
pub fn result_histogram(result: &TaskResult) -> String {
    let mut out = format!("qid={}  shots={}\n", result.id, result.shots);
    let peak = result
        .outcomes
        .iter()
        .map(|o| o.count)
        .max()
        .unwrap_or(0)
        .max(1);

    let key_width = result
        .outcomes
        .iter()
        .map(|o| o.key.len() + 2)
        .max()
        .unwrap_or(0)
        .max(MIN_KEY_COLUMN);

    for outcome in &result.outcomes {
        let bar = (outcome.count as usize * HISTOGRAM_WIDTH) / peak as usize;
        out.push_str(&format!(
            "{:<key_width$}  {:<bar_width$}  {}\n",
            format!("|{}>", outcome.key),
            "#".repeat(bar),
            outcome.count,
            bar_width = HISTOGRAM_WIDTH
        ));
    }
    out
}

/// Pretty-printed JSON of a result snapshot.
pub fn result_json(result: &TaskResult) -> serde_json::Result<String> {
    serde_json::to_string_pretty(result)
}

/// Backend pool table matching the original tooling columns.
pub fn pool_table(pool: &BackendPool) -> String {
    let mut out = format!("QuantumOS backend pool  ({} backends)\n", pool.len());
    out.push_str(&format!(
        "{:<10}  {:>6}  {:>6}  {:<14}  {:>8}  {}\n",
        "backend", "qubits", "avail", "state", "fidelity", "current_qid"
    ));
    out.push_str(&format!("{}\n", "-".repeat(64)));

    for backend in &pool.backends {
        let fidelity = backend
            .fidelity
            .map_or_else(|| "-".to_string(), |f| f.to_string());
        let current = backend
            .current_task
            .map_or_else(|| "-".to_string(), |t| t.to_string());
        out.push_str(&format!(
            "{:<10}  {:>6}  {:>6}  {:<14}  {:>8}  {}\n",
            backend.name,
            backend.total_qubits,
            backend.qubits_available,
            backend.state.name(),
            fidelity,
            current
        ));
    }
    out
}

/// Pretty-printed JSON of a pool snapshot.
pub fn pool_json(pool: &BackendPool) -> serde_json::Result<String> {
    serde_json::to_string_pretty(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AbiProfile;
    use crate::ffi::{RawBackendPool, RawResult};

    fn sample_result() -> TaskResult {
        let mut raw = RawResult::for_qid(4);
        raw.shots = 1000;
        raw.num_outcomes = 2;
        raw.keys[0][..2].copy_from_slice(b"00");
        raw.counts[0] = 750;
        raw.keys[1][..2].copy_from_slice(b"11");
        raw.counts[1] = 250;
        TaskResult::decode(&raw, AbiProfile::Full).unwrap()
    }

    #[test]
    fn test_table_shape() {
        let table = result_table(&sample_result());
        assert!(table.starts_with("qid=4  shots=1000  outcomes=2\n"));
        assert!(table.contains("|00>"));
        assert!(table.contains("750"));
        assert!(table.contains("75.0%"));
        assert!(table.contains("25.0%"));
    }

    #[test]
    fn test_histogram_scales_to_peak() {
        let hist = result_histogram(&sample_result());
        let bars: Vec<usize> = hist
            .lines()
            .skip(1)
            .map(|l| l.matches('#').count())
            .collect();
        assert_eq!(bars[0], HISTOGRAM_WIDTH); // peak outcome fills the width
        assert!(bars[1] > 0 && bars[1] < HISTOGRAM_WIDTH);
    }

    #[test]
    fn test_empty_result_renders() {
        let mut raw = RawResult::for_qid(9);
        raw.shots = 100;
        let result = TaskResult::decode(&raw, AbiProfile::Full).unwrap();
        let table = result_table(&result);
        assert!(table.contains("outcomes=0"));
        let hist = result_histogram(&result);
        assert!(hist.contains("qid=9"));
    }

    #[test]
    fn test_pool_table_columns() {
        let mut raw = RawBackendPool::zeroed();
        raw.num_backends = 1;
        raw.backends[0].name[..4].copy_from_slice(b"aer0");
        raw.backends[0].total_qubits = 32;
        raw.backends[0].qubits_available = 30;
        raw.backends[0].current_qid = 5;
        let pool = crate::resource::BackendPool::decode(&raw, AbiProfile::Full);

        let table = pool_table(&pool);
        assert!(table.contains("(1 backends)"));
        assert!(table.contains("aer0"));
        assert!(table.contains("IDLE"));
        assert!(table.lines().nth(3).unwrap().trim().ends_with('5'));
    }

    #[test]
    fn test_json_round_trips() {
        let result = sample_result();
        let json = result_json(&result).unwrap();
        let back: TaskResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }
}
