// SPDX-License-Identifier: Apache-2.0
//! Raw constants and record layouts for the QuantumOS driver ABI.
//!
//! Everything in this module must match the kernel-side `quantum_types.h`
//! definitions byte for byte. The driver's records are plain C structs copied
//! across the ioctl boundary, so the mirrors below spell out every
//! compiler-inserted alignment gap as an explicit `_pad` field — a mismatch
//! here does not fail loudly, it silently misreads every field after the gap.
//!
//! The layout tests at the bottom of this file pin the expected sizes and
//! offsets; update them together with the kernel headers or not at all.

use libc::c_ulong;

// ===========================================================================
// Device endpoint
// ===========================================================================

/// Character device node registered by `quantum_os.ko`.
pub const QUANTUM_DEV_PATH: &str = "/dev/quantum";

// ===========================================================================
// Limits (kernel quantum_types.h)
// ===========================================================================

/// Kernel submission buffer size. Header + circuit must fit strictly below it.
pub const QOS_QIR_SIZE: usize = 4096;
/// Maximum distinct measurement outcomes reported per task.
pub const QOS_MAX_OUTCOMES: usize = 32;
/// Fixed storage per outcome key, including the NUL terminator.
pub const QOS_KEY_LEN: usize = 192;
/// Maximum backends in the driver's resource pool.
pub const QOS_MAX_BACKENDS: usize = 8;
/// Fixed storage for a backend name, including the NUL terminator.
pub const QOS_NAME_LEN: usize = 32;
/// Fixed storage for the free-text error description of a failed task.
pub const QOS_ERROR_INFO_LEN: usize = 128;

// ===========================================================================
// ioctl request codes — _IO('Q', n)
// ===========================================================================

const QIOC_MAGIC: c_ulong = b'Q' as c_ulong;

/// Status query: argument is `*mut i32` carrying the qid, state is the
/// ioctl return value.
pub const QIOC_STATUS: c_ulong = (QIOC_MAGIC << 8) | 2;
/// Detailed result fetch: argument is `*mut RawResult` with `qid` set.
pub const QIOC_RESULT: c_ulong = (QIOC_MAGIC << 8) | 3;
/// Cancel request: argument is `*mut i32` carrying the qid.
pub const QIOC_CANCEL: c_ulong = (QIOC_MAGIC << 8) | 4;
/// Backend pool snapshot: argument is `*mut RawBackendPool`.
pub const QIOC_RESOURCE: c_ulong = (QIOC_MAGIC << 8) | 5;

// ===========================================================================
// Task state codes (QTASK_STATE_*)
// ===========================================================================

pub const QOS_STATE_UNKNOWN: i32 = 0;
pub const QOS_STATE_RECEIVED: i32 = 1;
pub const QOS_STATE_QUEUED: i32 = 2;
pub const QOS_STATE_RUNNING: i32 = 3;
pub const QOS_STATE_SUCCESS: i32 = 4;
pub const QOS_STATE_FAILED: i32 = 5;
pub const QOS_STATE_CANCELLED: i32 = 6;
pub const QOS_STATE_MERGING: i32 = 7;

// ===========================================================================
// Backend state codes (QBACKEND_STATE_*)
// ===========================================================================

pub const QOS_BACKEND_IDLE: i32 = 0;
pub const QOS_BACKEND_BUSY: i32 = 1;
pub const QOS_BACKEND_CALIBRATING: i32 = 2;
pub const QOS_BACKEND_OFFLINE: i32 = 3;

// ===========================================================================
// Strategy codes carried in the submission header
// ===========================================================================

pub const QOS_MITI_NONE: i32 = 0;
pub const QOS_MITI_MEM: i32 = 1;
pub const QOS_MITI_CDR: i32 = 2;
pub const QOS_MITI_PEC: i32 = 3;

pub const QOS_ALLOC_FIRST_FIT: i32 = 0;
pub const QOS_ALLOC_FIDELITY: i32 = 1;
pub const QOS_ALLOC_REGRESSION: i32 = 2;
pub const QOS_ALLOC_TOPO: i32 = 3;

pub const QOS_SPLIT_NONE: i32 = 0;
pub const QOS_SPLIT_SPACE_NAIVE: i32 = 1;
pub const QOS_SPLIT_TIME: i32 = 2;
pub const QOS_SPLIT_SPACE_PROB: i32 = 3;
pub const QOS_SPLIT_TOPO_AWARE: i32 = 4;

// ===========================================================================
// Connectivity topology codes
// ===========================================================================

pub const QOS_CONN_LINEAR: i32 = 0;
pub const QOS_CONN_GRID: i32 = 1;
pub const QOS_CONN_HEAVY_HEX: i32 = 2;
pub const QOS_CONN_ALL_TO_ALL: i32 = 3;

// ===========================================================================
// Private record layouts
//
// Field order, widths and padding mirror the kernel structs exactly. The
// `_pad` fields occupy the gaps the kernel compiler inserts; with them
// present the Rust compiler inserts none of its own, which the layout tests
// verify.
// ===========================================================================

/// Kernel `struct quantum_result` — answer to [`QIOC_RESULT`].
///
/// Expected size 6440; `completed_ns` sits at offset 6424, after a 4-byte
/// gap that aligns the 64-bit timestamp.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawResult {
    pub qid: i32,
    pub shots: i32,
    pub num_outcomes: i32,
    pub keys: [[u8; QOS_KEY_LEN]; QOS_MAX_OUTCOMES],
    pub counts: [i32; QOS_MAX_OUTCOMES],
    pub error_code: i32,
    pub error_info: [u8; QOS_ERROR_INFO_LEN],
    pub fidelity_score: i32,
    pub _pad0: [u8; 4],
    pub completed_ns: u64,
    pub num_sub_circuits: i32,
    pub _pad1: [u8; 4],
}

/// Kernel `struct quantum_calibration` — nested in [`RawBackend`].
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawCalibration {
    pub last_calibrated_ns: u64,
    pub round: u32,
    pub drift_ppm: u32,
}

/// Kernel `struct quantum_backend` — one pool entry.
///
/// Expected size 80; the nested calibration record sits at offset 64, after
/// a 4-byte gap following `current_qid`.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawBackend {
    pub id: i32,
    pub name: [u8; QOS_NAME_LEN],
    pub total_qubits: i32,
    pub state: i32,
    pub qubits_available: i32,
    pub connectivity: i32,
    pub fidelity_score: i32,
    pub current_qid: i32,
    pub _pad0: [u8; 4],
    pub calibration: RawCalibration,
}

/// Kernel `struct quantum_backend_pool` — answer to [`QIOC_RESOURCE`].
///
/// Expected size 648.
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawBackendPool {
    pub backends: [RawBackend; QOS_MAX_BACKENDS],
    pub num_backends: i32,
    pub _pad0: [u8; 4],
}

impl RawResult {
    /// An all-zero record with only the qid filled in, ready to hand to the
    /// driver. All-zero is a valid bit pattern for every field.
    pub fn for_qid(qid: i32) -> Box<Self> {
        let mut raw: Box<Self> = Box::new(unsafe { std::mem::zeroed() });
        raw.qid = qid;
        raw
    }
}

impl RawBackendPool {
    /// An all-zero pool buffer for the driver to fill.
    pub fn zeroed() -> Box<Self> {
        Box::new(unsafe { std::mem::zeroed() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::mem::{offset_of, size_of};

    // The Rust rendition of the original daemon habit of asserting sizeof()
    // against the kernel headers before touching the device.

    #[test]
    fn test_raw_result_layout() {
        assert_eq!(size_of::<RawResult>(), 6440);
        assert_eq!(offset_of!(RawResult, qid), 0);
        assert_eq!(offset_of!(RawResult, shots), 4);
        assert_eq!(offset_of!(RawResult, num_outcomes), 8);
        assert_eq!(offset_of!(RawResult, keys), 12);
        assert_eq!(offset_of!(RawResult, counts), 6156);
        assert_eq!(offset_of!(RawResult, error_code), 6284);
        assert_eq!(offset_of!(RawResult, error_info), 6288);
        assert_eq!(offset_of!(RawResult, fidelity_score), 6416);
        // The 4-byte gap before the 64-bit timestamp.
        assert_eq!(offset_of!(RawResult, completed_ns), 6424);
        assert_eq!(offset_of!(RawResult, num_sub_circuits), 6432);
    }

    #[test]
    fn test_raw_backend_layout() {
        assert_eq!(size_of::<RawCalibration>(), 16);
        assert_eq!(size_of::<RawBackend>(), 80);
        assert_eq!(offset_of!(RawBackend, id), 0);
        assert_eq!(offset_of!(RawBackend, name), 4);
        assert_eq!(offset_of!(RawBackend, total_qubits), 36);
        assert_eq!(offset_of!(RawBackend, state), 40);
        assert_eq!(offset_of!(RawBackend, qubits_available), 44);
        assert_eq!(offset_of!(RawBackend, connectivity), 48);
        assert_eq!(offset_of!(RawBackend, fidelity_score), 52);
        assert_eq!(offset_of!(RawBackend, current_qid), 56);
        // The 4-byte gap between the running qid and the nested record.
        assert_eq!(offset_of!(RawBackend, calibration), 64);
    }

    #[test]
    fn test_raw_pool_layout() {
        assert_eq!(size_of::<RawBackendPool>(), 648);
        assert_eq!(offset_of!(RawBackendPool, backends), 0);
        assert_eq!(offset_of!(RawBackendPool, num_backends), 640);
    }

    #[test]
    fn test_ioctl_request_codes() {
        assert_eq!(QIOC_STATUS, 0x5102);
        assert_eq!(QIOC_RESULT, 0x5103);
        assert_eq!(QIOC_CANCEL, 0x5104);
        assert_eq!(QIOC_RESOURCE, 0x5105);
    }

    #[test]
    fn test_for_qid_sets_only_qid() {
        let raw = RawResult::for_qid(42);
        assert_eq!(raw.qid, 42);
        assert_eq!(raw.shots, 0);
        assert_eq!(raw.num_outcomes, 0);
        assert_eq!(raw.completed_ns, 0);
    }
}
