// SPDX-License-Identifier: Apache-2.0
//! # qos-client
//!
//! Userspace client for the QuantumOS kernel task scheduler. The driver
//! accepts circuit workloads through a character device, executes them on a
//! pool of backends, and answers status/result/resource requests over a
//! narrow, versioned ioctl boundary this crate mirrors byte for byte.
//!
//! ## Architecture
//!
//! ```text
//!            ┌────────────────────────────┐
//!            │      qos CLI / callers      │
//!            └─────────────┬──────────────┘
//!                          │ public records
//!            ┌─────────────┴──────────────┐
//!            │        qos-client          │
//!            │                            │
//!            │  QuantumDevice  ← submit/status/fetch/cancel/resources
//!            │  DeviceChannel  ← RAII open/act/close per request
//!            │  poll           ← backoff state machine
//!            │  ffi            ← exact driver record layouts
//!            └─────────────┬──────────────┘
//!                          │ write/read + ioctl
//!            ┌─────────────┴──────────────┐
//!            │        /dev/quantum        │
//!            │      (quantum_os.ko)       │
//!            └────────────────────────────┘
//! ```
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use qos_client::{QuantumDevice, TaskConfig};
//!
//! let device = QuantumDevice::new();
//! let circuit = "OPENQASM 2.0;\nqreg q[2]; h q[0]; cx q[0],q[1];\n";
//!
//! let id = device.submit(circuit, &TaskConfig::new().with_shots(2000))?;
//! let result = device.fetch(id, None)?;
//!
//! for outcome in &result.outcomes {
//!     println!("|{}>  {}", outcome.key, outcome.count);
//! }
//! # Ok::<(), qos_client::QosError>(())
//! ```
//!
//! Every operation is a self-contained open/act/close cycle: there is no
//! persistent connection and no client-side state across calls, so the
//! handle can be cloned and used from many threads freely.

mod channel;
pub mod client;
pub mod config;
pub mod error;
pub mod ffi;
mod poll;
pub mod render;
pub mod resource;
pub mod result;
pub mod task;

// Re-export the most commonly used types at crate root.
pub use client::QuantumDevice;
pub use config::{AbiProfile, AllocStrategy, Mitigation, SplitStrategy, TaskConfig};
pub use error::{QosError, Result};
pub use poll::{DEFAULT_FETCH_TIMEOUT, DEFAULT_WAIT_TIMEOUT};
pub use resource::{Backend, BackendPool, BackendState, Connectivity};
pub use result::{Outcome, TaskResult};
pub use task::{TaskId, TaskState};
