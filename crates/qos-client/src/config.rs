// SPDX-License-Identifier: Apache-2.0
//! Submission configuration and the wire header encoder.

use serde::{Deserialize, Serialize};

use crate::ffi;

/// Which generation of the driver ABI to speak.
///
/// Two generations have shipped: the current one carries allocation/split
/// strategies, fidelity scores and calibration records; the older one
/// predates all of them. Rather than a second code path, [`Reduced`] keeps
/// the canonical wire layout and forces the extension fields to their
/// defaults on submit, reporting them as `None` on decode.
///
/// [`Reduced`]: AbiProfile::Reduced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbiProfile {
    /// Current driver generation, all fields live.
    #[default]
    Full,
    /// Older driver generation: strategies forced to none, fidelity and
    /// calibration data not reported.
    Reduced,
}

/// Error-mitigation level applied by the driver.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mitigation {
    #[default]
    None,
    /// Measurement-error mitigation.
    Measurement,
    /// Clifford data regression.
    CliffordDataRegression,
    /// Probabilistic error cancellation.
    ProbabilisticCancellation,
}

impl Mitigation {
    pub fn code(&self) -> i32 {
        match self {
            Mitigation::None => ffi::QOS_MITI_NONE,
            Mitigation::Measurement => ffi::QOS_MITI_MEM,
            Mitigation::CliffordDataRegression => ffi::QOS_MITI_CDR,
            Mitigation::ProbabilisticCancellation => ffi::QOS_MITI_PEC,
        }
    }
}

/// Backend allocation strategy hint for the driver's scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AllocStrategy {
    #[default]
    FirstFit,
    FidelityAware,
    RegressionBased,
    TopologyAware,
}

impl AllocStrategy {
    pub fn code(&self) -> i32 {
        match self {
            AllocStrategy::FirstFit => ffi::QOS_ALLOC_FIRST_FIT,
            AllocStrategy::FidelityAware => ffi::QOS_ALLOC_FIDELITY,
            AllocStrategy::RegressionBased => ffi::QOS_ALLOC_REGRESSION,
            AllocStrategy::TopologyAware => ffi::QOS_ALLOC_TOPO,
        }
    }
}

/// Circuit splitting strategy hint for the driver's scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitStrategy {
    #[default]
    None,
    NaiveSpatial,
    Temporal,
    ProbabilisticSpatial,
    TopologyAware,
}

impl SplitStrategy {
    pub fn code(&self) -> i32 {
        match self {
            SplitStrategy::None => ffi::QOS_SPLIT_NONE,
            SplitStrategy::NaiveSpatial => ffi::QOS_SPLIT_SPACE_NAIVE,
            SplitStrategy::Temporal => ffi::QOS_SPLIT_TIME,
            SplitStrategy::ProbabilisticSpatial => ffi::QOS_SPLIT_SPACE_PROB,
            SplitStrategy::TopologyAware => ffi::QOS_SPLIT_TOPO_AWARE,
        }
    }
}

/// Default number of shots when the caller does not say otherwise.
pub const DEFAULT_SHOTS: u32 = 1000;

/// Configuration for one submission. Caller-constructed, read-only,
/// consumed once by [`QuantumDevice::submit`].
///
/// [`QuantumDevice::submit`]: crate::client::QuantumDevice::submit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Repeat count for the measurement.
    pub shots: u32,
    /// Scheduling priority, small non-negative integer.
    pub priority: i32,
    /// Error-mitigation level.
    pub mitigation: Mitigation,
    /// Backend allocation strategy.
    pub alloc_strategy: AllocStrategy,
    /// Circuit splitting strategy.
    pub split_strategy: SplitStrategy,
}

impl Default for TaskConfig {
    fn default() -> Self {
        Self {
            shots: DEFAULT_SHOTS,
            priority: 0,
            mitigation: Mitigation::default(),
            alloc_strategy: AllocStrategy::default(),
            split_strategy: SplitStrategy::default(),
        }
    }
}

impl TaskConfig {
    /// Configuration with all defaults (1000 shots, priority 0, everything
    /// else off).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shot count.
    pub fn with_shots(mut self, shots: u32) -> Self {
        self.shots = shots;
        self
    }

    /// Set the scheduling priority.
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Set the error-mitigation level.
    pub fn with_mitigation(mut self, mitigation: Mitigation) -> Self {
        self.mitigation = mitigation;
        self
    }

    /// Set the allocation strategy.
    pub fn with_alloc_strategy(mut self, strategy: AllocStrategy) -> Self {
        self.alloc_strategy = strategy;
        self
    }

    /// Set the split strategy.
    pub fn with_split_strategy(mut self, strategy: SplitStrategy) -> Self {
        self.split_strategy = strategy;
        self
    }

    /// Encode the submission header line.
    ///
    /// The driver parses exactly this shape and strips it before handing the
    /// circuit to the executor:
    ///
    /// ```text
    /// shots=<n> priority=<n> mitigation=<n> alloc_strategy=<n> split_strategy=<n>\n
    /// ```
    ///
    /// Under [`AbiProfile::Reduced`] the strategy fields are forced to their
    /// default codes; the key set never changes.
    pub(crate) fn encode_header(&self, profile: AbiProfile) -> String {
        let (mitigation, alloc, split) = match profile {
            AbiProfile::Full => (
                self.mitigation.code(),
                self.alloc_strategy.code(),
                self.split_strategy.code(),
            ),
            AbiProfile::Reduced => (
                self.mitigation.code(),
                ffi::QOS_ALLOC_FIRST_FIT,
                ffi::QOS_SPLIT_NONE,
            ),
        };
        format!(
            "shots={} priority={} mitigation={} alloc_strategy={} split_strategy={}\n",
            self.shots, self.priority, mitigation, alloc, split
        )
    }
}
