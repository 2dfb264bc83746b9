//! Shared helpers for CLI commands.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qos_client::{
    AbiProfile, AllocStrategy, Mitigation, QuantumDevice, SplitStrategy, TaskId, TaskResult,
    TaskState,
};

/// Build the device handle from the global flags.
pub fn device(path: &Path, reduced_abi: bool) -> QuantumDevice {
    let profile = if reduced_abi {
        AbiProfile::Reduced
    } else {
        AbiProfile::Full
    };
    QuantumDevice::new().with_path(path).with_profile(profile)
}

/// Parse a positive task ID from the command line.
pub fn task_id(qid: i32) -> Result<TaskId> {
    TaskId::new(qid).ok_or_else(|| anyhow::anyhow!("Invalid task ID '{qid}': must be positive"))
}

/// Map a `--timeout` value in seconds to the client's wait argument.
/// Zero means wait without bound.
pub fn timeout(secs: u64) -> Option<Duration> {
    Some(Duration::from_secs(secs))
}

/// Map a numeric mitigation code to its typed form.
pub fn mitigation(code: u8) -> Result<Mitigation> {
    Ok(match code {
        0 => Mitigation::None,
        1 => Mitigation::Measurement,
        2 => Mitigation::CliffordDataRegression,
        3 => Mitigation::ProbabilisticCancellation,
        other => anyhow::bail!("Unknown mitigation level: {other}. Available: 0-3"),
    })
}

/// Map a numeric allocation-strategy code to its typed form.
pub fn alloc_strategy(code: u8) -> Result<AllocStrategy> {
    Ok(match code {
        0 => AllocStrategy::FirstFit,
        1 => AllocStrategy::FidelityAware,
        2 => AllocStrategy::RegressionBased,
        3 => AllocStrategy::TopologyAware,
        other => anyhow::bail!("Unknown allocation strategy: {other}. Available: 0-3"),
    })
}

/// Map a numeric split-strategy code to its typed form.
pub fn split_strategy(code: u8) -> Result<SplitStrategy> {
    Ok(match code {
        0 => SplitStrategy::None,
        1 => SplitStrategy::NaiveSpatial,
        2 => SplitStrategy::Temporal,
        3 => SplitStrategy::ProbabilisticSpatial,
        4 => SplitStrategy::TopologyAware,
        other => anyhow::bail!("Unknown split strategy: {other}. Available: 0-4"),
    })
}

/// Spinner shown while waiting on a task.
pub fn wait_spinner(qid: TaskId) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")
            .unwrap(),
    );
    spinner.set_message(format!("Waiting for task {qid}..."));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Print a successful result as the outcome table.
pub fn print_result(result: &TaskResult) {
    println!(
        "{} Task {} completed ({} shots)",
        style("✓").green().bold(),
        style(result.id).yellow(),
        result.shots
    );
    println!();
    print!("{}", qos_client::render::result_table(result));
}

/// Print the kernel's diagnostic record for a failed task.
pub fn print_failure(result: &TaskResult) {
    println!(
        "{} Task {} failed (error code {})",
        style("✗").red().bold(),
        style(result.id).yellow(),
        style(result.error_code).red()
    );
    if !result.error_info.is_empty() {
        println!("  {}", result.error_info);
    }
}

/// State label with the coloring the original tools used.
pub fn styled_state(state: TaskState) -> console::StyledObject<&'static str> {
    match state {
        TaskState::Success => style(state.name()).green(),
        TaskState::Failed => style(state.name()).red(),
        TaskState::Cancelled => style(state.name()).yellow(),
        TaskState::Running | TaskState::Merging => style(state.name()).cyan(),
        _ => style(state.name()).dim(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_codes_round_trip() {
        assert_eq!(mitigation(2).unwrap(), Mitigation::CliffordDataRegression);
        assert_eq!(alloc_strategy(1).unwrap(), AllocStrategy::FidelityAware);
        assert_eq!(split_strategy(4).unwrap(), SplitStrategy::TopologyAware);
        assert!(mitigation(9).is_err());
        assert!(alloc_strategy(4).is_err());
        assert!(split_strategy(5).is_err());
    }

    #[test]
    fn test_task_id_rejects_nonpositive() {
        assert!(task_id(0).is_err());
        assert!(task_id(-3).is_err());
        assert!(task_id(1).is_ok());
    }

    #[test]
    fn test_device_honors_flags() {
        let dev = device(Path::new("/dev/quantum1"), true);
        assert_eq!(dev.path(), Path::new("/dev/quantum1"));
        assert_eq!(dev.profile(), AbiProfile::Reduced);
    }
}
