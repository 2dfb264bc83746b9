//! Run command implementation.
//!
//! Submit a circuit, print the assigned task ID, and optionally wait for
//! the result in place.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use qos_client::{QosError, QuantumDevice, TaskConfig};

use super::common;

/// Execute the run command.
#[allow(clippy::too_many_arguments)]
pub fn execute(
    device: &QuantumDevice,
    input: Option<&Path>,
    expr: Option<&str>,
    shots: u32,
    priority: i32,
    mitigation: u8,
    alloc_strategy: u8,
    split_strategy: u8,
    wait: bool,
    timeout: u64,
) -> Result<()> {
    let (circuit, source) = match (input, expr) {
        (Some(path), None) => {
            if !path.exists() {
                anyhow::bail!("File not found: {}", path.display());
            }
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path.display()))?;
            (text, path.display().to_string())
        }
        (None, Some(text)) => (text.to_string(), "<inline>".to_string()),
        _ => anyhow::bail!("Provide a circuit file or -e <circuit>"),
    };

    let config = TaskConfig::new()
        .with_shots(shots)
        .with_priority(priority)
        .with_mitigation(common::mitigation(mitigation)?)
        .with_alloc_strategy(common::alloc_strategy(alloc_strategy)?)
        .with_split_strategy(common::split_strategy(split_strategy)?);

    println!(
        "{} Submitting {} ({} shots)",
        style("→").cyan().bold(),
        style(&source).green(),
        shots
    );

    let id = device.submit(&circuit, &config)?;

    println!(
        "{} Submitted as task {}",
        style("✓").green().bold(),
        style(id).yellow()
    );

    if !wait {
        println!("  Check it with 'qos status {id}' or fetch with 'qos result {id}'.");
        return Ok(());
    }

    // One polling session for wait and retrieval, so --timeout bounds the
    // whole thing rather than each half.
    let spinner = common::wait_spinner(id);
    let fetched = device.fetch_with_progress(id, common::timeout(timeout), |state, elapsed| {
        spinner.set_message(format!("Task {id}: {} ({elapsed}s)", state.name()));
    });
    spinner.finish_and_clear();

    match fetched {
        Ok(result) => {
            common::print_result(&result);
            Ok(())
        }
        Err(QosError::KernelReportedFailure(result)) => {
            common::print_failure(&result);
            std::process::exit(1);
        }
        Err(QosError::Timeout { qid, elapsed_secs }) => {
            anyhow::bail!(
                "Timeout after {elapsed_secs}s. Task {qid} is still in flight. \
                 Use 'qos result {qid}' to pick it up later."
            );
        }
        Err(e) => Err(e.into()),
    }
}
