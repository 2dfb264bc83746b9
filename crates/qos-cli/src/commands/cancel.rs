//! Cancel command implementation.

use anyhow::Result;
use console::style;

use qos_client::{QosError, QuantumDevice};

use super::common;

/// Execute the cancel command.
pub fn execute(device: &QuantumDevice, qid: i32) -> Result<()> {
    let id = common::task_id(qid)?;

    match device.cancel(id) {
        Ok(()) => {
            println!(
                "{} Task {} cancelled",
                style("✓").green().bold(),
                style(id).yellow()
            );
            Ok(())
        }
        Err(QosError::CancelRefused { qid, state }) => {
            anyhow::bail!(
                "Task {qid} is {state} and cannot be cancelled; wait for it with 'qos result {qid}'"
            );
        }
        Err(QosError::NotFound(qid)) => {
            anyhow::bail!("No task with ID {qid}");
        }
        Err(e) => Err(e.into()),
    }
}
