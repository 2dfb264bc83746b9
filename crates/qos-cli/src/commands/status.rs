//! Status command implementation.
//!
//! One status query per invocation, matching the original qstat tool:
//! `qos status <qid>` for a task, `qos status -a` for the backend pool.

use anyhow::Result;
use console::style;

use qos_client::QuantumDevice;

use super::common;

/// Execute the status command.
pub fn execute(device: &QuantumDevice, qid: Option<i32>, all: bool, json: bool) -> Result<()> {
    if all {
        return super::resources::execute(device, json);
    }

    let Some(qid) = qid else {
        anyhow::bail!("Provide a task ID, or -a for the backend pool");
    };
    let id = common::task_id(qid)?;
    let state = device.status(id)?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "qid": id, "state": state })
        );
    } else {
        println!(
            "Task {}: {}",
            style(id).yellow(),
            common::styled_state(state)
        );
    }
    Ok(())
}
