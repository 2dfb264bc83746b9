//! Result command implementation.
//!
//! Wait for a task to finish, then fetch and print its result.

use anyhow::Result;

use qos_client::{QosError, QuantumDevice, render};

use super::common;

/// Execute the result command.
pub fn execute(
    device: &QuantumDevice,
    qid: i32,
    timeout: u64,
    json: bool,
    histogram: bool,
) -> Result<()> {
    let id = common::task_id(qid)?;

    let spinner = (!json).then(|| common::wait_spinner(id));
    let fetched = device.fetch(id, common::timeout(timeout));
    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }

    match fetched {
        Ok(result) => {
            if json {
                println!("{}", render::result_json(&result)?);
            } else if histogram {
                print!("{}", render::result_histogram(&result));
            } else {
                common::print_result(&result);
            }
            Ok(())
        }
        Err(QosError::KernelReportedFailure(result)) => {
            if json {
                println!("{}", render::result_json(&result)?);
            } else {
                common::print_failure(&result);
            }
            std::process::exit(1);
        }
        Err(QosError::Timeout { qid, elapsed_secs }) => {
            anyhow::bail!(
                "Timeout after {elapsed_secs}s. Task {qid} is still in flight. \
                 Re-run 'qos result {qid}' or raise --timeout."
            );
        }
        Err(e) => Err(e.into()),
    }
}
