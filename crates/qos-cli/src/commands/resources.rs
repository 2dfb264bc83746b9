//! Resources command implementation.
//!
//! Snapshot of the driver's backend pool, matching the original qresource
//! tool.

use anyhow::Result;

use qos_client::{QuantumDevice, render};

/// Execute the resources command.
pub fn execute(device: &QuantumDevice, json: bool) -> Result<()> {
    let pool = device.resources()?;

    if json {
        println!("{}", render::pool_json(&pool)?);
    } else if pool.is_empty() {
        println!("No backends registered.");
    } else {
        print!("{}", render::pool_table(&pool));
    }
    Ok(())
}
