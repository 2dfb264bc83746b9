//! Version command implementation.

use console::style;

/// Execute the version command.
pub fn execute() {
    let version = env!("CARGO_PKG_VERSION");

    println!(
        "{} {} - userspace tools for the QuantumOS kernel scheduler",
        style("qos").cyan().bold(),
        style(format!("v{version}")).yellow()
    );
    println!();
    println!("Components:");
    println!("  qos-client  Device channel, polling and record decoding");
    println!("  qos-cli     Command-line interface");
    println!();
    println!(
        "Repository: {}",
        style("https://github.com/quantum-os/qos-tools").underlined()
    );
    println!("License:    {}", style("Apache-2.0").dim());
}
