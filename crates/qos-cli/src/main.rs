//! QuantumOS command-line tools.
//!
//! One binary, one subcommand per driver operation:
//!
//! ```text
//!   qos run bell.qasm -s 2000 -w     submit a circuit (and optionally wait)
//!   qos status 7                     one status query
//!   qos result 7 --histogram         wait for and print the result
//!   qos cancel 7                     request cancellation
//!   qos resources --json             snapshot the backend pool
//! ```

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use console::style;
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{cancel, resources, result, run, status, version};

/// qos - userspace tools for the QuantumOS kernel scheduler
#[derive(Parser)]
#[command(name = "qos")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Device node to talk to
    #[arg(long, default_value = "/dev/quantum", global = true)]
    device: PathBuf,

    /// Speak the older driver ABI generation (no strategies, no fidelity)
    #[arg(long, global = true)]
    reduced_abi: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a circuit for execution
    Run {
        /// Circuit file (QASM)
        input: Option<PathBuf>,

        /// Inline circuit text instead of a file
        #[arg(short = 'e', long, conflicts_with = "input")]
        expr: Option<String>,

        /// Number of shots
        #[arg(short, long, default_value = "1000")]
        shots: u32,

        /// Scheduling priority (0-9)
        #[arg(short, long, default_value = "0")]
        priority: i32,

        /// Error-mitigation level (0=none 1=measurement 2=CDR 3=PEC)
        #[arg(short, long, default_value = "0")]
        mitigation: u8,

        /// Allocation strategy (0=first-fit 1=fidelity 2=regression 3=topology)
        #[arg(long, default_value = "0")]
        alloc_strategy: u8,

        /// Split strategy (0=none 1=spatial 2=temporal 3=probabilistic 4=topology)
        #[arg(long, default_value = "0")]
        split_strategy: u8,

        /// Wait for the result and print it
        #[arg(short, long)]
        wait: bool,

        /// Wait timeout in seconds (0 = unbounded), with --wait
        #[arg(short, long, default_value = "30")]
        timeout: u64,
    },

    /// Query task status
    Status {
        /// Task ID
        qid: Option<i32>,

        /// Show the backend pool instead of one task
        #[arg(short, long)]
        all: bool,

        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Wait for and print a task result
    Result {
        /// Task ID
        qid: i32,

        /// Wait timeout in seconds (0 = unbounded)
        #[arg(short, long, default_value = "30")]
        timeout: u64,

        /// JSON output
        #[arg(long)]
        json: bool,

        /// ASCII histogram output
        #[arg(long, conflicts_with = "json")]
        histogram: bool,
    },

    /// Cancel a task
    Cancel {
        /// Task ID
        qid: i32,
    },

    /// Show the backend resource pool
    Resources {
        /// JSON output
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    // Setup logging
    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let device = commands::common::device(&cli.device, cli.reduced_abi);

    // Execute command
    let result = match cli.command {
        Commands::Run {
            input,
            expr,
            shots,
            priority,
            mitigation,
            alloc_strategy,
            split_strategy,
            wait,
            timeout,
        } => run::execute(
            &device,
            input.as_deref(),
            expr.as_deref(),
            shots,
            priority,
            mitigation,
            alloc_strategy,
            split_strategy,
            wait,
            timeout,
        ),

        Commands::Status { qid, all, json } => status::execute(&device, qid, all, json),

        Commands::Result {
            qid,
            timeout,
            json,
            histogram,
        } => result::execute(&device, qid, timeout, json, histogram),

        Commands::Cancel { qid } => cancel::execute(&device, qid),

        Commands::Resources { json } => resources::execute(&device, json),

        Commands::Version => {
            version::execute();
            Ok(())
        }
    };

    // Handle errors
    if let Err(e) = result {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }
}
