//! Cache hierarchy simulator CLI.
//!
//! This binary runs one trace through one hierarchy and prints the results. It performs:
//! 1. **Argument parsing:** The classic eight positional parameters, or a JSON
//!    configuration file plus the trace path.
//! 2. **Simulation:** Builds the hierarchy and feeds every trace record through it.
//! 3. **Output:** The text report on stdout, or the counter snapshot as JSON with `--json`.
//!
//! Diagnostics go to stderr through `tracing`, filtered by `RUST_LOG`.

use std::fs;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use thiserror::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

use cachesim_core::common::constants::UNNAMED_TRACE;
use cachesim_core::config::HierarchyConfig;
use cachesim_core::sim::{run_trace, run_trace_file};
use cachesim_core::{MemoryHierarchy, Report, SimError};

const PARAMETER_NAMES: [&str; 7] = [
    "BLOCKSIZE",
    "L1_SIZE",
    "L1_ASSOC",
    "L2_SIZE",
    "L2_ASSOC",
    "PREF_N",
    "PREF_M",
];

#[derive(Parser, Debug)]
#[command(
    name = "sim",
    author,
    version,
    about = "Trace-driven L1/L2 cache simulator with stream-buffer prefetching",
    long_about = "Simulate a write-back, write-allocate L1 cache with an optional L2 and an optional stream-buffer prefetcher.\n\nL2_SIZE = 0 disables L2; PREF_N = 0 or PREF_M = 0 disables prefetching.\n\nExamples:\n  sim 32 8192 4 262144 8 3 10 gcc_trace.txt\n  sim --config hierarchy.json gcc_trace.txt\n  sim --json 16 1024 2 0 0 0 0 perl_trace.txt"
)]
struct Cli {
    /// JSON hierarchy configuration; replaces the seven numeric parameters.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the counters as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// BLOCKSIZE L1_SIZE L1_ASSOC L2_SIZE L2_ASSOC PREF_N PREF_M TRACE_FILE
    /// (only TRACE_FILE with --config). A TRACE_FILE of `-` reads stdin.
    #[arg(value_name = "ARGS", required = true, num_args = 1..=8)]
    args: Vec<String>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("expected {expected} positional arguments, got {got}")]
    ArgumentCount { expected: usize, got: usize },

    #[error("{name} must be a non-negative integer, got '{value}'")]
    BadParameter { name: &'static str, value: String },

    #[error("cannot read configuration {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid configuration {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Sim(#[from] SimError),

    #[error("cannot encode counters: {0}")]
    Json(#[from] serde_json::Error),
}

fn main() {
    init_logging();
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let (config, trace_file) = resolve(cli)?;
    let from_stdin = trace_file.as_os_str() == "-";
    let hierarchy = if from_stdin {
        let mut hierarchy = MemoryHierarchy::from_config(&config).map_err(SimError::from)?;
        let _records =
            run_trace(&mut hierarchy, std::io::stdin().lock()).map_err(SimError::from)?;
        hierarchy
    } else {
        run_trace_file(&config, &trace_file)?
    };
    let counters = hierarchy.counters();
    info!(
        l1_miss_rate = counters.l1_miss_rate(),
        traffic = counters.main_memory_traffic,
        "simulation finished"
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&counters)?);
    } else {
        let snapshot = hierarchy.dump_state();
        let name = if from_stdin {
            UNNAMED_TRACE.to_string()
        } else {
            trace_file.display().to_string()
        };
        print!("{}", Report::new(&config, &name, &snapshot, counters));
    }
    Ok(())
}

/// Resolves the hierarchy configuration and trace path from the command line.
fn resolve(cli: &Cli) -> Result<(HierarchyConfig, PathBuf), CliError> {
    if let Some(path) = &cli.config {
        let [trace] = cli.args.as_slice() else {
            return Err(CliError::ArgumentCount {
                expected: 1,
                got: cli.args.len(),
            });
        };
        let text = fs::read_to_string(path).map_err(|source| CliError::ConfigRead {
            path: path.clone(),
            source,
        })?;
        let config =
            HierarchyConfig::from_json(&text).map_err(|source| CliError::ConfigParse {
                path: path.clone(),
                source,
            })?;
        return Ok((config, PathBuf::from(trace)));
    }

    let [params @ .., trace] = cli.args.as_slice() else {
        return Err(CliError::ArgumentCount {
            expected: PARAMETER_NAMES.len() + 1,
            got: 0,
        });
    };
    if params.len() != PARAMETER_NAMES.len() {
        return Err(CliError::ArgumentCount {
            expected: PARAMETER_NAMES.len() + 1,
            got: cli.args.len(),
        });
    }

    let mut values = [0u32; 7];
    for ((slot, name), text) in values.iter_mut().zip(PARAMETER_NAMES).zip(params) {
        *slot = text.parse().map_err(|_| CliError::BadParameter {
            name,
            value: text.clone(),
        })?;
    }
    let [block_size, l1_size, l1_assoc, l2_size, l2_assoc, pref_n, pref_m] = values;
    let config = HierarchyConfig::new(
        block_size, l1_size, l1_assoc, l2_size, l2_assoc, pref_n, pref_m,
    );
    Ok((config, PathBuf::from(trace)))
}
