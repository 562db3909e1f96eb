//! Runs writer and snapshot threads against a wait-free snapshot object, and
//! logs every operation they perform.
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing::info;
use tracing_subscriber::EnvFilter;

use wfsnap_harness::{run, Params, RunConfig, Variant};

/// Wait-free snapshot harness
#[derive(Parser, Debug)]
#[command(name = "wfsnap", version)]
struct Args {
    /// Parameters file: n_threads capacity lambda_1 lambda_2 n_snapshots
    #[arg(short, long, value_name = "PATH", default_value = "inp-params.txt")]
    params: PathBuf,

    /// Where to write the merged operation log
    #[arg(short, long, value_name = "PATH", default_value = "output.txt")]
    output: PathBuf,

    /// Snapshot object to drive
    #[arg(long, value_enum, default_value_t = Variant::Mrmw)]
    variant: Variant,

    /// Number of snapshot threads
    #[arg(long, default_value_t = 1)]
    readers: usize,

    /// Seed for the random number generators of every thread
    #[arg(long)]
    seed: Option<u64>,

    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let params = Params::from_file(&args.params)
        .with_context(|| format!("failed to load parameters from {}", args.params.display()))?;
    let config = RunConfig {
        params,
        variant: args.variant,
        readers: args.readers,
        seed: args.seed,
    };

    let report = run(&config).context("invalid snapshot configuration")?;

    let file = File::create(&args.output)
        .with_context(|| format!("failed to create {}", args.output.display()))?;
    report
        .write_log(BufWriter::new(file))
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!(output = %args.output.display(), events = report.events.len(), "wrote log");

    let stats = &report.stats;
    println!(
        "Average time to take a snapshot: {} µs",
        stats.average().as_micros()
    );
    println!(
        "Worst-case time to take a snapshot: {} µs",
        stats.worst.as_micros()
    );
    println!(
        "Snapshots: {} clean, {} borrowed",
        stats.clean, stats.borrowed
    );
    Ok(())
}
