//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Sequencer resequencing benchmark analyzer.
///
/// Computes transaction throughput from a sequencer log and charts the
/// container resource usage captured while the run was in flight.
#[derive(Debug, Parser)]
#[command(name = "sb", version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Compute resequencing throughput from a sequencer log
    Tps {
        /// Path to the sequencer log file
        log_file: PathBuf,

        /// Calendar year applied to log timestamps, which carry none.
        /// Defaults to the current year
        #[arg(long)]
        year: Option<i32>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Chart container CPU and memory usage from a docker stats capture
    Stats {
        /// Path to the captured `docker stats` output
        stats_file: PathBuf,

        /// Container name to keep rows for (overrides config)
        #[arg(long)]
        container: Option<String>,

        /// Chart width in columns (overrides config)
        #[arg(long)]
        width: Option<usize>,

        /// Output the summaries and raw series as JSON
        #[arg(long)]
        json: bool,
    },
}
