//! Command-line argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use pcapscope_core::DEFAULT_TOP_N;

use super::OutputFormat;

/// Classify packet captures and report traffic statistics.
#[derive(Parser, Debug)]
#[command(name = "pcapscope")]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Storage database for saved tables
    #[arg(long, env = "PCAPSCOPE_DB", default_value = "pcapscope.db", global = true)]
    pub db: PathBuf,

    /// Directory receiving support.log, error.log and checksum.log
    #[arg(long = "log-dir", env = "PCAPSCOPE_LOG_DIR", default_value = "logs", global = true)]
    pub log_dir: PathBuf,

    /// Entries per top-N report
    #[arg(long, default_value_t = DEFAULT_TOP_N, global = true)]
    pub top: usize,

    /// Target number of buckets in the speed series
    #[arg(long, default_value = "20", global = true)]
    pub intervals: usize,

    /// Output format for stdout
    #[arg(long = "format", value_enum, default_value = "table", global = true)]
    pub format: OutputFormat,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify capture files and print the overview report
    Overview {
        /// Capture files (pcap or pcapng)
        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Classify capture files and save the table under a slot
    Save {
        /// Slot name
        #[arg(long)]
        slot: String,

        /// Overwrite an existing slot
        #[arg(long)]
        replace: bool,

        #[arg(value_name = "FILE", required = true)]
        files: Vec<PathBuf>,
    },

    /// Print the overview report of a saved slot
    Show {
        #[arg(long)]
        slot: String,
    },

    /// List saved slots
    Slots,

    /// Delete a saved slot
    Delete {
        #[arg(long)]
        slot: String,
    },

    /// List registered protocol decoders and their fields
    Protocols,
}

impl Args {
    /// Tracing filter selected by `-v` repetitions.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
