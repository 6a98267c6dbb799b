//! Command-line interface module.
//!
//! This module handles:
//! - Argument parsing via clap
//! - Report assembly and output formatting (table, JSON)

mod args;
mod output;

pub use args::{Args, Command};
pub use output::{OutputFormat, OutputFormatter, OverviewReport};
