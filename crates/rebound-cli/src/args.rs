//! Command-line argument definitions for the Rebound CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select the input file and configuration file,
//! override rendering settings, and control logging verbosity.

use clap::Parser;

/// Command-line arguments for the Rebound list checker
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Maximum width of rendered error lines, overriding the configuration
    #[arg(long)]
    pub column_width: Option<usize>,

    /// Do not print the offending source line under the error position
    #[arg(long)]
    pub no_line_context: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
