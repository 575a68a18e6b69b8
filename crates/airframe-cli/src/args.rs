//! Command-line argument definitions for the Airframe CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, strictness and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Airframe configuration tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input configuration file
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path for the normalised configuration; printed to stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Reject input with errors or warnings instead of falling back to the default design
    #[arg(long)]
    pub strict: bool,
}
