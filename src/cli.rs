// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! The three positionals are parsed as signed integers so that `0` and
//! negative values reach [`ReduceParams::new`] and get the benchmark's own
//! messages instead of a generic clap error.

use std::num::NonZeroUsize;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Deserialize;

use crate::errors::Result;
use crate::pipeline::ReduceParams;

/// Printed after every argument error.
pub const USAGE: &str = "Usage: ocr-reduce <# iterations> <#vector pairs> <vector_length>";

/// Command-line arguments for `ocr-reduce`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "ocr-reduce",
    version,
    about = "Dataflow vector reduction benchmark.",
    long_about = None
)]
pub struct CliArgs {
    /// Number of times the whole reduction is repeated.
    #[arg(value_name = "ITERATIONS", allow_negative_numbers = true)]
    pub iterations: i64,

    /// Number of vector pairs.
    #[arg(value_name = "PAIRS", allow_negative_numbers = true)]
    pub pairs: i64,

    /// Length of each vector.
    #[arg(value_name = "VECTOR_LENGTH", allow_negative_numbers = true)]
    pub vector_length: i64,

    /// Optional runtime configuration file (TOML).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report every mismatching slot instead of only the first.
    #[arg(long)]
    pub verbose: bool,

    /// Size of the blocking worker pool that runs task bodies.
    #[arg(long, value_name = "N")]
    pub workers: Option<NonZeroUsize>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `OCR_REDUCE_LOG`, then the config file, then `info`.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Build and validate the task graph, print its shape, run nothing.
    #[arg(long)]
    pub dry_run: bool,
}

impl CliArgs {
    /// Validate the positionals.
    pub fn reduce_params(&self) -> Result<ReduceParams> {
        ReduceParams::new(self.iterations, self.pairs, self.vector_length)
    }
}

/// Log level as exposed on the CLI and in `[log] level`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Parse `std::env::args`. Help and version requests come back as errors too;
/// the caller decides how to exit.
pub fn parse() -> std::result::Result<CliArgs, clap::Error> {
    CliArgs::try_parse()
}

/// Parse an explicit argument list (first item is the binary name).
pub fn parse_from<I, T>(args: I) -> std::result::Result<CliArgs, clap::Error>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    CliArgs::try_parse_from(args)
}
