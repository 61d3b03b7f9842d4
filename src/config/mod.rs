// src/config/mod.rs

//! Runtime configuration for `ocr-reduce`.
//!
//! - `model.rs`: the TOML-backed data model.
//! - `loader.rs`: read a file from disk.
//! - `validate.rs`: reject nonsensical values.
//!
//! [`RunConfig`] is the merged result of the command line and the optional
//! file; it is all `run` needs.

pub mod loader;
pub mod model;
pub mod validate;

use std::num::NonZeroUsize;

pub use loader::{load_and_validate, load_from_path};
pub use model::{ConfigFile, LogSection, RawConfigFile, RuntimeSection, VerifySection};

use crate::cli::{CliArgs, LogLevel};
use crate::errors::Result;
use crate::pipeline::{ReduceParams, VerifyMode};

/// Workers used when neither the CLI nor the file names a count and the
/// machine's parallelism is unknown.
pub const FALLBACK_WORKERS: usize = 4;

/// Everything needed to run one benchmark.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub params: ReduceParams,
    pub workers: usize,
    pub verify_mode: VerifyMode,
    /// File-level log level; the CLI and environment take precedence.
    pub log_level: Option<LogLevel>,
    pub dry_run: bool,
}

impl RunConfig {
    /// Merge CLI arguments over an optional config file.
    ///
    /// Fails with `Argument` if the positionals are invalid.
    pub fn resolve(cli: &CliArgs, file: Option<&ConfigFile>) -> Result<Self> {
        let params = cli.reduce_params()?;
        let file = file.cloned().unwrap_or_default();

        let workers = cli
            .workers
            .map(NonZeroUsize::get)
            .or(file.runtime.workers)
            .unwrap_or_else(default_workers);

        let verify_mode = if cli.verbose {
            VerifyMode::All
        } else {
            file.verify.mode
        };

        Ok(Self {
            params,
            workers,
            verify_mode,
            log_level: file.log.level,
            dry_run: cli.dry_run,
        })
    }
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(FALLBACK_WORKERS)
}
