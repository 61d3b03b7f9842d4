// src/config/model.rs

use serde::Deserialize;

use crate::cli::LogLevel;
use crate::pipeline::VerifyMode;

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [runtime]
/// workers = 4
///
/// [verify]
/// mode = "all"
///
/// [log]
/// level = "debug"
/// ```
///
/// Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub runtime: RuntimeSection,

    #[serde(default)]
    pub verify: VerifySection,

    #[serde(default)]
    pub log: LogSection,
}

/// A validated configuration file. Build it with `ConfigFile::try_from`.
#[derive(Debug, Clone, Default)]
pub struct ConfigFile {
    pub runtime: RuntimeSection,
    pub verify: VerifySection,
    pub log: LogSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile) -> Self {
        Self {
            runtime: raw.runtime,
            verify: raw.verify,
            log: raw.log,
        }
    }
}

/// `[runtime]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuntimeSection {
    /// Size of the blocking worker pool. Defaults to the available
    /// parallelism of the machine.
    #[serde(default)]
    pub workers: Option<usize>,
}

/// `[verify]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VerifySection {
    /// `"first"` (default) or `"all"`.
    #[serde(default)]
    pub mode: VerifyMode,
}

/// `[log]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LogSection {
    #[serde(default)]
    pub level: Option<LogLevel>,
}
