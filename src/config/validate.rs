// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{ReduceError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ReduceError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_runtime(cfg)?;
    Ok(())
}

fn validate_runtime(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runtime.workers == Some(0) {
        return Err(ReduceError::ConfigError(
            "[runtime].workers must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}
