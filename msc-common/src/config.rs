pub mod offset;

use crate::config::offset::ConfiguredOffset;

use std::{fs::read_to_string, io::Error as IoError, path::Path};

use msc_core::{DEFAULT_ALMOST_FULL_PERCENT, ShiftTable};
use serde::Deserialize;
use thiserror::Error as ThisError;
use time::error::IndeterminateOffset;
use toml::de::Error as TomlError;
use tracing::info;

/// config.toml
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    #[serde(default = "Default::default")]
    pub local_offset: ConfiguredOffset,

    #[serde(default = "default_almost_full_percent")]
    pub almost_full_percent: u32,

    /// [shift]
    #[serde(default = "Default::default")]
    pub shift: ShiftTable,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            local_offset: ConfiguredOffset::default(),
            almost_full_percent: default_almost_full_percent(),
            shift: ShiftTable::default(),
        }
    }
}

fn default_almost_full_percent() -> u32 {
    DEFAULT_ALMOST_FULL_PERCENT
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, ConfigError> {
    let path = path.as_ref();
    let config_str = read_to_string(path).map_err(ConfigError::Io)?;
    let config: Config = toml::from_str(&config_str).map_err(ConfigError::Serialization)?;
    info!("config loaded from {}, local offset: {}", path.display(), config.local_offset);
    Ok(config)
}

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(IoError),

    #[error("serialization error: {0}")]
    Serialization(TomlError),

    #[error("local offset error: {0}")]
    LocalOffset(IndeterminateOffset),
}
