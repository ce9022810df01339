use crate::{config::ConfigError, local_offset::SystemLocalOffset};

use std::fmt::{Display, Formatter, Result as FmtResult};

use msc_core::LocalOffset;
use serde::Deserialize;
use thiserror::Error as ThisError;
use time::{UtcOffset, format_description::BorrowedFormatItem, macros::format_description};

/// `+09:00` のような符号付きオフセット表記。
const OFFSET_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[offset_hour sign:mandatory]:[offset_minute]");

/// 設定ファイル上の `local_offset`。省略時は実行環境のタイムゾーンに従う。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ConfiguredOffset {
    #[default]
    System,
    Fixed(UtcOffset),
}

impl ConfiguredOffset {
    /// 日付ごとにオフセットを返す実体にする。
    pub fn resolve(&self) -> Result<Box<dyn LocalOffset>, ConfigError> {
        match self {
            ConfiguredOffset::System => {
                let system = SystemLocalOffset::new().map_err(ConfigError::LocalOffset)?;
                Ok(Box::new(system))
            }
            ConfiguredOffset::Fixed(offset) => Ok(Box::new(*offset)),
        }
    }
}

impl TryFrom<String> for ConfiguredOffset {
    type Error = InvalidOffset;

    fn try_from(value: String) -> Result<ConfiguredOffset, InvalidOffset> {
        if value == "system" {
            return Ok(ConfiguredOffset::System);
        }
        UtcOffset::parse(&value, OFFSET_FORMAT)
            .map(ConfiguredOffset::Fixed)
            .map_err(|_| InvalidOffset(value))
    }
}

impl Display for ConfiguredOffset {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ConfiguredOffset::System => f.write_str("system"),
            ConfiguredOffset::Fixed(offset) => {
                let formatted = offset.format(OFFSET_FORMAT).map_err(|_| std::fmt::Error)?;
                f.write_str(&formatted)
            }
        }
    }
}

#[derive(Debug, Clone, ThisError)]
#[error("\"system\" or signed offset like +09:00 expected: {0}")]
pub struct InvalidOffset(String);
