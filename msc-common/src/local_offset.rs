use msc_core::{JST, LocalOffset};
use time::{Date, PrimitiveDateTime, Time, UtcOffset, error::IndeterminateOffset};
use tracing::{debug, warn};

/// 実行環境のタイムゾーンから日付ごとのオフセットを引く。
///
/// 引けなかった日は起動時に取得したオフセットで代用する。
#[derive(Debug, Clone, Copy)]
pub struct SystemLocalOffset {
    fallback: UtcOffset,
}

impl SystemLocalOffset {
    pub fn new() -> Result<SystemLocalOffset, IndeterminateOffset> {
        let fallback = UtcOffset::current_local_offset()?;
        debug!("system local offset at startup: {fallback}");
        Ok(SystemLocalOffset { fallback })
    }

    pub fn fallback(&self) -> UtcOffset {
        self.fallback
    }
}

impl LocalOffset for SystemLocalOffset {
    fn offset_on(&self, date: Date) -> UtcOffset {
        let reference_midnight = PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_offset(JST);
        match UtcOffset::local_offset_at(reference_midnight) {
            Ok(offset) => offset,
            Err(err) => {
                warn!("cannot determine local offset on {date}, using {}: {err}", self.fallback);
                self.fallback
            }
        }
    }
}
