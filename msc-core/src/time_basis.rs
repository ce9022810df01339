use crate::error::CalendarError;

use time::{Date, Duration, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset, Weekday, macros::offset};

/// シフト表が記述されている基準タイムゾーン (日本標準時)。
pub const JST: UtcOffset = offset!(+9);

/// 日付ごとのローカル UTC オフセットを与える。
///
/// 夏時間のあるタイムゾーンでは日付によって値が変わるので、
/// 問い合わせのたびに呼び出すこと。
pub trait LocalOffset {
    fn offset_on(&self, date: Date) -> UtcOffset;
}

impl LocalOffset for UtcOffset {
    fn offset_on(&self, _date: Date) -> UtcOffset {
        *self
    }
}

/// 現在時刻を日本標準時で返す。
pub fn now_jst() -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(JST)
}

/// 年月日の組を検証して `Date` にする。
pub fn calendar_date(year: i32, month: u8, day: u8) -> Result<Date, CalendarError> {
    let invalid = || CalendarError::InvalidDate { year, month, day };
    let month = Month::try_from(month).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

/// `offset` における壁時計の日時を絶対時刻にする。
///
/// `hour` は `0..=24` を受け付け、24 時は翌日 0 時として扱う。
pub fn to_instant(
    year: i32,
    month: u8,
    day: u8,
    hour: u8,
    minute: u8,
    offset: UtcOffset,
) -> Result<OffsetDateTime, CalendarError> {
    let date = calendar_date(year, month, day)?;
    if hour > 24 || minute >= 60 || (hour == 24 && minute != 0) {
        return Err(CalendarError::InvalidTime { hour, minute });
    }
    Ok(instant_on(date, hour.into(), minute.into(), offset))
}

/// `date` の 0 時から `hour` 時間 `minute` 分経過した時刻。
pub(crate) fn instant_on(date: Date, hour: i64, minute: i64, offset: UtcOffset) -> OffsetDateTime {
    PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_offset(offset) + Duration::hours(hour) + Duration::minutes(minute)
}

/// 基準オフセットとローカルオフセットの差を時間単位で返す (`reference - local`)。
///
/// 端数のあるオフセットは負の無限大方向に丸める。
pub fn offset_to_reference_in_hours(reference: UtcOffset, local: UtcOffset) -> i32 {
    (reference.whole_seconds() - local.whole_seconds()).div_euclid(3600)
}

/// 日曜始まりの曜日番号を月曜始まり (月 = 0 .. 日 = 6) に変換する。
pub fn weekday_index(weekday: Weekday) -> u8 {
    let wday = weekday.number_days_from_sunday() as i8;
    (wday - 1).rem_euclid(7) as u8
}

/// 絶対時刻の JST における曜日番号 (月曜始まり)。
pub fn jst_weekday_index(instant: OffsetDateTime) -> u8 {
    weekday_index(instant.to_offset(JST).weekday())
}

/// JST での月初日の曜日番号 (月曜始まり)。
pub fn first_weekday_in_jst(year: i32, month: u8) -> Result<u8, CalendarError> {
    let first = to_instant(year, month, 1, 0, 0, JST)?;
    Ok(jst_weekday_index(first))
}
