use crate::{
    SLOT_MINUTES,
    error::CalendarError,
    shift::ShiftSchedule,
    time_basis::{JST, LocalOffset, jst_weekday_index, to_instant},
};

use time::{Duration, OffsetDateTime};

/// 予約済みの 30 分枠 1 つ。日時はすべて JST で保持する。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    id: String,
    year: i32,
    month: u8,
    day: u8,
    starts_at: OffsetDateTime,
    ends_at: OffsetDateTime,
    weekday: u8,
}

impl Appointment {
    /// 取得元から渡された JST の年月日と開始時刻から作る。
    pub fn new(
        id: impl Into<String>,
        year: i32,
        month: u8,
        day: u8,
        start_hour: u8,
        start_minute: u8,
    ) -> Result<Appointment, CalendarError> {
        if start_hour >= 24 || start_minute >= 60 {
            return Err(CalendarError::InvalidTime {
                hour: start_hour,
                minute: start_minute,
            });
        }
        let starts_at = to_instant(year, month, day, start_hour, start_minute, JST)?;
        Ok(Appointment::at(id, starts_at))
    }

    /// 開始時刻 (任意のオフセット) から作る。日付は JST で読み替える。
    pub fn at(id: impl Into<String>, starts_at: OffsetDateTime) -> Appointment {
        let starts_at = starts_at.to_offset(JST);
        Appointment {
            id: id.into(),
            year: starts_at.year(),
            month: starts_at.month().into(),
            day: starts_at.day(),
            starts_at,
            ends_at: starts_at + Duration::minutes(SLOT_MINUTES),
            weekday: jst_weekday_index(starts_at),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn day(&self) -> u8 {
        self.day
    }

    pub fn starts_at(&self) -> OffsetDateTime {
        self.starts_at
    }

    pub fn ends_at(&self) -> OffsetDateTime {
        self.ends_at
    }

    /// JST での曜日番号 (月 = 0 .. 日 = 6)。
    pub fn weekday(&self) -> u8 {
        self.weekday
    }

    /// 描画側が編集リンクを組み立てるための参照。
    pub fn edit_reference(&self) -> String {
        format!("appointments/{}/edit", self.id)
    }

    /// 開始側は開始日の、終了側は終了日のシフトにそれぞれ収まっているか。
    pub fn in_shift(&self, schedule: &ShiftSchedule, local: &(impl LocalOffset + ?Sized)) -> bool {
        let (shift_start, _) = schedule.window_for(self.starts_at.date(), local);
        let (_, shift_end) = schedule.window_for(self.ends_at.date(), local);

        shift_start <= self.starts_at && self.ends_at <= shift_end
    }
}
