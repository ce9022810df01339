use crate::{
    error::ShiftTimeError,
    time_basis::{JST, LocalOffset, instant_on, offset_to_reference_in_hours, weekday_index},
};

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize, de::Visitor};
use time::{Date, Duration, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

/// シフト表上の壁時計時刻 (JST)。`24:00` は日の終わりを表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShiftTime {
    hour: u8,
    minute: u8,
}

impl ShiftTime {
    pub const END_OF_DAY: ShiftTime = ShiftTime { hour: 24, minute: 0 };

    pub fn new(hour: u8, minute: u8) -> Result<ShiftTime, ShiftTimeError> {
        if minute >= 60 || hour > 24 || (hour == 24 && minute != 0) {
            return Err(ShiftTimeError::OutOfRange(format!("{hour:02}:{minute:02}")));
        }
        Ok(ShiftTime { hour, minute })
    }

    pub fn hour(&self) -> u8 {
        self.hour
    }

    pub fn minute(&self) -> u8 {
        self.minute
    }

    fn since_midnight(&self) -> Duration {
        Duration::hours(self.hour.into()) + Duration::minutes(self.minute.into())
    }
}

impl FromStr for ShiftTime {
    type Err = ShiftTimeError;

    fn from_str(s: &str) -> Result<ShiftTime, ShiftTimeError> {
        let malformed = || ShiftTimeError::Malformed(s.to_string());
        let (hour, minute) = s.split_once(':').ok_or_else(malformed)?;
        if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
            return Err(malformed());
        }
        let hour = hour.parse().map_err(|_| malformed())?;
        let minute = minute.parse().map_err(|_| malformed())?;
        ShiftTime::new(hour, minute)
    }
}

impl Display for ShiftTime {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{:02}:{:02}", self.hour, self.minute)
    }
}

impl<'de> Deserialize<'de> for ShiftTime {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        deserializer.deserialize_str(ShiftTimeVisitor)
    }
}

impl Serialize for ShiftTime {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

struct ShiftTimeVisitor;

impl Visitor<'_> for ShiftTimeVisitor {
    type Value = ShiftTime;

    fn expecting(&self, formatter: &mut Formatter) -> FmtResult {
        formatter.write_str("HH:MM string")
    }

    fn visit_str<E>(self, v: &str) -> Result<ShiftTime, E>
    where
        E: serde::de::Error,
    {
        v.parse().map_err(E::custom)
    }
}

/// ある曜日のシフト開始・終了時刻。常に `start < end`。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawShiftWindow")]
pub struct ShiftWindow {
    start: ShiftTime,
    end: ShiftTime,
}

#[derive(Deserialize)]
struct RawShiftWindow {
    start: ShiftTime,
    end: ShiftTime,
}

impl TryFrom<RawShiftWindow> for ShiftWindow {
    type Error = ShiftTimeError;

    fn try_from(value: RawShiftWindow) -> Result<ShiftWindow, ShiftTimeError> {
        ShiftWindow::new(value.start, value.end)
    }
}

impl ShiftWindow {
    pub fn new(start: ShiftTime, end: ShiftTime) -> Result<ShiftWindow, ShiftTimeError> {
        if start >= end {
            return Err(ShiftTimeError::EmptyWindow {
                start: start.to_string(),
                end: end.to_string(),
            });
        }
        Ok(ShiftWindow { start, end })
    }

    pub fn start(&self) -> ShiftTime {
        self.start
    }

    pub fn end(&self) -> ShiftTime {
        self.end
    }

    /// 表の上での長さ。
    pub fn duration(&self) -> Duration {
        self.end.since_midnight() - self.start.since_midnight()
    }
}

/// 曜日 (月曜始まり) ごとのシフト表。プロセスの生存中は変更しない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ShiftTableByName", into = "ShiftTableByName")]
pub struct ShiftTable {
    windows: [ShiftWindow; 7],
}

#[derive(Serialize, Deserialize)]
struct ShiftTableByName {
    monday: ShiftWindow,
    tuesday: ShiftWindow,
    wednesday: ShiftWindow,
    thursday: ShiftWindow,
    friday: ShiftWindow,
    saturday: ShiftWindow,
    sunday: ShiftWindow,
}

impl From<ShiftTableByName> for ShiftTable {
    fn from(value: ShiftTableByName) -> ShiftTable {
        ShiftTable::new([
            value.monday,
            value.tuesday,
            value.wednesday,
            value.thursday,
            value.friday,
            value.saturday,
            value.sunday,
        ])
    }
}

impl From<ShiftTable> for ShiftTableByName {
    fn from(value: ShiftTable) -> ShiftTableByName {
        let [monday, tuesday, wednesday, thursday, friday, saturday, sunday] = value.windows;
        ShiftTableByName {
            monday,
            tuesday,
            wednesday,
            thursday,
            friday,
            saturday,
            sunday,
        }
    }
}

impl Default for ShiftTable {
    fn default() -> ShiftTable {
        const NINE: ShiftWindow = ShiftWindow {
            start: ShiftTime { hour: 21, minute: 0 },
            end: ShiftTime::END_OF_DAY,
        };
        const NINE_THIRTY: ShiftWindow = ShiftWindow {
            start: ShiftTime { hour: 21, minute: 30 },
            end: ShiftTime::END_OF_DAY,
        };
        ShiftTable::new([NINE, NINE, NINE_THIRTY, NINE, NINE_THIRTY, NINE, NINE])
    }
}

impl ShiftTable {
    /// 月曜から日曜の順に並べた 7 件から作る。
    pub fn new(windows: [ShiftWindow; 7]) -> ShiftTable {
        ShiftTable { windows }
    }

    /// `index` は月曜始まりの曜日番号 (`0..7`)。
    pub fn window(&self, index: u8) -> &ShiftWindow {
        &self.windows[usize::from(index) % 7]
    }
}

/// シフト表から日付ごとのシフト時間帯を絶対時刻として求める。
#[derive(Debug, Clone, Default)]
pub struct ShiftSchedule {
    table: ShiftTable,
}

impl ShiftSchedule {
    pub fn new(table: ShiftTable) -> ShiftSchedule {
        ShiftSchedule { table }
    }

    pub fn table(&self) -> &ShiftTable {
        &self.table
    }

    /// `date` (JST の暦日) のシフト開始・終了時刻。呼び出しごとに計算し直す。
    pub fn window_for(&self, date: Date, local: &(impl LocalOffset + ?Sized)) -> (OffsetDateTime, OffsetDateTime) {
        let reference_midnight = PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_offset(JST);
        let window = self.table.window(weekday_index(reference_midnight.weekday()));

        let local_offset = local.offset_on(date);
        let hour_shift = offset_to_reference_in_hours(JST, local_offset);

        let start = shifted_boundary(date, window.start, hour_shift, local_offset);
        let end = shifted_boundary(date, window.end, hour_shift, local_offset);
        (start, end)
    }

    /// `date` のシフトに入る 30 分枠の数。枠に揃っていなければ端数を含む。
    pub fn capacity_for(&self, date: Date, local: &(impl LocalOffset + ?Sized)) -> f64 {
        let (start, end) = self.window_for(date, local);
        let hours = (end - start).as_seconds_f64() / 3600.0;
        hours / 0.5
    }
}

/// JST の時刻を `hour_shift` ずらして `local` の壁時計で置き直す。
/// 24 時を超えれば翌日へ、負になれば前日へ繰り越す。
fn shifted_boundary(date: Date, time: ShiftTime, hour_shift: i32, local: UtcOffset) -> OffsetDateTime {
    let hour = i64::from(time.hour) + i64::from(hour_shift);
    let minute = i64::from(time.minute);

    if hour > 24 {
        instant_on(date, hour - 24, minute, local) + Duration::DAY
    } else if hour < 0 {
        instant_on(date, hour + 24, minute, local) - Duration::DAY
    } else {
        instant_on(date, hour, minute, local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use time::macros::{date, datetime, offset};

    fn shift_time(s: &str) -> ShiftTime {
        s.parse().unwrap()
    }

    #[test]
    fn parses_shift_times() {
        assert_eq!(shift_time("21:30"), ShiftTime::new(21, 30).unwrap());
        assert_eq!(shift_time("9:05"), ShiftTime::new(9, 5).unwrap());
        assert_eq!(shift_time("24:00"), ShiftTime::END_OF_DAY);
        assert_eq!(shift_time("00:00").to_string(), "00:00");

        assert!(matches!("24:30".parse::<ShiftTime>(), Err(ShiftTimeError::OutOfRange(_))));
        assert!(matches!("21:60".parse::<ShiftTime>(), Err(ShiftTimeError::OutOfRange(_))));
        assert!(matches!("2130".parse::<ShiftTime>(), Err(ShiftTimeError::Malformed(_))));
        assert!(matches!("21:3".parse::<ShiftTime>(), Err(ShiftTimeError::Malformed(_))));
        assert!(matches!(":30".parse::<ShiftTime>(), Err(ShiftTimeError::Malformed(_))));
        assert!(matches!("ab:cd".parse::<ShiftTime>(), Err(ShiftTimeError::Malformed(_))));
    }

    #[test]
    fn window_must_not_be_empty() {
        assert!(ShiftWindow::new(shift_time("21:00"), shift_time("24:00")).is_ok());
        assert!(matches!(
            ShiftWindow::new(shift_time("21:00"), shift_time("21:00")),
            Err(ShiftTimeError::EmptyWindow { .. })
        ));
        assert!(ShiftWindow::new(shift_time("22:00"), shift_time("21:00")).is_err());
    }

    #[test]
    fn default_table_matches_deployment() {
        let table = ShiftTable::default();
        for index in 0..7 {
            let expected_start = if index == 2 || index == 4 { "21:30" } else { "21:00" };
            assert_eq!(table.window(index).start(), shift_time(expected_start));
            assert_eq!(table.window(index).end(), ShiftTime::END_OF_DAY);
        }
    }

    #[test]
    fn window_in_jst_is_plain_wall_clock() {
        let schedule = ShiftSchedule::default();
        // 2024-05-10 は金曜
        let (start, end) = schedule.window_for(date!(2024 - 05 - 10), &JST);
        assert_eq!(start, datetime!(2024-05-10 21:30 +9));
        assert_eq!(end, datetime!(2024-05-11 00:00 +9));
    }

    #[test]
    fn negative_shift_stays_on_same_day() {
        // JST より 10 時間進んだローカルオフセット
        let local = offset!(+19);
        assert_eq!(offset_to_reference_in_hours(JST, local), -10);

        let schedule = ShiftSchedule::default();
        // 2024-05-13 は月曜 (21:00 開始)
        let (start, end) = schedule.window_for(date!(2024 - 05 - 13), &local);
        assert_eq!(start, datetime!(2024-05-13 11:00 +19));
        assert_eq!(end, datetime!(2024-05-13 14:00 +19));
    }

    #[test]
    fn large_positive_shift_rolls_into_next_local_day() {
        let local = offset!(-6);
        assert_eq!(offset_to_reference_in_hours(JST, local), 15);

        let schedule = ShiftSchedule::default();
        // 金曜: 21:30 + 15 = 36:30, 24:00 + 15 = 39:00
        // 両端とも翌日へ送る。同じ日付に置くと片側だけ繰り越す場合に長さが変わる
        let (start, end) = schedule.window_for(date!(2024 - 05 - 10), &local);
        assert_eq!(start, datetime!(2024-05-11 12:30 -6));
        assert_eq!(end, datetime!(2024-05-11 15:00 -6));
    }

    #[test]
    fn capacity_counts_half_hour_slots() {
        let schedule = ShiftSchedule::default();
        assert_eq!(schedule.capacity_for(date!(2024 - 05 - 13), &JST), 6.0);
        assert_eq!(schedule.capacity_for(date!(2024 - 05 - 10), &JST), 5.0);

        let odd = ShiftWindow::new(shift_time("21:15"), shift_time("24:00")).unwrap();
        let schedule = ShiftSchedule::new(ShiftTable::new([odd; 7]));
        assert_eq!(schedule.capacity_for(date!(2024 - 05 - 13), &JST), 5.5);
    }

    #[test]
    fn window_is_ordered_and_keeps_table_duration_for_every_offset() {
        let schedule = ShiftSchedule::default();
        for hours in -12..=14 {
            let local = UtcOffset::from_hms(hours, 0, 0).unwrap();
            for day in 1..=14 {
                let date = Date::from_calendar_date(2024, time::Month::July, day).unwrap();
                let (start, end) = schedule.window_for(date, &local);
                let expected = schedule.table().window(weekday_index(date.weekday())).duration();
                assert!(start < end, "{date} at {local}");
                assert_eq!(end - start, expected, "{date} at {local}");
            }
        }
    }

    #[test]
    fn deserializes_table_by_weekday_name() {
        let json = r#"{
            "monday":    { "start": "21:00", "end": "24:00" },
            "tuesday":   { "start": "21:00", "end": "24:00" },
            "wednesday": { "start": "21:30", "end": "24:00" },
            "thursday":  { "start": "21:00", "end": "24:00" },
            "friday":    { "start": "21:30", "end": "24:00" },
            "saturday":  { "start": "21:00", "end": "24:00" },
            "sunday":    { "start": "21:00", "end": "24:00" }
        }"#;
        let table: ShiftTable = serde_json::from_str(json).unwrap();
        assert_eq!(table, ShiftTable::default());

        let reversed = json.replace(r#""sunday":    { "start": "21:00""#, r#""sunday":    { "start": "24:00""#);
        assert!(serde_json::from_str::<ShiftTable>(&reversed).is_err());
    }
}
