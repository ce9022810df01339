use crate::{
    appointment::Appointment,
    error::CalendarError,
    shift::ShiftSchedule,
    time_basis::{LocalOffset, calendar_date, first_weekday_in_jst},
};

use std::collections::BTreeMap;

use serde::Serialize;
use time::{Date, Month, OffsetDateTime, util::days_in_year_month};

/// 予約の列と日ごとの件数を同時に更新する入れ物。
/// 件数は追加時に積み上げるだけで、走査し直すことはない。
#[derive(Debug, Clone, Default)]
pub struct AppointmentBook {
    appointments: Vec<Appointment>,
    per_day: BTreeMap<u8, usize>,
}

impl AppointmentBook {
    pub fn new() -> AppointmentBook {
        AppointmentBook::default()
    }

    pub fn from_appointments(appointments: impl IntoIterator<Item = Appointment>) -> AppointmentBook {
        let mut book = AppointmentBook::new();
        for appointment in appointments {
            book.push(appointment);
        }
        book
    }

    pub fn push(&mut self, appointment: Appointment) {
        *self.per_day.entry(appointment.day()).or_insert(0) += 1;
        self.appointments.push(appointment);
    }

    pub fn count(&self, day: u8) -> usize {
        self.per_day.get(&day).copied().unwrap_or(0)
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn on(&self, day: u8) -> impl Iterator<Item = &Appointment> {
        self.appointments.iter().filter(move |a| a.day() == day)
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// 積み上げた件数が予約の列と一致しているか走査して確かめる。
    pub fn is_consistent(&self) -> bool {
        let mut scanned: BTreeMap<u8, usize> = BTreeMap::new();
        for appointment in &self.appointments {
            *scanned.entry(appointment.day()).or_insert(0) += 1;
        }
        scanned == self.per_day
    }
}

/// 1 か月分の予約を集計するカレンダー。リクエストごとに作って捨てる。
///
/// 日ごとの件数は予約の `day` で数える。別の月の予約は `insert_if_in_shift` で弾く。
pub struct MonthCalendar<'a> {
    year: i32,
    month: Month,
    schedule: &'a ShiftSchedule,
    local: &'a dyn LocalOffset,
    book: AppointmentBook,
}

impl<'a> MonthCalendar<'a> {
    pub fn new(
        year: i32,
        month: u8,
        schedule: &'a ShiftSchedule,
        local: &'a dyn LocalOffset,
    ) -> Result<MonthCalendar<'a>, CalendarError> {
        let first = calendar_date(year, month, 1)?;
        Ok(MonthCalendar {
            year,
            month: first.month(),
            schedule,
            local,
            book: AppointmentBook::new(),
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month.into()
    }

    pub fn book(&self) -> &AppointmentBook {
        &self.book
    }

    /// 重複チェックはしない。同じ予約を 2 回入れれば 2 件と数える。
    /// 予約はこの月 (JST) のものであること。
    pub fn insert(&mut self, appointment: Appointment) {
        debug_assert!(
            self.contains(&appointment),
            "appointment {} is not in {}-{:02}",
            appointment.id(),
            self.year,
            u8::from(self.month),
        );
        self.book.push(appointment);
    }

    /// この月のシフト内の予約だけを受け付ける。
    pub fn insert_if_in_shift(&mut self, appointment: Appointment) -> bool {
        if self.contains(&appointment) && appointment.in_shift(self.schedule, self.local) {
            self.insert(appointment);
            true
        } else {
            false
        }
    }

    pub fn count(&self, day: u8) -> usize {
        self.book.count(day)
    }

    pub fn appointments_on(&self, day: u8) -> impl Iterator<Item = &Appointment> {
        self.book.on(day)
    }

    /// その日のシフトに入る 30 分枠の数。月に存在しない日は `None`。
    pub fn capacity(&self, day: u8) -> Option<f64> {
        let date = self.date_of(day)?;
        Some(self.schedule.capacity_for(date, self.local))
    }

    pub fn is_full(&self, day: u8) -> bool {
        self.capacity(day)
            .is_some_and(|capacity| self.count(day) as f64 >= capacity)
    }

    pub fn is_almost_full(&self, day: u8, percent: u32) -> bool {
        self.capacity(day)
            .is_some_and(|capacity| self.count(day) as f64 >= capacity * f64::from(percent) / 100.0)
    }

    /// 月初日の曜日番号 (月曜始まり, JST)。
    pub fn first_weekday(&self) -> u8 {
        first_weekday_in_jst(self.year, self.month.into()).unwrap_or_default()
    }

    pub fn dates(&self) -> impl Iterator<Item = Date> + '_ {
        (1..=31).map_while(|day| self.date_of(day))
    }

    /// 描画側へ渡すための読み取り専用スナップショットにする。
    pub fn finalize(self, almost_full_percent: u32) -> FinalizedMonth {
        let days = self
            .dates()
            .map(|date| {
                let day = date.day();
                DaySummary {
                    day,
                    count: self.count(day),
                    is_full: self.is_full(day),
                    is_almost_full: self.is_almost_full(day, almost_full_percent),
                    appointments: self.appointments_on(day).map(AppointmentEntry::from).collect(),
                }
            })
            .collect();

        FinalizedMonth {
            year: self.year,
            month: self.month.into(),
            first_weekday: self.first_weekday(),
            days_in_month: days_in_year_month(self.year, self.month),
            days,
        }
    }

    /// 予約の JST の年月がこの月と一致するか。
    pub fn contains(&self, appointment: &Appointment) -> bool {
        appointment.year() == self.year && appointment.month() == u8::from(self.month)
    }

    fn date_of(&self, day: u8) -> Option<Date> {
        Date::from_calendar_date(self.year, self.month, day).ok()
    }
}

/// 集計済みの 1 か月分。以降は変更できない。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FinalizedMonth {
    year: i32,
    month: u8,
    first_weekday: u8,
    days_in_month: u8,
    days: Vec<DaySummary>,
}

impl FinalizedMonth {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u8 {
        self.month
    }

    pub fn first_weekday(&self) -> u8 {
        self.first_weekday
    }

    pub fn days_in_month(&self) -> u8 {
        self.days_in_month
    }

    pub fn days(&self) -> &[DaySummary] {
        &self.days
    }

    pub fn day(&self, day: u8) -> Option<&DaySummary> {
        self.days.get(usize::from(day).checked_sub(1)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DaySummary {
    pub day: u8,
    pub count: usize,
    pub is_full: bool,
    pub is_almost_full: bool,
    pub appointments: Vec<AppointmentEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentEntry {
    pub id: String,
    pub edit_reference: String,

    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
}

impl From<&Appointment> for AppointmentEntry {
    fn from(value: &Appointment) -> AppointmentEntry {
        AppointmentEntry {
            id: value.id().to_string(),
            edit_reference: value.edit_reference(),
            starts_at: value.starts_at(),
        }
    }
}
