use msc_core::{DaySummary, JST, LocalOffset, ShiftSchedule, time_basis::offset_to_reference_in_hours};
use serde::Serialize;
use time::{Date, OffsetDateTime};

/// `window` サブコマンドの出力。
#[derive(Debug, Clone, Serialize)]
pub struct WindowReport {
    pub date: String,
    pub hour_shift: i32,

    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,

    #[serde(with = "time::serde::rfc3339")]
    pub ends_at: OffsetDateTime,

    pub capacity: f64,
}

impl WindowReport {
    pub fn new(schedule: &ShiftSchedule, local: &dyn LocalOffset, date: Date) -> WindowReport {
        let (starts_at, ends_at) = schedule.window_for(date, local);
        WindowReport {
            date: date.to_string(),
            hour_shift: offset_to_reference_in_hours(JST, local.offset_on(date)),
            starts_at,
            ends_at,
            capacity: schedule.capacity_for(date, local),
        }
    }
}

/// `admit` サブコマンドの出力。
#[derive(Debug, Clone, Serialize)]
pub struct AdmissionReport {
    pub id: String,
    pub admitted: bool,
    pub day: Option<DaySummary>,
}
