pub mod appointment;
pub mod calendar;
pub mod error;
pub mod shift;
pub mod time_basis;

pub use crate::{
    appointment::Appointment,
    calendar::{DaySummary, FinalizedMonth, MonthCalendar},
    error::{CalendarError, ShiftTimeError},
    shift::{ShiftSchedule, ShiftTable, ShiftTime, ShiftWindow},
    time_basis::{JST, LocalOffset},
};

/// 予約 1 枠の長さ (分)。
pub const SLOT_MINUTES: i64 = 30;

/// 「ほぼ満席」とみなす既定の割合 (%)。
pub const DEFAULT_ALMOST_FULL_PERCENT: u32 = 80;
