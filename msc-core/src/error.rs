use thiserror::Error as ThisError;

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum CalendarError {
    /// 存在しない暦日が指定された。
    #[error("invalid date: {year}-{month}-{day}")]
    InvalidDate { year: i32, month: u8, day: u8 },

    /// 時刻として範囲外の時・分が指定された。
    #[error("invalid time: {hour}:{minute:02}")]
    InvalidTime { hour: u8, minute: u8 },
}

#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ShiftTimeError {
    #[error("HH:MM expected: {0}")]
    Malformed(String),

    #[error("time out of range: {0}")]
    OutOfRange(String),

    #[error("shift must start before it ends: {start}~{end}")]
    EmptyWindow { start: String, end: String },
}
