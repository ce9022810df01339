use std::{fs::read_to_string, io::Error as IoError, path::Path};

use msc_core::{Appointment, CalendarError};
use serde::Deserialize;
use serde_json::Error as SerdeJsonError;
use thiserror::Error as ThisError;
use tracing::{info, warn};

/// 取得側から渡される 1 件分の予約 (年月はリクエスト側で決まる)。
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RawAppointment {
    pub id: String,
    pub day: u8,
    pub start_hour: u8,
    pub start_minute: u8,
}

/// 不正なレコードの扱い。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidRecordPolicy {
    /// 最初の不正なレコードでリクエスト全体を失敗させる。
    Reject,

    /// 不正なレコードだけ読み飛ばす。
    Skip,
}

pub fn load_raw_appointments(path: impl AsRef<Path>) -> Result<Vec<RawAppointment>, AppointmentsError> {
    let path = path.as_ref();
    let json_str = read_to_string(path).map_err(AppointmentsError::Io)?;
    let raws: Vec<RawAppointment> = serde_json::from_str(&json_str).map_err(AppointmentsError::Serialization)?;
    info!("{} appointment records loaded from {}", raws.len(), path.display());
    Ok(raws)
}

/// JST の `year`/`month` の予約として組み立てる。
pub fn build_appointments(
    raws: impl IntoIterator<Item = RawAppointment>,
    year: i32,
    month: u8,
    policy: InvalidRecordPolicy,
) -> Result<Vec<Appointment>, AppointmentsError> {
    let mut appointments = vec![];
    for raw in raws {
        match Appointment::new(raw.id.clone(), year, month, raw.day, raw.start_hour, raw.start_minute) {
            Ok(appointment) => appointments.push(appointment),
            Err(err) if policy == InvalidRecordPolicy::Skip => {
                warn!("skipping appointment {}: {err}", raw.id);
            }
            Err(err) => return Err(AppointmentsError::Record { id: raw.id, source: err }),
        }
    }
    Ok(appointments)
}

#[derive(Debug, ThisError)]
pub enum AppointmentsError {
    #[error("io error: {0}")]
    Io(IoError),

    #[error("serialization error: {0}")]
    Serialization(SerdeJsonError),

    #[error("invalid appointment {id}: {source}")]
    Record {
        id: String,

        #[source]
        source: CalendarError,
    },
}
