mod cli;
mod report;

use crate::{
    cli::{ArgumentsCommand, MonthArguments},
    report::{AdmissionReport, WindowReport},
};

use std::{
    io::{Write, stdout},
    path::Path,
};

use anyhow::Result;
use clap::Parser;
use msc_common::{
    appointments::{InvalidRecordPolicy, build_appointments, load_raw_appointments},
    config::{Config, load_config},
};
use msc_core::{
    Appointment, LocalOffset, MonthCalendar, ShiftSchedule,
    time_basis::{calendar_date, now_jst},
};
use serde::Serialize;
use tracing::{info, warn};

fn main() -> Result<()> {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    let args = cli::Arguments::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => {
            info!("no config file specified, using built-in shift table");
            Config::default()
        }
    };

    let local = config.local_offset.resolve()?;
    let schedule = ShiftSchedule::new(config.shift.clone());

    match args.command {
        ArgumentsCommand::Calendar {
            month,
            appointments,
            skip_invalid,
        } => {
            let (year, month) = resolve_month(&month);
            let calendar = load_calendar(&schedule, &*local, year, month, &appointments, skip_invalid)?;
            print_json(&calendar.finalize(config.almost_full_percent))?;
        }
        ArgumentsCommand::Window { year, month, day } => {
            let date = calendar_date(year, month, day)?;
            print_json(&WindowReport::new(&schedule, &*local, date))?;
        }
        ArgumentsCommand::Admit {
            month,
            appointments,
            skip_invalid,
            id,
            day,
            hour,
            minute,
        } => {
            let (year, month) = resolve_month(&month);
            let mut calendar = load_calendar(&schedule, &*local, year, month, &appointments, skip_invalid)?;

            let candidate = Appointment::new(id.clone(), year, month, day, hour, minute)?;
            let admitted = calendar.insert_if_in_shift(candidate);
            if admitted {
                info!("appointment {id} admitted on {year}-{month:02}-{day:02}");
            } else {
                warn!("appointment {id} is out of shift, rejected");
            }

            let month = calendar.finalize(config.almost_full_percent);
            print_json(&AdmissionReport {
                id,
                admitted,
                day: month.day(day).cloned(),
            })?;
        }
    }
    Ok(())
}

fn resolve_month(arguments: &MonthArguments) -> (i32, u8) {
    match (arguments.year, arguments.month) {
        (Some(year), Some(month)) => (year, month),
        _ => {
            let now = now_jst();
            (now.year(), now.month().into())
        }
    }
}

fn load_calendar<'a>(
    schedule: &'a ShiftSchedule,
    local: &'a dyn LocalOffset,
    year: i32,
    month: u8,
    appointments_path: &Path,
    skip_invalid: bool,
) -> Result<MonthCalendar<'a>> {
    let policy = if skip_invalid {
        InvalidRecordPolicy::Skip
    } else {
        InvalidRecordPolicy::Reject
    };
    let raws = load_raw_appointments(appointments_path)?;
    let appointments = build_appointments(raws, year, month, policy)?;

    let mut calendar = MonthCalendar::new(year, month, schedule, local)?;
    for appointment in appointments {
        calendar.insert(appointment);
    }
    info!("{} appointments booked in {year}-{month:02}", calendar.book().len());
    Ok(calendar)
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let mut out = stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}
