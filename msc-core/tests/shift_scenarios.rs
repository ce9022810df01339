use msc_core::{
    Appointment, DEFAULT_ALMOST_FULL_PERCENT, JST, MonthCalendar, ShiftSchedule, ShiftTable, ShiftWindow,
    time_basis::offset_to_reference_in_hours,
};
use time::{
    Date, Month, OffsetDateTime,
    macros::{date, datetime, offset},
};

/// 2024-05-10 は金曜。
const FRIDAY: Date = date!(2024 - 05 - 10);

fn uniform_schedule(start: &str, end: &str) -> ShiftSchedule {
    let window = ShiftWindow::new(start.parse().unwrap(), end.parse().unwrap()).unwrap();
    ShiftSchedule::new(ShiftTable::new([window; 7]))
}

/// 金曜 21:30〜24:00 のシフトに対する開始時刻の判定
#[test]
fn friday_half_past_nine_boundary() {
    let schedule = ShiftSchedule::default();
    assert_eq!(offset_to_reference_in_hours(JST, JST), 0);

    let on_boundary = Appointment::new("1", 2024, 5, 10, 21, 30).unwrap();
    assert_eq!(on_boundary.ends_at(), datetime!(2024-05-10 22:00 +9));
    assert!(on_boundary.in_shift(&schedule, &JST));

    let too_early = Appointment::new("2", 2024, 5, 10, 21, 0).unwrap();
    assert!(!too_early.in_shift(&schedule, &JST));
}

/// 3 時間のシフトは 6 枠、ほぼ満席は 5 件から
#[test]
fn three_hour_shift_capacity() {
    let schedule = uniform_schedule("21:00", "24:00");
    assert_eq!(schedule.capacity_for(FRIDAY, &JST), 6.0);

    let mut calendar = MonthCalendar::new(2024, 5, &schedule, &JST).unwrap();
    let mut almost_full_from = None;
    for index in 0..6u8 {
        let minutes = 21 * 60 + 30 * u16::from(index);
        let appointment =
            Appointment::new(format!("s{index}"), 2024, 5, 10, (minutes / 60) as u8, (minutes % 60) as u8).unwrap();
        assert!(calendar.insert_if_in_shift(appointment));
        if almost_full_from.is_none() && calendar.is_almost_full(10, DEFAULT_ALMOST_FULL_PERCENT) {
            almost_full_from = Some(calendar.count(10));
        }
    }
    assert_eq!(almost_full_from, Some(5));
    assert_eq!(calendar.count(10), 6);
    assert!(calendar.is_full(10));
}

/// JST より 10 時間進んだ環境では 21:00 が同日 11:00 になる
#[test]
fn shift_minus_ten_hours() {
    let local = offset!(+19);
    assert_eq!(offset_to_reference_in_hours(JST, local), -10);

    let schedule = uniform_schedule("21:00", "24:00");
    let (start, _) = schedule.window_for(FRIDAY, &local);
    assert_eq!(start, datetime!(2024-05-10 11:00 +19));
    assert_eq!(start.to_offset(local).date(), FRIDAY);
}

/// 24:00 に +15 時間すると 39 時になり、翌ローカル日の 15 時へ繰り越す
#[test]
fn shift_plus_fifteen_hours_on_end_of_day() {
    let local = offset!(-6);
    assert_eq!(offset_to_reference_in_hours(JST, local), 15);

    let schedule = uniform_schedule("21:00", "24:00");
    let (start, end) = schedule.window_for(FRIDAY, &local);
    // 同じ日付の 15 時に置くと、片側だけ繰り越す hour_shift (+1〜+3) で start < end が崩れる
    assert_eq!(end, datetime!(2024-05-11 15:00 -6));
    assert_eq!(start, datetime!(2024-05-11 12:00 -6));
    assert_eq!((end - start).whole_hours(), 3);
}

/// 夏時間の切り替えで日ごとにオフセットが変わってもシフトの長さは変わらない
#[test]
fn duration_survives_daylight_saving_change() {
    struct Eastern;

    impl msc_core::LocalOffset for Eastern {
        fn offset_on(&self, date: Date) -> time::UtcOffset {
            // 2024 年の米国東部時間の夏時間は 3/10〜11/3
            let dst = date >= date!(2024 - 03 - 10) && date < date!(2024 - 11 - 03);
            if dst { offset!(-4) } else { offset!(-5) }
        }
    }

    let schedule = ShiftSchedule::default();
    for day in 1..=20 {
        let date = Date::from_calendar_date(2024, Month::March, day).unwrap();
        let (start, end) = schedule.window_for(date, &Eastern);
        let expected = schedule.table().window(date.weekday().number_days_from_monday()).duration();
        assert!(start < end);
        assert_eq!(end - start, expected, "{date}");
    }

    let before: OffsetDateTime = schedule.window_for(date!(2024 - 03 - 09), &Eastern).0;
    let after: OffsetDateTime = schedule.window_for(date!(2024 - 03 - 11), &Eastern).0;
    assert_eq!(before.offset(), offset!(-5));
    assert_eq!(after.offset(), offset!(-4));
}
