use chrono::{FixedOffset, TimeZone, Utc};
use smartfix_relay::hours::{is_open, BusinessHours};

fn makassar() -> FixedOffset {
    FixedOffset::east_opt(8 * 3600).unwrap()
}

#[test]
fn test_sunday_closed_all_day() {
    // 2026-10-25 is a Sunday.
    for hour in 0..24 {
        let t = makassar().with_ymd_and_hms(2026, 10, 25, hour, 30, 0).unwrap();
        assert!(!is_open(&t), "sunday {hour}:30 should be closed");
    }
}

#[test]
fn test_weekdays_open_nine_to_eight() {
    // Monday 2026-10-19 through Saturday 2026-10-24.
    for day in 19..=24 {
        for hour in 0..24 {
            let t = makassar().with_ymd_and_hms(2026, 10, day, hour, 0, 0).unwrap();
            let expected = (9..20).contains(&hour);
            assert_eq!(is_open(&t), expected, "day {day} hour {hour}");
        }
    }
}

#[test]
fn test_last_open_second() {
    let t = makassar().with_ymd_and_hms(2026, 10, 20, 19, 59, 59).unwrap();
    assert!(is_open(&t));
    let t = makassar().with_ymd_and_hms(2026, 10, 20, 20, 0, 0).unwrap();
    assert!(!is_open(&t));
}

#[test]
fn test_other_timezones_are_converted() {
    // Sunday 20:00 in New York is Monday 08:00 in Makassar: still closed.
    let ny = FixedOffset::west_opt(4 * 3600).unwrap();
    let t = ny.with_ymd_and_hms(2026, 10, 18, 20, 0, 0).unwrap();
    assert!(!is_open(&t));

    // One hour later it is Monday 09:00 local.
    let t = ny.with_ymd_and_hms(2026, 10, 18, 21, 0, 0).unwrap();
    assert!(is_open(&t));
}

#[test]
fn test_custom_schedule() {
    let hours = BusinessHours {
        utc_offset_seconds: 0,
        open_hour: 8,
        close_hour: 17,
    };
    let t = Utc.with_ymd_and_hms(2026, 10, 19, 8, 0, 0).unwrap();
    assert!(hours.is_open_at(&t));
    let t = Utc.with_ymd_and_hms(2026, 10, 19, 17, 0, 0).unwrap();
    assert!(!hours.is_open_at(&t));
}
