use super::*;
use chrono::{Duration, FixedOffset, Utc};

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

fn tod(text: &str) -> TimeOfDay {
    TimeOfDay::parse(text).unwrap()
}

#[test]
fn test_parse_valid_times() {
    let t = tod("21:00");
    assert_eq!(t.hour(), 21);
    assert_eq!(t.minute(), 0);

    let t = tod("00:00");
    assert_eq!((t.hour(), t.minute()), (0, 0));

    let t = tod("23:59");
    assert_eq!((t.hour(), t.minute()), (23, 59));

    let t = tod("  07:05 ");
    assert_eq!((t.hour(), t.minute()), (7, 5));
}

#[test]
fn test_parse_rejects_other_shapes() {
    for bad in [
        "", "21", "21:", ":00", "9:05", "09:5", "21:00:00", "21-00", "ab:cd", "+1:00", "21 :00",
        "２１:００",
    ] {
        assert_eq!(TimeOfDay::parse(bad), None, "{bad:?} should not parse");
    }
}

#[test]
fn test_parse_rejects_out_of_range() {
    assert_eq!(TimeOfDay::parse("24:00"), None);
    assert_eq!(TimeOfDay::parse("23:60"), None);
    assert_eq!(TimeOfDay::parse("99:99"), None);

    assert_eq!(
        "24:00".parse::<TimeOfDay>(),
        Err(ParseTimeOfDayError::OutOfRange("24:00".to_string()))
    );
    assert_eq!(
        "9:00".parse::<TimeOfDay>(),
        Err(ParseTimeOfDayError::Format("9:00".to_string()))
    );
}

#[test]
fn test_parse_format_round_trip_all_valid_times() {
    for hour in 0..24 {
        for minute in 0..60 {
            let text = format!("{hour:02}:{minute:02}");
            let parsed = tod(&text);
            assert_eq!(parsed.hour(), hour);
            assert_eq!(parsed.minute(), minute);
            assert_eq!(parsed.to_string(), text);
        }
    }
}

#[test]
fn test_time_of_day_serde_as_string() {
    let json = serde_json::to_string(&tod("06:30")).unwrap();
    assert_eq!(json, "\"06:30\"");

    let back: TimeOfDay = serde_json::from_str(&json).unwrap();
    assert_eq!(back, tod("06:30"));

    assert!(serde_json::from_str::<TimeOfDay>("\"6:30\"").is_err());
}

#[test]
fn test_next_occurrence_later_today() {
    let now = utc(2026, 6, 15, 20, 59, 45);
    let next = next_occurrence(tod("21:00"), &now).unwrap();
    assert_eq!(next, utc(2026, 6, 15, 21, 0, 0));
}

#[test]
fn test_next_occurrence_already_passed_rolls_one_day() {
    let now = utc(2026, 6, 15, 21, 0, 1);
    let next = next_occurrence(tod("21:00"), &now).unwrap();
    assert_eq!(next, utc(2026, 6, 16, 21, 0, 0));
}

#[test]
fn test_next_occurrence_exact_instant_is_upcoming() {
    let now = utc(2026, 6, 15, 21, 0, 0);
    let next = next_occurrence(tod("21:00"), &now).unwrap();
    assert_eq!(next, now);
}

#[test]
fn test_next_occurrence_across_midnight() {
    let now = utc(2026, 6, 15, 23, 59, 30);
    assert_eq!(
        next_occurrence(tod("00:00"), &now).unwrap(),
        utc(2026, 6, 16, 0, 0, 0)
    );

    // Month and year boundaries come from the calendar, not a fixed 24h step
    let now = utc(2026, 12, 31, 23, 30, 0);
    assert_eq!(
        next_occurrence(tod("23:15"), &now).unwrap(),
        utc(2027, 1, 1, 23, 15, 0)
    );
}

#[test]
fn test_next_occurrence_bounds_for_every_minute_of_day() {
    let time = tod("13:37");
    let start = utc(2026, 6, 15, 0, 0, 30);

    for minute in 0..(24 * 60) {
        let reference = start + Duration::minutes(minute);
        let next = next_occurrence(time, &reference).unwrap();

        assert!(next >= reference);
        assert!(next - reference <= Duration::hours(24));
        assert_eq!((next.hour(), next.minute(), next.second()), (13, 37, 0));

        let today = time.on_date(reference.date_naive(), &Utc).unwrap();
        if today < reference {
            assert!(next > reference, "passed occurrence must roll forward");
            assert_eq!(next - today, Duration::days(1));
        }
    }
}

#[test]
fn test_next_occurrence_uses_reference_offset() {
    let tz = FixedOffset::east_opt(9 * 3600).unwrap();
    let now = tz.with_ymd_and_hms(2026, 6, 15, 22, 0, 0).unwrap();

    let next = next_occurrence(tod("21:00"), &now).unwrap();
    assert_eq!(next, tz.with_ymd_and_hms(2026, 6, 16, 21, 0, 0).unwrap());
    assert_eq!(next.offset(), now.offset());
}

#[test]
fn test_schedule_from_entries_drops_invalid() {
    let schedule = Schedule::from_entries(["22:30", "garbage", "", "25:00", "06:00"]);
    assert_eq!(schedule.times(), &[tod("22:30"), tod("06:00")]);
    assert_eq!(schedule.len(), 2);
    assert!(!schedule.is_empty());
}

#[test]
fn test_schedule_tolerates_duplicates() {
    let schedule = Schedule::from_entries(["21:00", "21:00"]);
    assert_eq!(schedule.len(), 2);

    let now = utc(2026, 6, 15, 21, 0, 10);
    assert_eq!(
        schedule.matching_occurrence(&now, 30),
        Some(utc(2026, 6, 15, 21, 0, 0))
    );
}

#[test]
fn test_should_fire_before_nominal_minute() {
    let schedule = Schedule::from_entries(["21:00"]);
    assert!(schedule.should_fire_now(&utc(2026, 6, 15, 20, 59, 45), 30));
}

#[test]
fn test_should_fire_window_is_inclusive_and_symmetric() {
    let schedule = Schedule::from_entries(["21:00"]);
    let nominal = utc(2026, 6, 15, 21, 0, 0);

    for offset in -30..=30 {
        let reference = nominal + Duration::seconds(offset);
        assert!(
            schedule.should_fire_now(&reference, 30),
            "offset {offset}s should fire"
        );
    }
    for offset in [-31, 31, -60, 60, -3600, 3600] {
        let reference = nominal + Duration::seconds(offset);
        assert!(
            !schedule.should_fire_now(&reference, 30),
            "offset {offset}s should not fire"
        );
    }

    // Sub-second precision counts too
    let just_outside = nominal + Duration::milliseconds(30_001);
    assert!(!schedule.should_fire_now(&just_outside, 30));
}

#[test]
fn test_should_fire_window_straddles_midnight() {
    let schedule = Schedule::from_entries(["00:00"]);

    let before = utc(2026, 6, 15, 23, 59, 45);
    assert_eq!(
        schedule.matching_occurrence(&before, 30),
        Some(utc(2026, 6, 16, 0, 0, 0))
    );

    let after = utc(2026, 6, 16, 0, 0, 20);
    assert_eq!(
        schedule.matching_occurrence(&after, 30),
        Some(utc(2026, 6, 16, 0, 0, 0))
    );

    let schedule = Schedule::from_entries(["23:59"]);
    let next_day = utc(2026, 6, 16, 0, 0, 0);
    assert!(!schedule.should_fire_now(&next_day, 30));
    let next_day = utc(2026, 6, 15, 23, 59, 25);
    assert!(schedule.should_fire_now(&next_day, 30));
}

#[test]
fn test_minute_poll_observes_each_time_once() {
    let schedule = Schedule::from_entries(["21:00", "06:30"]);

    // Polls at :17 past each minute for a whole day
    let start = utc(2026, 6, 15, 0, 0, 17);
    let fired: Vec<_> = (0..(24 * 60))
        .map(|minute| start + Duration::minutes(minute))
        .filter_map(|now| schedule.matching_occurrence(&now, 30))
        .collect();

    assert_eq!(
        fired,
        vec![utc(2026, 6, 15, 6, 30, 0), utc(2026, 6, 15, 21, 0, 0)]
    );
}

#[test]
fn test_matching_occurrence_picks_closest() {
    let schedule = Schedule::from_entries(["21:00", "21:01"]);
    let reference = utc(2026, 6, 15, 21, 0, 40);
    assert_eq!(
        schedule.matching_occurrence(&reference, 30),
        Some(utc(2026, 6, 15, 21, 1, 0))
    );
}

#[test]
fn test_zero_tolerance_matches_only_exact_instant() {
    let schedule = Schedule::from_entries(["12:00"]);
    assert!(schedule.should_fire_now(&utc(2026, 6, 15, 12, 0, 0), 0));
    assert!(!schedule.should_fire_now(&utc(2026, 6, 15, 12, 0, 1), 0));
}

#[test]
fn test_next_upcoming_picks_soonest() {
    let schedule = Schedule::from_entries(["06:30", "21:00", "13:00"]);

    let now = utc(2026, 6, 15, 14, 0, 0);
    assert_eq!(schedule.next_upcoming(&now), Some(utc(2026, 6, 15, 21, 0, 0)));

    let now = utc(2026, 6, 15, 22, 0, 0);
    assert_eq!(schedule.next_upcoming(&now), Some(utc(2026, 6, 16, 6, 30, 0)));
}

#[test]
fn test_next_upcoming_after_nominal_minute_is_tomorrow() {
    let schedule = Schedule::from_entries(["21:00"]);
    let now = utc(2026, 6, 15, 21, 0, 1);
    assert_eq!(schedule.next_upcoming(&now), Some(utc(2026, 6, 16, 21, 0, 0)));
}

#[test]
fn test_firing_and_display_agree_at_exact_instant() {
    let schedule = Schedule::from_entries(["21:00"]);
    let now = utc(2026, 6, 15, 21, 0, 0);

    let fired = schedule.matching_occurrence(&now, 30);
    let upcoming = schedule.next_upcoming(&now);
    assert_eq!(fired, Some(now));
    assert_eq!(upcoming, Some(now));
}

#[test]
fn test_empty_schedule() {
    let schedule = Schedule::default();
    assert!(schedule.is_empty());

    let now = utc(2026, 6, 15, 21, 0, 0);
    assert_eq!(schedule.next_upcoming(&now), None);
    assert!(!schedule.should_fire_now(&now, 30));

    let all_invalid = Schedule::from_entries(["nope", "25:61"]);
    assert_eq!(all_invalid.next_upcoming(&now), None);
    assert!(!all_invalid.should_fire_now(&now, 30));
}

#[test]
fn test_schedule_collects_from_times() {
    let schedule: Schedule = [tod("08:00"), tod("20:00")].into_iter().collect();
    assert_eq!(schedule.len(), 2);
}
