use busnet::shared::time::{self, Duration, Time, TimeError, corrected_duration};

#[test]
fn valid_time_test_1() {
    assert_eq!(Time::parse("00:00").unwrap().as_minutes(), 0);
}

#[test]
fn valid_time_test_2() {
    assert_eq!(Time::parse("08:25").unwrap().as_minutes(), 505);
}

#[test]
fn valid_time_test_3() {
    assert_eq!(Time::parse("23:59").unwrap().as_minutes(), 1439);
}

#[test]
fn valid_time_from_str() {
    let time: Time = " 9:05 ".parse().unwrap();
    assert_eq!(time, Time::from_hm(9, 5));
}

#[test]
fn invalid_time_test_1() {
    assert!(matches!(Time::parse("08:0a"), Err(TimeError::Malformed(_))));
}

#[test]
fn invalid_time_test_2() {
    assert!(matches!(Time::parse("0800"), Err(TimeError::Malformed(_))));
    assert!(matches!(Time::parse(":30"), Err(TimeError::Malformed(_))));
    assert!(matches!(Time::parse("08:00:00"), Err(TimeError::Malformed(_))));
}

#[test]
fn out_of_range_time() {
    assert!(matches!(Time::parse("24:00"), Err(TimeError::OutOfRange(_))));
    assert!(matches!(Time::parse("12:60"), Err(TimeError::OutOfRange(_))));
}

#[test]
fn corrected_duration_same_day() {
    let duration = corrected_duration(Time::from_hm(8, 0), Time::from_hm(8, 25));
    assert_eq!(duration, Duration::from_minutes(25));
}

#[test]
fn corrected_duration_wraps_midnight() {
    let duration = corrected_duration(Time::from_hm(23, 50), Time::from_hm(0, 20));
    assert_eq!(duration, Duration::from_minutes(30));
}

#[test]
fn absolute_clock_folds_into_day() {
    let clock = Time::from_hm(23, 40) + Duration::from_minutes(40);
    assert!(!clock.is_within_day());
    assert_eq!(clock.of_day(), Time::from_hm(0, 20));
    assert_eq!(clock.to_string(), "00:20");
    assert_eq!(
        Time::from_hm(23, 40).add_within_day(Duration::from_minutes(40)),
        Time::from_hm(0, 20)
    );
    assert_eq!(time::MINUTES_PER_DAY, 1440);
}

#[test]
fn duration_display() {
    assert_eq!(Duration::from_minutes(35).to_string(), "35min");
    assert_eq!(Duration::from_minutes(125).to_string(), "2h 05min");
}
