#![allow(dead_code)]

use busnet::prelude::*;

pub fn minutes(values: &[u32]) -> Vec<Duration> {
    values.iter().copied().map(Duration::from_minutes).collect()
}

pub fn hm(time: &str) -> Time {
    Time::parse(time).unwrap()
}

/// Stops A, B, C on line 5 (10, 15 and 20 minutes apart) with one course
/// leaving A at 08:00.
pub fn line_five() -> (Repository, [u32; 3]) {
    let mut repository = Repository::new();
    let a = repository.add_stop("A").unwrap();
    let b = repository.add_stop("B").unwrap();
    let c = repository.add_stop("C").unwrap();
    repository
        .add_line(5, vec![a, b, c], minutes(&[10, 15, 20]))
        .unwrap();
    repository.add_course(5, hm("08:00")).unwrap();
    (repository, [a, b, c])
}

/// [`line_five`] plus line 7 going straight from A to C in an hour, with a
/// course at 07:50.
pub fn with_express() -> (Repository, [u32; 3]) {
    let (mut repository, [a, b, c]) = line_five();
    repository
        .add_line(7, vec![a, c], minutes(&[60, 10]))
        .unwrap();
    repository.add_course(7, hm("07:50")).unwrap();
    (repository, [a, b, c])
}

pub fn departures(repository: &Repository, stop_idx: u32, line: LineNumber) -> Vec<String> {
    repository
        .timetable(stop_idx, line)
        .map(|timetable| {
            timetable
                .iter()
                .map(|entry| format!("{}-{}", entry.departure_time, entry.arrival_time))
                .collect()
        })
        .unwrap_or_default()
}
