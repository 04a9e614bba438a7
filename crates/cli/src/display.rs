use busnet::prelude::*;
use std::fmt::Write;

fn stop_name(repository: &Repository, stop_idx: u32) -> &str {
    repository
        .stop(stop_idx)
        .map(|stop| stop.name.as_ref())
        .unwrap_or("?")
}

/// Trailing hint for an unknown stop name.
pub fn suggestions(names: &[String]) -> String {
    if names.is_empty() {
        return String::new();
    }
    format!(", did you mean {}?", names.join(", "))
}

pub fn stops(repository: &Repository) -> String {
    let mut out = String::new();
    for stop in repository.stops() {
        let lines: Vec<String> = stop.line_numbers().map(|line| line.to_string()).collect();
        let _ = writeln!(out, "{:<24} lines: {}", stop.name, lines.join(", "));
    }
    out
}

pub fn lines(repository: &Repository) -> String {
    let mut out = String::new();
    for line in repository.lines() {
        let path: Vec<&str> = line
            .path
            .iter()
            .map(|stop_idx| stop_name(repository, *stop_idx))
            .collect();
        let _ = writeln!(
            out,
            "Line {:<4} {} (loop {})",
            line.number,
            path.join(" -> "),
            line.loop_duration()
        );
    }
    out
}

pub fn stop_timetable(repository: &Repository, stop: &Stop) -> String {
    let mut out = format!("{}\n", stop.name);
    for (line, timetable) in stop.timetables.iter() {
        let times: Vec<String> = timetable
            .iter()
            .map(|entry| {
                if entry.arrival_time == entry.departure_time {
                    entry.departure_time.to_string()
                } else {
                    format!("{} (back {})", entry.departure_time, entry.arrival_time)
                }
            })
            .collect();
        let next = repository
            .line(*line)
            .and_then(|bus_line| bus_line.next_stop_after(stop.index))
            .map(|stop_idx| stop_name(repository, stop_idx))
            .unwrap_or("?");
        let _ = writeln!(out, "  Line {line} towards {next}: {}", times.join(" "));
    }
    out
}

/// One row per course, one column per stop on the path.
pub fn line_timetable(repository: &Repository, line: &BusLine, courses: &[Time]) -> String {
    let mut out = format!("Line {}\n", line.number);
    if courses.is_empty() {
        out.push_str("  no courses\n");
        return out;
    }
    for stop_idx in line.path.iter() {
        let _ = write!(out, "{:>12}", truncate(stop_name(repository, *stop_idx), 11));
    }
    out.push('\n');
    for start in courses {
        for (_, entry) in line.schedule(*start) {
            let _ = write!(out, "{:>12}", entry.departure_time);
        }
        out.push('\n');
    }
    out
}

pub fn itinerary(repository: &Repository, itinerary: &Itinerary) -> String {
    let mut out = format!(
        "{} -> {}, ready at {}\n",
        stop_name(repository, itinerary.from),
        stop_name(repository, itinerary.to),
        itinerary.departure
    );
    for (leg, waiting) in itinerary.legs.iter().zip(itinerary.waiting_times()) {
        let _ = writeln!(
            out,
            "  {:<20} -> {:<20} line {:<4} {} - {} (wait {})",
            stop_name(repository, leg.from_stop),
            stop_name(repository, leg.to_stop),
            leg.line,
            leg.departure_time,
            leg.arrival_time,
            waiting
        );
    }
    let _ = writeln!(
        out,
        "Arrive {} after {}: travelling {}, waiting {}, {} boarding(s)",
        itinerary.arrival_time(),
        itinerary.total_duration(),
        itinerary.total_travel(),
        itinerary.total_waiting(),
        itinerary.boardings()
    );
    out
}

pub fn transfers(repository: &Repository, transfers: &Transfers) -> String {
    let mut out = format!(
        "{} -> {}\n",
        stop_name(repository, transfers.from),
        stop_name(repository, transfers.to)
    );
    for hop in transfers.hops.iter() {
        let _ = writeln!(
            out,
            "  {:<20} -> {:<20} line {}",
            stop_name(repository, hop.from_stop),
            stop_name(repository, hop.to_stop),
            hop.line
        );
    }
    let lines: Vec<String> = transfers.lines().iter().map(|line| line.to_string()).collect();
    let _ = writeln!(
        out,
        "{} boarding(s) on lines {}",
        transfers.boardings,
        lines.join(", ")
    );
    out
}

pub fn deletion_prompt(plan: &StopDeletion) -> String {
    let lines: Vec<String> = plan.orphaned_lines.iter().map(|line| line.to_string()).collect();
    format!(
        "Deleting {} leaves line(s) {} with a single stop, they will be deleted too. Continue? [y/N] ",
        plan.stop_name,
        lines.join(", ")
    )
}

fn truncate(name: &str, max: usize) -> String {
    name.chars().take(max).collect()
}

#[cfg(test)]
fn network() -> Repository {
    let mut repository = Repository::new();
    let a = repository.add_stop("A").unwrap();
    let b = repository.add_stop("B").unwrap();
    let c = repository.add_stop("C").unwrap();
    repository
        .add_line(
            5,
            vec![a, b, c],
            vec![10, 15, 20].into_iter().map(Duration::from_minutes).collect(),
        )
        .unwrap();
    repository.add_course(5, Time::from_hm(8, 0)).unwrap();
    repository
}

#[test]
fn renders_line_timetable_rows() {
    let repository = network();
    let line = repository.line(5).unwrap();
    let out = line_timetable(&repository, line, &repository.courses(5).unwrap());
    let row = out.lines().last().unwrap();
    assert_eq!(row.split_whitespace().collect::<Vec<_>>(), ["08:00", "08:10", "08:25"]);
}

#[test]
fn renders_itinerary_totals() {
    let repository = network();
    let itinerary = repository
        .router(0, 2)
        .departure_at(Time::from_hm(7, 50))
        .fastest()
        .unwrap();
    let out = self::itinerary(&repository, &itinerary);
    assert!(out.ends_with("Arrive 08:25 after 35min: travelling 25min, waiting 10min, 1 boarding(s)\n"));
}

#[test]
fn no_suggestions_renders_nothing() {
    assert_eq!(suggestions(&[]), "");
    assert_eq!(suggestions(&["Abbey".to_string()]), ", did you mean Abbey?");
}
