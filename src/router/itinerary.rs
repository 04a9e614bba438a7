use crate::{
    repository::LineNumber,
    shared::time::{Duration, Time, corrected_duration},
};

/// One ride between two adjacent stops of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub from_stop: u32,
    pub to_stop: u32,
    pub line: LineNumber,
    pub departure_time: Time,
    pub arrival_time: Time,
}

impl Leg {
    pub fn travel_time(&self) -> Duration {
        corrected_duration(self.departure_time, self.arrival_time)
    }
}

/// A timed route. Leg times are times of day, totals account for midnight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Itinerary {
    pub from: u32,
    pub to: u32,
    /// When the traveller shows up at `from`.
    pub departure: Time,
    pub legs: Vec<Leg>,
}

impl Itinerary {
    pub fn new(from: u32, to: u32, departure: Time, legs: Vec<Leg>) -> Self {
        Self {
            from,
            to,
            departure,
            legs,
        }
    }

    /// Time spent at the stop before each leg.
    pub fn waiting_times(&self) -> Vec<Duration> {
        let mut ready = self.departure.of_day();
        self.legs
            .iter()
            .map(|leg| {
                let waiting = corrected_duration(ready, leg.departure_time);
                ready = leg.arrival_time;
                waiting
            })
            .collect()
    }

    pub fn total_waiting(&self) -> Duration {
        self.waiting_times().into_iter().sum()
    }

    pub fn total_travel(&self) -> Duration {
        self.legs.iter().map(Leg::travel_time).sum()
    }

    /// From showing up at the first stop to stepping off at the last.
    pub fn total_duration(&self) -> Duration {
        self.total_waiting() + self.total_travel()
    }

    pub fn arrival_time(&self) -> Time {
        self.legs
            .last()
            .map(|leg| leg.arrival_time)
            .unwrap_or(self.departure)
    }

    /// How many times a bus is boarded. Staying on the same line between
    /// consecutive legs is a single boarding.
    pub fn boardings(&self) -> usize {
        count_boardings(self.legs.iter().map(|leg| (leg.line, leg.departure_time, leg.arrival_time)))
    }
}

/// One stop-to-stop hop of an untimed route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hop {
    pub from_stop: u32,
    pub to_stop: u32,
    pub line: LineNumber,
}

/// The route using the fewest boardings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transfers {
    pub from: u32,
    pub to: u32,
    pub hops: Vec<Hop>,
    /// Distinct boardings along `hops`.
    pub boardings: usize,
}

impl Transfers {
    /// Lines in the order they are boarded.
    pub fn lines(&self) -> Vec<LineNumber> {
        let mut lines: Vec<LineNumber> = self.hops.iter().map(|hop| hop.line).collect();
        lines.dedup();
        lines
    }
}

/// A new boarding starts whenever the line changes or the bus is not the one
/// we arrived with (a wait in between).
fn count_boardings(legs: impl Iterator<Item = (LineNumber, Time, Time)>) -> usize {
    let mut boardings = 0;
    let mut previous: Option<(LineNumber, Time)> = None;
    for (line, departure_time, arrival_time) in legs {
        match previous {
            Some((previous_line, previous_arrival))
                if previous_line == line && previous_arrival == departure_time => {}
            _ => boardings += 1,
        }
        previous = Some((line, arrival_time));
    }
    boardings
}

#[test]
fn boardings_split_on_line_change() {
    let legs = [
        (5, Time::from_minutes(480), Time::from_minutes(490)),
        (5, Time::from_minutes(490), Time::from_minutes(505)),
        (7, Time::from_minutes(510), Time::from_minutes(520)),
    ];
    assert_eq!(count_boardings(legs.into_iter()), 2);
}
