use std::{collections::BTreeMap, sync::Arc};

use crate::shared::{
    Identifiable,
    time::{Duration, Time},
};

pub type LineNumber = u32;

/// A named place where buses halt.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stop {
    /// Position of the stop in the repository, never reused.
    pub index: u32,
    /// Human-readable name, unique among live stops.
    pub name: Arc<str>,
    /// Lowercased name used by the fuzzy search.
    pub normalized_name: Arc<str>,
    /// One timetable per line calling at this stop.
    pub timetables: BTreeMap<LineNumber, Timetable>,
    /// Set once the stop has been deleted. The index slot stays taken.
    pub retired: bool,
}

impl Identifiable for Stop {
    fn name(&self) -> &str {
        &self.name
    }

    fn normalized_name(&self) -> &str {
        &self.normalized_name
    }
}

impl Stop {
    pub fn timetable(&self, line: LineNumber) -> Option<&Timetable> {
        self.timetables.get(&line)
    }

    /// Numbers of the lines with a timetable at this stop, ascending.
    pub fn line_numbers(&self) -> impl Iterator<Item = LineNumber> + '_ {
        self.timetables.keys().copied()
    }
}

/// One course calling at a stop.
///
/// `arrival_time` only differs from `departure_time` at the stop where a
/// course both starts and ends, where it holds the time the bus comes back.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    pub departure_time: Time,
    pub arrival_time: Time,
}

impl Departure {
    pub const fn new(departure_time: Time, arrival_time: Time) -> Self {
        Self {
            departure_time,
            arrival_time,
        }
    }

    pub const fn passing(time: Time) -> Self {
        Self::new(time, time)
    }
}

/// Departures of one line from one stop, sorted by departure time with no two
/// sharing a minute.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Timetable(pub(crate) Vec<Departure>);

/// A numbered bus route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusLine {
    pub number: LineNumber,
    /// Stop indices in driving order. The last stop connects back to the first.
    pub path: Vec<u32>,
    /// `travel_times[i]` is the time from `path[i]` to `path[(i + 1) % len]`.
    pub travel_times: Vec<Duration>,
}
