use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

mod entities;
pub mod source;
pub mod timetable;
pub mod topology;
pub use entities::*;
pub use topology::StopDeletion;

use thiserror::Error;
use tracing::debug;

use crate::{
    router::Router,
    shared::{
        self,
        time::{Duration, Time, TimeError},
    },
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Stop index {0} does not match any stop")]
    UnknownStop(u32),
    #[error("No stop is named {0:?}")]
    UnknownStopName(String),
    #[error("Line {0} does not exist")]
    UnknownLine(LineNumber),
    #[error("Invalid time: {0}")]
    InvalidTime(#[from] TimeError),
    #[error("Line {line} already departs stop {stop} at {time}")]
    DuplicateDeparture {
        stop: u32,
        line: LineNumber,
        time: Time,
    },
    #[error("Line {line} has no course at stop {stop} departing at {time}")]
    CourseNotFound {
        stop: u32,
        line: LineNumber,
        time: Time,
    },
    #[error("Only the first stop of line {line} arrives apart from departing, stop {stop} does not")]
    UnexpectedArrival { stop: u32, line: LineNumber },
    #[error("Timetable of line {line} at stop {stop} does not follow the line's travel times")]
    CourseMismatch { stop: u32, line: LineNumber },
    #[error("Stop names must not be empty")]
    EmptyStopName,
    #[error("A stop named {0:?} already exists")]
    DuplicateStop(String),
    #[error("Line {0} already exists")]
    DuplicateLine(LineNumber),
    #[error("Invalid path for line {line}: {reason}")]
    InvalidPath { line: LineNumber, reason: String },
    #[error("Stop {stop} is not on the path of line {line}")]
    NotOnPath { stop: u32, line: LineNumber },
    #[error("Deleting stop {0:?} was not confirmed")]
    DeletionNotConfirmed(String),
    #[error("The deletion plan for stop {0} no longer matches the network")]
    StaleDeletionPlan(u32),
}

/// The authoritative store: every stop ever created, by index, and every live
/// line by number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Repository {
    pub(crate) stops: Vec<Stop>,
    pub(crate) lines: BTreeMap<LineNumber, BusLine>,

    stop_lookup: HashMap<Arc<str>, u32>,
}

impl Repository {
    pub fn new() -> Self {
        Default::default()
    }

    /// Appends a new stop and returns its index.
    pub fn add_stop(&mut self, name: &str) -> Result<u32, self::Error> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::EmptyStopName);
        }
        if self.stop_lookup.contains_key(name) {
            return Err(Error::DuplicateStop(name.to_string()));
        }
        let index = self.stops.len() as u32;
        let name: Arc<str> = name.into();
        self.stops.push(Stop {
            index,
            name: name.clone(),
            normalized_name: shared::normalize(&name).into(),
            timetables: BTreeMap::new(),
            retired: false,
        });
        self.stop_lookup.insert(name, index);
        debug!("Added stop {index}");
        Ok(index)
    }

    /// Creates a line with no courses yet.
    /// `travel_times[i]` is the time between `path[i]` and the stop after it,
    /// the last entry covering the way back to `path[0]`.
    pub fn add_line(
        &mut self,
        number: LineNumber,
        path: Vec<u32>,
        travel_times: Vec<Duration>,
    ) -> Result<&BusLine, self::Error> {
        if self.lines.contains_key(&number) {
            return Err(Error::DuplicateLine(number));
        }
        let invalid = |reason: &str| Error::InvalidPath {
            line: number,
            reason: reason.to_string(),
        };
        if path.len() < 2 {
            return Err(invalid("a line needs at least two stops"));
        }
        if travel_times.len() != path.len() {
            return Err(invalid("expected one travel time per stop"));
        }
        if travel_times.contains(&Duration::ZERO) {
            return Err(invalid("travel times must be at least one minute"));
        }
        let loop_duration = travel_times
            .iter()
            .try_fold(Duration::ZERO, |total, travel_time| total.checked_add(*travel_time));
        if !loop_duration.is_some_and(|total| total < Duration::from_days(1)) {
            return Err(invalid("a course must take less than a day"));
        }
        for (i, stop_idx) in path.iter().enumerate() {
            self.live_stop(*stop_idx)?;
            if path[..i].contains(stop_idx) {
                return Err(invalid("stops must not repeat"));
            }
        }

        for stop_idx in path.iter() {
            self.stops[*stop_idx as usize]
                .timetables
                .insert(number, Timetable::default());
        }
        debug!("Added line {number} over {} stops", path.len());
        let line = self.lines.entry(number).or_insert(BusLine {
            number,
            path,
            travel_times,
        });
        Ok(line)
    }

    /// Get a live stop by index.
    pub fn stop(&self, index: u32) -> Option<&Stop> {
        self.stops.get(index as usize).filter(|stop| !stop.retired)
    }

    /// Finds a live stop by its exact name.
    pub fn stop_by_name(&self, name: &str) -> Result<&Stop, self::Error> {
        let index = self
            .stop_lookup
            .get(name.trim())
            .ok_or_else(|| Error::UnknownStopName(name.to_string()))?;
        Ok(&self.stops[*index as usize])
    }

    pub fn line(&self, number: LineNumber) -> Option<&BusLine> {
        self.lines.get(&number)
    }

    /// Live stops in index order.
    pub fn stops(&self) -> impl Iterator<Item = &Stop> {
        self.stops.iter().filter(|stop| !stop.retired)
    }

    /// Lines in ascending number order.
    pub fn lines(&self) -> impl Iterator<Item = &BusLine> {
        self.lines.values()
    }

    /// Number of index slots, retired stops included.
    pub fn stop_slots(&self) -> usize {
        self.stops.len()
    }

    /// Lines whose path goes through the stop, ascending by number.
    pub fn lines_serving(&self, stop_idx: u32) -> Vec<&BusLine> {
        let Some(stop) = self.stop(stop_idx) else {
            return vec![];
        };
        stop.line_numbers()
            .filter_map(|number| self.lines.get(&number))
            .filter(|line| line.is_on_path(stop_idx))
            .collect()
    }

    pub fn timetable(&self, stop_idx: u32, line: LineNumber) -> Option<&Timetable> {
        self.stop(stop_idx)?.timetable(line)
    }

    /// Does a fuzzy search on all the live stops, comparing their name to the needle.
    pub fn search_stops_by_name<'a>(&'a self, needle: &str) -> Vec<&'a Stop> {
        let haystack: Vec<&Stop> = self.stops().collect();
        shared::search(needle, &haystack)
    }

    pub fn router(&'_ self, from: u32, to: u32) -> Router<'_> {
        Router::new(self, from, to)
    }

    pub(crate) fn live_stop(&self, index: u32) -> Result<&Stop, self::Error> {
        self.stop(index).ok_or(Error::UnknownStop(index))
    }

    pub(crate) fn existing_line(&self, number: LineNumber) -> Result<&BusLine, self::Error> {
        self.lines.get(&number).ok_or(Error::UnknownLine(number))
    }

    pub(crate) fn retire_stop(&mut self, index: u32) {
        let stop = &mut self.stops[index as usize];
        stop.retired = true;
        stop.timetables.clear();
        self.stop_lookup.remove(&stop.name);
    }
}
