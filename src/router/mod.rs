mod fastest;
pub mod itinerary;
mod transfers;
mod waiting;

pub use itinerary::*;

use thiserror::Error;

use crate::{
    repository::{BusLine, LineNumber, Repository},
    shared::time::{Duration, Time},
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Stop {0} does not match any entry")]
    UnknownStop(u32),
    #[error("Line {0} does not match any entry")]
    UnknownLine(LineNumber),
    #[error("Start and destination are the same stop")]
    SameStartAndEnd,
    #[error("Departure time {0:?} is outside of a day")]
    NoTimeCapacity(Time),
    #[error("Could not find a route")]
    NoRouteFound,
}

/// Route queries between two stops of a borrowed [`Repository`].
pub struct Router<'a> {
    repository: &'a Repository,
    from: u32,
    to: u32,
    departure: Time,
}

/// Taking the next bus of a line from a stop to the stop after it.
#[derive(Debug, Clone)]
pub(crate) struct Ride {
    pub leg: Leg,
    pub waiting: Duration,
    /// Arrival on the router's absolute clock.
    pub arrival: Time,
}

impl<'a> Router<'a> {
    pub fn new(repository: &'a Repository, from: u32, to: u32) -> Self {
        Self {
            repository,
            from,
            to,
            departure: Time::now(),
        }
    }

    pub fn departure_at(mut self, departure: Time) -> Self {
        self.departure = departure;
        self
    }

    pub fn departure(&self) -> Time {
        self.departure
    }

    /// Checks shared by every query. `timed` queries also need a departure
    /// time inside the day.
    fn validate(&self, timed: bool) -> Result<(), self::Error> {
        if self.from == self.to {
            return Err(Error::SameStartAndEnd);
        }
        for stop_idx in [self.from, self.to] {
            if self.repository.stop(stop_idx).is_none() {
                return Err(Error::UnknownStop(stop_idx));
            }
        }
        if timed && !self.departure.is_within_day() {
            return Err(Error::NoTimeCapacity(self.departure));
        }
        Ok(())
    }

    /// Boards the first bus of `line` leaving `stop_idx` at or after `clock`
    /// and rides it one stop. `None` when nothing leaves before midnight.
    fn ride(&self, line: &BusLine, stop_idx: u32, clock: Time) -> Option<Ride> {
        let time_of_day = clock.of_day();
        let index = self
            .repository
            .next_departure_on_or_after(stop_idx, line.number, time_of_day)?;
        let departure_time = self
            .repository
            .timetable(stop_idx, line.number)?
            .get(index)?
            .departure_time;
        let to_stop = line.next_stop_after(stop_idx)?;
        let travel_time = line.travel_time_after(stop_idx)?;

        let waiting = departure_time - time_of_day;
        let arrival = clock + waiting + travel_time;
        Some(Ride {
            leg: Leg {
                from_stop: stop_idx,
                to_stop,
                line: line.number,
                departure_time,
                arrival_time: arrival.of_day(),
            },
            waiting,
            arrival,
        })
    }
}
