use tracing::debug;

use crate::{
    repository::{BusLine, Departure, Error, LineNumber, Repository, Timetable},
    shared::time::{Duration, Time, TimeError},
};

impl Timetable {
    pub fn as_slice(&self) -> &[Departure] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Departure> {
        self.0.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Departure> {
        self.0.iter()
    }

    /// Smallest index whose departure is strictly later than `time`.
    pub fn first_greater(&self, time: Time) -> usize {
        self.0.partition_point(|entry| entry.departure_time <= time)
    }

    /// Index of the entry departing exactly at `time`.
    pub fn position_of(&self, time: Time) -> Option<usize> {
        self.0
            .binary_search_by_key(&time, |entry| entry.departure_time)
            .ok()
    }

    /// Index of the first departure at or after `time`, or `None` when
    /// nothing leaves before midnight.
    pub fn next_departure_on_or_after(&self, time: Time) -> Option<usize> {
        let index = self.0.partition_point(|entry| entry.departure_time < time);
        (index < self.0.len()).then_some(index)
    }

    /// Inserts keeping the order. Hands the entry back if its departure
    /// minute is already taken.
    pub fn insert(&mut self, entry: Departure) -> Result<usize, Departure> {
        let index = self.first_greater(entry.departure_time);
        if index > 0 && self.0[index - 1].departure_time == entry.departure_time {
            return Err(entry);
        }
        self.0.insert(index, entry);
        Ok(index)
    }

    pub fn remove(&mut self, departure_time: Time) -> Option<Departure> {
        let index = self.position_of(departure_time)?;
        Some(self.0.remove(index))
    }
}

impl BusLine {
    /// Time spent on one full lap of the path.
    pub fn loop_duration(&self) -> Duration {
        self.travel_times.iter().copied().sum()
    }

    /// The entry every stop gets for a course leaving the first stop at `start`,
    /// in path order.
    pub fn schedule(&self, start: Time) -> Vec<(u32, Departure)> {
        let loop_end = start.add_within_day(self.loop_duration());
        let mut offset = Duration::ZERO;
        self.path
            .iter()
            .zip(self.travel_times.iter())
            .enumerate()
            .map(|(i, (stop_idx, travel_time))| {
                let entry = if i == 0 {
                    Departure::new(start, loop_end)
                } else {
                    Departure::passing(start.add_within_day(offset))
                };
                offset += *travel_time;
                (*stop_idx, entry)
            })
            .collect()
    }
}

impl Repository {
    /// Adds one entry to the timetable of `line` at `stop_idx`.
    pub fn insert_departure(
        &mut self,
        stop_idx: u32,
        line: LineNumber,
        departure_time: Time,
        arrival_time: Time,
    ) -> Result<usize, Error> {
        self.check_entry(stop_idx, line, departure_time, arrival_time)?;
        let timetable = self.timetable_mut(stop_idx, line)?;
        timetable
            .insert(Departure::new(departure_time, arrival_time))
            .map_err(|_| Error::DuplicateDeparture {
                stop: stop_idx,
                line,
                time: departure_time,
            })
    }

    /// Removes the entry of `line` leaving `stop_idx` at `departure_time`.
    pub fn remove_departure(
        &mut self,
        stop_idx: u32,
        line: LineNumber,
        departure_time: Time,
    ) -> Result<Departure, Error> {
        self.existing_line(line)?;
        let timetable = self.timetable_mut(stop_idx, line)?;
        timetable
            .remove(departure_time)
            .ok_or(Error::CourseNotFound {
                stop: stop_idx,
                line,
                time: departure_time,
            })
    }

    /// Index into [`Repository::timetable`] of the first departure of `line`
    /// from `stop_idx` at or after `time`. `None` also covers unknown stops
    /// and lines.
    pub fn next_departure_on_or_after(
        &self,
        stop_idx: u32,
        line: LineNumber,
        time: Time,
    ) -> Option<usize> {
        self.timetable(stop_idx, line)?
            .next_departure_on_or_after(time)
    }

    /// Schedules a course of `line` leaving its first stop at `start`.
    /// Either every stop on the path gets its entry or none does.
    pub fn add_course(&mut self, line: LineNumber, start: Time) -> Result<(), Error> {
        if !start.is_within_day() {
            return Err(out_of_day(start));
        }
        let schedule = self.existing_line(line)?.schedule(start);
        for (stop_idx, entry) in schedule.iter() {
            let timetable = self.timetable(*stop_idx, line).ok_or(Error::NotOnPath {
                stop: *stop_idx,
                line,
            })?;
            if timetable.position_of(entry.departure_time).is_some() {
                return Err(Error::DuplicateDeparture {
                    stop: *stop_idx,
                    line,
                    time: entry.departure_time,
                });
            }
        }
        for (stop_idx, entry) in schedule {
            // Checked above, cannot collide.
            let _ = self.timetable_mut(stop_idx, line)?.insert(entry);
        }
        debug!("Added course of line {line} at {start}");
        Ok(())
    }

    /// Removes the course of `line` that leaves its first stop at `start`.
    pub fn remove_course(&mut self, line: LineNumber, start: Time) -> Result<(), Error> {
        if !start.is_within_day() {
            return Err(out_of_day(start));
        }
        let schedule = self.existing_line(line)?.schedule(start);
        for (stop_idx, entry) in schedule.iter() {
            let found = self
                .timetable(*stop_idx, line)
                .and_then(|timetable| timetable.position_of(entry.departure_time));
            if found.is_none() {
                return Err(Error::CourseNotFound {
                    stop: *stop_idx,
                    line,
                    time: entry.departure_time,
                });
            }
        }
        for (stop_idx, entry) in schedule {
            self.timetable_mut(stop_idx, line)?
                .remove(entry.departure_time);
        }
        debug!("Removed course of line {line} at {start}");
        Ok(())
    }

    /// Start times of every course of the line, earliest first.
    pub fn courses(&self, line: LineNumber) -> Result<Vec<Time>, Error> {
        let origin = self.existing_line(line)?.path[0];
        Ok(self
            .timetable(origin, line)
            .map(|timetable| timetable.iter().map(|entry| entry.departure_time).collect())
            .unwrap_or_default())
    }

    /// Checks that every timetable of the line holds exactly the courses
    /// leaving its first stop, laid out by the line's travel times.
    pub fn check_courses(&self, line: LineNumber) -> Result<(), Error> {
        let bus_line = self.existing_line(line)?;
        let mut expected = vec![Timetable::default(); bus_line.path.len()];
        for start in self.courses(line)? {
            for (position, (_, entry)) in bus_line.schedule(start).into_iter().enumerate() {
                // Distinct starts never share a minute at the same stop.
                let _ = expected[position].insert(entry);
            }
        }
        for (stop_idx, expected) in bus_line.path.iter().zip(expected.iter()) {
            if self.timetable(*stop_idx, line) != Some(expected) {
                return Err(Error::CourseMismatch {
                    stop: *stop_idx,
                    line,
                });
            }
        }
        Ok(())
    }

    fn check_entry(
        &self,
        stop_idx: u32,
        line: LineNumber,
        departure_time: Time,
        arrival_time: Time,
    ) -> Result<(), Error> {
        self.live_stop(stop_idx)?;
        let bus_line = self.existing_line(line)?;
        if !bus_line.is_on_path(stop_idx) {
            return Err(Error::NotOnPath {
                stop: stop_idx,
                line,
            });
        }
        if arrival_time != departure_time && bus_line.path[0] != stop_idx {
            return Err(Error::UnexpectedArrival {
                stop: stop_idx,
                line,
            });
        }
        for time in [departure_time, arrival_time] {
            if !time.is_within_day() {
                return Err(out_of_day(time));
            }
        }
        Ok(())
    }

    pub(crate) fn timetable_mut(
        &mut self,
        stop_idx: u32,
        line: LineNumber,
    ) -> Result<&mut Timetable, Error> {
        self.live_stop(stop_idx)?;
        self.stops[stop_idx as usize]
            .timetables
            .get_mut(&line)
            .ok_or(Error::NotOnPath {
                stop: stop_idx,
                line,
            })
    }
}

fn out_of_day(time: Time) -> Error {
    Error::InvalidTime(TimeError::OutOfRange(time.as_minutes().to_string()))
}

#[test]
fn insert_keeps_order() {
    let mut timetable = Timetable::default();
    for minutes in [600, 480, 720, 540] {
        timetable
            .insert(Departure::passing(Time::from_minutes(minutes)))
            .unwrap();
    }
    let times: Vec<_> = timetable
        .iter()
        .map(|entry| entry.departure_time.as_minutes())
        .collect();
    assert_eq!(times, vec![480, 540, 600, 720]);
}

#[test]
fn insert_rejects_same_minute() {
    let mut timetable = Timetable::default();
    timetable.insert(Departure::passing(480.into())).unwrap();
    assert!(timetable.insert(Departure::new(480.into(), 500.into())).is_err());
    assert_eq!(timetable.len(), 1);
}

#[test]
fn first_greater_is_insert_position() {
    let mut timetable = Timetable::default();
    for minutes in [10, 20, 30] {
        timetable.insert(Departure::passing(minutes.into())).unwrap();
    }
    assert_eq!(timetable.first_greater(5.into()), 0);
    assert_eq!(timetable.first_greater(20.into()), 2);
    assert_eq!(timetable.first_greater(30.into()), 3);
}

#[test]
fn next_departure_none_after_last() {
    let mut timetable = Timetable::default();
    timetable.insert(Departure::passing(600.into())).unwrap();
    assert_eq!(timetable.next_departure_on_or_after(600.into()), Some(0));
    assert_eq!(timetable.next_departure_on_or_after(601.into()), None);
}
