use crate::{
    persistence::{self, Snapshot},
    repository::{LineNumber, Repository},
    shared::time::{Duration, Time},
};
use std::{
    collections::{BTreeMap, HashMap},
    time::Instant,
};
use tracing::debug;

/// Stop ids as written in the snapshot, mapped to fresh indices.
type IdToIndex = HashMap<u32, u32>;

impl Repository {
    /// Builds a repository from a snapshot. Any dangling reference or broken
    /// timetable invariant fails the whole load.
    pub fn load_snapshot(mut self, snapshot: &Snapshot) -> Result<Self, persistence::Error> {
        let stop_ids = self.load_stops(snapshot)?;
        self.load_lines(snapshot, &stop_ids)?;
        self.load_stop_times(snapshot, &stop_ids)?;
        Ok(self)
    }

    pub fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), persistence::Error> {
        snapshot.write(self)
    }

    fn load_stops(&mut self, snapshot: &Snapshot) -> Result<IdToIndex, persistence::Error> {
        debug!("Loading stops...");
        let now = Instant::now();
        let mut stop_ids: IdToIndex = HashMap::new();
        snapshot.stream_stops(|(_, record)| {
            let index = self.add_stop(&record.stop_name)?;
            if stop_ids.insert(record.stop_id, index).is_some() {
                return Err(persistence::Error::DuplicateStopId(record.stop_id));
            }
            Ok(())
        })?;
        debug!("Loading stops took {:?}", now.elapsed());
        Ok(stop_ids)
    }

    fn load_lines(
        &mut self,
        snapshot: &Snapshot,
        stop_ids: &IdToIndex,
    ) -> Result<(), persistence::Error> {
        debug!("Loading lines...");
        let now = Instant::now();
        let mut paths: BTreeMap<LineNumber, Vec<(u32, u32, Duration)>> = BTreeMap::new();
        snapshot.stream_line_stops(|(_, record)| {
            let stop_idx = *stop_ids
                .get(&record.stop_id)
                .ok_or(persistence::Error::UnknownStopId(record.stop_id))?;
            paths.entry(record.line_number).or_default().push((
                record.stop_sequence,
                stop_idx,
                Duration::from_minutes(record.travel_time),
            ));
            Ok(())
        })?;

        for (number, mut rows) in paths.into_iter() {
            rows.sort_by_key(|(sequence, _, _)| *sequence);
            let (path, travel_times): (Vec<u32>, Vec<Duration>) = rows
                .into_iter()
                .map(|(_, stop_idx, travel_time)| (stop_idx, travel_time))
                .unzip();
            self.add_line(number, path, travel_times)?;
        }
        debug!("Loading lines took {:?}", now.elapsed());
        Ok(())
    }

    fn load_stop_times(
        &mut self,
        snapshot: &Snapshot,
        stop_ids: &IdToIndex,
    ) -> Result<(), persistence::Error> {
        debug!("Loading stop times...");
        let now = Instant::now();
        snapshot.stream_stop_times(|(_, record)| {
            let stop_idx = *stop_ids
                .get(&record.stop_id)
                .ok_or(persistence::Error::UnknownStopId(record.stop_id))?;
            if self.line(record.line_number).is_none() {
                return Err(persistence::Error::UnknownLine(record.line_number));
            }
            let departure_time = Time::parse(&record.departure_time)?;
            let arrival_time = Time::parse(&record.arrival_time)?;
            self.insert_departure(stop_idx, record.line_number, departure_time, arrival_time)?;
            Ok(())
        })?;
        for line in self.lines() {
            self.check_courses(line.number)?;
        }
        debug!("Loading stop times took {:?}", now.elapsed());
        Ok(())
    }
}
