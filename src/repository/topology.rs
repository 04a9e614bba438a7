use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    repository::{BusLine, Error, LineNumber, Repository},
    shared::time::Duration,
};

impl BusLine {
    pub fn is_on_path(&self, stop_idx: u32) -> bool {
        self.path.contains(&stop_idx)
    }

    pub fn position(&self, stop_idx: u32) -> Option<usize> {
        self.path.iter().position(|idx| *idx == stop_idx)
    }

    /// The stop after `stop_idx`, wrapping from the last stop to the first.
    pub fn next_stop_after(&self, stop_idx: u32) -> Option<u32> {
        let position = self.position(stop_idx)?;
        Some(self.path[(position + 1) % self.path.len()])
    }

    /// Travel time from `stop_idx` to the stop after it.
    pub fn travel_time_after(&self, stop_idx: u32) -> Option<Duration> {
        let position = self.position(stop_idx)?;
        Some(self.travel_times[position])
    }

    /// Stops reachable by staying on the bus from `stop_idx`, in riding order.
    pub fn stops_after(&self, stop_idx: u32) -> impl Iterator<Item = u32> + '_ {
        let position = self.position(stop_idx).unwrap_or(0);
        let count = if self.is_on_path(stop_idx) {
            self.path.len() - 1
        } else {
            0
        };
        (1..=count).map(move |step| self.path[(position + step) % self.path.len()])
    }

    /// Drops one occurrence of the stop. The legs into and out of it merge.
    pub fn remove_stop_from_path(&mut self, stop_idx: u32) -> bool {
        let Some(position) = self.position(stop_idx) else {
            return false;
        };
        let count = self.path.len();
        let merged = self.travel_times[position];
        self.travel_times[(position + count - 1) % count] += merged;
        self.path.remove(position);
        self.travel_times.remove(position);
        true
    }
}

/// What deleting a stop would take with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StopDeletion {
    pub stop_idx: u32,
    pub stop_name: Arc<str>,
    /// Every line going through the stop, ascending.
    pub lines: Vec<LineNumber>,
    /// Lines left with fewer than two stops, deleted as a whole on commit.
    pub orphaned_lines: Vec<LineNumber>,
}

impl StopDeletion {
    pub fn needs_confirmation(&self) -> bool {
        !self.orphaned_lines.is_empty()
    }
}

impl Repository {
    pub fn is_on_path(&self, line: LineNumber, stop_idx: u32) -> bool {
        self.line(line)
            .is_some_and(|line| line.is_on_path(stop_idx))
    }

    pub fn next_stop_after(&self, stop_idx: u32, line: LineNumber) -> Option<u32> {
        self.line(line)?.next_stop_after(stop_idx)
    }

    /// Takes a stop out of a line's path without deleting the stop.
    /// Refuses to leave the line with a single stop, use [`Repository::delete_line`].
    pub fn remove_stop_from_path(&mut self, line: LineNumber, stop_idx: u32) -> Result<(), Error> {
        self.live_stop(stop_idx)?;
        let bus_line = self.existing_line(line)?;
        if !bus_line.is_on_path(stop_idx) {
            return Err(Error::NotOnPath {
                stop: stop_idx,
                line,
            });
        }
        if bus_line.path.len() <= 2 {
            return Err(Error::InvalidPath {
                line,
                reason: "a line needs at least two stops".to_string(),
            });
        }
        self.detach_stop(line, stop_idx);
        Ok(())
    }

    /// Removes the line and its timetables at every stop it served.
    pub fn delete_line(&mut self, line: LineNumber) -> Result<BusLine, Error> {
        let bus_line = self.lines.remove(&line).ok_or(Error::UnknownLine(line))?;
        for stop_idx in bus_line.path.iter() {
            self.stops[*stop_idx as usize].timetables.remove(&line);
        }
        debug!("Deleted line {line}");
        Ok(bus_line)
    }

    /// Computes what deleting the stop would remove. Never mutates.
    pub fn plan_stop_deletion(&self, stop_idx: u32) -> Result<StopDeletion, Error> {
        let stop = self.live_stop(stop_idx)?;
        let lines: Vec<LineNumber> = self
            .lines()
            .filter(|line| line.is_on_path(stop_idx))
            .map(|line| line.number)
            .collect();
        let orphaned_lines = lines
            .iter()
            .copied()
            .filter(|number| self.lines[number].path.len() <= 2)
            .collect();
        Ok(StopDeletion {
            stop_idx,
            stop_name: stop.name.clone(),
            lines,
            orphaned_lines,
        })
    }

    /// Applies a plan from [`Repository::plan_stop_deletion`].
    /// Nothing changes unless the plan is still current and, when it orphans
    /// lines, `approved` is set.
    pub fn commit_stop_deletion(&mut self, plan: StopDeletion, approved: bool) -> Result<(), Error> {
        if self.plan_stop_deletion(plan.stop_idx)? != plan {
            return Err(Error::StaleDeletionPlan(plan.stop_idx));
        }
        if plan.needs_confirmation() && !approved {
            warn!(
                "Deleting stop {} would remove lines {:?}, not confirmed",
                plan.stop_idx, plan.orphaned_lines
            );
            return Err(Error::DeletionNotConfirmed(plan.stop_name.to_string()));
        }

        for line in plan.lines.iter() {
            if plan.orphaned_lines.contains(line) {
                self.delete_line(*line)?;
            } else {
                self.detach_stop(*line, plan.stop_idx);
            }
        }
        self.retire_stop(plan.stop_idx);
        debug!(
            "Deleted stop {} touching lines {:?}",
            plan.stop_idx, plan.lines
        );
        Ok(())
    }

    /// Plans and commits in one go. `confirm` is only asked when lines would
    /// be deleted along with the stop.
    pub fn delete_stop<F>(&mut self, stop_idx: u32, confirm: F) -> Result<StopDeletion, Error>
    where
        F: FnOnce(&StopDeletion) -> bool,
    {
        let plan = self.plan_stop_deletion(stop_idx)?;
        let approved = !plan.needs_confirmation() || confirm(&plan);
        self.commit_stop_deletion(plan.clone(), approved)?;
        Ok(plan)
    }

    /// Removes the stop from the line's path, drops its timetable for the
    /// line and rebuilds the return times when the first stop changed.
    /// The line must keep at least two stops.
    fn detach_stop(&mut self, line: LineNumber, stop_idx: u32) {
        let Some(bus_line) = self.lines.get_mut(&line) else {
            return;
        };
        let was_origin = bus_line.path.first() == Some(&stop_idx);
        bus_line.remove_stop_from_path(stop_idx);
        let origin = bus_line.path[0];
        let loop_duration = bus_line.loop_duration();
        self.stops[stop_idx as usize].timetables.remove(&line);

        if was_origin
            && let Some(timetable) = self.stops[origin as usize].timetables.get_mut(&line)
        {
            timetable.0.iter_mut().for_each(|entry| {
                entry.arrival_time = entry.departure_time.add_within_day(loop_duration);
            });
        }
    }
}

#[test]
fn remove_middle_stop_merges_legs() {
    let mut line = BusLine {
        number: 1,
        path: vec![0, 1, 2],
        travel_times: vec![10.into(), 15.into(), 20.into()],
    };
    assert!(line.remove_stop_from_path(1));
    assert_eq!(line.path, vec![0, 2]);
    assert_eq!(line.travel_times, vec![25.into(), 20.into()]);
}

#[test]
fn remove_first_stop_merges_return_leg() {
    let mut line = BusLine {
        number: 1,
        path: vec![0, 1, 2],
        travel_times: vec![10.into(), 15.into(), 20.into()],
    };
    assert!(line.remove_stop_from_path(0));
    assert_eq!(line.path, vec![1, 2]);
    assert_eq!(line.travel_times, vec![15.into(), 30.into()]);
}

#[test]
fn next_stop_wraps() {
    let line = BusLine {
        number: 1,
        path: vec![4, 7, 9],
        travel_times: vec![1.into(), 1.into(), 1.into()],
    };
    assert_eq!(line.next_stop_after(7), Some(9));
    assert_eq!(line.next_stop_after(9), Some(4));
    assert_eq!(line.next_stop_after(5), None);
    assert_eq!(line.stops_after(7).collect::<Vec<_>>(), vec![9, 4]);
}
