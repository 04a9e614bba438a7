use std::collections::VecDeque;

use tracing::{debug, trace};

use crate::{
    repository::LineNumber,
    router::{self, Hop, Router, Transfers},
};

/// How a stop was first reached: boarding `line` at `from_stop`.
#[derive(Debug, Clone, Copy)]
struct Boarding {
    from_stop: u32,
    line: LineNumber,
}

impl<'a> Router<'a> {
    /// Route with the fewest boardings, ignoring the timetables.
    ///
    /// Breadth first over stops where one step is a whole ride on one line,
    /// so every stop reachable with `k` boardings is found before any stop
    /// needing `k + 1`. The first route found wins ties.
    pub fn fewest_transfers(&self) -> Result<Transfers, router::Error> {
        self.validate(false)?;
        let slots = self.repository.stop_slots();
        let mut visited = vec![false; slots];
        let mut parents: Vec<Option<Boarding>> = vec![None; slots];
        let mut queue = VecDeque::from([self.from]);
        visited[self.from as usize] = true;

        'search: while let Some(stop_idx) = queue.pop_front() {
            for line in self.repository.lines_serving(stop_idx) {
                for next in line.stops_after(stop_idx) {
                    if visited[next as usize] {
                        continue;
                    }
                    visited[next as usize] = true;
                    parents[next as usize] = Some(Boarding {
                        from_stop: stop_idx,
                        line: line.number,
                    });
                    trace!("Reached {next} from {stop_idx} on line {}", line.number);
                    if next == self.to {
                        break 'search;
                    }
                    queue.push_back(next);
                }
            }
        }

        let mut boardings = vec![];
        let mut current = self.to;
        while current != self.from {
            let boarding = parents[current as usize].ok_or(router::Error::NoRouteFound)?;
            boardings.push((boarding, current));
            current = boarding.from_stop;
        }
        boardings.reverse();
        debug!(
            "Found route from {} to {} with {} boardings",
            self.from,
            self.to,
            boardings.len()
        );

        let mut hops = vec![];
        for (boarding, alight_at) in boardings.iter() {
            let line = self
                .repository
                .line(boarding.line)
                .ok_or(router::Error::UnknownLine(boarding.line))?;
            let mut from_stop = boarding.from_stop;
            for to_stop in line.stops_after(boarding.from_stop) {
                hops.push(Hop {
                    from_stop,
                    to_stop,
                    line: line.number,
                });
                if to_stop == *alight_at {
                    break;
                }
                from_stop = to_stop;
            }
        }

        Ok(Transfers {
            from: self.from,
            to: self.to,
            hops,
            boardings: boardings.len(),
        })
    }
}
