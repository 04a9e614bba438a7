use std::{
    cmp::Reverse,
    collections::{BinaryHeap, HashSet},
};

use tracing::{debug, trace};

use crate::{
    router::{self, Itinerary, Leg, Router},
    shared::time::{Duration, Time},
};

/// A state of the search: standing at a stop at some point on the absolute clock.
#[derive(Debug, Clone)]
struct Node {
    stop_idx: u32,
    arrival: Time,
    /// The node we rode in from and the leg taken.
    parent: Option<(usize, Leg)>,
}

/// Queue key. Least waiting first, then earliest arrival, then discovery order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Label {
    waiting: Duration,
    arrival: Time,
    node: usize,
}

impl<'a> Router<'a> {
    /// Route that spends the least time standing at stops.
    ///
    /// Best first over (stop, arrival) states keyed by accumulated waiting.
    /// From a state every line serving the stop offers its next departure,
    /// ridden one stop. A state is settled the first time it is popped and
    /// the search ends when the destination is popped. States more than a
    /// day after the departure are not expanded.
    pub fn least_waiting(&self) -> Result<Itinerary, router::Error> {
        self.validate(true)?;
        let horizon = self.departure + Duration::from_days(1);

        let mut nodes = vec![Node {
            stop_idx: self.from,
            arrival: self.departure,
            parent: None,
        }];
        let mut settled: HashSet<(u32, Time)> = HashSet::new();
        let mut queue = BinaryHeap::from([Reverse(Label {
            waiting: Duration::ZERO,
            arrival: self.departure,
            node: 0,
        })]);

        while let Some(Reverse(label)) = queue.pop() {
            let (stop_idx, clock) = (nodes[label.node].stop_idx, nodes[label.node].arrival);
            if !settled.insert((stop_idx, clock)) {
                continue;
            }
            if stop_idx == self.to {
                debug!(
                    "Reached {} waiting {} after settling {} states",
                    self.to,
                    label.waiting,
                    settled.len()
                );
                return Ok(self.backtrack(&nodes, label.node));
            }

            for line in self.repository.lines_serving(stop_idx) {
                let Some(ride) = self.ride(line, stop_idx, clock) else {
                    continue;
                };
                if ride.arrival >= horizon || settled.contains(&(ride.leg.to_stop, ride.arrival)) {
                    continue;
                }
                let waiting = label.waiting + ride.waiting;
                trace!(
                    "Line {}: {} -> {} waiting {}",
                    line.number, stop_idx, ride.leg.to_stop, waiting
                );
                let node = nodes.len();
                nodes.push(Node {
                    stop_idx: ride.leg.to_stop,
                    arrival: ride.arrival,
                    parent: Some((label.node, ride.leg)),
                });
                queue.push(Reverse(Label {
                    waiting,
                    arrival: ride.arrival,
                    node,
                }));
            }
        }
        Err(router::Error::NoRouteFound)
    }

    fn backtrack(&self, nodes: &[Node], target: usize) -> Itinerary {
        let mut legs = vec![];
        let mut current = target;
        while let Some((parent, leg)) = nodes[current].parent {
            legs.push(leg);
            current = parent;
        }
        legs.reverse();
        Itinerary::new(self.from, self.to, self.departure, legs)
    }
}
