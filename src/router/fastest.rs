use tracing::{debug, trace};

use crate::{
    repository::LineNumber,
    router::{self, Itinerary, Router},
};

impl<'a> Router<'a> {
    /// Earliest arrival at the destination riding only `line`.
    ///
    /// At every stop the next departure of the line is taken and ridden one
    /// stop further, until the destination is reached or the line has no
    /// departure left today.
    pub fn fastest_along(&self, line: LineNumber) -> Result<Itinerary, router::Error> {
        self.validate(true)?;
        let bus_line = self
            .repository
            .line(line)
            .ok_or(router::Error::UnknownLine(line))?;
        if !bus_line.is_on_path(self.from) || !bus_line.is_on_path(self.to) {
            debug!("Line {line} does not connect {} and {}", self.from, self.to);
            return Err(router::Error::NoRouteFound);
        }

        let mut legs = Vec::with_capacity(bus_line.path.len());
        let mut current = self.from;
        let mut clock = self.departure;
        while current != self.to {
            let ride = self
                .ride(bus_line, current, clock)
                .ok_or(router::Error::NoRouteFound)?;
            trace!(
                "Line {line}: {} -> {} at {}",
                ride.leg.from_stop, ride.leg.to_stop, ride.leg.departure_time
            );
            current = ride.leg.to_stop;
            clock = ride.arrival;
            legs.push(ride.leg);
        }
        Ok(Itinerary::new(self.from, self.to, self.departure, legs))
    }

    /// [`Router::fastest_along`] over every line serving both stops, keeping
    /// the earliest arrival. Ties go to the lower line number.
    pub fn fastest(&self) -> Result<Itinerary, router::Error> {
        self.validate(true)?;
        self.repository
            .lines_serving(self.from)
            .into_iter()
            .filter(|line| line.is_on_path(self.to))
            .filter_map(|line| self.fastest_along(line.number).ok())
            .min_by_key(|itinerary| itinerary.total_duration())
            .ok_or(router::Error::NoRouteFound)
    }
}
