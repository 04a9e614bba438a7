pub mod persistence;
pub mod repository;
pub mod router;
pub mod shared;

pub mod prelude {
    pub use crate::persistence::Snapshot;
    pub use crate::repository::{BusLine, Departure, LineNumber, Repository, Stop, StopDeletion, Timetable};
    pub use crate::router::{Hop, Itinerary, Leg, Router, Transfers};
    pub use crate::shared::time::{Duration, Time};
}
