use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StopRecord {
    pub stop_id: u32,
    pub stop_name: String,
}

/// One stop of a line's path. `travel_time` is in minutes to the next stop,
/// the last row of a line leading back to its first stop.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LineStopRecord {
    pub line_number: u32,
    pub stop_sequence: u32,
    pub stop_id: u32,
    pub travel_time: u32,
}

/// Times are written as `HH:MM`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct StopTimeRecord {
    pub stop_id: u32,
    pub line_number: u32,
    pub departure_time: String,
    pub arrival_time: String,
}
