/// File names inside a snapshot directory.
pub struct Config {
    pub stops_file_name: String,
    pub line_stops_file_name: String,
    pub stop_times_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            stops_file_name: "stops.txt".into(),
            line_stops_file_name: "line_stops.txt".into(),
            stop_times_file_name: "stop_times.txt".into(),
        }
    }
}
