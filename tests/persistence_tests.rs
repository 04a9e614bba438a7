mod common;

use busnet::{
    persistence::{self, Config, Snapshot},
    prelude::*,
    repository,
};
use common::*;
use std::{fs, path::Path};

fn write_files(dir: &Path, stops: &str, line_stops: &str, stop_times: &str) {
    fs::write(dir.join("stops.txt"), stops).unwrap();
    fs::write(dir.join("line_stops.txt"), line_stops).unwrap();
    fs::write(dir.join("stop_times.txt"), stop_times).unwrap();
}

const STOPS: &str = "stop_id,stop_name\n10,A\n20,B\n30,C\n";
const LINE_STOPS: &str = "line_number,stop_sequence,stop_id,travel_time\n\
5,2,20,15\n5,1,10,10\n5,3,30,20\n";

#[test]
fn save_then_load_reproduces_the_network() {
    let (mut repository, _) = with_express();
    repository.add_course(5, hm("23:50")).unwrap();
    repository.add_stop("Depot, north gate").unwrap();

    let dir = tempfile::tempdir().unwrap();
    let snapshot = Snapshot::new().from_directory(dir.path());
    repository.save_snapshot(&snapshot).unwrap();

    let loaded = Repository::new().load_snapshot(&snapshot).unwrap();
    assert_eq!(loaded, repository);
}

#[test]
fn save_compacts_deleted_stops() {
    let (mut repository, [_, b, _]) = line_five();
    repository.delete_stop(b, |_| true).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let snapshot = Snapshot::new().from_directory(dir.path().join("network"));
    repository.save_snapshot(&snapshot).unwrap();
    let loaded = Repository::new().load_snapshot(&snapshot).unwrap();

    let names: Vec<&str> = loaded.stops().map(|stop| stop.name.as_ref()).collect();
    assert_eq!(names, vec!["A", "C"]);
    let a = loaded.stop_by_name("A").unwrap().index;
    let c = loaded.stop_by_name("C").unwrap().index;
    let line = loaded.line(5).unwrap();
    assert_eq!(line.path, vec![a, c]);
    assert_eq!(line.travel_times, minutes(&[25, 20]));
    assert_eq!(departures(&loaded, a, 5), vec!["08:00-08:45"]);
    assert_eq!(departures(&loaded, c, 5), vec!["08:25-08:25"]);
}

#[test]
fn load_orders_paths_by_sequence() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        STOPS,
        LINE_STOPS,
        "stop_id,line_number,departure_time,arrival_time\n10,5,08:00,08:45\n20,5,08:10,08:10\n30,5,08:25,08:25\n",
    );
    let repository = Repository::new()
        .load_snapshot(&Snapshot::new().from_directory(dir.path()))
        .unwrap();
    let line = repository.line(5).unwrap();
    assert_eq!(line.path, vec![0, 1, 2]);
    assert_eq!(line.travel_times, minutes(&[10, 15, 20]));
    assert_eq!(repository.courses(5).unwrap(), vec![hm("08:00")]);
}

#[test]
fn custom_file_names() {
    let (repository, _) = line_five();
    let dir = tempfile::tempdir().unwrap();
    let snapshot = Snapshot::new()
        .with_config(Config {
            stops_file_name: "halts.csv".into(),
            line_stops_file_name: "routes.csv".into(),
            stop_times_file_name: "times.csv".into(),
        })
        .from_directory(dir.path());
    repository.save_snapshot(&snapshot).unwrap();
    assert!(dir.path().join("halts.csv").exists());
    assert!(!dir.path().join("stops.txt").exists());
    assert_eq!(Repository::new().load_snapshot(&snapshot).unwrap(), repository);
}

#[test]
fn unknown_stop_id_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        STOPS,
        "line_number,stop_sequence,stop_id,travel_time\n5,1,10,10\n5,2,40,10\n",
        "stop_id,line_number,departure_time,arrival_time\n",
    );
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(result, Err(persistence::Error::UnknownStopId(40))));
}

#[test]
fn timetable_for_unknown_line_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        STOPS,
        LINE_STOPS,
        "stop_id,line_number,departure_time,arrival_time\n10,6,08:00,08:00\n",
    );
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(result, Err(persistence::Error::UnknownLine(6))));
}

#[test]
fn bad_time_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        STOPS,
        LINE_STOPS,
        "stop_id,line_number,departure_time,arrival_time\n10,5,8h00,08:45\n",
    );
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(result, Err(persistence::Error::InvalidTime(_))));
}

#[test]
fn duplicate_departure_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        STOPS,
        LINE_STOPS,
        "stop_id,line_number,departure_time,arrival_time\n20,5,08:10,08:10\n20,5,08:10,08:10\n",
    );
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(
        result,
        Err(persistence::Error::Network(
            repository::Error::DuplicateDeparture { line: 5, .. }
        ))
    ));
}

#[test]
fn stop_off_the_path_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        "stop_id,stop_name\n10,A\n20,B\n30,C\n40,D\n",
        LINE_STOPS,
        "stop_id,line_number,departure_time,arrival_time\n40,5,08:10,08:10\n",
    );
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(
        result,
        Err(persistence::Error::Network(repository::Error::NotOnPath { line: 5, .. }))
    ));
}

#[test]
fn malformed_csv_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        "stop_id,stop_name\nten,A\n",
        LINE_STOPS,
        "stop_id,line_number,departure_time,arrival_time\n",
    );
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(result, Err(persistence::Error::Csv(_))));
}

#[test]
fn missing_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(result, Err(persistence::Error::Io(_))));
}

#[test]
fn snapshot_without_storage() {
    let (repository, _) = line_five();
    let snapshot = Snapshot::new();
    assert!(matches!(
        repository.save_snapshot(&snapshot),
        Err(persistence::Error::NoStorage)
    ));
    let empty = Repository::new().load_snapshot(&snapshot).unwrap();
    assert_eq!(empty.stops().count(), 0);
}

#[test]
fn overflowing_travel_times_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        STOPS,
        "line_number,stop_sequence,stop_id,travel_time\n5,1,10,4294967295\n5,2,20,2\n",
        "stop_id,line_number,departure_time,arrival_time\n",
    );
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(
        result,
        Err(persistence::Error::Network(repository::Error::InvalidPath { line: 5, .. }))
    ));
}

#[test]
fn duplicate_stop_id_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        "stop_id,stop_name\n10,A\n10,B\n30,C\n",
        "line_number,stop_sequence,stop_id,travel_time\n5,1,10,10\n5,2,30,20\n",
        "stop_id,line_number,departure_time,arrival_time\n",
    );
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(result, Err(persistence::Error::DuplicateStopId(10))));
}

#[test]
fn stop_times_off_the_travel_times_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        STOPS,
        LINE_STOPS,
        "stop_id,line_number,departure_time,arrival_time\n10,5,08:00,08:45\n20,5,08:12,08:12\n30,5,08:25,08:25\n",
    );
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(
        result,
        Err(persistence::Error::Network(repository::Error::CourseMismatch { stop: 1, line: 5 }))
    ));
}

#[test]
fn stop_time_without_a_course_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    write_files(
        dir.path(),
        STOPS,
        LINE_STOPS,
        "stop_id,line_number,departure_time,arrival_time\n30,5,08:25,08:25\n",
    );
    let result = Repository::new().load_snapshot(&Snapshot::new().from_directory(dir.path()));
    assert!(matches!(
        result,
        Err(persistence::Error::Network(repository::Error::CourseMismatch { stop: 2, line: 5 }))
    ));
}
