use serde::{Serialize, de::DeserializeOwned};
use std::{
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    time::Instant,
};
use thiserror::Error;
use tracing::debug;

mod config;
pub mod models;
pub use config::*;
use models::*;

use crate::{
    repository::{self, LineNumber, Repository},
    shared::time::TimeError,
};

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Stop id {0} is not listed in the stops file")]
    UnknownStopId(u32),
    #[error("Stop id {0} is listed twice in the stops file")]
    DuplicateStopId(u32),
    #[error("Line {0} has timetables but no stops")]
    UnknownLine(LineNumber),
    #[error("Invalid time: {0}")]
    InvalidTime(#[from] TimeError),
    #[error("Inconsistent network: {0}")]
    Network(#[from] repository::Error),
    #[error("The snapshot has no storage to write to")]
    NoStorage,
}

#[derive(Default)]
pub enum StorageType {
    #[default]
    None,
    Directory(PathBuf),
}

/// A network saved as a directory of CSV files.
#[derive(Default)]
pub struct Snapshot {
    config: Config,
    storage: StorageType,
}

impl Snapshot {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: self::Config) -> Self {
        self.config = config;
        self
    }

    pub fn from_directory<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.storage = StorageType::Directory(path.into());
        self
    }

    pub fn stream_stops<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, StopRecord)) -> Result<(), self::Error>,
    {
        match &self.storage {
            StorageType::None => Ok(()),
            StorageType::Directory(path) => {
                stream_from_file::<StopRecord, F>(path, &self.config.stops_file_name, f)
            }
        }
    }

    pub fn stream_line_stops<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, LineStopRecord)) -> Result<(), self::Error>,
    {
        match &self.storage {
            StorageType::None => Ok(()),
            StorageType::Directory(path) => {
                stream_from_file::<LineStopRecord, F>(path, &self.config.line_stops_file_name, f)
            }
        }
    }

    pub fn stream_stop_times<F>(&self, f: F) -> Result<(), self::Error>
    where
        F: FnMut((usize, StopTimeRecord)) -> Result<(), self::Error>,
    {
        match &self.storage {
            StorageType::None => Ok(()),
            StorageType::Directory(path) => {
                stream_from_file::<StopTimeRecord, F>(path, &self.config.stop_times_file_name, f)
            }
        }
    }

    /// Writes every live stop and line. Stop ids are the current stop indices.
    pub fn write(&self, repository: &Repository) -> Result<(), self::Error> {
        let StorageType::Directory(path) = &self.storage else {
            return Err(Error::NoStorage);
        };
        let now = Instant::now();
        fs::create_dir_all(path)?;

        write_to_file(
            path,
            &self.config.stops_file_name,
            repository.stops().map(|stop| StopRecord {
                stop_id: stop.index,
                stop_name: stop.name.to_string(),
            }),
        )?;

        write_to_file(
            path,
            &self.config.line_stops_file_name,
            repository.lines().flat_map(|line| {
                line.path
                    .iter()
                    .zip(line.travel_times.iter())
                    .enumerate()
                    .map(move |(sequence, (stop_idx, travel_time))| LineStopRecord {
                        line_number: line.number,
                        stop_sequence: sequence as u32 + 1,
                        stop_id: *stop_idx,
                        travel_time: travel_time.as_minutes(),
                    })
            }),
        )?;

        write_to_file(
            path,
            &self.config.stop_times_file_name,
            repository.stops().flat_map(|stop| {
                stop.timetables.iter().flat_map(move |(line, timetable)| {
                    timetable.iter().map(move |entry| StopTimeRecord {
                        stop_id: stop.index,
                        line_number: *line,
                        departure_time: entry.departure_time.to_hm_string(),
                        arrival_time: entry.arrival_time.to_hm_string(),
                    })
                })
            }),
        )?;
        debug!("Writing snapshot took {:?}", now.elapsed());
        Ok(())
    }
}

fn stream_from_file<T, F>(dir: &Path, file_name: &str, mut f: F) -> Result<(), self::Error>
where
    T: DeserializeOwned,
    F: FnMut((usize, T)) -> Result<(), self::Error>,
{
    let file = File::open(dir.join(file_name))?;
    let mut reader = csv::Reader::from_reader(file);
    for (i, record) in reader.deserialize().enumerate() {
        f((i, record?))?;
    }
    Ok(())
}

fn write_to_file<T, I>(dir: &Path, file_name: &str, records: I) -> Result<(), self::Error>
where
    T: Serialize,
    I: Iterator<Item = T>,
{
    let mut writer = csv::Writer::from_path(dir.join(file_name))?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}
