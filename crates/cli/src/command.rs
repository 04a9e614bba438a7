use busnet::{
    persistence,
    repository::{self, LineNumber, Repository},
    router,
    shared::time::{Duration, Time, TimeError},
};
use std::io;
use thiserror::Error;

use crate::display;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Missing argument <{0}>")]
    MissingArgument(&'static str),
    #[error("Unexpected argument {0:?}")]
    UnexpectedArgument(String),
    #[error("Unknown command {0:?}")]
    UnknownCommand(String),
    #[error("{0:?} is not a line number")]
    InvalidLineNumber(String),
    #[error("{0:?} is not a stop with a travel time, expected <stop>:<minutes>")]
    InvalidLineStop(String),
    #[error("No stop is named {name:?}{}", display::suggestions(.suggestions))]
    UnknownStop {
        name: String,
        suggestions: Vec<String>,
    },
    #[error(transparent)]
    Time(#[from] TimeError),
    #[error(transparent)]
    Repository(#[from] repository::Error),
    #[error(transparent)]
    Router(#[from] router::Error),
    #[error(transparent)]
    Persistence(#[from] persistence::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub enum Command {
    Stops,
    Lines,
    Search(String),
    Stop(String),
    Line(LineNumber),
    AddStop(String),
    AddLine {
        number: LineNumber,
        stops: Vec<(String, Duration)>,
    },
    AddCourse {
        line: LineNumber,
        start: Time,
    },
    RemoveCourse {
        line: LineNumber,
        start: Time,
    },
    Detach {
        line: LineNumber,
        stop: String,
    },
    DeleteLine(LineNumber),
    DeleteStop {
        name: String,
        assume_yes: bool,
    },
    Fastest {
        from: String,
        to: String,
        departure: Option<Time>,
        line: Option<LineNumber>,
    },
    Transfers {
        from: String,
        to: String,
    },
    Waiting {
        from: String,
        to: String,
        departure: Option<Time>,
    },
}

impl Command {
    pub fn parse(args: &[String]) -> Result<Self, Error> {
        let mut args = Args(args.iter());
        let name = args.required("command")?;
        let command = match name.as_str() {
            "stops" => Command::Stops,
            "lines" => Command::Lines,
            "search" => Command::Search(args.required("name")?),
            "stop" => Command::Stop(args.required("stop")?),
            "line" => Command::Line(line_number(&args.required("line")?)?),
            "add-stop" => Command::AddStop(args.required("name")?),
            "add-line" => {
                let number = line_number(&args.required("line")?)?;
                let stops = args.rest().map(|arg| line_stop(&arg)).collect::<Result<_, _>>()?;
                return Ok(Command::AddLine { number, stops });
            }
            "add-course" => Command::AddCourse {
                line: line_number(&args.required("line")?)?,
                start: Time::parse(&args.required("HH:MM")?)?,
            },
            "remove-course" => Command::RemoveCourse {
                line: line_number(&args.required("line")?)?,
                start: Time::parse(&args.required("HH:MM")?)?,
            },
            "detach" => Command::Detach {
                line: line_number(&args.required("line")?)?,
                stop: args.required("stop")?,
            },
            "delete-line" => Command::DeleteLine(line_number(&args.required("line")?)?),
            "delete-stop" => {
                let name = args.required("stop")?;
                let assume_yes = args.flag("--yes");
                Command::DeleteStop { name, assume_yes }
            }
            "fastest" => Command::Fastest {
                from: args.required("from")?,
                to: args.required("to")?,
                departure: args.optional().map(|time| Time::parse(&time)).transpose()?,
                line: args.optional().map(|line| line_number(&line)).transpose()?,
            },
            "transfers" => Command::Transfers {
                from: args.required("from")?,
                to: args.required("to")?,
            },
            "waiting" => Command::Waiting {
                from: args.required("from")?,
                to: args.required("to")?,
                departure: args.optional().map(|time| Time::parse(&time)).transpose()?,
            },
            _ => return Err(Error::UnknownCommand(name)),
        };
        args.finish()?;
        Ok(command)
    }

    /// Whether the network has to be written back afterwards.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Command::AddStop(_)
                | Command::AddLine { .. }
                | Command::AddCourse { .. }
                | Command::RemoveCourse { .. }
                | Command::Detach { .. }
                | Command::DeleteLine(_)
                | Command::DeleteStop { .. }
        )
    }
}

/// Looks a stop up by exact name, falling back to close matches for the error.
pub fn resolve_stop(repository: &Repository, name: &str) -> Result<u32, Error> {
    match repository.stop_by_name(name) {
        Ok(stop) => Ok(stop.index),
        Err(repository::Error::UnknownStopName(_)) => Err(Error::UnknownStop {
            name: name.to_string(),
            suggestions: repository
                .search_stops_by_name(name)
                .into_iter()
                .take(3)
                .map(|stop| stop.name.to_string())
                .collect(),
        }),
        Err(err) => Err(err.into()),
    }
}

fn line_number(arg: &str) -> Result<LineNumber, Error> {
    arg.parse()
        .map_err(|_| Error::InvalidLineNumber(arg.to_string()))
}

fn line_stop(arg: &str) -> Result<(String, Duration), Error> {
    let invalid = || Error::InvalidLineStop(arg.to_string());
    let (name, minutes) = arg.rsplit_once(':').ok_or_else(invalid)?;
    let minutes: u32 = minutes.trim().parse().map_err(|_| invalid())?;
    if name.trim().is_empty() {
        return Err(invalid());
    }
    Ok((name.to_string(), Duration::from_minutes(minutes)))
}

struct Args<'a>(std::slice::Iter<'a, String>);

impl Args<'_> {
    fn required(&mut self, name: &'static str) -> Result<String, Error> {
        self.0.next().cloned().ok_or(Error::MissingArgument(name))
    }

    fn optional(&mut self) -> Option<String> {
        self.0.next().cloned()
    }

    fn flag(&mut self, flag: &str) -> bool {
        if self.0.as_slice().first().is_some_and(|arg| arg == flag) {
            self.0.next();
            return true;
        }
        false
    }

    fn rest(&mut self) -> impl Iterator<Item = String> + '_ {
        self.0.by_ref().cloned()
    }

    fn finish(mut self) -> Result<(), Error> {
        match self.0.next() {
            Some(arg) => Err(Error::UnexpectedArgument(arg.clone())),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
fn args(line: &str) -> Vec<String> {
    line.split_whitespace().map(str::to_string).collect()
}

#[test]
fn parses_fastest_with_line() {
    let command = Command::parse(&args("fastest A C 07:50 5")).unwrap();
    let Command::Fastest {
        from,
        to,
        departure,
        line,
    } = command
    else {
        panic!("expected fastest");
    };
    assert_eq!((from.as_str(), to.as_str()), ("A", "C"));
    assert_eq!(departure, Some(Time::from_hm(7, 50)));
    assert_eq!(line, Some(5));
}

#[test]
fn parses_line_stops() {
    let command = Command::parse(&args("add-line 5 A:10 B:15 C:20")).unwrap();
    let Command::AddLine { number, stops } = command else {
        panic!("expected add-line");
    };
    assert_eq!(number, 5);
    assert_eq!(stops[1], ("B".to_string(), Duration::from_minutes(15)));
}

#[test]
fn rejects_bad_input() {
    assert!(matches!(
        Command::parse(&args("line five")),
        Err(Error::InvalidLineNumber(_))
    ));
    assert!(matches!(
        Command::parse(&args("waiting A B 25:00")),
        Err(Error::Time(TimeError::OutOfRange(_)))
    ));
    assert!(matches!(
        Command::parse(&args("transfers A")),
        Err(Error::MissingArgument("to"))
    ));
    assert!(matches!(
        Command::parse(&args("stops now")),
        Err(Error::UnexpectedArgument(_))
    ));
}

#[test]
fn delete_stop_takes_yes_flag() {
    let command = Command::parse(&args("delete-stop Central --yes")).unwrap();
    assert!(matches!(
        command,
        Command::DeleteStop {
            assume_yes: true,
            ..
        }
    ));
}
