mod command;
mod display;

use crate::command::{Command, Error, resolve_stop};
use busnet::prelude::*;
use std::{
    io::{self, BufRead, Write},
    path::Path,
    time::Instant,
};
use tracing::{error, info};

const USAGE: &str = "usage: busnet <snapshot dir> <command> [args..]

  stops | lines | search <name> | stop <name> | line <number>
  add-stop <name> | add-line <number> <stop>:<minutes>..
  add-course <line> <HH:MM> | remove-course <line> <HH:MM>
  detach <line> <stop> | delete-line <number> | delete-stop <name> [--yes]
  fastest <from> <to> [HH:MM] [line] | waiting <from> <to> [HH:MM]
  transfers <from> <to>";

fn main() {
    tracing_subscriber::fmt().with_writer(io::stderr).init();

    let args: Vec<_> = std::env::args().collect();
    if args.len() < 3 {
        eprintln!("{USAGE}");
        std::process::exit(1);
    }
    let command = match Command::parse(&args[2..]) {
        Ok(command) => command,
        Err(err) => {
            error!("{err}");
            eprintln!("{USAGE}");
            std::process::exit(1);
        }
    };
    let snapshot = Snapshot::new().from_directory(&args[1]);

    let repository = match load(Path::new(&args[1]), &snapshot) {
        Ok(repository) => repository,
        Err(err) => {
            error!("Failed to load {}: {err}", args[1]);
            std::process::exit(1);
        }
    };

    if let Err(err) = run(command, repository, &snapshot) {
        error!("{err}");
        std::process::exit(1);
    }
}

fn load(path: &Path, snapshot: &Snapshot) -> Result<Repository, Error> {
    if !path.exists() {
        info!("No snapshot at {}, starting an empty network", path.display());
        return Ok(Repository::new());
    }
    info!("Loading data...");
    let now = Instant::now();
    let repository = Repository::new().load_snapshot(snapshot)?;
    info!("Loading data took {:?}", now.elapsed());
    Ok(repository)
}

fn run(command: Command, mut repository: Repository, snapshot: &Snapshot) -> Result<(), Error> {
    let mutates = command.mutates();
    match command {
        Command::Stops => print!("{}", display::stops(&repository)),
        Command::Lines => print!("{}", display::lines(&repository)),
        Command::Search(name) => {
            for stop in repository.search_stops_by_name(&name) {
                println!("{}", stop.name);
            }
        }
        Command::Stop(name) => {
            let stop_idx = resolve_stop(&repository, &name)?;
            let stop = repository
                .stop(stop_idx)
                .ok_or(busnet::repository::Error::UnknownStop(stop_idx))?;
            print!("{}", display::stop_timetable(&repository, stop));
        }
        Command::Line(number) => {
            let courses = repository.courses(number)?;
            let line = repository
                .line(number)
                .ok_or(busnet::repository::Error::UnknownLine(number))?;
            print!("{}", display::line_timetable(&repository, line, &courses));
        }
        Command::AddStop(name) => {
            let stop_idx = repository.add_stop(&name)?;
            println!("Added stop {name} ({stop_idx})");
        }
        Command::AddLine { number, stops } => {
            let mut path = Vec::with_capacity(stops.len());
            let mut travel_times = Vec::with_capacity(stops.len());
            for (name, travel_time) in stops {
                path.push(resolve_stop(&repository, &name)?);
                travel_times.push(travel_time);
            }
            let line = repository.add_line(number, path, travel_times)?;
            println!("Added line {} over {} stops", line.number, line.path.len());
        }
        Command::AddCourse { line, start } => {
            repository.add_course(line, start)?;
            println!("Added course of line {line} at {start}");
        }
        Command::RemoveCourse { line, start } => {
            repository.remove_course(line, start)?;
            println!("Removed course of line {line} at {start}");
        }
        Command::Detach { line, stop } => {
            let stop_idx = resolve_stop(&repository, &stop)?;
            repository.remove_stop_from_path(line, stop_idx)?;
            println!("Line {line} no longer calls at {stop}");
        }
        Command::DeleteLine(number) => {
            repository.delete_line(number)?;
            println!("Deleted line {number}");
        }
        Command::DeleteStop { name, assume_yes } => {
            let stop_idx = resolve_stop(&repository, &name)?;
            let plan = repository.delete_stop(stop_idx, |plan| assume_yes || confirm(plan))?;
            println!("Deleted stop {}", plan.stop_name);
            for line in plan.orphaned_lines.iter() {
                println!("Deleted line {line}");
            }
        }
        Command::Fastest {
            from,
            to,
            departure,
            line,
        } => {
            let router = repository
                .router(resolve_stop(&repository, &from)?, resolve_stop(&repository, &to)?)
                .departure_at(departure.unwrap_or_else(Time::now));
            let itinerary = match line {
                Some(line) => router.fastest_along(line)?,
                None => router.fastest()?,
            };
            print!("{}", display::itinerary(&repository, &itinerary));
        }
        Command::Transfers { from, to } => {
            let transfers = repository
                .router(resolve_stop(&repository, &from)?, resolve_stop(&repository, &to)?)
                .fewest_transfers()?;
            print!("{}", display::transfers(&repository, &transfers));
        }
        Command::Waiting {
            from,
            to,
            departure,
        } => {
            let itinerary = repository
                .router(resolve_stop(&repository, &from)?, resolve_stop(&repository, &to)?)
                .departure_at(departure.unwrap_or_else(Time::now))
                .least_waiting()?;
            print!("{}", display::itinerary(&repository, &itinerary));
        }
    }

    if mutates {
        snapshot.write(&repository)?;
        info!("Saved network");
    }
    Ok(())
}

/// Asks on stdin, anything but `y`/`yes` declines.
fn confirm(plan: &StopDeletion) -> bool {
    print!("{}", display::deletion_prompt(plan));
    if io::stdout().flush().is_err() {
        return false;
    }
    let mut answer = String::new();
    if io::stdin().lock().read_line(&mut answer).is_err() {
        return false;
    }
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
