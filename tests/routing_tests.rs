mod common;

use busnet::{prelude::*, router::Error};
use common::*;

fn leg(from_stop: u32, to_stop: u32, line: LineNumber, departure: &str, arrival: &str) -> Leg {
    Leg {
        from_stop,
        to_stop,
        line,
        departure_time: hm(departure),
        arrival_time: hm(arrival),
    }
}

#[test]
fn fastest_along_single_line() {
    let (repository, [a, b, c]) = line_five();
    let itinerary = repository
        .router(a, c)
        .departure_at(hm("07:50"))
        .fastest_along(5)
        .unwrap();
    assert_eq!(
        itinerary.legs,
        vec![
            leg(a, b, 5, "08:00", "08:10"),
            leg(b, c, 5, "08:10", "08:25"),
        ]
    );
    assert_eq!(itinerary.total_travel(), Duration::from_minutes(25));
    assert_eq!(itinerary.total_waiting(), Duration::from_minutes(10));
    assert_eq!(itinerary.arrival_time(), hm("08:25"));
    assert_eq!(itinerary.boardings(), 1);
}

#[test]
fn fastest_wraps_around_the_loop() {
    let (mut repository, [a, b, c]) = line_five();
    repository.add_course(5, hm("09:00")).unwrap();
    let itinerary = repository
        .router(c, b)
        .departure_at(hm("08:00"))
        .fastest_along(5)
        .unwrap();
    assert_eq!(
        itinerary.legs,
        vec![
            leg(c, a, 5, "08:25", "08:45"),
            leg(a, b, 5, "09:00", "09:10"),
        ]
    );
    assert_eq!(itinerary.waiting_times(), minutes(&[25, 15]));
    assert_eq!(itinerary.boardings(), 2);
}

#[test]
fn fastest_legs_are_chronological() {
    let (mut repository, [a, _, c]) = with_express();
    for start in ["06:00", "06:20", "07:05", "09:40"] {
        repository.add_course(5, hm(start)).unwrap();
    }
    let itinerary = repository
        .router(c, a)
        .departure_at(hm("06:30"))
        .fastest()
        .unwrap();
    let mut ready = hm("06:30");
    for leg in itinerary.legs.iter() {
        assert!(leg.departure_time >= ready);
        assert!(leg.arrival_time > leg.departure_time);
        ready = leg.arrival_time;
    }
    assert_eq!(itinerary.to, a);
}

#[test]
fn fastest_picks_the_earliest_arrival() {
    let (repository, [a, _, c]) = with_express();
    let itinerary = repository
        .router(a, c)
        .departure_at(hm("07:50"))
        .fastest()
        .unwrap();
    assert_eq!(itinerary.arrival_time(), hm("08:25"));
    assert!(itinerary.legs.iter().all(|leg| leg.line == 5));
    assert_eq!(itinerary.total_duration(), Duration::from_minutes(35));
}

#[test]
fn fastest_along_needs_both_stops_on_the_line() {
    let (repository, [a, b, _]) = with_express();
    assert_eq!(
        repository.router(a, b).departure_at(hm("07:00")).fastest_along(7),
        Err(Error::NoRouteFound)
    );
    assert_eq!(
        repository.router(a, b).departure_at(hm("07:00")).fastest_along(42),
        Err(Error::UnknownLine(42))
    );
}

#[test]
fn no_departure_left_today() {
    let (repository, [a, _, c]) = line_five();
    let router = repository.router(a, c).departure_at(hm("08:01"));
    assert_eq!(router.fastest(), Err(Error::NoRouteFound));
    assert_eq!(router.least_waiting(), Err(Error::NoRouteFound));
}

#[test]
fn route_across_midnight() {
    let mut repository = Repository::new();
    let x = repository.add_stop("X").unwrap();
    let y = repository.add_stop("Y").unwrap();
    repository.add_line(9, vec![x, y], minutes(&[30, 30])).unwrap();
    repository.add_course(9, hm("23:50")).unwrap();

    let itinerary = repository
        .router(x, y)
        .departure_at(hm("23:40"))
        .fastest()
        .unwrap();
    assert_eq!(itinerary.legs, vec![leg(x, y, 9, "23:50", "00:20")]);
    assert_eq!(itinerary.total_travel(), Duration::from_minutes(30));
    assert_eq!(itinerary.total_duration(), Duration::from_minutes(40));

    let waiting = repository
        .router(x, y)
        .departure_at(hm("23:40"))
        .least_waiting()
        .unwrap();
    assert_eq!(waiting.legs, itinerary.legs);
}

#[test]
fn least_waiting_prefers_the_bus_already_there() {
    let (repository, [a, _, c]) = with_express();
    let itinerary = repository
        .router(a, c)
        .departure_at(hm("07:50"))
        .least_waiting()
        .unwrap();
    assert_eq!(itinerary.legs, vec![leg(a, c, 7, "07:50", "08:50")]);
    assert_eq!(itinerary.total_waiting(), Duration::ZERO);
}

#[test]
fn least_waiting_never_waits_longer_than_fastest() {
    let (mut repository, [a, b, c]) = with_express();
    for start in ["07:05", "07:35", "09:00"] {
        repository.add_course(5, hm(start)).unwrap();
    }
    repository.add_course(7, hm("08:40")).unwrap();
    for (from, to) in [(a, c), (c, b), (b, a), (a, b)] {
        let router = repository.router(from, to).departure_at(hm("07:20"));
        let waiting = router.least_waiting().unwrap();
        let fastest = router.fastest().unwrap();
        assert!(waiting.total_waiting() <= fastest.total_waiting());
        assert_eq!(waiting.legs.first().map(|leg| leg.from_stop), Some(from));
        assert_eq!(waiting.legs.last().map(|leg| leg.to_stop), Some(to));
    }
}

#[test]
fn least_waiting_changes_lines() {
    let mut repository = Repository::new();
    let [p, q, r] = ["P", "Q", "R"].map(|name| repository.add_stop(name).unwrap());
    repository.add_line(1, vec![p, q], minutes(&[10, 10])).unwrap();
    repository.add_line(2, vec![q, r], minutes(&[10, 10])).unwrap();
    repository.add_course(1, hm("08:00")).unwrap();
    repository.add_course(2, hm("08:15")).unwrap();

    let itinerary = repository
        .router(p, r)
        .departure_at(hm("08:00"))
        .least_waiting()
        .unwrap();
    assert_eq!(
        itinerary.legs,
        vec![leg(p, q, 1, "08:00", "08:10"), leg(q, r, 2, "08:15", "08:25")]
    );
    assert_eq!(itinerary.total_waiting(), Duration::from_minutes(5));
    assert_eq!(itinerary.boardings(), 2);
}

#[test]
fn fewest_transfers_on_one_line() {
    let (repository, [a, b, c]) = line_five();
    let transfers = repository.router(a, c).fewest_transfers().unwrap();
    assert_eq!(
        transfers.hops,
        vec![
            Hop { from_stop: a, to_stop: b, line: 5 },
            Hop { from_stop: b, to_stop: c, line: 5 },
        ]
    );
    assert_eq!(transfers.boardings, 1);
    assert_eq!(transfers.lines(), vec![5]);
}

#[test]
fn fewest_transfers_changes_line_once() {
    let mut repository = Repository::new();
    let [a, b, c, d] = ["A", "B", "C", "D"].map(|name| repository.add_stop(name).unwrap());
    repository.add_line(1, vec![a, b], minutes(&[5, 5])).unwrap();
    repository.add_line(2, vec![b, c, d], minutes(&[5, 5, 5])).unwrap();

    let transfers = repository.router(a, d).fewest_transfers().unwrap();
    assert_eq!(
        transfers.hops,
        vec![
            Hop { from_stop: a, to_stop: b, line: 1 },
            Hop { from_stop: b, to_stop: c, line: 2 },
            Hop { from_stop: c, to_stop: d, line: 2 },
        ]
    );
    assert_eq!(transfers.boardings, 2);
    assert_eq!(transfers.lines(), vec![1, 2]);
}

#[test]
fn fewest_transfers_ignores_timetables() {
    let (mut repository, [a, _, c]) = line_five();
    repository.remove_course(5, hm("08:00")).unwrap();
    assert_eq!(repository.router(a, c).fewest_transfers().unwrap().boardings, 1);
}

#[test]
fn unreachable_stop() {
    let (mut repository, [a, _, _]) = line_five();
    let island = repository.add_stop("Island").unwrap();
    let router = repository.router(a, island).departure_at(hm("07:00"));
    assert_eq!(router.fewest_transfers(), Err(Error::NoRouteFound));
    assert_eq!(router.least_waiting(), Err(Error::NoRouteFound));
    assert_eq!(router.fastest(), Err(Error::NoRouteFound));
}

#[test]
fn invalid_queries() {
    let (repository, [a, _, c]) = line_five();
    assert_eq!(
        repository.router(a, a).fewest_transfers(),
        Err(Error::SameStartAndEnd)
    );
    assert_eq!(
        repository.router(a, 99).departure_at(hm("08:00")).fastest(),
        Err(Error::UnknownStop(99))
    );
    let late = Time::from_minutes(1500);
    assert_eq!(
        repository.router(a, c).departure_at(late).least_waiting(),
        Err(Error::NoTimeCapacity(late))
    );
    assert!(repository.router(a, c).departure_at(late).fewest_transfers().is_ok());
}
