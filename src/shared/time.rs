use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Sub, SubAssign},
    str::FromStr,
};

use chrono::{Local, Timelike};
use thiserror::Error;

pub const MINUTES_PER_DAY: u32 = 24 * 60;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    #[error("Time {0:?} is not formatted as HH:MM")]
    Malformed(String),
    #[error("Time {0} is outside of a day")]
    OutOfRange(String),
}

/// Minutes since midnight.
///
/// Timetables only ever hold values inside `[0, 1440)`. The router keeps an
/// absolute clock that is allowed to run past midnight, use [`Time::of_day`]
/// to fold it back before looking anything up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Time(u32);

impl From<u32> for Time {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Sub<Time> for Time {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Self::Output {
        Duration(self.0 - rhs.0)
    }
}

impl Add<Duration> for Time {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign<Duration> for Time {
    fn add_assign(&mut self, rhs: Duration) {
        self.0 += rhs.0
    }
}

impl Display for Time {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hm_string())
    }
}

impl FromStr for Time {
    type Err = TimeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Time {
    pub fn now() -> Self {
        let now = Local::now();
        Self(now.num_seconds_from_midnight() / 60)
    }

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn from_hm(hours: u32, minutes: u32) -> Self {
        Self(hours * 60 + minutes)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }

    /// Folds an absolute clock back into a single day.
    pub const fn of_day(&self) -> Self {
        Self(self.0 % MINUTES_PER_DAY)
    }

    pub const fn is_within_day(&self) -> bool {
        self.0 < MINUTES_PER_DAY
    }

    /// Adds a duration and folds the result into the day.
    pub const fn add_within_day(&self, duration: Duration) -> Self {
        Self((self.0 + duration.0) % MINUTES_PER_DAY)
    }

    pub fn to_hm_string(&self) -> String {
        let minutes = self.of_day().0;
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }

    /// Parses `HH:MM` (a single hour digit is accepted).
    pub fn parse(time: &str) -> Result<Self, TimeError> {
        let malformed = || TimeError::Malformed(time.to_string());
        let (hours, minutes) = time.trim().split_once(':').ok_or_else(malformed)?;
        if hours.is_empty()
            || hours.len() > 2
            || minutes.len() != 2
            || !hours.chars().chain(minutes.chars()).all(|c| c.is_ascii_digit())
        {
            return Err(malformed());
        }
        let hours: u32 = hours.parse().map_err(|_| malformed())?;
        let minutes: u32 = minutes.parse().map_err(|_| malformed())?;
        if hours >= 24 || minutes >= 60 {
            return Err(TimeError::OutOfRange(time.to_string()));
        }
        Ok(Self::from_hm(hours, minutes))
    }
}

/// Time from `first` to `second`, assuming `second` is on the next day when it
/// is numerically smaller.
pub const fn corrected_duration(first: Time, second: Time) -> Duration {
    if second.0 >= first.0 {
        Duration(second.0 - first.0)
    } else {
        Duration(second.0 + MINUTES_PER_DAY - first.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Duration(u32);

impl From<u32> for Duration {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl Duration {
    pub const ZERO: Duration = Duration(0);

    pub const fn from_minutes(minutes: u32) -> Self {
        Self(minutes)
    }

    pub const fn from_days(days: u32) -> Self {
        Self(days * MINUTES_PER_DAY)
    }

    pub const fn as_minutes(&self) -> u32 {
        self.0
    }

    pub const fn checked_add(self, rhs: Self) -> Option<Self> {
        match self.0.checked_add(rhs.0) {
            Some(minutes) => Some(Self(minutes)),
            None => None,
        }
    }
}

impl Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hours = self.0 / 60;
        let minutes = self.0 % 60;
        if hours > 0 {
            write!(f, "{hours}h {minutes:02}min")
        } else {
            write!(f, "{minutes}min")
        }
    }
}

impl Sub for Duration {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Duration {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0
    }
}

impl Add for Duration {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Duration {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0
    }
}

impl Sum for Duration {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Duration::ZERO, |acc, value| acc + value)
    }
}

#[test]
fn parse_unparse_1() {
    let time = "00:00";
    let stime = Time::parse(time).unwrap();
    assert_eq!(time, stime.to_hm_string())
}

#[test]
fn parse_unparse_2() {
    let time = "08:05";
    let stime = Time::parse(time).unwrap();
    assert_eq!(time, stime.to_hm_string())
}

#[test]
fn parse_unparse_3() {
    let time = "23:59";
    let stime = Time::parse(time).unwrap();
    assert_eq!(time, stime.to_hm_string())
}

#[test]
fn parse_single_digit_hour() {
    assert_eq!(Time::parse("7:30").unwrap(), Time::from_hm(7, 30));
}

#[test]
fn to_string_folds_next_day() {
    assert_eq!(Time::from_minutes(MINUTES_PER_DAY + 5).to_hm_string(), "00:05");
}

#[test]
fn checked_add_stops_at_overflow() {
    let big = Duration::from_minutes(u32::MAX);
    assert_eq!(big.checked_add(Duration::from_minutes(2)), None);
    assert_eq!(
        Duration::from_minutes(10).checked_add(Duration::from_minutes(15)),
        Some(Duration::from_minutes(25))
    );
}
