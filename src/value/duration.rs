//! ISO-8601 durations
//!
//! [`IsoDuration`] keeps every component as written (`P380D` stays 380 days,
//! it is not normalized into weeks). Differences between two points in time
//! are decomposed into days, hours, minutes and seconds only: calendar
//! components cannot be recovered from an elapsed time span.

use crate::constants::DURATION_PATTERN;
use chrono::{DateTime, TimeDelta, TimeZone};
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DURATION_PATTERN).expect("valid duration regex"));

const SECONDS_PER_MINUTE: u64 = 60;
const SECONDS_PER_HOUR: u64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: u64 = 24 * SECONDS_PER_HOUR;

/// Text that is not a valid ISO-8601 duration
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid ISO-8601 duration: '{input}'")]
pub struct DurationParseError {
    pub input: String,
}

/// A signed ISO-8601 duration with per-component values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct IsoDuration {
    years: u64,
    months: u64,
    weeks: u64,
    days: u64,
    hours: u64,
    minutes: u64,
    seconds: u64,
    negative: bool,
}

impl IsoDuration {
    /// Duration of whole days, hours, minutes and seconds
    pub fn from_components(days: u64, hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            days,
            hours,
            minutes,
            seconds,
            ..Self::default()
        }
    }

    /// Duration with calendar components
    pub fn from_calendar(years: u64, months: u64, weeks: u64, days: u64) -> Self {
        Self {
            years,
            months,
            weeks,
            days,
            ..Self::default()
        }
    }

    /// Parse `[+-]P[nY][nM][nW][nD][T[nH][nM][nS]]`
    pub fn parse(input: &str) -> Result<Self, DurationParseError> {
        let invalid = || DurationParseError {
            input: input.to_string(),
        };

        let caps = DURATION_RE.captures(input.trim()).ok_or_else(invalid)?;

        let component = |index: usize| -> Result<Option<u64>, DurationParseError> {
            caps.get(index)
                .map(|m| m.as_str().parse::<u64>().map_err(|_| invalid()))
                .transpose()
        };

        let date_parts = [component(2)?, component(3)?, component(4)?, component(5)?];
        let time_parts = [component(6)?, component(7)?, component(8)?];

        let has_date = date_parts.iter().any(Option::is_some);
        let has_time = time_parts.iter().any(Option::is_some);
        let has_time_marker = input.to_ascii_uppercase().contains('T');

        // "P" alone and a dangling "T" are not durations
        if !(has_date || has_time) || (has_time_marker && !has_time) {
            return Err(invalid());
        }

        let negative = caps.get(1).is_some_and(|m| m.as_str() == "-");

        Ok(Self {
            years: date_parts[0].unwrap_or(0),
            months: date_parts[1].unwrap_or(0),
            weeks: date_parts[2].unwrap_or(0),
            days: date_parts[3].unwrap_or(0),
            hours: time_parts[0].unwrap_or(0),
            minutes: time_parts[1].unwrap_or(0),
            seconds: time_parts[2].unwrap_or(0),
            negative,
        })
    }

    /// Whether `input` has duration syntax
    pub fn matches_pattern(input: &str) -> bool {
        Self::parse(input).is_ok()
    }

    /// Decompose an elapsed time span into days/hours/minutes/seconds
    ///
    /// Sub-second precision is dropped.
    pub fn from_time_delta(delta: TimeDelta) -> Self {
        let negative = delta < TimeDelta::zero();
        let total = delta.num_seconds().unsigned_abs();

        Self {
            days: total / SECONDS_PER_DAY,
            hours: (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            seconds: total % SECONDS_PER_MINUTE,
            negative,
            ..Self::default()
        }
    }

    /// Duration elapsed from `start` to `end`
    pub fn between<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> Self {
        Self::from_time_delta(end.clone().signed_duration_since(start.clone()))
    }

    /// Exact time span, available only without year and month components
    pub fn to_time_delta(&self) -> Option<TimeDelta> {
        if self.years != 0 || self.months != 0 {
            return None;
        }

        let days = self.weeks.checked_mul(7)?.checked_add(self.days)?;
        let total = days
            .checked_mul(SECONDS_PER_DAY)?
            .checked_add(self.hours.checked_mul(SECONDS_PER_HOUR)?)?
            .checked_add(self.minutes.checked_mul(SECONDS_PER_MINUTE)?)?
            .checked_add(self.seconds)?;
        let total = i64::try_from(total).ok()?;

        TimeDelta::try_seconds(if self.negative { -total } else { total })
    }

    /// The same duration with the sign flipped
    pub fn inverted(&self) -> Self {
        Self {
            negative: !self.negative,
            ..*self
        }
    }

    pub fn years(&self) -> u64 {
        self.years
    }

    pub fn months(&self) -> u64 {
        self.months
    }

    pub fn weeks(&self) -> u64 {
        self.weeks
    }

    pub fn days(&self) -> u64 {
        self.days
    }

    pub fn hours(&self) -> u64 {
        self.hours
    }

    pub fn minutes(&self) -> u64 {
        self.minutes
    }

    pub fn seconds(&self) -> u64 {
        self.seconds
    }

    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn is_zero(&self) -> bool {
        Self {
            negative: false,
            ..*self
        } == Self::default()
    }
}

impl FromStr for IsoDuration {
    type Err = DurationParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<TimeDelta> for IsoDuration {
    fn from(delta: TimeDelta) -> Self {
        Self::from_time_delta(delta)
    }
}

/// Canonical ISO-8601 rendering; zero renders as `PT0S`
impl fmt::Display for IsoDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.negative {
            f.write_str("-")?;
        }
        f.write_str("P")?;

        if self.is_zero() {
            return f.write_str("T0S");
        }

        for (value, unit) in [
            (self.years, 'Y'),
            (self.months, 'M'),
            (self.weeks, 'W'),
            (self.days, 'D'),
        ] {
            if value != 0 {
                write!(f, "{}{}", value, unit)?;
            }
        }

        if self.hours != 0 || self.minutes != 0 || self.seconds != 0 {
            f.write_str("T")?;
            for (value, unit) in [(self.hours, 'H'), (self.minutes, 'M'), (self.seconds, 'S')] {
                if value != 0 {
                    write!(f, "{}{}", value, unit)?;
                }
            }
        }

        Ok(())
    }
}
