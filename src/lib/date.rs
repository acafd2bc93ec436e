//! Calendar-aware time arithmetic, with a focus on edge cases
//!
//! Timestamps are naive (no time zone) and nanosecond-precise. Durations
//! are expressed as a number of days, weeks, months or years: days and weeks
//! are exact, months and years follow the calendar and clamp the day when
//! the target month is too short (see `Unit::jump`).
//!
//! This module also provides the boundaries of a day, which is the
//! granularity at which windows are usually aligned.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};

/// A point in time with nanosecond precision
pub type Timestamp = NaiveDateTime;

/// Earliest representable instant, lower bound of unbounded windows
pub const EPOCH_MIN: Timestamp = NaiveDateTime::MIN;

/// Latest representable instant, upper bound of unbounded windows
pub const EPOCH_MAX: Timestamp = NaiveDateTime::MAX;

/// Smallest representable step between two instants
pub fn tick() -> TimeDelta {
    TimeDelta::nanoseconds(1)
}

/// Length unit of a repeating cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Unit {
    Day,
    Week,
    Month,
    Year,
}

impl Unit {
    /// `count` units before/after `ts`
    ///
    /// Day will be truncated to fit in the new month:
    /// adding one month to `2024-01-31` makes it `2024-02-29`,
    /// adding one year to `2024-02-29` makes it `2025-02-28`.
    ///
    /// Returns `None` if the result is not representable.
    pub fn jump(self, ts: Timestamp, count: i64) -> Option<Timestamp> {
        match self {
            Unit::Day => ts.checked_add_signed(TimeDelta::try_days(count)?),
            Unit::Week => ts.checked_add_signed(TimeDelta::try_weeks(count)?),
            Unit::Month => jump_month(ts, count),
            Unit::Year => jump_month(ts, count.checked_mul(12)?),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl FromStr for Unit {
    type Err = ();

    /// Accepts `day`, `Days`, `WEEK`, ... : case does not matter and
    /// the plural is optional
    fn from_str(s: &str) -> Result<Self, ()> {
        let lower = s.to_ascii_lowercase();
        let singular = lower.strip_suffix('s').unwrap_or(&lower);
        match singular {
            "day" => Ok(Unit::Day),
            "week" => Ok(Unit::Week),
            "month" => Ok(Unit::Month),
            "year" => Ok(Unit::Year),
            _ => Err(()),
        }
    }
}

fn jump_month(ts: Timestamp, count: i64) -> Option<Timestamp> {
    let months = Months::new(u32::try_from(count.unsigned_abs()).ok()?);
    if count >= 0 {
        ts.checked_add_months(months)
    } else {
        ts.checked_sub_months(months)
    }
}

/// Number of month boundaries crossed between `from` and `to`
///
/// Negative if `to` is before `from`. Days are ignored:
/// `2024-Jan-31` and `2024-Feb-01` are one month apart.
pub fn months_between(from: Timestamp, to: Timestamp) -> i64 {
    let years = i64::from(to.year()) - i64::from(from.year());
    let months = i64::from(to.month()) - i64::from(from.month());
    years * 12 + months
}

/// Midnight at the beginning of `date`
pub fn start_of_day(date: NaiveDate) -> Timestamp {
    date.and_time(NaiveTime::MIN)
}

/// Last tick of `date`
pub fn end_of_day(date: NaiveDate) -> Timestamp {
    match date.succ_opt() {
        Some(next) => start_of_day(next) - tick(),
        None => EPOCH_MAX,
    }
}

/// Checks that `ts` is exactly midnight
pub fn is_start_of_day(ts: Timestamp) -> bool {
    ts.time() == NaiveTime::MIN
}

/// Checks that `ts` is the last tick of its day
pub fn is_end_of_day(ts: Timestamp) -> bool {
    end_of_day(ts.date()) == ts
}
