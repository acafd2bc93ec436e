//! Periods and the windows they resolve to
//!
//! A `PeriodSpec` describes how to compute a window ("every month starting
//! Jan 1st", "the past 30 days", ...). Evaluating it at a given instant
//! yields a concrete `Window`, and for periods where this makes sense, the
//! directly preceding window of the same length.

use std::fmt;
use std::num::NonZeroU32;

use chrono::NaiveDate;
use tracing::debug;

use crate::date::{self, Timestamp, Unit, EPOCH_MAX, EPOCH_MIN};
use crate::error::{Result, SpecError};

/// `Window { start, end }` is the range of instants from `start` to `end` inclusive
///
/// Always satisfies `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl Window {
    /// Contains every representable instant
    pub const UNBOUNDED: Window = Window {
        start: EPOCH_MIN,
        end: EPOCH_MAX,
    };

    /// Whole days from `from` to `to` inclusive
    pub fn days(from: NaiveDate, to: NaiveDate) -> Result<Self> {
        Ok(DateRange::new(Some(from), Some(to))?.window())
    }

    pub fn contains(&self, ts: Timestamp) -> bool {
        self.start <= ts && ts <= self.end
    }
}

/// A repeating window of `amount × unit` starting at `anchor`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cycle {
    amount: NonZeroU32,
    unit: Unit,
    anchor: NaiveDate,
}

impl Cycle {
    /// Reject lengths that are not positive or do not fit in a `u32`
    pub fn new(amount: i64, unit: Unit, anchor: NaiveDate) -> Result<Self> {
        let amount = positive(amount)?;
        Ok(Self {
            amount,
            unit,
            anchor,
        })
    }

    /// `self.amount` accessor
    pub fn amount(&self) -> NonZeroU32 {
        self.amount
    }

    /// `self.unit` accessor
    pub fn unit(&self) -> Unit {
        self.unit
    }

    /// `self.anchor` accessor
    pub fn anchor(&self) -> NaiveDate {
        self.anchor
    }

    fn origin(&self) -> Timestamp {
        date::start_of_day(self.anchor)
    }

    /// Start of the `index`-th window, `0` being the one that starts at the anchor
    ///
    /// Always measured from the anchor rather than from the previous boundary,
    /// so that clamping to short months does not accumulate.
    fn boundary(&self, index: i64) -> Option<Timestamp> {
        let count = index.checked_mul(i64::from(self.amount.get()))?;
        self.unit.jump(self.origin(), count)
    }

    /// The `index`-th window, negative indexes are before the anchor
    pub fn window_at(&self, index: i64) -> Option<Window> {
        let start = self.boundary(index)?;
        let end = match self.boundary(index + 1) {
            Some(next) => next - date::tick(),
            None => EPOCH_MAX,
        };
        Some(Window { start, end })
    }

    /// Index of the window that contains `ts`
    ///
    /// Starts from an arithmetic estimate then corrects it by at most a
    /// few steps, so the cost does not depend on the distance to the anchor.
    pub fn index_at(&self, ts: Timestamp) -> Option<i64> {
        let mut index = self.estimate(ts);
        loop {
            match self.boundary(index) {
                Some(start) if start > ts => index -= 1,
                Some(_) => break,
                None => return None,
            }
        }
        while matches!(self.boundary(index + 1), Some(next) if next <= ts) {
            index += 1;
        }
        Some(index)
    }

    fn estimate(&self, ts: Timestamp) -> i64 {
        let origin = self.origin();
        let span = i64::from(self.amount.get());
        let elapsed = match self.unit {
            Unit::Day => (ts - origin).num_days(),
            Unit::Week => (ts - origin).num_weeks(),
            Unit::Month => date::months_between(origin, ts),
            Unit::Year => date::months_between(origin, ts).div_euclid(12),
        };
        elapsed.div_euclid(span)
    }

    /// Window that contains `now`, or the first one if `now` precedes the anchor
    pub fn current(&self, now: Timestamp) -> Window {
        let first = Window {
            start: self.origin(),
            end: EPOCH_MAX,
        };
        let first = self.window_at(0).unwrap_or(first);
        if now < first.start {
            return first;
        }
        self.index_at(now)
            .and_then(|index| self.window_at(index))
            .unwrap_or(first)
    }

    /// Window directly before `current`
    ///
    /// When `current` starts on a boundary of the cycle this is the previous
    /// window of the cycle, otherwise `current.start` is stepped back by one
    /// cycle length.
    pub fn before(&self, current: &Window) -> Option<Window> {
        if let Some(index) = self.index_at(current.start) {
            if self.boundary(index) == Some(current.start) {
                return self.window_at(index - 1);
            }
        }
        let span = i64::from(self.amount.get());
        let start = self.unit.jump(current.start, -span)?;
        let end = current.start.checked_sub_signed(date::tick())?;
        Some(Window { start, end })
    }
}

/// Explicit bounds, either of which may be absent
///
/// `to` is inclusive through the end of its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DateRange {
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
}

impl DateRange {
    /// Reject ranges that end before they start
    pub fn new(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        if let (Some(from), Some(to)) = (from, to) {
            if from > to {
                return Err(SpecError::InvertedRange { from, to }.into());
            }
        }
        Ok(Self { from, to })
    }

    /// `self.from` accessor
    pub fn from(&self) -> Option<NaiveDate> {
        self.from
    }

    /// `self.to` accessor
    pub fn to(&self) -> Option<NaiveDate> {
        self.to
    }

    pub fn window(&self) -> Window {
        Window {
            start: self.from.map(date::start_of_day).unwrap_or(EPOCH_MIN),
            end: self.to.map(date::end_of_day).unwrap_or(EPOCH_MAX),
        }
    }
}

/// How to compute a window from a reference instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PeriodSpec {
    /// no bounds
    AllTime,
    /// repeating window advanced until it contains the reference instant
    Cycle(Cycle),
    /// `[now - days, now]`, the start being truncated to midnight
    PastDays(NonZeroU32),
    /// explicit bounds
    DateRange(DateRange),
}

impl PeriodSpec {
    pub fn cycle(amount: i64, unit: Unit, anchor: NaiveDate) -> Result<Self> {
        Ok(PeriodSpec::Cycle(Cycle::new(amount, unit, anchor)?))
    }

    pub fn past_days(days: i64) -> Result<Self> {
        Ok(PeriodSpec::PastDays(positive(days)?))
    }

    pub fn date_range(from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<Self> {
        Ok(PeriodSpec::DateRange(DateRange::new(from, to)?))
    }

    /// Concrete window of this period as seen from `now`
    pub fn resolve(&self, now: Timestamp) -> Window {
        let window = match self {
            PeriodSpec::AllTime => Window::UNBOUNDED,
            PeriodSpec::Cycle(cycle) => cycle.current(now),
            PeriodSpec::PastDays(days) => {
                let start = Unit::Day
                    .jump(now, -i64::from(days.get()))
                    .map(|ts| date::start_of_day(ts.date()))
                    .unwrap_or(EPOCH_MIN);
                Window { start, end: now }
            }
            PeriodSpec::DateRange(range) => range.window(),
        };
        debug!(period = %self, %now, window = %window, "resolved window");
        window
    }

    /// Window directly preceding `current`, with the same length
    ///
    /// `None` for periods that have no meaningful predecessor (all time,
    /// explicit ranges) and when the predecessor is not representable.
    pub fn previous(&self, current: &Window) -> Option<Window> {
        match self {
            PeriodSpec::AllTime | PeriodSpec::DateRange(_) => None,
            PeriodSpec::Cycle(cycle) => cycle.before(current),
            PeriodSpec::PastDays(days) => {
                let start = Unit::Day.jump(current.start, -i64::from(days.get()))?;
                let end = current.start.checked_sub_signed(date::tick())?;
                Some(Window { start, end })
            }
        }
    }
}

fn positive(count: i64) -> Result<NonZeroU32> {
    if count <= 0 {
        return Err(SpecError::NonPositiveCount(count).into());
    }
    let count = u32::try_from(count).map_err(|_| SpecError::CountTooLarge(count))?;
    NonZeroU32::new(count).ok_or_else(|| SpecError::NonPositiveCount(0).into())
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // whole days are shown as dates, anything else as full timestamps
        let aligned = date::is_start_of_day(self.start) && date::is_end_of_day(self.end);
        if self.start != EPOCH_MIN {
            if aligned {
                write!(f, "{}", self.start.date())?;
            } else {
                write!(f, "{}", self.start)?;
            }
        }
        if aligned && self.start.date() == self.end.date() {
            return Ok(());
        }
        write!(f, "..")?;
        if self.end != EPOCH_MAX {
            if aligned {
                write!(f, "{}", self.end.date())?;
            } else {
                write!(f, "{}", self.end)?;
            }
        }
        Ok(())
    }
}

impl fmt::Display for PeriodSpec {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PeriodSpec::AllTime => write!(f, "all"),
            PeriodSpec::Cycle(cycle) => write!(
                f,
                "every {} {} from {}",
                cycle.amount,
                cycle.unit.to_string().to_lowercase(),
                cycle.anchor
            ),
            PeriodSpec::PastDays(days) => write!(f, "past {} days", days),
            PeriodSpec::DateRange(range) => {
                if let Some(from) = range.from {
                    write!(f, "{}", from)?;
                }
                write!(f, "..")?;
                if let Some(to) = range.to {
                    write!(f, "{}", to)?;
                }
                Ok(())
            }
        }
    }
}
