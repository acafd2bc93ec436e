//! Ways in which input to the aggregator can be malformed
//!
//! All kinds are detected when a `PeriodSpec` or a `Record` is built,
//! never during aggregation itself.

use chrono::NaiveDate;

/// Rejected input
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// a period that cannot be resolved into a window
    #[error("invalid period: {0}")]
    InvalidPeriodSpec(#[from] SpecError),
    /// NaN or infinite amount
    #[error("{0} is not a finite amount")]
    NonFiniteAmount(f64),
    /// finite, but too large in magnitude for a `Decimal`
    #[error("{0} is out of the representable range")]
    AmountOutOfRange(f64),
}

/// Why a period was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SpecError {
    /// zero or negative cycle length or number of days
    #[error("{0} is not a positive length")]
    NonPositiveCount(i64),
    /// does not fit in 32 bits
    #[error("{0} is too large to be a length")]
    CountTooLarge(i64),
    /// `from` after `to`
    #[error("range starts on {from} but ends on {to}")]
    InvertedRange { from: NaiveDate, to: NaiveDate },
}

impl SpecError {
    /// What message to show to help fix the period
    pub fn fix_hint(self) -> String {
        match self {
            SpecError::NonPositiveCount(_) => "use a length of at least 1".to_string(),
            SpecError::CountTooLarge(n) => format!("{} is more than {}", n, u32::MAX),
            SpecError::InvertedRange { from, to } => format!("did you mean {}..{} ?", to, from),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
