use std::fmt;

use num_traits::FromPrimitive;
use rust_decimal::Decimal;

use crate::date::Timestamp;
use crate::error::{Error, Result};

/// Name of the bucket for records without a category, and for the tail
/// of a breakdown
pub const OTHER: &str = "Other";

/// A single financial event: an expense, an income, a transfer...
///
/// Immutable once built. The sign of `amount` is not interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    amount: Decimal,
    occurred_at: Timestamp,
    category: String,
}

impl Record {
    /// A blank category is stored as `"Other"`
    pub fn new<S>(amount: Decimal, occurred_at: Timestamp, category: S) -> Self
    where
        S: Into<String>,
    {
        let category = category.into();
        let category = if category.trim().is_empty() {
            OTHER.to_string()
        } else {
            category
        };
        Self {
            amount,
            occurred_at,
            category,
        }
    }

    /// Ingest a floating-point amount, rejecting NaN, infinities and
    /// magnitudes a `Decimal` cannot hold
    pub fn from_f64<S>(amount: f64, occurred_at: Timestamp, category: S) -> Result<Self>
    where
        S: Into<String>,
    {
        if !amount.is_finite() {
            return Err(Error::NonFiniteAmount(amount));
        }
        let amount = Decimal::from_f64(amount).ok_or(Error::AmountOutOfRange(amount))?;
        Ok(Self::new(amount, occurred_at, category))
    }

    /// `self.amount` accessor
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// `self.occurred_at` accessor
    pub fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }

    /// `self.category` accessor
    pub fn category(&self) -> &str {
        &self.category
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.occurred_at, self.amount, self.category)
    }
}
