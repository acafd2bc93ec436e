//! Period bucketing and aggregation of financial records
//!
//! Time arithmetic (`date`), records (`entry`), periods and the windows
//! they resolve to (`period`), and reductions over a window (`summary`).
//!
//! Nothing in here reads the clock: every operation that depends on the
//! current instant takes it as a parameter.

pub mod date;
pub mod entry;
pub mod error;
pub mod period;
pub mod summary;

pub use date::{Timestamp, Unit};
pub use entry::Record;
pub use error::{Error, Result, SpecError};
pub use period::{Cycle, DateRange, PeriodSpec, Window};
pub use summary::{
    aggregate, average_total, breakdown_by_category, delta_pct, savings_rate, sum_in_window, AggregateResult,
    Calendar, Share, Summary, Usage,
};
