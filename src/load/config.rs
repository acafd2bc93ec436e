//! Persistent settings, read from a TOML file
//!
//! ```toml
//! period = "every 1 month from 2024-01-01"
//! top = 6
//! series = 6
//! ignored_categories = ["transfer"]
//! plot = "spending.svg"
//!
//! [budgets]
//! food = 400
//! ```
//!
//! Every key is optional, unknown keys are rejected.

use std::collections::BTreeMap;
use std::path::PathBuf;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::load::error;

#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Settings {
    /// period expression, see `parse::parse_period`
    pub period: Option<String>,
    /// number of categories shown before the rest is folded into "Other"
    pub top: Option<usize>,
    /// number of windows in the trailing series
    pub series: Option<usize>,
    /// categories left out before anything is computed
    pub ignored_categories: Vec<String>,
    /// spending limit per category over the selected window
    pub budgets: BTreeMap<String, Decimal>,
    /// where to write the plot of the series
    pub plot: Option<PathBuf>,
}

/// Read settings from the contents of `path`
///
/// Problems are recorded in `errs` together with their location.
pub fn extract(path: &str, errs: &mut error::Report, contents: &str) -> Option<Settings> {
    match toml::from_str::<Settings>(contents) {
        Ok(settings) => Some(settings),
        Err(e) => {
            let err = errs.make("Invalid settings");
            match e.span().and_then(|r| pest::Span::new(contents, r.start, r.end)) {
                Some(span) => err.span(&(path, span), e.message()),
                None => err.text(format!("{}: {}", path, e.message())),
            };
            err.hint("known keys are period, top, series, ignored_categories, budgets, plot");
            None
        }
    }
}
