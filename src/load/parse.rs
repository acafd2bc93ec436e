//! Convert the contents of a file into records, and text into periods
//!
//! The grammar only checks the shape of the input: that dates exist,
//! that amounts fit, and that periods are well-formed is verified here so
//! that each problem can be reported with its location.

#![allow(clippy::upper_case_acronyms)]

use std::str::FromStr;

use chrono::{Months, NaiveDate, NaiveTime};
use pest::Parser;
use pest_derive::Parser;
use rust_decimal::Decimal;
use tracing::trace;

use billfold::{PeriodSpec, Record, Timestamp, Unit};

use crate::load::error;

/// Wrapper around Pest's `Pair`
type Pair<'i> = pest::iterators::Pair<'i, Rule>;

/// Pest-generated parser
#[derive(Parser)]
#[grammar = "load/billfold.pest"]
pub struct BillfoldParser;

/// Get the records contained in `contents`, read from `path`
///
/// All lines are checked even after a failure, so the return value holds
/// every record that is valid. Success is determined by querying `errs`
/// (e.g. `errs.is_fatal()`), not by looking at the records.
pub fn extract(path: &str, errs: &mut error::Report, contents: &str) -> Vec<Record> {
    let program = match BillfoldParser::parse(Rule::program, contents) {
        Ok(mut pairs) => match pairs.next() {
            Some(program) => program,
            None => return Vec::new(),
        },
        Err(e) => {
            errs.make("Parsing failure").parse_failure(e.with_path(path));
            return Vec::new();
        }
    };
    let mut records = Vec::new();
    for pair in program.into_inner() {
        match pair.as_rule() {
            Rule::record => {
                if let Some(record) = validate_record(path, errs, pair) {
                    trace!(%record, "read record");
                    records.push(record);
                }
            }
            Rule::EOI => break,
            _ => unreachable!(),
        }
    }
    records
}

/// Check a single line
fn validate_record(path: &str, errs: &mut error::Report, pair: Pair) -> Option<Record> {
    let mut items = pair.into_inner();
    let occurred_at = validate_timestamp(path, errs, items.next()?);
    let amount = validate_amount(path, errs, items.next()?);
    let category = items.next()?.as_str();
    // the note is for the reader of the file only
    Some(Record::new(amount?, occurred_at?, category))
}

/// Parse an amount of money
///
/// The grammar only accepts decimal numbers, but they may still have too
/// many digits to be represented.
fn validate_amount(path: &str, errs: &mut error::Report, pair: Pair) -> Option<Decimal> {
    match Decimal::from_str(pair.as_str()) {
        Ok(amount) => Some(amount),
        Err(e) => {
            let loc = (path, pair.as_span());
            errs.make("Invalid amount")
                .span(&loc, "provided here")
                .text(format!("'{}' cannot be represented: {}", pair.as_str(), e))
                .hint("use at most 28 significant digits");
            None
        }
    }
}

fn validate_timestamp(path: &str, errs: &mut error::Report, pair: Pair) -> Option<Timestamp> {
    let mut items = pair.into_inner();
    let date = validate_date(path, errs, items.next()?);
    let time = match items.next() {
        Some(time) => validate_time(path, errs, time)?,
        None => NaiveTime::MIN,
    };
    Some(date?.and_time(time))
}

/// Parse a date and check that it exists
fn validate_date(path: &str, errs: &mut error::Report, pair: Pair) -> Option<NaiveDate> {
    let loc = (path, pair.as_span());
    let mut items = pair.into_inner();
    // the grammar bounds the number of digits, these always fit
    let year = items.next()?.as_str().parse::<i32>().ok()?;
    let month = items.next()?.as_str().parse::<u32>().ok()?;
    let day = items.next()?.as_str().parse::<u32>().ok()?;
    match NaiveDate::from_ymd_opt(year, month, day) {
        Some(date) => Some(date),
        None => {
            let err = errs
                .make("Invalid date")
                .span(&loc, "provided here")
                .text(format!("{:04}-{:02}-{:02} does not exist", year, month, day));
            match month_length(year, month) {
                Some(len) => err.hint(format!("{:04}-{:02} has {} days", year, month, len)),
                None => err.hint("months are numbered from 1 to 12"),
            };
            None
        }
    }
}

/// Number of days in `month`, `None` if it is not a valid month
fn month_length(year: i32, month: u32) -> Option<u32> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let next = first.checked_add_months(Months::new(1))?;
    u32::try_from((next - first).num_days()).ok()
}

fn validate_time(path: &str, errs: &mut error::Report, pair: Pair) -> Option<NaiveTime> {
    let loc = (path, pair.as_span());
    let text = pair.as_str();
    let mut fields = pair
        .into_inner()
        .map(|item| item.as_str().parse::<u32>().ok());
    let hour = fields.next()??;
    let minute = fields.next()??;
    let second = fields.next().flatten().unwrap_or(0);
    match NaiveTime::from_hms_opt(hour, minute, second) {
        Some(time) => Some(time),
        None => {
            errs.make("Invalid time")
                .span(&loc, "provided here")
                .text(format!("{} is not a time of day", text))
                .hint("hours range from 00 to 23, minutes and seconds from 00 to 59");
            None
        }
    }
}

/// Read a period expression such as `every 2 weeks from 2024-01-01`
///
/// `origin` names where `text` comes from (a file or a command-line flag).
pub fn parse_period(origin: &str, errs: &mut error::Report, text: &str) -> Option<PeriodSpec> {
    let period = match BillfoldParser::parse(Rule::period, text) {
        Ok(mut pairs) => pairs.next()?,
        Err(e) => {
            errs.make("Invalid period")
                .parse_failure(e.with_path(origin))
                .hint("try 'all', 'past 30 days', 'every month from 2024-01-01' or '2024-01-01..'");
            return None;
        }
    };
    let pair = period.into_inner().next()?;
    let loc = (origin, pair.as_span());
    let spec = match pair.as_rule() {
        Rule::all_time => Ok(PeriodSpec::AllTime),
        Rule::past_days => {
            let count = validate_count(origin, errs, pair.into_inner().next()?)?;
            PeriodSpec::past_days(count)
        }
        Rule::cycle => {
            let mut count = 1;
            let mut unit = Unit::Month;
            let mut anchor = None;
            for item in pair.into_inner() {
                match item.as_rule() {
                    Rule::count => count = validate_count(origin, errs, item)?,
                    // the grammar only accepts known units
                    Rule::unit => unit = item.as_str().parse::<Unit>().ok()?,
                    Rule::date => anchor = Some(validate_date(origin, errs, item)?),
                    _ => unreachable!(),
                }
            }
            PeriodSpec::cycle(count, unit, anchor?)
        }
        Rule::date_range => {
            let mut from = None;
            let mut to = None;
            for item in pair.into_inner() {
                let rule = item.as_rule();
                let date = validate_date(origin, errs, item.into_inner().next()?)?;
                match rule {
                    Rule::from_date => from = Some(date),
                    Rule::to_date => to = Some(date),
                    _ => unreachable!(),
                }
            }
            PeriodSpec::date_range(from, to)
        }
        _ => unreachable!(),
    };
    match spec {
        Ok(spec) => Some(spec),
        Err(err) => {
            let report = errs
                .make("Invalid period")
                .span(&loc, "provided here")
                .text(&err);
            if let billfold::Error::InvalidPeriodSpec(reason) = err {
                report.hint(reason.fix_hint());
            }
            None
        }
    }
}

/// Read a number of days or cycle units
///
/// Only overflow is reported here, zero is rejected when the period is built.
fn validate_count(origin: &str, errs: &mut error::Report, pair: Pair) -> Option<i64> {
    match pair.as_str().parse::<i64>() {
        Ok(count) => Some(count),
        Err(_) => {
            let loc = (origin, pair.as_span());
            errs.make("Invalid period")
                .span(&loc, "provided here")
                .text(format!("{} is too large to be a length", pair.as_str()));
            None
        }
    }
}

/// Read a reference instant such as `2024-03-31` or `2024-03-31T18:30`
pub fn parse_timestamp(origin: &str, errs: &mut error::Report, text: &str) -> Option<Timestamp> {
    match BillfoldParser::parse(Rule::timestamp, text.trim()) {
        Ok(mut pairs) => {
            let pair = pairs.next()?;
            if pair.as_str().len() != text.trim().len() {
                errs.make("Invalid date")
                    .text(format!("'{}' has trailing characters", text))
                    .hint("use YYYY-MM-DD or YYYY-MM-DDTHH:MM");
                return None;
            }
            validate_timestamp(origin, errs, pair)
        }
        Err(e) => {
            errs.make("Invalid date")
                .parse_failure(e.with_path(origin))
                .hint("use YYYY-MM-DD or YYYY-MM-DDTHH:MM");
            None
        }
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
    use super::*;
    use billfold::{date, Window};
    use rust_decimal_macros::dec;

    macro_rules! day {
        ( $y:tt - $m:tt - $d:tt ) => {{
            NaiveDate::from_ymd_opt($y, $m, $d).unwrap()
        }}
    }

    macro_rules! records {
        ( $text:expr ) => {{
            let mut errs = error::Report::new();
            let records = extract("test.txt", &mut errs, $text);
            (records, errs)
        }}
    }

    macro_rules! period {
        ( $text:expr ) => {{
            let mut errs = error::Report::new();
            let spec = parse_period("--period", &mut errs, $text);
            (spec, errs)
        }}
    }

    #[test]
    fn simple_records() {
        let (records, errs) = records!("\
# groceries and such
2024-01-15          100.00  food       \"groceries\"
2024-02-01T09:30    -12.5   transport

2024-2-3T23:59:30  3  books  # paperback
");
        assert!(errs.is_empty());
        assert_eq!(records, vec![
            Record::new(dec!(100.00), date::start_of_day(day!(2024-1-15)), "food"),
            Record::new(dec!(-12.5), day!(2024-2-1).and_hms_opt(9, 30, 0).unwrap(), "transport"),
            Record::new(dec!(3), day!(2024-2-3).and_hms_opt(23, 59, 30).unwrap(), "books"),
        ]);
    }

    #[test]
    fn no_trailing_newline() {
        let (records, errs) = records!("2024-01-15 1 food");
        assert!(errs.is_empty());
        assert_eq!(records.len(), 1);
        let (records, errs) = records!("");
        assert!(errs.is_empty());
        assert!(records.is_empty());
    }

    #[test]
    fn invalid_dates_are_all_reported() {
        let (records, errs) = records!("\
2023-02-29 12.00 food
2024-01-01 1 rent
2024-13-01 5 fun
2024-01-01T25:00 5 fun
");
        assert!(errs.is_fatal());
        assert_eq!(errs.count_errors(), 3);
        assert_eq!(records, vec![
            Record::new(dec!(1), date::start_of_day(day!(2024-1-1)), "rent"),
        ]);
        let out = format!("{}", errs);
        assert!(out.contains("2023-02 has 28 days"));
        assert!(out.contains("months are numbered from 1 to 12"));
        assert!(out.contains("test.txt:1:1"));
    }

    #[test]
    fn malformed_line() {
        let (records, errs) = records!("2024-01-01 food 12\n");
        assert!(errs.is_fatal());
        assert!(records.is_empty());
        assert!(format!("{}", errs).contains("Parsing failure"));
    }

    #[test]
    fn fields_must_be_separated() {
        let (records, errs) = records!("2024-01-1512 food\n");
        assert!(errs.is_fatal());
        assert!(records.is_empty());
        let (records, errs) = records!("2024-01-15 12food\n");
        assert!(errs.is_fatal());
        assert!(records.is_empty());
        let (records, errs) = records!("2024-01-15 12 food\"lunch\"\n");
        assert!(errs.is_fatal());
        assert!(records.is_empty());
        let (records, errs) = records!("2024-01-15\t12 food \"lunch\"\n");
        assert!(errs.is_empty());
        assert_eq!(records.len(), 1);

        assert_eq!(period!("past30days").0, None);
        assert_eq!(period!("past 30days").0, None);
        assert_eq!(period!("every 2weeks from 2024-01-01").0, None);
        assert_eq!(period!("everymonth from 2024-01-01").0, None);
        assert_eq!(period!("every month from2024-01-01").0, None);
        assert!(period!("every  2\tweeks  from 2024-01-01").0.is_some());
    }

    #[test]
    fn periods() {
        assert_eq!(period!("all").0, Some(PeriodSpec::AllTime));
        assert_eq!(period!("  past 30 days ").0, Some(PeriodSpec::past_days(30).unwrap()));
        assert_eq!(period!("past 1 day").0, Some(PeriodSpec::past_days(1).unwrap()));
        assert_eq!(
            period!("every month from 2024-01-31").0,
            Some(PeriodSpec::cycle(1, Unit::Month, day!(2024-1-31)).unwrap())
        );
        assert_eq!(
            period!("Every 2 Weeks from 2024-01-01").0,
            Some(PeriodSpec::cycle(2, Unit::Week, day!(2024-1-1)).unwrap())
        );
        assert_eq!(
            period!("2024-01-01..").0,
            Some(PeriodSpec::date_range(Some(day!(2024-1-1)), None).unwrap())
        );
        assert_eq!(
            period!("..2024-03-31").0,
            Some(PeriodSpec::date_range(None, Some(day!(2024-3-31))).unwrap())
        );
        assert_eq!(
            period!("2024-01-01..2024-03-31").0.map(|p| p.resolve(date::start_of_day(day!(2020-1-1)))),
            Some(Window::days(day!(2024-1-1), day!(2024-3-31)).unwrap())
        );
        assert_eq!(period!("..").0, Some(PeriodSpec::date_range(None, None).unwrap()));
    }

    #[test]
    fn invalid_periods() {
        let (spec, errs) = period!("past 0 days");
        assert_eq!(spec, None);
        assert!(format!("{}", errs).contains("use a length of at least 1"));

        let (spec, errs) = period!("every 0 months from 2024-01-01");
        assert_eq!(spec, None);
        assert!(errs.is_fatal());

        let (spec, errs) = period!("2024-03-01..2024-01-01");
        assert_eq!(spec, None);
        assert!(format!("{}", errs).contains("did you mean 2024-01-01..2024-03-01 ?"));

        let (spec, errs) = period!("past 99999999999999999999 days");
        assert_eq!(spec, None);
        assert!(format!("{}", errs).contains("too large"));

        let (spec, errs) = period!("every fortnight from 2024-01-01");
        assert_eq!(spec, None);
        assert!(errs.is_fatal());

        let (spec, errs) = period!("every month from 2023-02-30");
        assert_eq!(spec, None);
        assert_eq!(errs.count_errors(), 1);
    }

    #[test]
    fn reference_instants() {
        let mut errs = error::Report::new();
        assert_eq!(
            parse_timestamp("--now", &mut errs, "2024-03-31T18:30"),
            Some(day!(2024-3-31).and_hms_opt(18, 30, 0).unwrap())
        );
        assert_eq!(
            parse_timestamp("--now", &mut errs, "2024-03-31"),
            Some(date::start_of_day(day!(2024-3-31)))
        );
        assert!(errs.is_empty());
        assert_eq!(parse_timestamp("--now", &mut errs, "2024-03-31 garbage"), None);
        assert_eq!(parse_timestamp("--now", &mut errs, "yesterday"), None);
        assert_eq!(errs.count_errors(), 2);
    }
}
