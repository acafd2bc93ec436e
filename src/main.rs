mod cli;
mod load;

use std::path::PathBuf;

use chrono::{Datelike, Local};
use clap::{crate_version, value_t, App, Arg, ArgMatches};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use billfold::{
    aggregate, breakdown_by_category, savings_rate, sum_in_window, Calendar, Cycle,
    PeriodSpec, Record, Timestamp, Unit, Usage, Window,
};
use cli::{plot::Plotter, table::Table};
use load::{config::Settings, error::Report};

const DEFAULT_TOP: usize = 5;
const DEFAULT_SERIES: usize = 6;

fn app() -> App<'static, 'static> {
    let is_count = |s: String| {
        s.parse::<usize>()
            .map(|_| ())
            .map_err(|_| format!("'{}' is not a nonnegative integer", s))
    };
    App::new("billfold")
        .version(crate_version!())
        .about("Sums financial records over periods and compares them to the previous one")
        .arg(
            Arg::with_name("FILE")
                .help("Records to aggregate, one 'DATE AMOUNT CATEGORY' per line")
                .required(true)
                .index(1),
        )
        .arg(
            Arg::with_name("income")
                .long("income")
                .value_name("FILE")
                .takes_value(true)
                .help("Income records, used to compute the savings rate"),
        )
        .arg(
            Arg::with_name("period")
                .long("period")
                .short("p")
                .value_name("EXPR")
                .takes_value(true)
                .help("'all', 'past N days', 'every [N] UNIT from DATE' or '[DATE]..[DATE]'"),
        )
        .arg(
            Arg::with_name("now")
                .long("now")
                .value_name("DATE")
                .takes_value(true)
                .help("Reference instant YYYY-MM-DD[THH:MM], defaults to the current time"),
        )
        .arg(
            Arg::with_name("top")
                .long("top")
                .value_name("N")
                .takes_value(true)
                .validator(is_count)
                .help("Number of categories shown before the rest is grouped"),
        )
        .arg(
            Arg::with_name("series")
                .long("series")
                .value_name("N")
                .takes_value(true)
                .validator(is_count)
                .help("Number of windows in the trailing series"),
        )
        .arg(
            Arg::with_name("plot")
                .long("plot")
                .value_name("FILE.svg")
                .takes_value(true)
                .help("Write the trailing series as an SVG step plot"),
        )
        .arg(
            Arg::with_name("config")
                .long("config")
                .short("c")
                .value_name("FILE")
                .takes_value(true)
                .help("TOML settings, overridden by command-line flags"),
        )
        .arg(
            Arg::with_name("verbose")
                .short("v")
                .multiple(true)
                .help("Log more details to stderr (repeat for more)"),
        )
}

/// `RUST_LOG` has priority over the `-v` count
fn init_logging(verbosity: u64) {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let matches = app().get_matches();
    init_logging(matches.occurrences_of("verbose"));
    let mut errs = Report::new();
    let _ = run(&matches, &mut errs);
    if !errs.is_empty() {
        eprint!("{}", errs);
    }
    if errs.is_fatal() {
        std::process::exit(1);
    }
}

fn run(matches: &ArgMatches, errs: &mut Report) -> Option<()> {
    let settings = match matches.value_of("config") {
        Some(path) => load::read_settings(path, errs)?,
        None => Settings::default(),
    };
    let now = match matches.value_of("now") {
        Some(text) => load::parse::parse_timestamp("--now", errs, text)?,
        None => Local::now().naive_local(),
    };
    let spec = match matches.value_of("period") {
        Some(text) => load::parse::parse_period("--period", errs, text)?,
        None => match &settings.period {
            Some(text) => load::parse::parse_period("period", errs, text)?,
            None => PeriodSpec::AllTime,
        },
    };
    let top = value_t!(matches, "top", usize)
        .ok()
        .or(settings.top)
        .unwrap_or(DEFAULT_TOP);
    let series = value_t!(matches, "series", usize)
        .ok()
        .or(settings.series)
        .unwrap_or(DEFAULT_SERIES);
    let plot = matches
        .value_of("plot")
        .map(PathBuf::from)
        .or_else(|| settings.plot.clone());

    let records = load::read_records(matches.value_of("FILE")?, errs)?;
    let records = keep_counted(records, &settings.ignored_categories);
    let income = match matches.value_of("income") {
        Some(path) => Some(keep_counted(
            load::read_records(path, errs)?,
            &settings.ignored_categories,
        )),
        None => None,
    };
    info!(period = %spec, %now, top, series, "aggregating");

    let res = aggregate(&records, &spec, now);
    println!(
        "{}",
        Table::aggregate(&res).with_title(format!("Period: {}", spec))
    );
    let shares = breakdown_by_category(&records, &res.window, top);
    if !shares.is_empty() {
        println!("{}", Table::breakdown(&shares).with_title("By category"));
    }
    if let Some(income) = &income {
        let earned = sum_in_window(income, &res.window);
        println!(
            " Savings rate: {}% of {:.2}\n",
            savings_rate(earned, res.total),
            earned
        );
    }
    if !settings.budgets.is_empty() {
        let usages = settings.budgets.iter().map(|(category, limit)| {
            let spent = spent_on(&records, &res.window, category);
            (category.as_str(), Usage::measure(spent, *limit))
        });
        println!("{}", Table::budgets(usages).with_title("Budgets"));
    }

    // a month always has a valid length
    let cycle = series_cycle(&spec, now).ok()?;
    let calendar = trailing(&cycle, now, series, &records);
    // same windows as the expenses, line by line
    let earned = income
        .as_ref()
        .map(|income| trailing(&cycle, now, series, income));
    if !calendar.contents().is_empty() {
        let table = Table::series(calendar.contents(), earned.as_ref().map(Calendar::contents));
        println!(
            "{}",
            table.with_title(format!(
                "Every {} {}",
                cycle.amount(),
                cycle.unit().to_string().to_lowercase()
            ))
        );
    }
    if let Some(file) = plot {
        match Plotter::from(calendar.contents()).save(&file) {
            Ok(true) => info!(file = %file.display(), "wrote plot"),
            Ok(false) => warn!("empty series, no plot written"),
            Err(e) => {
                errs.make("Cannot write plot")
                    .text(format!("'{}': {}", file.display(), e))
                    .hint("check that the directory exists and is writable");
            }
        }
    }
    Some(())
}

/// Drop records of ignored categories
fn keep_counted(records: Vec<Record>, ignored: &[String]) -> Vec<Record> {
    if ignored.is_empty() {
        return records;
    }
    let before = records.len();
    let records = records
        .into_iter()
        .filter(|r| !ignored.iter().any(|cat| cat == r.category()))
        .collect::<Vec<_>>();
    info!(dropped = before - records.len(), "ignored categories");
    records
}

fn spent_on(records: &[Record], window: &Window, category: &str) -> rust_decimal::Decimal {
    records
        .iter()
        .filter(|r| r.category() == category)
        .filter(|r| window.contains(r.occurred_at()))
        .map(Record::amount)
        .sum()
}

fn trailing(cycle: &Cycle, now: Timestamp, count: usize, records: &[Record]) -> Calendar {
    let mut calendar = Calendar::trailing(cycle, now, count);
    calendar.register(records);
    calendar
}

/// Cycle used for the trailing series: the one of the period if it has one,
/// calendar months otherwise
fn series_cycle(spec: &PeriodSpec, now: Timestamp) -> billfold::Result<Cycle> {
    match spec {
        PeriodSpec::Cycle(cycle) => Ok(*cycle),
        _ => {
            let first = now.date().with_day(1).unwrap_or_else(|| now.date());
            Cycle::new(1, Unit::Month, first)
        }
    }
}
