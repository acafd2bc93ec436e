//! Everything that reads user input: record files, settings, and
//! the expressions given on the command line

pub mod config;
pub mod error;
pub mod parse;

use tracing::info;

use billfold::Record;

/// Read and check all records of `filename`
///
/// `None` if any fatal error was recorded in `errs`.
pub fn read_records(filename: &str, errs: &mut error::Report) -> Option<Vec<Record>> {
    let contents = read_file(filename, errs)?;
    let records = parse::extract(filename, errs, &contents);
    if errs.is_fatal() {
        return None;
    }
    if records.is_empty() {
        errs.make("No records")
            .nonfatal()
            .text(format!("'{}' contains no record", filename))
            .hint("each line should look like '2024-01-15 12.50 food'");
    }
    info!(file = filename, count = records.len(), "loaded records");
    Some(records)
}

/// Read the settings stored in `filename`
pub fn read_settings(filename: &str, errs: &mut error::Report) -> Option<config::Settings> {
    let contents = read_file(filename, errs)?;
    let settings = config::extract(filename, errs, &contents)?;
    info!(file = filename, "loaded settings");
    Some(settings)
}

fn read_file(filename: &str, errs: &mut error::Report) -> Option<String> {
    match std::fs::read_to_string(filename) {
        Ok(contents) => Some(contents),
        Err(e) => {
            errs.make("File not found")
                .text(format!("Cannot read '{}': {}", filename, e))
                .hint("check the path, it is relative to the current directory");
            None
        }
    }
}
