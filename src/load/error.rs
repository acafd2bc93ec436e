//! Pretty-printing of problems found in user input
//!
//! Most of the layout is done by `pest::error::Error::new_from_span`,
//! `Error` only groups several annotated spans under one label and `Report`
//! gathers all of them so that one run shows every problem of a file.
//!
//! # Example
//!
//! ```rust
//! errs.make("Invalid date")
//!     .span(&loc, "provided here")
//!     .text("2023-02-29 does not exist")
//!     .hint("February 2023 has 28 days")
//! ```
//!
//! ```txt
//! --> Error: Invalid date
//!  |     --> expenses.txt:4:1
//!  |      |
//!  |    4 | 2023-02-29   12.00  food
//!  |      | ^--------^
//!  |      |
//!  |      = provided here
//!  |  2023-02-29 does not exist
//!  |      ? hint: February 2023 has 28 days
//! ```

use std::fmt;

use crate::load::parse::Rule;

/// Location of an error: name of the input and span within it
pub type Loc<'i> = (&'i str, pest::Span<'i>);

/// Report for a single problem
///
/// All messages should fit in a single line: split longer explanations
/// into several calls to `text` and `hint`.
#[must_use]
#[derive(Debug)]
pub struct Error {
    /// warning (yellow) or error (red)
    fatal: bool,
    label: String,
    items: Vec<Item>,
}

#[derive(Debug)]
enum Item {
    /// annotated excerpt of the input
    Block(pest::error::Error<Rule>),
    Text(String),
    Hint(String),
}

/// A collection of errors
///
/// Usually all the problems of one run, but nothing is assumed about
/// how the recorded errors relate to each other.
#[must_use]
#[derive(Debug, Default)]
pub struct Report {
    /// fatal errors in `contents[..contents.len() - 1]`, the last one
    /// can still be downgraded to a warning
    fatal: usize,
    contents: Vec<Error>,
}

impl Error {
    fn new<S>(msg: S) -> Self
    where
        S: ToString,
    {
        Self {
            fatal: true,
            label: msg.to_string(),
            items: Vec::new(),
        }
    }

    /// Mark as a warning rather than a fatal error
    pub fn nonfatal(&mut self) -> &mut Self {
        self.fatal = false;
        self
    }

    /// Add an error produced by the parser itself
    pub fn parse_failure(&mut self, err: pest::error::Error<Rule>) -> &mut Self {
        self.items
            .push(Item::Block(err.renamed_rules(rule_rename)));
        self
    }

    /// Add an excerpt of the input and a message pointing at it
    pub fn span<S>(&mut self, loc: &Loc, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Block(
            pest::error::Error::new_from_span(
                pest::error::ErrorVariant::CustomError {
                    message: msg.to_string(),
                },
                loc.1.clone(),
            )
            .with_path(loc.0),
        ));
        self
    }

    /// Add an important note
    pub fn text<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Text(msg.to_string()));
        self
    }

    /// Add a hint on how to fix
    pub fn hint<S>(&mut self, msg: S) -> &mut Self
    where
        S: ToString,
    {
        self.items.push(Item::Hint(msg.to_string()));
        self
    }
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if any of the recorded errors are fatal
    pub fn is_fatal(&self) -> bool {
        self.count_errors() > 0
    }

    fn last_is_fatal(&self) -> bool {
        self.contents.last().map(|e| e.fatal).unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    /// Number of fatal errors
    pub fn count_errors(&self) -> usize {
        self.fatal + usize::from(self.last_is_fatal())
    }

    /// Number of nonfatal errors
    pub fn count_warnings(&self) -> usize {
        self.contents.len() - self.count_errors()
    }

    /// Add a new error, fatal unless `nonfatal` is called on it
    pub fn make<S>(&mut self, msg: S) -> &mut Error
    where
        S: ToString,
    {
        if self.last_is_fatal() {
            self.fatal += 1;
        }
        self.contents.push(Error::new(msg));
        let last = self.contents.len() - 1;
        &mut self.contents[last]
    }
}

const RED: &str = "\x1b[0;91;1m";
const YELLOW: &str = "\x1b[0;93;1m";
const BLUE: &str = "\x1b[0;96;1m";
const WHITE: &str = "\x1b[0;1m";
const NONE: &str = "\x1b[0m";

/// How many errors of a report are shown before it is truncated
const SHOWN: usize = 10;

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (color, header) = if self.fatal {
            (RED, "--> Error")
        } else {
            (YELLOW, "--> Warning")
        };
        writeln!(f, "{}{}:{} {}{}", color, header, WHITE, self.label, NONE)?;
        for item in &self.items {
            match item {
                Item::Block(err) => write_block(f, color, &err.to_string())?,
                Item::Text(txt) => writeln!(f, " {}|  {}{}{}", color, WHITE, txt, NONE)?,
                Item::Hint(txt) => writeln!(f, " {}|      {}? hint: {}{}", color, BLUE, NONE, txt)?,
            }
        }
        Ok(())
    }
}

/// Indent a block rendered by `pest` inside the margin of the report,
/// aligning its gutter on the `-->` arrow of the first line
fn write_block(f: &mut fmt::Formatter<'_>, color: &str, block: &str) -> fmt::Result {
    let mut align = "   ".to_string();
    let mut align_found = false;
    for line in block.lines() {
        write!(
            f,
            " {}|{}  {}",
            color,
            if align_found { &align } else { "" },
            BLUE
        )?;
        for c in line.chars() {
            match c {
                '-' if !align_found => {
                    align_found = true;
                    write!(f, "{}-", align)?;
                }
                ' ' if !align_found => {
                    align.pop();
                    write!(f, " ")?;
                }
                '|' => write!(f, "|{}", NONE)?,
                '=' => write!(f, "={}", NONE)?,
                '^' => write!(f, "{}^", color)?,
                // pest renders line endings as a visible symbol
                '␊' => (),
                _ => write!(f, "{}", c)?,
            }
        }
        writeln!(f)?;
    }
    Ok(())
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.contents.is_empty() {
            return Ok(());
        }
        // only the most severe kind is shown
        let fatal = self.is_fatal();
        let count = if fatal {
            self.count_errors()
        } else {
            self.count_warnings()
        };
        let color = if fatal { RED } else { YELLOW };
        for err in self
            .contents
            .iter()
            .filter(|err| err.fatal == fatal)
            .take(SHOWN)
        {
            writeln!(f, "{}", err)?;
        }
        if count > SHOWN {
            writeln!(f, "{} And {} more.", color, count - SHOWN)?;
        }
        let plural = if count > 1 { "s" } else { "" };
        let (kind, what) = if fatal {
            ("Fatal", "error")
        } else {
            ("Nonfatal", "warning")
        };
        writeln!(
            f,
            "{}{}: {}{} {}{} emitted{}",
            color, kind, WHITE, count, what, plural, NONE
        )
    }
}

fn rule_rename(r: &Rule) -> String {
    String::from(match r {
        Rule::EOI => "end of input",
        Rule::year => "a 4-digit year",
        Rule::month => "a 1- or 2-digit month number",
        Rule::day => "a 1- or 2-digit day number",
        Rule::date => "a date YYYY-MM-DD",
        Rule::hour => "a 2-digit hour",
        Rule::minute => "2-digit minutes",
        Rule::second => "2-digit seconds",
        Rule::time => "a time HH:MM or HH:MM:SS",
        Rule::timestamp => "a date YYYY-MM-DD, optionally followed by THH:MM",
        Rule::money_amount => "an amount ('-12.50')",
        Rule::category => "a category name",
        Rule::string => "a string of non-'\"' characters",
        Rule::note => "a note ('\"foo\"')",
        Rule::record => "a record 'DATE AMOUNT CATEGORY [\"NOTE\"]'",
        Rule::program => "a sequence of records, one per line",
        Rule::count => "a number",
        Rule::unit => "one of day, week, month, year",
        Rule::days => "'days'",
        Rule::all_time => "'all'",
        Rule::past_days => "a period 'past N days'",
        Rule::cycle => "a period 'every [N] UNIT from DATE'",
        Rule::from_date => "a start date",
        Rule::to_date => "an end date",
        Rule::date_range => "a period '[DATE]..[DATE]'",
        Rule::period => "one of 'all', 'past N days', 'every N UNIT from DATE', 'DATE..DATE'",
        _ => "a valid token",
    })
}
