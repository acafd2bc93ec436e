use std::fmt;

use rust_decimal::Decimal;

use billfold::{average_total, savings_rate, AggregateResult, Share, Summary, Usage, Window};

/// A boxed grid with labelled lines and columns
pub struct Table {
    title: Option<String>,
    grid: GridFmt,
}

struct BoxFmt {
    width: usize,
    text: String,
}

struct ColFmt {
    width: usize,
    label: BoxFmt,
    boxes: Vec<BoxFmt>,
}

struct GridFmt {
    labels: ColFmt,
    columns: Vec<ColFmt>,
}

impl Table {
    pub fn with_columns<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        let columns = labels
            .into_iter()
            .map(|l| ColFmt::with_label(BoxFmt::from(l.to_string())))
            .collect::<Vec<_>>();
        Self {
            title: None,
            grid: GridFmt::with_columns(columns),
        }
    }

    pub fn with_title<S>(mut self, title: S) -> Self
    where
        S: ToString,
    {
        self.title = Some(title.to_string());
        self
    }

    /// Add a line, missing cells are left blank
    pub fn push_line<S>(&mut self, label: S, cells: Vec<String>)
    where
        S: ToString,
    {
        self.grid.push_line(
            BoxFmt::from(label.to_string()),
            cells.into_iter().map(BoxFmt::from).collect(),
        );
    }

    /// Current and previous window side by side
    pub fn aggregate(res: &AggregateResult) -> Self {
        let mut table = Self::with_columns(["Window", "Total", "Records", "Change"]);
        table.push_line(
            "current",
            vec![
                window(&res.window),
                amount(res.total),
                res.count.to_string(),
                change(res.delta_pct),
            ],
        );
        if let Some(prev) = &res.previous_window {
            let total = res.previous_total.map(amount).unwrap_or_default();
            table.push_line("previous", vec![window(prev), total]);
        }
        table
    }

    /// One line per category
    pub fn breakdown(shares: &[Share]) -> Self {
        let mut table = Self::with_columns(["Amount", "Share"]);
        for share in shares {
            table.push_line(&share.category, vec![amount(share.amount), percent(share.pct)]);
        }
        table
    }

    /// One line per window of a series, then the average over all windows
    ///
    /// `income` is a series over the same windows as `expenses`, it adds
    /// the income and the savings rate of each window.
    pub fn series(expenses: &[Summary], income: Option<&[Summary]>) -> Self {
        let mut table = match income {
            Some(_) => Self::with_columns(["Total", "Records", "Income", "Saved"]),
            None => Self::with_columns(["Total", "Records"]),
        };
        for (idx, spent) in expenses.iter().enumerate() {
            let mut cells = vec![nonempty(spent), spent.count().to_string()];
            if let Some(earned) = income.and_then(|inc| inc.get(idx)) {
                cells.push(nonempty(earned));
                cells.push(percent(savings_rate(earned.total(), spent.total())));
            }
            table.push_line(window(&spent.window()), cells);
        }
        let spent = average_total(expenses);
        let mut cells = vec![amount(spent), String::new()];
        if let Some(income) = income {
            let earned = average_total(income);
            cells.push(amount(earned));
            cells.push(percent(savings_rate(earned, spent)));
        }
        table.push_line("average", cells);
        table
    }

    /// One line per category that has a limit
    pub fn budgets<'u, I>(usages: I) -> Self
    where
        I: IntoIterator<Item = (&'u str, Usage)>,
    {
        let mut table = Self::with_columns(["Spent", "Limit", "Used", ""]);
        for (category, usage) in usages {
            table.push_line(
                category,
                vec![
                    amount(usage.spent),
                    amount(usage.limit),
                    percent(usage.pct),
                    String::from(if usage.over { "over" } else { "" }),
                ],
            );
        }
        table
    }
}

fn amount(a: Decimal) -> String {
    format!("{:.2}", a)
}

/// Blank for a window without records
fn nonempty(sum: &Summary) -> String {
    if sum.count() > 0 {
        amount(sum.total())
    } else {
        String::new()
    }
}

fn percent(p: Decimal) -> String {
    format!("{}%", p)
}

fn change(delta: Option<Decimal>) -> String {
    match delta {
        Some(d) if d > Decimal::ZERO => format!("+{}%", d),
        Some(d) => format!("{}%", d),
        None => String::from("n/a"),
    }
}

fn window(w: &Window) -> String {
    let text = w.to_string();
    if text == ".." {
        String::from("all time")
    } else {
        text
    }
}

impl BoxFmt {
    fn from(text: String) -> Self {
        let width = text.chars().count();
        Self { text, width }
    }
}

impl ColFmt {
    fn with_label(label: BoxFmt) -> Self {
        Self {
            width: label.width,
            label,
            boxes: Vec::new(),
        }
    }

    fn push(&mut self, b: BoxFmt) {
        self.width = self.width.max(b.width);
        self.boxes.push(b);
    }
}

impl GridFmt {
    fn with_columns(columns: Vec<ColFmt>) -> Self {
        Self {
            labels: ColFmt::with_label(BoxFmt::from(String::new())),
            columns,
        }
    }

    fn push_line(&mut self, label: BoxFmt, boxes: Vec<BoxFmt>) {
        self.labels.push(label);
        let mut boxes = boxes.into_iter();
        for c in &mut self.columns {
            c.push(boxes.next().unwrap_or_else(|| BoxFmt::from(String::new())));
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(title) = &self.title {
            writeln!(f, " {}", title)?;
        }
        write!(f, "{}", self.grid)
    }
}

impl fmt::Display for GridFmt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        // upper border
        write!(f, "{}", ULCORNER)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", LOJOIN)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", URCORNER)?;
        // title line
        write!(f, "{}", VLINE)?;
        self.labels.write_label(f)?;
        for c in &self.columns {
            write!(f, "{}", VLINE)?;
            c.write_label(f)?;
        }
        writeln!(f, "{}", VLINE)?;
        // separator
        write!(f, "{}", RTJOIN)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", CROSS)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", LTJOIN)?;
        // main block
        for idx in 0..self.labels.len() {
            write!(f, "{}", VLINE)?;
            self.labels.write_item(f, idx, false)?;
            for c in &self.columns {
                write!(f, "{}", VLINE)?;
                c.write_item(f, idx, true)?;
            }
            writeln!(f, "{}", VLINE)?;
        }
        // lower border
        write!(f, "{}", DLCORNER)?;
        self.labels.hline(f)?;
        for c in &self.columns {
            write!(f, "{}", HIJOIN)?;
            c.hline(f)?;
        }
        writeln!(f, "{}", DRCORNER)
    }
}

impl ColFmt {
    fn write_label(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.label.write(f, self.width, true)
    }

    fn write_item(&self, f: &mut fmt::Formatter, idx: usize, right: bool) -> fmt::Result {
        self.boxes[idx].write(f, self.width, right)
    }

    fn len(&self) -> usize {
        self.boxes.len()
    }

    fn hline(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", HLINE.repeat(self.width + 2))
    }
}

const HLINE: &str = "─";
const VLINE: &str = "│";
const ULCORNER: &str = "┌";
const URCORNER: &str = "┐";
const DLCORNER: &str = "└";
const DRCORNER: &str = "┘";
const LTJOIN: &str = "┤";
const RTJOIN: &str = "├";
const HIJOIN: &str = "┴";
const LOJOIN: &str = "┬";
const CROSS: &str = "┼";

impl BoxFmt {
    fn write(&self, f: &mut fmt::Formatter, width: usize, right: bool) -> fmt::Result {
        let padding = " ".repeat(width.saturating_sub(self.width));
        if right {
            write!(f, " {}{} ", padding, self.text)
        } else {
            write!(f, " {}{} ", self.text, padding)
        }
    }
}
