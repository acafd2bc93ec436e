//! Reduction of records to totals, shares and deltas
//!
//! Everything here is a pure function of the records it is given: nothing
//! is cached, and the same inputs always produce the same outputs.

use std::collections::BTreeMap;
use std::ops;

use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use tracing::debug;

use crate::date::{self, Timestamp};
use crate::entry::{Record, OTHER};
use crate::period::{Cycle, PeriodSpec, Window};

/// Totals of the current window compared to the previous one
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    pub total: Decimal,
    pub count: usize,
    /// `None` if the period has no previous window
    pub previous_total: Option<Decimal>,
    /// `None` means no previous data to compare against
    pub delta_pct: Option<Decimal>,
    pub window: Window,
    pub previous_window: Option<Window>,
}

/// One line of a breakdown by category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub category: String,
    pub amount: Decimal,
    /// percentage of the total of all groups, rounded to an integer
    pub pct: Decimal,
}

fn in_window<'r>(records: &'r [Record], window: &'r Window) -> impl Iterator<Item = &'r Record> {
    records.iter().filter(move |r| window.contains(r.occurred_at()))
}

/// Sum of the amounts of all records inside `window` (bounds included)
///
/// Saturates at `Decimal::MIN` and `Decimal::MAX`.
pub fn sum_in_window(records: &[Record], window: &Window) -> Decimal {
    in_window(records, window)
        .map(Record::amount)
        .fold(Decimal::ZERO, Decimal::saturating_add)
}

/// Resolve the current and previous windows of `spec` at `now` and sum both
pub fn aggregate(records: &[Record], spec: &PeriodSpec, now: Timestamp) -> AggregateResult {
    let window = spec.resolve(now);
    let (total, count) = in_window(records, &window).fold((Decimal::ZERO, 0), |(sum, n), r| {
        (sum.saturating_add(r.amount()), n + 1)
    });
    let previous_window = spec.previous(&window);
    let previous_total = previous_window.map(|prev| sum_in_window(records, &prev));
    let delta_pct = previous_total.and_then(|prev| delta_pct(total, prev));
    debug!(%window, %total, count, ?previous_total, ?delta_pct, "aggregated");
    AggregateResult {
        total,
        count,
        previous_total,
        delta_pct,
        window,
        previous_window,
    }
}

/// `round((current - previous) / |previous| × 100)`
///
/// `None` when `previous` is zero.
pub fn delta_pct(current: Decimal, previous: Decimal) -> Option<Decimal> {
    if previous.is_zero() {
        return None;
    }
    Some(percent_of(current.saturating_sub(previous), previous.abs()))
}

/// `round(part / whole × 100)`, `0` when `whole` is zero
///
/// Saturates when the ratio is not representable.
pub fn percent_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    match part.checked_div(whole) {
        Some(ratio) => round_half_up(ratio.saturating_mul(dec!(100))),
        None if part.is_sign_negative() != whole.is_sign_negative() => Decimal::MIN,
        None => Decimal::MAX,
    }
}

/// Nearest integer, ties towards positive infinity
fn round_half_up(x: Decimal) -> Decimal {
    let ties = if x.is_sign_negative() {
        RoundingStrategy::MidpointTowardZero
    } else {
        RoundingStrategy::MidpointAwayFromZero
    };
    x.round_dp_with_strategy(0, ties).normalize()
}

/// Group the records of `window` by category
///
/// Groups are sorted by decreasing amount (ties by name) and only the `top_n`
/// first are kept, the rest is summed into an `"Other"` group.
/// Percentages are taken of the magnitude of the total, so they decrease
/// along with the amounts even when refunds make the total negative.
pub fn breakdown_by_category(records: &[Record], window: &Window, top_n: usize) -> Vec<Share> {
    let mut groups = BTreeMap::<&str, Decimal>::new();
    for record in in_window(records, window) {
        let sum = groups.entry(record.category()).or_default();
        *sum = sum.saturating_add(record.amount());
    }
    let total = groups
        .values()
        .fold(Decimal::ZERO, |acc, amount| acc.saturating_add(*amount));
    let mut sorted = groups.into_iter().collect::<Vec<_>>();
    sorted.sort_by(|(ca, a), (cb, b)| b.cmp(a).then_with(|| ca.cmp(cb)));
    let mut kept = sorted
        .iter()
        .take(top_n)
        .map(|(cat, amount)| (cat.to_string(), *amount))
        .collect::<Vec<_>>();
    if sorted.len() > top_n {
        let rest = sorted[top_n..]
            .iter()
            .fold(Decimal::ZERO, |acc, (_, amount)| acc.saturating_add(*amount));
        match kept.iter_mut().find(|(cat, _)| cat == OTHER) {
            Some((_, amount)) => *amount = amount.saturating_add(rest),
            None => kept.push((OTHER.to_string(), rest)),
        }
        // the folded group may outweigh the ones kept
        kept.sort_by(|(_, a), (_, b)| b.cmp(a));
    }
    kept.into_iter()
        .map(|(category, amount)| Share {
            pct: percent_of(amount, total.abs()),
            category,
            amount,
        })
        .collect()
}

/// Share of income that was not spent, `round((income - expenses) / income × 100)`
///
/// `0` when there was no income.
pub fn savings_rate(income: Decimal, expenses: Decimal) -> Decimal {
    percent_of(income.saturating_sub(expenses), income)
}

/// Progress of an amount towards a limit (a budget) or a target (a goal)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub spent: Decimal,
    pub limit: Decimal,
    /// capped at 100
    pub pct: Decimal,
    pub over: bool,
}

impl Usage {
    pub fn measure(spent: Decimal, limit: Decimal) -> Self {
        let pct = if limit > Decimal::ZERO {
            percent_of(spent.min(limit), limit)
        } else if spent > Decimal::ZERO {
            dec!(100)
        } else {
            Decimal::ZERO
        };
        Self {
            spent,
            limit,
            pct,
            over: spent > limit,
        }
    }
}

/// Total and number of records of a single window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    window: Window,
    total: Decimal,
    count: usize,
}

impl Summary {
    pub fn new(window: Window) -> Self {
        Self {
            window,
            total: Decimal::ZERO,
            count: 0,
        }
    }

    pub fn window(&self) -> Window {
        self.window
    }

    pub fn total(&self) -> Decimal {
        self.total
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

impl ops::AddAssign<&Record> for Summary {
    fn add_assign(&mut self, record: &Record) {
        if self.window.contains(record.occurred_at()) {
            self.total = self.total.saturating_add(record.amount());
            self.count += 1;
        }
    }
}

/// Mean total per window, rounded to a whole amount like percentages are
///
/// Empty windows count, so this is the average spent per month of a monthly
/// series. `0` for an empty series.
pub fn average_total(series: &[Summary]) -> Decimal {
    let sum = series
        .iter()
        .fold(Decimal::ZERO, |acc, s| acc.saturating_add(s.total));
    match sum.checked_div(Decimal::from(series.len())) {
        Some(mean) => round_half_up(mean),
        None => Decimal::ZERO,
    }
}

/// A collection of disjoint ordered summaries
#[derive(Debug, Clone)]
pub struct Calendar {
    items: Vec<Summary>,
}

impl Calendar {
    /// Construct from windows, which are sorted and must not overlap
    pub fn from_windows<I>(windows: I) -> Self
    where
        I: IntoIterator<Item = Window>,
    {
        let mut items = windows.into_iter().map(Summary::new).collect::<Vec<_>>();
        items.sort_by(|a, b| a.window.start.cmp(&b.window.start));
        debug_assert!(items
            .windows(2)
            .all(|w| w[0].window.end < w[1].window.start));
        Self { items }
    }

    /// The `count` consecutive windows of `cycle` that end with the one of `now`
    pub fn trailing(cycle: &Cycle, now: Timestamp, count: usize) -> Self {
        let current = if now < date::start_of_day(cycle.anchor()) {
            0
        } else {
            cycle.index_at(now).unwrap_or(0)
        };
        // stops early at the first window that is not representable
        let windows = (0..count).map_while(|back| {
            let back = i64::try_from(back).ok()?;
            cycle.window_at(current.checked_sub(back)?)
        });
        Self::from_windows(windows)
    }

    /// Add all records to the summaries whose window contains them
    pub fn register(&mut self, records: &[Record]) {
        for record in records {
            // windows are disjoint: at most one matches
            if let Some(sum) = self
                .items
                .iter_mut()
                .find(|sum| sum.window.contains(record.occurred_at()))
            {
                *sum += record;
            }
        }
    }

    pub fn contents(&self) -> &[Summary] {
        &self.items
    }
}

#[cfg(test)]
#[rustfmt::skip]
mod test {
    use super::*;
    use crate::date::Unit;
    use chrono::NaiveDate;
    use num_traits::Signed;
    use proptest::prelude::*;

    macro_rules! day {
        ( $y:tt - $m:tt - $d:tt ) => {{
            NaiveDate::from_ymd_opt($y, $m, $d).unwrap()
        }}
    }

    macro_rules! dt {
        ( $y:tt - $m:tt - $d:tt ) => {{
            date::start_of_day(day!($y-$m-$d))
        }}
    }

    macro_rules! rec {
        ( $amount:expr, $y:tt - $m:tt - $d:tt ) => {{
            Record::new($amount, dt!($y-$m-$d), "misc")
        }};
        ( $amount:expr, $y:tt - $m:tt - $d:tt, $cat:expr ) => {{
            Record::new($amount, dt!($y-$m-$d), $cat)
        }};
    }

    macro_rules! share {
        ( $cat:expr, $amount:expr, $pct:expr ) => {{
            Share { category: $cat.to_string(), amount: $amount, pct: $pct }
        }}
    }

    fn scenario() -> Vec<Record> {
        vec![rec!(dec!(100), 2024-1-15), rec!(dec!(50), 2024-2-1)]
    }

    #[test]
    fn scenario_a_first_window() {
        let spec = PeriodSpec::cycle(1, Unit::Month, day!(2024-1-1)).unwrap();
        let window = spec.resolve(dt!(2024-1-20));
        assert_eq!(window, Window::days(day!(2024-1-1), day!(2024-1-31)).unwrap());
        assert_eq!(sum_in_window(&scenario(), &window), dec!(100));
    }

    #[test]
    fn scenario_b_delta() {
        let spec = PeriodSpec::cycle(1, Unit::Month, day!(2024-1-1)).unwrap();
        let res = aggregate(&scenario(), &spec, dt!(2024-2-10));
        assert_eq!(res.window, Window::days(day!(2024-2-1), day!(2024-2-29)).unwrap());
        assert_eq!(res.total, dec!(50));
        assert_eq!(res.count, 1);
        assert_eq!(res.previous_window, Some(Window::days(day!(2024-1-1), day!(2024-1-31)).unwrap()));
        assert_eq!(res.previous_total, Some(dec!(100)));
        assert_eq!(res.delta_pct, Some(dec!(-50)));
    }

    #[test]
    fn scenario_c_past_days_excludes_old() {
        let spec = PeriodSpec::past_days(30).unwrap();
        let records = vec![rec!(dec!(75), 2024-2-1)];
        let window = spec.resolve(dt!(2024-3-31));
        assert_eq!(sum_in_window(&records, &window), dec!(0));
    }

    #[test]
    fn scenario_d_empty() {
        let specs = [
            PeriodSpec::AllTime,
            PeriodSpec::past_days(7).unwrap(),
            PeriodSpec::cycle(1, Unit::Week, day!(2024-1-1)).unwrap(),
            PeriodSpec::date_range(None, Some(day!(2024-1-1))).unwrap(),
        ];
        for spec in &specs {
            let window = spec.resolve(dt!(2024-3-31));
            assert_eq!(sum_in_window(&[], &window), dec!(0));
            assert_eq!(breakdown_by_category(&[], &window, 5), vec![]);
            let res = aggregate(&[], spec, dt!(2024-3-31));
            assert_eq!(res.total, dec!(0));
            assert_eq!(res.count, 0);
            assert_eq!(res.delta_pct, None);
        }
    }

    #[test]
    fn scenario_e_open_range() {
        let spec = PeriodSpec::date_range(Some(day!(2024-1-1)), None).unwrap();
        let records = vec![rec!(dec!(12), 2030-1-1), rec!(dec!(5), 2023-12-31)];
        let res = aggregate(&records, &spec, dt!(2024-6-1));
        assert_eq!(res.total, dec!(12));
        assert_eq!(res.previous_total, None);
        assert_eq!(res.delta_pct, None);
    }

    #[test]
    fn no_previous_data() {
        let spec = PeriodSpec::cycle(1, Unit::Month, day!(2024-1-1)).unwrap();
        let records = vec![rec!(dec!(50), 2024-2-1)];
        let res = aggregate(&records, &spec, dt!(2024-2-10));
        assert_eq!(res.previous_total, Some(dec!(0)));
        assert_eq!(res.delta_pct, None);
    }

    #[test]
    fn deltas() {
        assert_eq!(delta_pct(dec!(150), dec!(100)), Some(dec!(50)));
        assert_eq!(delta_pct(dec!(0), dec!(100)), Some(dec!(-100)));
        assert_eq!(delta_pct(dec!(-50), dec!(-100)), Some(dec!(50)));
        assert_eq!(delta_pct(dec!(1), dec!(3)), Some(dec!(-67)));
        assert_eq!(delta_pct(dec!(2.005), dec!(2)), Some(dec!(0)));
        assert_eq!(delta_pct(dec!(201), dec!(200)), Some(dec!(1)));
        assert_eq!(delta_pct(dec!(10), dec!(0)), None);
    }

    #[test]
    fn rounding_ties_go_up() {
        assert_eq!(round_half_up(dec!(2.5)), dec!(3));
        assert_eq!(round_half_up(dec!(-2.5)), dec!(-2));
        assert_eq!(round_half_up(dec!(-2.51)), dec!(-3));
        assert_eq!(round_half_up(dec!(-0.4)).to_string(), "0");
        assert_eq!(round_half_up(Decimal::MAX), Decimal::MAX);
        assert_eq!(round_half_up(Decimal::MIN), Decimal::MIN);
        assert_eq!(percent_of(dec!(1), dec!(8)), dec!(13));
        assert_eq!(percent_of(dec!(1), dec!(0)), dec!(0));
    }

    #[test]
    fn breakdown_top_and_other() {
        let records = vec![
            rec!(dec!(50), 2024-1-2, "food"),
            rec!(dec!(30), 2024-1-3, "rent"),
            rec!(dec!(10), 2024-1-4, "fun"),
            rec!(dec!(6), 2024-1-5, "books"),
            rec!(dec!(4), 2024-1-6, "food"),
            rec!(dec!(1000), 2023-1-6, "rent"),
        ];
        let window = Window::days(day!(2024-1-1), day!(2024-1-31)).unwrap();
        assert_eq!(breakdown_by_category(&records, &window, 2), vec![
            share!("food", dec!(54), dec!(54)),
            share!("rent", dec!(30), dec!(30)),
            share!(OTHER, dec!(16), dec!(16)),
        ]);
        assert_eq!(breakdown_by_category(&records, &window, 10), vec![
            share!("food", dec!(54), dec!(54)),
            share!("rent", dec!(30), dec!(30)),
            share!("fun", dec!(10), dec!(10)),
            share!("books", dec!(6), dec!(6)),
        ]);
    }

    #[test]
    fn breakdown_other_is_reordered_and_merged() {
        let records = vec![
            rec!(dec!(40), 2024-1-2, "food"),
            rec!(dec!(10), 2024-1-3, ""),
            rec!(dec!(25), 2024-1-4, "fun"),
            rec!(dec!(25), 2024-1-5, "books"),
        ];
        let window = Window::UNBOUNDED;
        assert_eq!(breakdown_by_category(&records, &window, 1), vec![
            share!(OTHER, dec!(60), dec!(60)),
            share!("food", dec!(40), dec!(40)),
        ]);
        // "Other" is already one of the kept groups
        let records = vec![
            rec!(dec!(40), 2024-1-2, "food"),
            rec!(dec!(30), 2024-1-3, ""),
            rec!(dec!(20), 2024-1-4, "fun"),
            rec!(dec!(10), 2024-1-5, "books"),
        ];
        assert_eq!(breakdown_by_category(&records, &window, 2), vec![
            share!(OTHER, dec!(60), dec!(60)),
            share!("food", dec!(40), dec!(40)),
        ]);
        assert_eq!(breakdown_by_category(&records, &window, 0), vec![
            share!(OTHER, dec!(100), dec!(100)),
        ]);
    }

    #[test]
    fn breakdown_zero_total() {
        let records = vec![
            rec!(dec!(10), 2024-1-2, "refund"),
            rec!(dec!(-10), 2024-1-3, "refund"),
            rec!(dec!(0), 2024-1-3, "free"),
        ];
        assert_eq!(breakdown_by_category(&records, &Window::UNBOUNDED, 5), vec![
            share!("free", dec!(0), dec!(0)),
            share!("refund", dec!(0), dec!(0)),
        ]);
    }

    #[test]
    fn breakdown_negative_total() {
        let records = vec![
            rec!(dec!(-10), 2024-1-2, "refund_a"),
            rec!(dec!(-20), 2024-1-3, "refund_b"),
        ];
        assert_eq!(breakdown_by_category(&records, &Window::UNBOUNDED, 5), vec![
            share!("refund_a", dec!(-10), dec!(-33)),
            share!("refund_b", dec!(-20), dec!(-67)),
        ]);
        let records = vec![
            rec!(dec!(30), 2024-1-2, "food"),
            rec!(dec!(-80), 2024-1-3, "refund"),
        ];
        assert_eq!(breakdown_by_category(&records, &Window::UNBOUNDED, 5), vec![
            share!("food", dec!(30), dec!(60)),
            share!("refund", dec!(-80), dec!(-160)),
        ]);
    }

    #[test]
    fn huge_amounts_saturate() {
        let huge = Decimal::from_i128_with_scale(10i128.pow(25), 0);
        let records = vec![rec!(dec!(0.01), 2024-1-15), rec!(huge, 2024-2-1)];
        let spec = PeriodSpec::cycle(1, Unit::Month, day!(2024-1-1)).unwrap();
        let res = aggregate(&records, &spec, dt!(2024-2-10));
        assert_eq!(res.total, huge);
        assert_eq!(res.previous_total, Some(dec!(0.01)));
        assert_eq!(res.delta_pct, Some(Decimal::MAX));
        assert_eq!(delta_pct(-huge, dec!(0.01)), Some(Decimal::MIN));

        let records = vec![rec!(Decimal::MAX, 2024-1-2), rec!(Decimal::MAX, 2024-1-3)];
        assert_eq!(sum_in_window(&records, &Window::UNBOUNDED), Decimal::MAX);
        assert_eq!(aggregate(&records, &PeriodSpec::AllTime, dt!(2024-2-1)).total, Decimal::MAX);
        let mut sum = Summary::new(Window::UNBOUNDED);
        sum += &records[0];
        sum += &records[1];
        assert_eq!(sum.total(), Decimal::MAX);
        let shares = breakdown_by_category(&records, &Window::UNBOUNDED, 5);
        assert_eq!(shares, vec![share!("misc", Decimal::MAX, dec!(100))]);
        assert_eq!(percent_of(Decimal::MAX, dec!(0.001)), Decimal::MAX);
        assert_eq!(percent_of(Decimal::MIN, dec!(0.001)), Decimal::MIN);
    }

    #[test]
    fn savings() {
        assert_eq!(savings_rate(dec!(1000), dec!(750)), dec!(25));
        assert_eq!(savings_rate(dec!(1000), dec!(1500)), dec!(-50));
        assert_eq!(savings_rate(dec!(0), dec!(20)), dec!(0));
    }

    #[test]
    fn budget_usage() {
        assert_eq!(Usage::measure(dec!(30), dec!(40)), Usage {
            spent: dec!(30), limit: dec!(40), pct: dec!(75), over: false,
        });
        let over = Usage::measure(dec!(55), dec!(40));
        assert_eq!(over.pct, dec!(100));
        assert!(over.over);
        assert_eq!(Usage::measure(dec!(5), dec!(0)).pct, dec!(100));
        assert_eq!(Usage::measure(dec!(0), dec!(0)).pct, dec!(0));
        assert!(!Usage::measure(dec!(40), dec!(40)).over);
    }

    #[test]
    fn trailing_months() {
        let cycle = Cycle::new(1, Unit::Month, day!(2023-1-1)).unwrap();
        let mut cal = Calendar::trailing(&cycle, dt!(2024-3-10), 3);
        cal.register(&[
            rec!(dec!(1), 2023-12-31),
            rec!(dec!(2), 2024-1-1),
            rec!(dec!(3), 2024-2-29),
            rec!(dec!(4), 2024-3-10),
            rec!(dec!(5), 2024-3-11),
            rec!(dec!(6), 2024-4-1),
        ]);
        let got = cal.contents()
            .iter()
            .map(|s| (s.window(), s.total(), s.count()))
            .collect::<Vec<_>>();
        assert_eq!(got, vec![
            (Window::days(day!(2024-1-1), day!(2024-1-31)).unwrap(), dec!(2), 1),
            (Window::days(day!(2024-2-1), day!(2024-2-29)).unwrap(), dec!(3), 1),
            (Window::days(day!(2024-3-1), day!(2024-3-31)).unwrap(), dec!(9), 2),
        ]);
    }

    #[test]
    fn monthly_average() {
        let cycle = Cycle::new(1, Unit::Month, day!(2024-1-1)).unwrap();
        let mut cal = Calendar::trailing(&cycle, dt!(2024-3-10), 3);
        cal.register(&[
            rec!(dec!(100), 2024-1-5),
            rec!(dec!(50.5), 2024-1-20),
            rec!(dec!(60), 2024-3-1),
        ]);
        // February has no record but still counts
        assert_eq!(average_total(cal.contents()), dec!(70));
        assert_eq!(average_total(&cal.contents()[..1]), dec!(151));
        assert_eq!(average_total(&[]), dec!(0));
    }

    #[test]
    fn trailing_before_anchor() {
        let cycle = Cycle::new(1, Unit::Week, day!(2024-1-1)).unwrap();
        let cal = Calendar::trailing(&cycle, dt!(2023-6-1), 2);
        let windows = cal.contents().iter().map(Summary::window).collect::<Vec<_>>();
        assert_eq!(windows, vec![
            Window::days(day!(2023-12-25), day!(2023-12-31)).unwrap(),
            Window::days(day!(2024-1-1), day!(2024-1-7)).unwrap(),
        ]);
        assert!(Calendar::trailing(&cycle, dt!(2024-1-1), 0).contents().is_empty());
    }

    fn any_records() -> impl Strategy<Value = Vec<Record>> {
        let record = (-100_000i64..100_000, 0i64..2000, 0usize..8).prop_map(|(cents, offset, cat)| {
            Record::new(
                Decimal::new(cents, 2),
                dt!(2020-1-1) + chrono::TimeDelta::try_days(offset).unwrap(),
                ["food", "rent", "fun", "books", "travel", "health", "gifts", ""][cat],
            )
        });
        proptest::collection::vec(record, 0..60)
    }

    proptest! {
        #[test]
        fn all_time_sums_everything(records in any_records()) {
            let expected: Decimal = records.iter().map(Record::amount).sum();
            let window = PeriodSpec::AllTime.resolve(dt!(2024-1-1));
            prop_assert_eq!(sum_in_window(&records, &window), expected);
        }

        #[test]
        fn aggregate_is_idempotent(records in any_records(), days in 1i64..400, offset in 0i64..2500) {
            let spec = PeriodSpec::past_days(days).unwrap();
            let now = dt!(2020-1-1) + chrono::TimeDelta::try_days(offset).unwrap();
            prop_assert_eq!(aggregate(&records, &spec, now), aggregate(&records, &spec, now));
        }

        #[test]
        fn breakdown_shares_are_consistent(
            cents in proptest::collection::vec(-100_000i64..100_000, 0..60),
            top_n in 0usize..10,
        ) {
            let records = cents.iter().enumerate().map(|(i, c)| {
                Record::new(Decimal::new(*c, 2), dt!(2024-1-1), format!("cat{}", i % 12))
            }).collect::<Vec<_>>();
            let shares = breakdown_by_category(&records, &Window::UNBOUNDED, top_n);
            let total: Decimal = shares.iter().map(|s| s.amount).sum();
            prop_assert_eq!(total, records.iter().map(Record::amount).sum::<Decimal>());
            let pct: Decimal = shares.iter().map(|s| s.pct).sum();
            let slack = Decimal::from(shares.len().saturating_sub(1));
            if !total.is_zero() {
                let full = dec!(100) * total.signum();
                prop_assert!(pct >= full - slack && pct <= full + slack);
            }
            for pair in shares.windows(2) {
                prop_assert!(pair[0].amount >= pair[1].amount);
                prop_assert!(pair[0].pct >= pair[1].pct);
            }
        }
    }
}
