//! Aggregation engine: pure, stateless reductions over record slices.
//!
//! Nothing here touches the store or the HTTP layer, so every view is
//! testable on in-memory record lists. Every function is total on the
//! empty slice: zero totals, `None` sentinels, never NaN.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, Weekday};
use rust_decimal::Decimal;

use super::models::{Category, Record};

const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Summed amount per category, with its share of the grand total.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    pub category: Category,
    pub total: Decimal,
    /// 0-100, rounded to two decimals; 0 for every group when the grand
    /// total is zero.
    pub percentage: Decimal,
}

/// Summed amount for one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total: Decimal,
}

/// Summed amount for one `yyyy-mm` month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyTotal {
    pub month: String,
    pub total: Decimal,
}

/// The single largest record of a slice.
#[derive(Debug, Clone, PartialEq)]
pub struct HighestSpend {
    pub description: String,
    pub amount: Decimal,
    pub date: NaiveDate,
}

/// Weekday carrying the highest summed amount.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayTotal {
    pub weekday: &'static str,
    pub total: Decimal,
}

/// Single-pass spending statistics for one record slice.
#[derive(Debug, Clone, PartialEq)]
pub struct SpendingSummary {
    pub total: Decimal,
    pub count: usize,
    /// Mean amount; zero (not NaN) for an empty slice.
    pub average: Decimal,
    pub highest: Option<HighestSpend>,
    pub busiest_weekday: Option<WeekdayTotal>,
}

/// Sum of all record amounts.
pub fn total(records: &[Record]) -> Decimal {
    records.iter().map(|r| r.amount).sum()
}

/// Income minus expenses over the same period. Negative balances are valid
/// and are not clamped.
pub fn balance(income: &[Record], expenses: &[Record]) -> Decimal {
    total(income) - total(expenses)
}

/// Group by category and sum. The groups partition the grand total exactly:
/// category fallback happened during normalization, so every record lands
/// in exactly one bucket. Sorted by descending total (category name breaks
/// ties) so output is deterministic.
pub fn category_totals(records: &[Record]) -> Vec<CategoryTotal> {
    let mut sums: HashMap<Category, Decimal> = HashMap::new();
    let mut grand = Decimal::ZERO;
    for record in records {
        *sums.entry(record.category).or_insert(Decimal::ZERO) += record.amount;
        grand += record.amount;
    }

    let mut totals: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(category, total)| {
            let percentage = if grand.is_zero() {
                Decimal::ZERO
            } else {
                (total / grand * PERCENT).round_dp(2)
            };
            CategoryTotal { category, total, percentage }
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.as_str().cmp(b.category.as_str()))
    });
    totals
}

/// Group by exact date and sum, ascending by date. Days without activity
/// do not appear; callers that need a dense series fill gaps themselves.
pub fn daily_series(records: &[Record]) -> Vec<DailyTotal> {
    let mut sums: HashMap<NaiveDate, Decimal> = HashMap::new();
    for record in records {
        *sums.entry(record.date).or_insert(Decimal::ZERO) += record.amount;
    }

    let mut series: Vec<DailyTotal> = sums
        .into_iter()
        .map(|(date, total)| DailyTotal { date, total })
        .collect();
    series.sort_by_key(|d| d.date);
    series
}

/// Group by `yyyy-mm` label and sum, ordered chronologically. Records may
/// arrive in any order, so each label is parsed back into (year, month)
/// for sorting rather than trusting insertion order.
pub fn monthly_series(records: &[Record]) -> Vec<MonthlyTotal> {
    let mut sums: HashMap<String, Decimal> = HashMap::new();
    for record in records {
        *sums.entry(record.month_label()).or_insert(Decimal::ZERO) += record.amount;
    }

    let mut series: Vec<MonthlyTotal> = sums
        .into_iter()
        .map(|(month, total)| MonthlyTotal { month, total })
        .collect();
    series.sort_by_key(|m| parse_month_label(&m.month));
    series
}

fn parse_month_label(label: &str) -> (i32, u32) {
    label
        .split_once('-')
        .and_then(|(year, month)| Some((year.parse().ok()?, month.parse().ok()?)))
        .unwrap_or((0, 0))
}

/// Single pass over a record slice: grand total, count, average, highest
/// record, and busiest weekday by summed amount. Ties on "highest" and on
/// weekday totals are broken by first encounter in input order.
pub fn spending_summary(records: &[Record]) -> SpendingSummary {
    let mut grand = Decimal::ZERO;
    let mut highest: Option<&Record> = None;
    let mut by_weekday: HashMap<Weekday, (Decimal, usize)> = HashMap::new();

    for (index, record) in records.iter().enumerate() {
        grand += record.amount;

        if highest.map_or(true, |h| record.amount > h.amount) {
            highest = Some(record);
        }

        let entry = by_weekday
            .entry(record.date.weekday())
            .or_insert((Decimal::ZERO, index));
        entry.0 += record.amount;
    }

    let count = records.len();
    let average = if count == 0 {
        Decimal::ZERO
    } else {
        grand / Decimal::from(count as u64)
    };

    let busiest_weekday = by_weekday
        .into_iter()
        .max_by(|a, b| a.1 .0.cmp(&b.1 .0).then_with(|| b.1 .1.cmp(&a.1 .1)))
        .map(|(weekday, (total, _))| WeekdayTotal {
            weekday: weekday_name(weekday),
            total,
        });

    SpendingSummary {
        total: grand,
        count,
        average,
        highest: highest.map(|record| HighestSpend {
            description: record.description.clone(),
            amount: record.amount,
            date: record.date,
        }),
        busiest_weekday,
    }
}

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}
