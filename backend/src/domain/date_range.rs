//! Month range resolution.
//!
//! Translates the human-facing period selector (`yyyy-mm` for a month,
//! `yyyy` for a whole year) into an inclusive date range the store can
//! filter on. "No selector" is represented as `Option::None` by callers;
//! an unparseable selector is an error, never an implicit "all records".

use chrono::NaiveDate;

use super::LedgerError;

/// Inclusive `[start, end]` date range. ISO dates compare lexicographically
/// in calendar order, so the store can filter on the raw date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn start_iso(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_iso(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A validated period selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodSelector {
    Month { year: i32, month: u32 },
    Year(i32),
}

impl PeriodSelector {
    /// Parse a `yyyy-mm` or `yyyy` selector. Anything else (wrong field
    /// widths, non-numeric text, month outside 1-12) is rejected.
    pub fn parse(selector: &str) -> Result<PeriodSelector, LedgerError> {
        let invalid = || LedgerError::InvalidSelector(selector.to_string());

        if let Some((year, month)) = selector.split_once('-') {
            if year.len() != 4 || month.len() != 2 {
                return Err(invalid());
            }
            let year: i32 = year.parse().map_err(|_| invalid())?;
            let month: u32 = month.parse().map_err(|_| invalid())?;
            if !(1..=12).contains(&month) {
                return Err(invalid());
            }
            Ok(PeriodSelector::Month { year, month })
        } else if selector.len() == 4 {
            let year: i32 = selector.parse().map_err(|_| invalid())?;
            Ok(PeriodSelector::Year(year))
        } else {
            Err(invalid())
        }
    }

    /// Resolve to the inclusive range covering the whole period. The month
    /// end is the day before the first of the following month, so variable
    /// month lengths and leap-year Februaries fall out of the calendar
    /// arithmetic.
    pub fn resolve(self) -> DateRange {
        let bounds = match self {
            PeriodSelector::Month { year, month } => {
                let (next_year, next_month) = if month == 12 {
                    (year + 1, 1)
                } else {
                    (year, month + 1)
                };
                let start = NaiveDate::from_ymd_opt(year, month, 1);
                let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
                    .and_then(|first_of_next| first_of_next.pred_opt());
                (start, end)
            }
            PeriodSelector::Year(year) => (
                NaiveDate::from_ymd_opt(year, 1, 1),
                NaiveDate::from_ymd_opt(year, 12, 31),
            ),
        };
        match bounds {
            (Some(start), Some(end)) => DateRange { start, end },
            // parse() only admits months 1-12 and four-digit years, all of
            // which chrono can represent.
            _ => unreachable!("selector validated at parse time"),
        }
    }
}

/// Resolve an optional selector string: `None` means "no filter".
pub fn resolve_selector(selector: Option<&str>) -> Result<Option<DateRange>, LedgerError> {
    match selector {
        Some(selector) => Ok(Some(PeriodSelector::parse(selector)?.resolve())),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn month_selector_resolves_to_full_month() {
        let range = PeriodSelector::parse("2024-03").unwrap().resolve();
        assert_eq!(range.start, date(2024, 3, 1));
        assert_eq!(range.end, date(2024, 3, 31));
    }

    #[test]
    fn month_end_respects_month_length() {
        let april = PeriodSelector::parse("2025-04").unwrap().resolve();
        assert_eq!(april.end, date(2025, 4, 30));

        let december = PeriodSelector::parse("2025-12").unwrap().resolve();
        assert_eq!(december.start, date(2025, 12, 1));
        assert_eq!(december.end, date(2025, 12, 31));
    }

    #[test]
    fn february_end_respects_leap_years() {
        let leap = PeriodSelector::parse("2024-02").unwrap().resolve();
        assert_eq!(leap.end, date(2024, 2, 29));

        let common = PeriodSelector::parse("2023-02").unwrap().resolve();
        assert_eq!(common.end, date(2023, 2, 28));

        // Divisible by 100 but not 400: not a leap year.
        let century = PeriodSelector::parse("2100-02").unwrap().resolve();
        assert_eq!(century.end, date(2100, 2, 28));
    }

    #[test]
    fn year_selector_covers_whole_year() {
        let range = PeriodSelector::parse("2024").unwrap().resolve();
        assert_eq!(range.start, date(2024, 1, 1));
        assert_eq!(range.end, date(2024, 12, 31));
    }

    #[test]
    fn malformed_selectors_are_rejected() {
        for bad in ["", "foo", "2024-13", "2024-00", "03-2024", "2024-3", "24-03", "2024-03-15", "20x4"] {
            let err = PeriodSelector::parse(bad).unwrap_err();
            assert!(
                matches!(err, LedgerError::InvalidSelector(_)),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn absent_selector_means_no_filter() {
        assert_eq!(resolve_selector(None).unwrap(), None);
        assert!(resolve_selector(Some("2024-05")).unwrap().is_some());
        assert!(resolve_selector(Some("nope")).is_err());
    }

    #[test]
    fn range_contains_is_inclusive_on_both_bounds() {
        let range = PeriodSelector::parse("2024-02").unwrap().resolve();
        assert!(range.contains(date(2024, 2, 1)));
        assert!(range.contains(date(2024, 2, 29)));
        assert!(!range.contains(date(2024, 3, 1)));
        assert!(!range.contains(date(2024, 1, 31)));
    }
}
