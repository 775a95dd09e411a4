//! Date-range bucketing for log queries and charts
//!
//! Screens pick a symbolic period ("7d", "current-week", "all", ...) and
//! this module turns it into concrete dates. "Today" is always passed in;
//! nothing here reads the clock.

use crate::errors::MetricsError;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Inclusive date range for queries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl DateRange {
    /// Build a range, swapping the bounds if they arrive reversed
    pub fn new(start_date: NaiveDate, end_date: NaiveDate) -> Self {
        if start_date <= end_date {
            Self { start_date, end_date }
        } else {
            Self {
                start_date: end_date,
                end_date: start_date,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Number of calendar days covered, both ends included
    pub fn len_days(&self) -> i64 {
        (self.end_date - self.start_date).num_days() + 1
    }

    /// Every day in the range, in order
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end_date;
        self.start_date.iter_days().take_while(move |day| *day <= end)
    }
}

/// Symbolic period selected on a log or chart screen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Period {
    /// Trailing N days ending today
    Days(u32),
    CurrentWeek,
    /// Span of the already-fetched dataset
    All,
    DayRange(DateRange),
}

impl Period {
    /// Parse a period token.
    ///
    /// Accepts `Nd`, `Nday` and `Ndays` (e.g. "7d", "90days"),
    /// "current-week", "all", and "day range" / "day-range" / "custom"
    /// which require `explicit` dates.
    pub fn from_token(token: &str, explicit: Option<DateRange>) -> Result<Self, MetricsError> {
        let normalized = token.trim().to_lowercase();
        match normalized.as_str() {
            "current-week" | "current_week" | "week" => Ok(Period::CurrentWeek),
            "all" => Ok(Period::All),
            "day range" | "day-range" | "day_range" | "custom" => explicit
                .map(Period::DayRange)
                .ok_or_else(|| MetricsError::MissingExplicitRange(token.to_string())),
            other => parse_days(other)
                .map(Period::Days)
                .ok_or_else(|| MetricsError::UnknownPeriod(token.to_string())),
        }
    }
}

fn parse_days(token: &str) -> Option<u32> {
    let digits = token
        .strip_suffix("days")
        .or_else(|| token.strip_suffix("day"))
        .or_else(|| token.strip_suffix('d'))?;
    digits.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// First day of the week containing `date`, clamped to the earliest
/// representable date
pub fn week_start(date: NaiveDate, starts_on: Weekday) -> NaiveDate {
    let offset = (7 + date.weekday().num_days_from_monday() - starts_on.num_days_from_monday()) % 7;
    days_before(date, offset)
}

/// `date` minus `days`, saturating at [`NaiveDate::MIN`]
fn days_before(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_sub_signed(Duration::days(days as i64))
        .unwrap_or(NaiveDate::MIN)
}

/// `date` plus `days`, saturating at [`NaiveDate::MAX`]
fn days_after(date: NaiveDate, days: u32) -> NaiveDate {
    date.checked_add_signed(Duration::days(days as i64))
        .unwrap_or(NaiveDate::MAX)
}

/// Resolve a period into concrete dates.
///
/// `dataset` is only consulted for [`Period::All`]; an empty dataset
/// collapses to `today..today`.
pub fn resolve_date_range(
    period: &Period,
    today: NaiveDate,
    dataset: &[NaiveDate],
    starts_on: Weekday,
) -> DateRange {
    match period {
        Period::Days(n) => DateRange::new(days_before(today, *n), today),
        Period::CurrentWeek => {
            let start = week_start(today, starts_on);
            DateRange::new(start, days_after(start, 6))
        }
        Period::All => match (dataset.iter().min(), dataset.iter().max()) {
            (Some(first), Some(last)) => DateRange::new(*first, *last),
            _ => {
                debug!(%today, "No data for 'all' period, using today");
                DateRange::new(today, today)
            }
        },
        Period::DayRange(range) => DateRange::new(range.start_date, range.end_date),
    }
}

/// One chart bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBucket {
    pub date: NaiveDate,
    /// Mean of the day's values, `None` on days without entries
    pub average: Option<f64>,
    pub count: usize,
}

/// Group dated values into one bucket per day of `range`.
///
/// Entries outside the range are dropped; empty days are kept so charts
/// get a continuous x-axis.
pub fn bucket_daily(range: &DateRange, entries: &[(NaiveDate, f64)]) -> Vec<DailyBucket> {
    range
        .days()
        .map(|date| {
            let values: Vec<f64> = entries
                .iter()
                .filter(|(day, value)| *day == date && value.is_finite())
                .map(|(_, value)| *value)
                .collect();
            let average = if values.is_empty() {
                None
            } else {
                Some(values.iter().sum::<f64>() / values.len() as f64)
            };
            DailyBucket {
                date,
                average,
                count: values.len(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_current_week_monday_start() {
        // 2024-06-15 is a Saturday
        let today = date(2024, 6, 15);
        let range = resolve_date_range(&Period::CurrentWeek, today, &[], Weekday::Mon);
        assert_eq!(range.start_date, date(2024, 6, 10));
        assert_eq!(range.end_date, date(2024, 6, 16));
        assert_eq!(range.len_days(), 7);
    }

    #[test]
    fn test_current_week_sunday_start() {
        let today = date(2024, 6, 15);
        let range = resolve_date_range(&Period::CurrentWeek, today, &[], Weekday::Sun);
        assert_eq!(range.start_date, date(2024, 6, 9));
        assert_eq!(range.end_date, date(2024, 6, 15));
    }

    #[rstest]
    #[case("7d", 7)]
    #[case("14d", 14)]
    #[case("30d", 30)]
    #[case("90d", 90)]
    #[case("7day", 7)]
    #[case("30days", 30)]
    fn test_trailing_days(#[case] token: &str, #[case] days: i64) {
        let today = date(2024, 6, 15);
        let period = Period::from_token(token, None).unwrap();
        let range = resolve_date_range(&period, today, &[], Weekday::Mon);
        assert_eq!(range.end_date, today);
        assert_eq!(range.start_date, today - Duration::days(days));
    }

    #[test]
    fn test_all_uses_dataset_span() {
        let today = date(2024, 6, 15);
        let dataset = [date(2024, 3, 2), date(2023, 12, 31), date(2024, 5, 1)];
        let range = resolve_date_range(&Period::All, today, &dataset, Weekday::Mon);
        assert_eq!(range, DateRange::new(date(2023, 12, 31), date(2024, 5, 1)));
    }

    #[test]
    fn test_all_without_data_is_today() {
        let today = date(2024, 6, 15);
        let range = resolve_date_range(&Period::All, today, &[], Weekday::Mon);
        assert_eq!(range, DateRange::new(today, today));
    }

    #[test]
    fn test_day_range_passthrough() {
        let explicit = DateRange::new(date(2024, 1, 1), date(2024, 1, 31));
        let period = Period::from_token("day range", Some(explicit)).unwrap();
        let range = resolve_date_range(&period, date(2024, 6, 15), &[], Weekday::Mon);
        assert_eq!(range, explicit);
    }

    #[test]
    fn test_reversed_range_is_normalized() {
        let range = DateRange::new(date(2024, 1, 31), date(2024, 1, 1));
        assert_eq!(range.start_date, date(2024, 1, 1));
        assert_eq!(range.end_date, date(2024, 1, 31));
    }

    #[test]
    fn test_huge_trailing_period_saturates() {
        let today = date(2024, 6, 15);
        let period = Period::from_token("100000000d", None).unwrap();
        let range = resolve_date_range(&period, today, &[], Weekday::Mon);
        assert_eq!(range.start_date, NaiveDate::MIN);
        assert_eq!(range.end_date, today);

        let range = resolve_date_range(&Period::Days(u32::MAX), today, &[], Weekday::Mon);
        assert_eq!(range.start_date, NaiveDate::MIN);
    }

    #[test]
    fn test_current_week_at_calendar_edges() {
        let range = resolve_date_range(&Period::CurrentWeek, NaiveDate::MAX, &[], Weekday::Mon);
        assert!(range.contains(NaiveDate::MAX));
        assert!(range.len_days() <= 7);

        let range = resolve_date_range(&Period::CurrentWeek, NaiveDate::MIN, &[], Weekday::Mon);
        assert!(range.contains(NaiveDate::MIN));
        assert!(range.len_days() <= 7);
    }

    #[test]
    fn test_token_errors() {
        assert!(matches!(
            Period::from_token("day range", None),
            Err(MetricsError::MissingExplicitRange(_))
        ));
        assert!(matches!(
            Period::from_token("fortnight", None),
            Err(MetricsError::UnknownPeriod(_))
        ));
        assert!(matches!(
            Period::from_token("0d", None),
            Err(MetricsError::UnknownPeriod(_))
        ));
        assert_eq!(Period::from_token("Current-Week", None).unwrap(), Period::CurrentWeek);
        assert_eq!(Period::from_token("ALL", None).unwrap(), Period::All);
    }

    #[test]
    fn test_bucket_daily() {
        let range = DateRange::new(date(2024, 6, 10), date(2024, 6, 12));
        let entries = [
            (date(2024, 6, 10), 80.0),
            (date(2024, 6, 10), 81.0),
            (date(2024, 6, 12), 79.5),
            (date(2024, 6, 20), 70.0),
        ];
        let buckets = bucket_daily(&range, &entries);
        assert_eq!(buckets.len(), 3);
        assert_eq!(buckets[0].average, Some(80.5));
        assert_eq!(buckets[0].count, 2);
        assert_eq!(buckets[1].average, None);
        assert_eq!(buckets[2].average, Some(79.5));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Property: the week always starts on the configured day and holds `date`
        #[test]
        fn prop_week_contains_date(
            year in 2020i32..2030,
            day_of_year in 1u32..366
        ) {
            let date = NaiveDate::from_yo_opt(year, day_of_year);
            prop_assume!(date.is_some());
            let date = date.unwrap();

            let range = resolve_date_range(&Period::CurrentWeek, date, &[], Weekday::Mon);
            prop_assert_eq!(range.start_date.weekday(), Weekday::Mon);
            prop_assert_eq!(range.end_date.weekday(), Weekday::Sun);
            prop_assert!(range.contains(date));
        }

        /// Property: trailing ranges span N+1 calendar days
        #[test]
        fn prop_trailing_days_length(n in 1u32..400) {
            let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
            let range = resolve_date_range(&Period::Days(n), today, &[], Weekday::Mon);
            prop_assert_eq!(range.len_days(), n as i64 + 1);
            prop_assert_eq!(range.days().count() as i64, range.len_days());
        }
    }
}
