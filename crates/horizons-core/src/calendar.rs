//! Calendar arithmetic shared by the period codec and navigator.
//!
//! Two pieces live here:
//!
//! - [`iso_week`]: ISO-8601 week number and week-year of a date.
//! - [`weeks_in_month`]: the Monday-start, seven-day spans that cover a
//!   month. Spans may leak into the previous or next month; each span
//!   remembers which month it was generated for so callers can grey out
//!   foreign days.
//!
//! All functions are pure. Out-of-range input (month 13, a year chrono
//! cannot represent) yields `None` or an empty list instead of panicking.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

/// ISO-8601 week coordinates of a date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IsoWeek {
    /// The ISO week-year, which differs from the calendar year for some
    /// dates in early January and late December.
    pub year: i32,
    /// Week number, `1..=53`.
    pub week: u32,
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

/// Compute the ISO week of `date`.
///
/// The date is shifted to the Thursday of its Monday-start week; the
/// Thursday's calendar year is the ISO week-year and its ordinal day
/// determines the week number.
#[must_use]
pub fn iso_week(date: NaiveDate) -> IsoWeek {
    let iso_day = i64::from(date.weekday().number_from_monday());
    let thursday = shift_days(date, 4 - iso_day).unwrap_or(date);
    IsoWeek {
        year: thursday.year(),
        week: (thursday.ordinal0() + 1).div_ceil(7),
    }
}

/// One Monday-to-Sunday span of a month's week decomposition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WeekSpan {
    /// Position within the month, starting at 1.
    pub number: u32,
    /// The Monday that opens the span.
    pub start: NaiveDate,
    /// The Sunday that closes the span.
    pub end: NaiveDate,
    pub target_year: i32,
    pub target_month: u32,
}

impl WeekSpan {
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// True when `date` lies inside the span but belongs to an adjacent month.
    #[must_use]
    pub fn is_foreign(&self, date: NaiveDate) -> bool {
        self.contains(date) && (date.year() != self.target_year || date.month() != self.target_month)
    }

    /// The seven dates of the span, Monday first.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(7)
    }
}

/// Decompose a month into consecutive Monday-start weeks.
///
/// Starts at the Monday on or before the 1st and emits seven-day spans until
/// one reaches or passes the last day of the month. The result always has
/// 4 to 6 spans for a valid month, and an empty list otherwise.
#[must_use]
pub fn weeks_in_month(year: i32, month: u32) -> Vec<WeekSpan> {
    let (Some(first), Some(last)) = (first_of_month(year, month), last_of_month(year, month)) else {
        return Vec::new();
    };

    let mut spans = Vec::with_capacity(6);
    let mut monday = monday_on_or_before(first);
    let mut number = 1;

    loop {
        let Some(sunday) = shift_days(monday, 6) else {
            break;
        };
        spans.push(WeekSpan {
            number,
            start: monday,
            end: sunday,
            target_year: year,
            target_month: month,
        });
        if sunday >= last {
            break;
        }
        let Some(next) = shift_days(monday, 7) else {
            break;
        };
        monday = next;
        number += 1;
    }

    spans
}

/// Find the span of `year`/`month` that contains `date`.
#[must_use]
pub fn week_of_month_containing(year: i32, month: u32, date: NaiveDate) -> Option<WeekSpan> {
    weeks_in_month(year, month)
        .into_iter()
        .find(|span| span.contains(date))
}

#[must_use]
pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

#[must_use]
pub fn last_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    let (next_year, next_month) = if month == 12 {
        (year.checked_add(1)?, 1)
    } else {
        (year, month.checked_add(1)?)
    };
    first_of_month(next_year, next_month)?.pred_opt()
}

/// Number of days in a month, or 0 for an invalid month.
#[must_use]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    last_of_month(year, month).map_or(0, |d| d.day())
}

#[must_use]
pub fn monday_on_or_before(date: NaiveDate) -> NaiveDate {
    let back = i64::from(date.weekday().num_days_from_monday());
    shift_days(date, -back).unwrap_or(date)
}

/// Add (or subtract) whole days, `None` when the result leaves chrono's range.
#[must_use]
pub fn shift_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::try_days(days)?)
}

/// Quarter (1..=4) that contains `month`.
#[must_use]
pub const fn quarter_of_month(month: u32) -> u32 {
    month.div_ceil(3)
}

/// True when `date` falls on a Monday.
#[must_use]
pub fn is_monday(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Mon
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn iso_week_mid_year() {
        assert_eq!(iso_week(ymd(2026, 3, 31)), IsoWeek { year: 2026, week: 14 });
    }

    #[test]
    fn iso_week_early_january_belongs_to_previous_year() {
        // 2021-01-01 is a Friday: week 53 of 2020.
        assert_eq!(iso_week(ymd(2021, 1, 1)), IsoWeek { year: 2020, week: 53 });
        // 2022-01-02 is a Sunday: week 52 of 2021.
        assert_eq!(iso_week(ymd(2022, 1, 2)), IsoWeek { year: 2021, week: 52 });
    }

    #[test]
    fn iso_week_late_december_belongs_to_next_year() {
        // 2024-12-30 is a Monday whose Thursday is 2025-01-02.
        assert_eq!(iso_week(ymd(2024, 12, 30)), IsoWeek { year: 2025, week: 1 });
    }

    #[test]
    fn iso_week_matches_chrono_for_a_decade() {
        let mut date = ymd(2018, 12, 1);
        let stop = ymd(2029, 2, 1);
        while date < stop {
            let ours = iso_week(date);
            let theirs = date.iso_week();
            assert_eq!((ours.year, ours.week), (theirs.year(), theirs.week()), "{date}");
            date = date.succ_opt().expect("in range");
        }
    }

    #[test]
    fn iso_week_display_is_zero_padded() {
        assert_eq!(IsoWeek { year: 2026, week: 5 }.to_string(), "2026-W05");
    }

    #[test]
    fn weeks_in_month_leaks_into_neighbours() {
        // March 2026 starts on a Sunday.
        let spans = weeks_in_month(2026, 3);
        assert_eq!(spans.len(), 6);
        assert_eq!(spans[0].start, ymd(2026, 2, 23));
        assert_eq!(spans[0].end, ymd(2026, 3, 1));
        assert!(spans[0].is_foreign(ymd(2026, 2, 27)));
        assert!(!spans[0].is_foreign(ymd(2026, 3, 1)));
        assert_eq!(spans[5].start, ymd(2026, 3, 30));
        assert_eq!(spans[5].end, ymd(2026, 4, 5));
    }

    #[test]
    fn weeks_in_month_four_week_february() {
        // February 2021 starts on a Monday and has 28 days.
        let spans = weeks_in_month(2021, 2);
        assert_eq!(spans.len(), 4);
        assert_eq!(spans[0].start, ymd(2021, 2, 1));
        assert_eq!(spans[3].end, ymd(2021, 2, 28));
    }

    #[test]
    fn weeks_in_month_numbers_are_sequential() {
        let spans = weeks_in_month(2026, 1);
        let numbers: Vec<u32> = spans.iter().map(|s| s.number).collect();
        assert_eq!(numbers, (1..=u32::try_from(spans.len()).expect("small")).collect::<Vec<_>>());
        assert!(spans.iter().all(|s| is_monday(s.start)));
    }

    #[test]
    fn weeks_in_month_invalid_month_is_empty() {
        assert!(weeks_in_month(2026, 0).is_empty());
        assert!(weeks_in_month(2026, 13).is_empty());
    }

    #[test]
    fn week_containing_finds_span() {
        let span = week_of_month_containing(2026, 3, ymd(2026, 3, 18)).expect("span");
        assert_eq!(span.number, 4);
        assert!(week_of_month_containing(2026, 3, ymd(2026, 5, 1)).is_none());
    }

    #[test]
    fn days_in_month_handles_leap_years() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2100, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2026, 12), 31);
        assert_eq!(days_in_month(2026, 13), 0);
    }

    #[test]
    fn quarter_of_month_rounds_up() {
        assert_eq!(quarter_of_month(1), 1);
        assert_eq!(quarter_of_month(3), 1);
        assert_eq!(quarter_of_month(4), 2);
        assert_eq!(quarter_of_month(12), 4);
    }

    #[test]
    fn span_days_are_consecutive() {
        let span = weeks_in_month(2026, 3)[2];
        let days: Vec<NaiveDate> = span.days().collect();
        assert_eq!(days.len(), 7);
        assert_eq!(days[0], span.start);
        assert_eq!(days[6], span.end);
    }
}
