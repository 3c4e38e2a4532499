//! Hierarchy navigation over period ids.
//!
//! Everything here is a pure function of a period id and the base year of
//! the thirty-year horizon. Child and parent ids are always produced by the
//! codec ([`PeriodKey::encode`]), never by string surgery.
//!
//! Child counts per level:
//!
//! - thirty-year → 6 five-year buckets
//! - five-year → 5 years
//! - year → 4 quarters
//! - quarter → 3 months
//! - month → 4 to 6 weeks (see [`calendar::weeks_in_month`])
//! - week → 7 days
//! - day → none
//!
//! A week's first or last span may contain days of the neighbouring month.
//! Those days are listed as children of the week, but their own parent is
//! the week of *their* month that covers the same Monday.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::period::id::{MAX_FIVE_YEAR_INDEX, MAX_YEAR, PeriodId, PeriodKey};
use crate::period::level::Level;

/// Direction for sibling navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Previous,
    Next,
}

/// Derives children, parents, and siblings of period ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigator {
    base_year: i32,
}

impl Navigator {
    /// `base_year` is the first year of the thirty-year horizon.
    #[must_use]
    pub const fn new(base_year: i32) -> Self {
        Self { base_year }
    }

    #[must_use]
    pub const fn base_year(&self) -> i32 {
        self.base_year
    }

    /// Child ids of `id`, in calendar order.
    #[must_use]
    pub fn children_of(&self, id: &PeriodId) -> Vec<PeriodId> {
        self.children(id.key()).into_iter().map(PeriodId::from).collect()
    }

    /// Parent id of `id`, `None` for the root.
    #[must_use]
    pub fn parent_of(&self, id: &PeriodId) -> Option<PeriodId> {
        self.parent(id.key()).map(PeriodId::from)
    }

    /// Previous or next sibling of `id` at the same level.
    #[must_use]
    pub fn adjacent_of(&self, id: &PeriodId, direction: Direction) -> Option<PeriodId> {
        self.adjacent(id.key(), direction).map(PeriodId::from)
    }

    /// All ancestors of `id`, immediate parent first, root last.
    #[must_use]
    pub fn ancestors_of(&self, id: &PeriodId) -> Vec<PeriodId> {
        let mut out = Vec::new();
        let mut current = self.parent(id.key());
        while let Some(key) = current {
            current = self.parent(key);
            out.push(key.encode());
        }
        out
    }

    #[must_use]
    pub fn children(&self, key: PeriodKey) -> Vec<PeriodKey> {
        match key {
            PeriodKey::ThirtyYear => (0..=MAX_FIVE_YEAR_INDEX)
                .map(|index| PeriodKey::FiveYear { index })
                .collect(),
            PeriodKey::FiveYear { index } => {
                let first = self.first_year_of_bucket(index);
                (first..first + 5)
                    .map(|year| PeriodKey::Year { year })
                    .collect()
            }
            PeriodKey::Year { year } => (1..=4)
                .map(|quarter| PeriodKey::Quarter { year, quarter })
                .collect(),
            PeriodKey::Quarter { year, quarter } => {
                let first = (quarter.clamp(1, 4) - 1) * 3 + 1;
                (first..first + 3)
                    .map(|month| PeriodKey::Month { year, month })
                    .collect()
            }
            PeriodKey::Month { year, month } => calendar::weeks_in_month(year, month)
                .into_iter()
                .map(|span| PeriodKey::Week {
                    year,
                    month,
                    week: span.number,
                })
                .collect(),
            PeriodKey::Week { year, month, week } => week_span(year, month, week)
                .map(|span| span.days().map(PeriodKey::for_date).collect())
                .unwrap_or_default(),
            PeriodKey::Day { .. } => Vec::new(),
        }
    }

    #[must_use]
    pub fn parent(&self, key: PeriodKey) -> Option<PeriodKey> {
        match key {
            PeriodKey::ThirtyYear => None,
            PeriodKey::FiveYear { .. } => Some(PeriodKey::ThirtyYear),
            PeriodKey::Year { year } => Some(PeriodKey::FiveYear {
                index: self.bucket_of_year(year),
            }),
            PeriodKey::Quarter { year, .. } => Some(PeriodKey::Year { year }),
            PeriodKey::Month { year, month } => Some(PeriodKey::Quarter {
                year,
                quarter: calendar::quarter_of_month(month),
            }),
            PeriodKey::Week { year, month, .. } => Some(PeriodKey::Month { year, month }),
            PeriodKey::Day { year, month, .. } => {
                let date = key.date()?;
                calendar::week_of_month_containing(year, month, date).map(|span| {
                    PeriodKey::Week {
                        year,
                        month,
                        week: span.number,
                    }
                })
            }
        }
    }

    #[must_use]
    pub fn adjacent(&self, key: PeriodKey, direction: Direction) -> Option<PeriodKey> {
        let step: i32 = match direction {
            Direction::Previous => -1,
            Direction::Next => 1,
        };

        match key {
            PeriodKey::ThirtyYear => None,
            PeriodKey::FiveYear { index } => {
                let index = index.min(MAX_FIVE_YEAR_INDEX);
                let next = match direction {
                    Direction::Previous => index.checked_sub(1)?,
                    Direction::Next => index + 1,
                };
                (next <= MAX_FIVE_YEAR_INDEX).then_some(PeriodKey::FiveYear { index: next })
            }
            PeriodKey::Year { year } => {
                checked_year(year + step).map(|year| PeriodKey::Year { year })
            }
            PeriodKey::Quarter { year, quarter } => {
                let (year, quarter) = match (direction, quarter) {
                    (Direction::Next, 4) => (checked_year(year + 1)?, 1),
                    (Direction::Next, q) => (year, q + 1),
                    (Direction::Previous, 1) => (checked_year(year - 1)?, 4),
                    (Direction::Previous, q) => (year, q - 1),
                };
                Some(PeriodKey::Quarter { year, quarter })
            }
            PeriodKey::Month { year, month } => {
                let (year, month) = step_month(year, month, direction)?;
                Some(PeriodKey::Month { year, month })
            }
            PeriodKey::Week { year, month, week } => {
                let count = weeks_count(year, month);
                match direction {
                    Direction::Next if week < count => Some(PeriodKey::Week {
                        year,
                        month,
                        week: week + 1,
                    }),
                    Direction::Previous if week > 1 => Some(PeriodKey::Week {
                        year,
                        month,
                        week: week - 1,
                    }),
                    Direction::Next => {
                        let (year, month) = step_month(year, month, direction)?;
                        Some(PeriodKey::Week {
                            year,
                            month,
                            week: 1,
                        })
                    }
                    Direction::Previous => {
                        let (year, month) = step_month(year, month, direction)?;
                        let week = weeks_count(year, month);
                        (week > 0).then_some(PeriodKey::Week { year, month, week })
                    }
                }
            }
            PeriodKey::Day { .. } => {
                let date = key.date()?;
                let moved = match direction {
                    Direction::Previous => date.pred_opt()?,
                    Direction::Next => date.succ_opt()?,
                };
                checked_year(moved.year())?;
                Some(PeriodKey::for_date(moved))
            }
        }
    }

    /// First and last calendar date covered by a period.
    ///
    /// For weeks this is the full Monday-to-Sunday span, including days that
    /// belong to a neighbouring month.
    #[must_use]
    pub fn date_range(&self, key: PeriodKey) -> Option<(NaiveDate, NaiveDate)> {
        let years = |first: i32, last: i32| {
            Some((
                NaiveDate::from_ymd_opt(first, 1, 1)?,
                NaiveDate::from_ymd_opt(last, 12, 31)?,
            ))
        };
        match key {
            PeriodKey::ThirtyYear => years(self.base_year, self.base_year + 29),
            PeriodKey::FiveYear { index } => {
                let first = self.first_year_of_bucket(index);
                years(first, first + 4)
            }
            PeriodKey::Year { year } => years(year, year),
            PeriodKey::Quarter { year, quarter } => {
                let first_month = (quarter.clamp(1, 4) - 1) * 3 + 1;
                Some((
                    calendar::first_of_month(year, first_month)?,
                    calendar::last_of_month(year, first_month + 2)?,
                ))
            }
            PeriodKey::Month { year, month } => Some((
                calendar::first_of_month(year, month)?,
                calendar::last_of_month(year, month)?,
            )),
            PeriodKey::Week { year, month, week } => {
                week_span(year, month, week).map(|span| (span.start, span.end))
            }
            PeriodKey::Day { .. } => key.date().map(|d| (d, d)),
        }
    }

    /// The period at `level` that contains `date`.
    ///
    /// Weeks are resolved inside the date's own month.
    #[must_use]
    pub fn containing(&self, date: NaiveDate, level: Level) -> PeriodKey {
        let (year, month) = (date.year(), date.month());
        match level {
            Level::ThirtyYear => PeriodKey::ThirtyYear,
            Level::FiveYear => PeriodKey::FiveYear {
                index: self.bucket_of_year(year),
            },
            Level::Year => PeriodKey::Year { year },
            Level::Quarter => PeriodKey::Quarter {
                year,
                quarter: calendar::quarter_of_month(month),
            },
            Level::Month => PeriodKey::Month { year, month },
            Level::Week => calendar::week_of_month_containing(year, month, date).map_or(
                PeriodKey::Month { year, month },
                |span| PeriodKey::Week {
                    year,
                    month,
                    week: span.number,
                },
            ),
            Level::Day => PeriodKey::for_date(date),
        }
    }

    /// Five-year bucket index of `year`, clamped to `0..=5`.
    #[must_use]
    pub fn bucket_of_year(&self, year: i32) -> u8 {
        let raw = (year - self.base_year).div_euclid(5);
        u8::try_from(raw.clamp(0, i32::from(MAX_FIVE_YEAR_INDEX))).unwrap_or(0)
    }

    fn first_year_of_bucket(&self, index: u8) -> i32 {
        self.base_year + 5 * i32::from(index.min(MAX_FIVE_YEAR_INDEX))
    }
}

fn checked_year(year: i32) -> Option<i32> {
    (0..=MAX_YEAR).contains(&year).then_some(year)
}

fn step_month(year: i32, month: u32, direction: Direction) -> Option<(i32, u32)> {
    match (direction, month) {
        (Direction::Next, 12) => Some((checked_year(year + 1)?, 1)),
        (Direction::Next, m) => Some((year, m + 1)),
        (Direction::Previous, 1) => Some((checked_year(year - 1)?, 12)),
        (Direction::Previous, m) => Some((year, m - 1)),
    }
}

fn weeks_count(year: i32, month: u32) -> u32 {
    u32::try_from(calendar::weeks_in_month(year, month).len()).unwrap_or(0)
}

fn week_span(year: i32, month: u32, week: u32) -> Option<calendar::WeekSpan> {
    let index = usize::try_from(week.checked_sub(1)?).ok()?;
    calendar::weeks_in_month(year, month).get(index).copied()
}
