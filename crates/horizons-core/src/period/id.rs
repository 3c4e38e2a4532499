//! Period identifier codec.
//!
//! Every period is addressed by a short string key: a level prefix followed
//! by its date coordinates at fixed width.
//!
//! | Level       | Example          | Coordinates                     |
//! |-------------|------------------|---------------------------------|
//! | thirty-year | `30y`            | none (one root per base year)   |
//! | five-year   | `5y-3`           | bucket index                    |
//! | year        | `y-2026`         | year                            |
//! | quarter     | `q-2026-2`       | year, quarter                   |
//! | month       | `m-2026-03`      | year, zero-padded month         |
//! | week        | `w-2026-03-05`   | year, month, week of that month |
//! | day         | `d-2026-03-31`   | year, month, day                |
//!
//! [`PeriodKey::encode`] and [`PeriodKey::from_str`] are exact inverses for
//! every valid key. `from_str` is strict: it rejects unknown prefixes,
//! out-of-range coordinates, and non-canonical spellings such as
//! `m-2026-3`. [`PeriodKey::parse_lenient`] never fails; anything it cannot
//! read degrades to the thirty-year root with a warning, so a corrupt id
//! in persisted data cannot take the rest of the tree down with it.
//!
//! The five-year bucket index is not range-checked here. The navigator
//! clamps it to `0..=5` wherever it derives parents or children.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::str::FromStr;

use crate::calendar;
use crate::period::level::Level;

/// Highest five-year bucket index inside a thirty-year horizon.
pub const MAX_FIVE_YEAR_INDEX: u8 = 5;

/// Highest year the codec will encode (four digits).
pub const MAX_YEAR: i32 = 9999;

/// Typed coordinates of one period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "level", rename_all = "snake_case")]
pub enum PeriodKey {
    ThirtyYear,
    FiveYear { index: u8 },
    Year { year: i32 },
    Quarter { year: i32, quarter: u32 },
    Month { year: i32, month: u32 },
    Week { year: i32, month: u32, week: u32 },
    Day { year: i32, month: u32, day: u32 },
}

impl PeriodKey {
    #[must_use]
    pub const fn level(&self) -> Level {
        match self {
            Self::ThirtyYear => Level::ThirtyYear,
            Self::FiveYear { .. } => Level::FiveYear,
            Self::Year { .. } => Level::Year,
            Self::Quarter { .. } => Level::Quarter,
            Self::Month { .. } => Level::Month,
            Self::Week { .. } => Level::Week,
            Self::Day { .. } => Level::Day,
        }
    }

    /// Key for the day containing `date`.
    #[must_use]
    pub fn for_date(date: NaiveDate) -> Self {
        use chrono::Datelike;
        Self::Day {
            year: date.year(),
            month: date.month(),
            day: date.day(),
        }
    }

    /// The calendar date of a day key.
    #[must_use]
    pub fn date(&self) -> Option<NaiveDate> {
        match *self {
            Self::Day { year, month, day } => NaiveDate::from_ymd_opt(year, month, day),
            _ => None,
        }
    }

    /// Render the canonical string form.
    #[must_use]
    pub fn encode(&self) -> PeriodId {
        let prefix = self.level().prefix();
        let body = match *self {
            Self::ThirtyYear => return PeriodId(prefix.to_string()),
            Self::FiveYear { index } => format!("{index}"),
            Self::Year { year } => format!("{year:04}"),
            Self::Quarter { year, quarter } => format!("{year:04}-{quarter}"),
            Self::Month { year, month } => format!("{year:04}-{month:02}"),
            Self::Week { year, month, week } => format!("{year:04}-{month:02}-{week:02}"),
            Self::Day { year, month, day } => format!("{year:04}-{month:02}-{day:02}"),
        };
        PeriodId(format!("{prefix}-{body}"))
    }

    /// Parse an id, degrading to [`PeriodKey::ThirtyYear`] on any failure.
    ///
    /// Failures are logged at `warn` so malformed persisted ids are visible
    /// without aborting the caller.
    #[must_use]
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.parse() {
            Ok(key) => key,
            Err(err) => {
                tracing::warn!(id = raw, error = %err, "unreadable period id, treating as thirty-year root");
                Self::ThirtyYear
            }
        }
    }

    fn check_ranges(self, raw: &str) -> Result<Self, PeriodIdError> {
        let out_of_range = |field: &'static str| PeriodIdError::OutOfRange {
            id: raw.to_string(),
            field,
        };

        let year = match self {
            Self::ThirtyYear | Self::FiveYear { .. } => return Ok(self),
            Self::Year { year }
            | Self::Quarter { year, .. }
            | Self::Month { year, .. }
            | Self::Week { year, .. }
            | Self::Day { year, .. } => year,
        };
        if !(0..=MAX_YEAR).contains(&year) {
            return Err(out_of_range("year"));
        }

        match self {
            Self::Quarter { quarter, .. } if !(1..=4).contains(&quarter) => {
                Err(out_of_range("quarter"))
            }
            Self::Month { month, .. } if !(1..=12).contains(&month) => Err(out_of_range("month")),
            Self::Week { year, month, week } => {
                if !(1..=12).contains(&month) {
                    return Err(out_of_range("month"));
                }
                let weeks = calendar::weeks_in_month(year, month).len();
                if week == 0 || week as usize > weeks {
                    return Err(out_of_range("week"));
                }
                Ok(self)
            }
            Self::Day { .. } if self.date().is_none() => Err(out_of_range("day")),
            _ => Ok(self),
        }
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.encode().as_str())
    }
}

/// Errors from strict period id parsing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PeriodIdError {
    #[error("unknown period prefix in '{0}'")]
    UnknownPrefix(String),

    #[error("malformed period id '{id}': {reason}")]
    Malformed { id: String, reason: &'static str },

    #[error("period id '{id}' has {field} out of range")]
    OutOfRange { id: String, field: &'static str },

    #[error("period id '{id}' is not canonical (expected '{canonical}')")]
    NonCanonical { id: String, canonical: String },
}

impl FromStr for PeriodKey {
    type Err = PeriodIdError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        if raw == Level::ThirtyYear.prefix() {
            return Ok(Self::ThirtyYear);
        }

        let (prefix, body) = raw
            .split_once('-')
            .ok_or_else(|| PeriodIdError::UnknownPrefix(raw.to_string()))?;
        let level: Level = Level::ALL
            .into_iter()
            .find(|l| *l != Level::ThirtyYear && l.prefix() == prefix)
            .ok_or_else(|| PeriodIdError::UnknownPrefix(raw.to_string()))?;

        let parts: Vec<&str> = body.split('-').collect();
        let malformed = |reason: &'static str| PeriodIdError::Malformed {
            id: raw.to_string(),
            reason,
        };
        let expected_parts = match level {
            Level::ThirtyYear => 0,
            Level::FiveYear | Level::Year => 1,
            Level::Quarter | Level::Month => 2,
            Level::Week | Level::Day => 3,
        };
        if parts.len() != expected_parts {
            return Err(malformed("wrong number of coordinates"));
        }

        let number = |s: &str| -> Result<u32, PeriodIdError> {
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed("coordinate is not a number"));
            }
            s.parse::<u32>()
                .map_err(|_| malformed("coordinate does not fit"))
        };
        let year = |s: &str| -> Result<i32, PeriodIdError> {
            i32::try_from(number(s)?).map_err(|_| malformed("year does not fit"))
        };

        let key = match level {
            Level::ThirtyYear => Self::ThirtyYear,
            Level::FiveYear => Self::FiveYear {
                index: u8::try_from(number(parts[0])?)
                    .map_err(|_| malformed("five-year index does not fit"))?,
            },
            Level::Year => Self::Year {
                year: year(parts[0])?,
            },
            Level::Quarter => Self::Quarter {
                year: year(parts[0])?,
                quarter: number(parts[1])?,
            },
            Level::Month => Self::Month {
                year: year(parts[0])?,
                month: number(parts[1])?,
            },
            Level::Week => Self::Week {
                year: year(parts[0])?,
                month: number(parts[1])?,
                week: number(parts[2])?,
            },
            Level::Day => Self::Day {
                year: year(parts[0])?,
                month: number(parts[1])?,
                day: number(parts[2])?,
            },
        };

        let key = key.check_ranges(raw)?;
        let canonical = key.encode();
        if canonical.as_str() != raw {
            return Err(PeriodIdError::NonCanonical {
                id: raw.to_string(),
                canonical: canonical.0,
            });
        }
        Ok(key)
    }
}

/// String form of a period key, used as the map key of the period store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodId(String);

impl PeriodId {
    /// Wrap a raw string without validation.
    ///
    /// Use this for ids that come from persisted data; [`PeriodId::key`]
    /// degrades gracefully if the string turns out to be malformed.
    #[must_use]
    pub fn new_unchecked(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Decode the coordinates, falling back to the thirty-year root.
    #[must_use]
    pub fn key(&self) -> PeriodKey {
        PeriodKey::parse_lenient(&self.0)
    }

    #[must_use]
    pub fn level(&self) -> Level {
        self.key().level()
    }

    /// The thirty-year root id.
    #[must_use]
    pub fn root() -> Self {
        PeriodKey::ThirtyYear.encode()
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PeriodId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PeriodId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<PeriodKey> for PeriodId {
    fn from(key: PeriodKey) -> Self {
        key.encode()
    }
}

impl FromStr for PeriodId {
    type Err = PeriodIdError;

    /// Strict parse: only canonical, in-range ids are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<PeriodKey>().map(|key| key.encode())
    }
}
