use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The seven nested planning horizons, coarsest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    ThirtyYear,
    FiveYear,
    Year,
    Quarter,
    Month,
    Week,
    Day,
}

impl Level {
    /// Every level, coarsest first.
    pub const ALL: [Self; 7] = [
        Self::ThirtyYear,
        Self::FiveYear,
        Self::Year,
        Self::Quarter,
        Self::Month,
        Self::Week,
        Self::Day,
    ];

    const fn as_str(self) -> &'static str {
        match self {
            Self::ThirtyYear => "thirty_year",
            Self::FiveYear => "five_year",
            Self::Year => "year",
            Self::Quarter => "quarter",
            Self::Month => "month",
            Self::Week => "week",
            Self::Day => "day",
        }
    }

    /// Textual prefix used by the period id codec.
    #[must_use]
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::ThirtyYear => "30y",
            Self::FiveYear => "5y",
            Self::Year => "y",
            Self::Quarter => "q",
            Self::Month => "m",
            Self::Week => "w",
            Self::Day => "d",
        }
    }

    /// The next finer level, `None` for days.
    #[must_use]
    pub const fn child(self) -> Option<Self> {
        match self {
            Self::ThirtyYear => Some(Self::FiveYear),
            Self::FiveYear => Some(Self::Year),
            Self::Year => Some(Self::Quarter),
            Self::Quarter => Some(Self::Month),
            Self::Month => Some(Self::Week),
            Self::Week => Some(Self::Day),
            Self::Day => None,
        }
    }

    /// The next coarser level, `None` for the thirty-year root.
    #[must_use]
    pub const fn parent(self) -> Option<Self> {
        match self {
            Self::ThirtyYear => None,
            Self::FiveYear => Some(Self::ThirtyYear),
            Self::Year => Some(Self::FiveYear),
            Self::Quarter => Some(Self::Year),
            Self::Month => Some(Self::Quarter),
            Self::Week => Some(Self::Month),
            Self::Day => Some(Self::Week),
        }
    }

    /// Depth from the root: 0 for thirty-year, 6 for day.
    #[must_use]
    pub const fn depth(self) -> usize {
        self as usize
    }

    /// True when `self` is strictly finer than `other`.
    #[must_use]
    pub fn is_finer_than(self, other: Self) -> bool {
        self > other
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a [`Level`] from text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid level: '{0}'")]
pub struct ParseLevelError(pub String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "thirty_year" | "30y" => Ok(Self::ThirtyYear),
            "five_year" | "5y" => Ok(Self::FiveYear),
            "year" | "y" => Ok(Self::Year),
            "quarter" | "q" => Ok(Self::Quarter),
            "month" | "m" => Ok(Self::Month),
            "week" | "w" => Ok(Self::Week),
            "day" | "d" => Ok(Self::Day),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
