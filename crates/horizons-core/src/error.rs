use std::fmt;

/// Machine-readable error codes for failures surfaced outside the engine.
///
/// The engine itself degrades to no-ops; these codes classify what the
/// CLI and the snapshot collaborator report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotInitialized,
    ConfigParseError,
    InvalidPeriodId,
    InvalidPlacement,
    ItemNotFound,
    InvalidTarget,
    InvalidEnumValue,
    SnapshotReadFailed,
    SnapshotCorrupt,
    SnapshotWriteFailed,
    LockContention,
    InternalUnexpected,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NotInitialized => "E1001",
            Self::ConfigParseError => "E1002",
            Self::InvalidPeriodId => "E2001",
            Self::InvalidPlacement => "E2002",
            Self::ItemNotFound => "E2003",
            Self::InvalidTarget => "E2004",
            Self::InvalidEnumValue => "E2005",
            Self::SnapshotReadFailed => "E3001",
            Self::SnapshotCorrupt => "E3002",
            Self::SnapshotWriteFailed => "E5001",
            Self::LockContention => "E5002",
            Self::InternalUnexpected => "E9001",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotInitialized => "Planner not initialized",
            Self::ConfigParseError => "Config file parse error",
            Self::InvalidPeriodId => "Invalid period id",
            Self::InvalidPlacement => "Invalid placement",
            Self::ItemNotFound => "Item not found",
            Self::InvalidTarget => "Target is not a child of the period",
            Self::InvalidEnumValue => "Invalid level/kind/slot value",
            Self::SnapshotReadFailed => "Snapshot read failed",
            Self::SnapshotCorrupt => "Snapshot is not valid JSON",
            Self::SnapshotWriteFailed => "Snapshot write failed",
            Self::LockContention => "Lock contention",
            Self::InternalUnexpected => "Internal unexpected error",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::NotInitialized => Some("Run `hz init` to create .horizons/ here."),
            Self::ConfigParseError => Some("Fix syntax in .horizons/config.toml and retry."),
            Self::InvalidPeriodId => {
                Some("Use 30y, 5y-<i>, y-<yyyy>, q-<yyyy>-<q>, m-<yyyy>-<mm>, w-<yyyy>-<mm>-<ww>, or d-<yyyy>-<mm>-<dd>.")
            }
            Self::InvalidPlacement => Some("Use todos, routines, slot:<period>, or time:<slot>."),
            Self::ItemNotFound => None,
            Self::InvalidTarget => Some("Run `hz nav children <period>` to list valid targets."),
            Self::InvalidEnumValue => Some("Use one of the documented level/kind/slot values."),
            Self::SnapshotReadFailed => Some("Check that the snapshot path exists and is readable."),
            Self::SnapshotCorrupt => {
                Some("Restore .horizons/snapshot.json from a backup or remove it to start fresh.")
            }
            Self::SnapshotWriteFailed => Some("Check disk space and write permissions."),
            Self::LockContention => Some("Retry after the other `hz` process releases its lock."),
            Self::InternalUnexpected => Some("Retry once. If persistent, report a bug with logs."),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
