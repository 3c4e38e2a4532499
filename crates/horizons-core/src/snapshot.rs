//! Whole-state snapshots and the persistence collaborator seam.
//!
//! The engine never performs I/O during a mutation. A higher layer takes a
//! [`Snapshot`] after a mutation completes and hands it to a
//! [`SnapshotStore`]; on startup it loads one and rebuilds a planner from it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::STATE_DIR;
use crate::error::ErrorCode;
use crate::model::{Item, ItemId, Period};
use crate::period::PeriodId;

/// Full planner state: `{ periods, items, records, annual_events }`.
///
/// `records` and `annual_events` belong to collaborators outside the engine
/// and are carried through untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub periods: BTreeMap<PeriodId, Period>,
    #[serde(default)]
    pub items: BTreeMap<ItemId, Item>,
    #[serde(default)]
    pub records: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub annual_events: Vec<serde_json::Value>,
}

impl Snapshot {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
            && self.items.is_empty()
            && self.records.is_empty()
            && self.annual_events.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("failed to read snapshot {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to write snapshot {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
    #[error("snapshot {} is not valid: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),
}

impl SnapshotError {
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Read { .. } => ErrorCode::SnapshotReadFailed,
            Self::Corrupt { .. } => ErrorCode::SnapshotCorrupt,
            Self::Write { .. } => ErrorCode::SnapshotWriteFailed,
            Self::Encode(_) => ErrorCode::InternalUnexpected,
        }
    }
}

/// Persistence collaborator: accepts and returns whole snapshots.
pub trait SnapshotStore {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Snapshot>, SnapshotError>;

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError>;
}

/// Pretty-printed JSON file, replaced atomically on save.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<root>/.horizons/snapshot.json`.
    #[must_use]
    pub fn default_path(root: &Path) -> PathBuf {
        root.join(STATE_DIR).join("snapshot.json")
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self) -> Result<Option<Snapshot>, SnapshotError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SnapshotError::Read {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        let snapshot =
            serde_json::from_str(&content).map_err(|source| SnapshotError::Corrupt {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(path = %self.path.display(), "loaded snapshot");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> Result<(), SnapshotError> {
        let write_err = |source| SnapshotError::Write {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(write_err)?;
        }
        let body = serde_json::to_string_pretty(snapshot).map_err(SnapshotError::Encode)?;

        let temp = self.temp_path();
        fs::write(&temp, body).map_err(write_err)?;
        fs::rename(&temp, &self.path).map_err(write_err)?;

        tracing::debug!(
            path = %self.path.display(),
            periods = snapshot.periods.len(),
            items = snapshot.items.len(),
            "saved snapshot"
        );
        Ok(())
    }
}
