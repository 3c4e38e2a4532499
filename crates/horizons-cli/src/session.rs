//! One load → mutate → save cycle over the planner snapshot.
//!
//! A session holds the state-directory lock for its whole lifetime, so two
//! `hz` processes never interleave their read-modify-write cycles.

use anyhow::{Context as _, Result};
use horizons_core::PlannerConfig;
use horizons_core::config::STATE_DIR;
use horizons_core::error::ErrorCode;
use horizons_core::ids::RandomIds;
use horizons_core::lock::{LOCK_FILE, LockMode, PlannerLock};
use horizons_core::{JsonFileStore, Planner, SnapshotStore};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::output::{self, OutputMode};

/// Environment override for the snapshot location.
pub const SNAPSHOT_ENV: &str = "HORIZONS_SNAPSHOT";

const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Resolve the snapshot path: `--snapshot`, then `HORIZONS_SNAPSHOT`, then
/// `<root>/.horizons/snapshot.json`.
pub fn snapshot_path(root: &Path, flag: Option<&Path>) -> PathBuf {
    flag.map(Path::to_path_buf)
        .or_else(|| std::env::var_os(SNAPSHOT_ENV).map(PathBuf::from))
        .unwrap_or_else(|| JsonFileStore::default_path(root))
}

/// What every command needs before it touches the snapshot.
#[derive(Debug, Clone)]
pub struct Context {
    pub root: PathBuf,
    pub snapshot: Option<PathBuf>,
    pub planner: PlannerConfig,
    pub output: OutputMode,
}

pub struct Session {
    pub planner: Planner,
    pub output: OutputMode,
    store: JsonFileStore,
    _lock: PlannerLock,
}

impl Session {
    /// Lock the state directory, load the snapshot, and restore the
    /// planner. Fails when `hz init` has not been run under `root`.
    pub fn open(ctx: &Context, mode: LockMode) -> Result<Self> {
        let output = ctx.output;
        let state_dir = ctx.root.join(STATE_DIR);
        if !state_dir.is_dir() {
            return Err(output::fail(
                output,
                ErrorCode::NotInitialized,
                state_dir.display().to_string(),
            ));
        }

        let lock = PlannerLock::acquire(&state_dir.join(LOCK_FILE), mode, LOCK_TIMEOUT)
            .map_err(|err| output::fail(output, err.code(), err.to_string()))?;

        let store = JsonFileStore::new(snapshot_path(&ctx.root, ctx.snapshot.as_deref()));
        let planner = match store
            .load()
            .map_err(|err| output::fail(output, err.code(), err.to_string()))?
        {
            Some(snapshot) => Planner::restore(ctx.planner.clone(), snapshot, Box::new(RandomIds)),
            None => Planner::new(ctx.planner.clone()),
        };
        tracing::debug!(path = %store.path().display(), ?mode, "session opened");

        Ok(Self {
            planner,
            output,
            store,
            _lock: lock,
        })
    }

    /// Persist the planner's full state.
    pub fn save(&self) -> Result<()> {
        self.store
            .save(&self.planner.snapshot())
            .map_err(|err| output::fail(self.output, err.code(), err.to_string()))
            .with_context(|| format!("saving {}", self.store.path().display()))
    }
}
