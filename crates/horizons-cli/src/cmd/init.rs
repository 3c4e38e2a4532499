use anyhow::{Context as _, Result};
use clap::Args;
use horizons_core::PlannerConfig;
use horizons_core::config::{self, STATE_DIR};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Force re-initialization even if `.horizons/` already exists.
    #[arg(long)]
    pub force: bool,

    /// First year of the thirty-year horizon (default: the current year).
    #[arg(long)]
    pub base_year: Option<i32>,
}

const GITIGNORE: &str = "lock\n*.tmp\n";

#[derive(Debug, Serialize)]
struct InitReport {
    state_dir: PathBuf,
    config: PathBuf,
    base_year: i32,
}

/// Execute `hz init`. Creates the state directory:
///
/// ```text
/// .horizons/
///   config.toml   (planner config with defaults filled in)
///   .gitignore    (lock file and temp snapshots)
/// ```
///
/// The snapshot itself is written by the first mutating command.
///
/// # Errors
///
/// Returns an error if `.horizons/` already exists and `--force` is not set,
/// or if any filesystem operation fails.
pub fn run_init(args: &InitArgs, output: OutputMode, project_root: &Path) -> Result<()> {
    let state_dir = project_root.join(STATE_DIR);

    if state_dir.exists() && !args.force {
        anyhow::bail!(".horizons/ already exists. Use `hz init --force` to reinitialize.");
    }

    std::fs::create_dir_all(&state_dir)
        .with_context(|| format!("Failed to create {}", state_dir.display()))?;

    let mut planner_config = PlannerConfig::default();
    if let Some(year) = args.base_year {
        planner_config.calendar.base_year = year;
    }
    let config_path = config::write_planner_config(project_root, &planner_config)?;
    let gitignore = state_dir.join(".gitignore");
    std::fs::write(&gitignore, GITIGNORE)
        .with_context(|| format!("Failed to write {}", gitignore.display()))?;

    tracing::info!(path = %state_dir.display(), "initialized planner");
    let report = InitReport {
        state_dir,
        config: config_path,
        base_year: planner_config.calendar.base_year,
    };
    render(output, &report, |r, w| {
        writeln!(
            w,
            "Initialized horizons planner in {} (base year {})",
            r.state_dir.display(),
            r.base_year
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_config_and_refuses_second_run() {
        let dir = tempfile::tempdir().expect("tempdir");
        let args = InitArgs {
            force: false,
            base_year: Some(2024),
        };
        run_init(&args, OutputMode::Text, dir.path()).expect("first init");

        let loaded = config::load_planner_config(dir.path()).expect("config");
        assert_eq!(loaded.calendar.base_year, 2024);
        assert!(run_init(&args, OutputMode::Text, dir.path()).is_err());

        let forced = InitArgs {
            force: true,
            base_year: None,
        };
        run_init(&forced, OutputMode::Text, dir.path()).expect("forced init");
    }
}
