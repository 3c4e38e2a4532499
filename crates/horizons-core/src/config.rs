use anyhow::{Context, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::{Path, PathBuf};

/// Directory under the planner root holding config, snapshot, and lock.
pub const STATE_DIR: &str = ".horizons";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub completion: CompletionConfig,
    #[serde(default)]
    pub routines: RoutineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// First year of the thirty-year horizon.
    #[serde(default = "default_base_year")]
    pub base_year: i32,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            base_year: default_base_year(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionConfig {
    /// Force a completion toggle onto every descendant.
    #[serde(default = "default_true")]
    pub cascade_down: bool,
    /// Recompute ancestors after a completion toggle.
    #[serde(default = "default_true")]
    pub bubble_up: bool,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            cascade_down: default_true(),
            bubble_up: default_true(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineConfig {
    /// Refill quota routines when a period is entered.
    #[serde(default = "default_true")]
    pub auto_reset: bool,
}

impl Default for RoutineConfig {
    fn default() -> Self {
        Self {
            auto_reset: default_true(),
        }
    }
}

/// Per-user settings from `~/.config/horizons/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub planner: PlannerConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

#[must_use]
pub fn config_path(root: &Path) -> PathBuf {
    root.join(STATE_DIR).join("config.toml")
}

pub fn load_planner_config(root: &Path) -> Result<PlannerConfig> {
    let path = config_path(root);
    if !path.exists() {
        return Ok(PlannerConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<PlannerConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Write `config` to `<root>/.horizons/config.toml`, creating the directory.
pub fn write_planner_config(root: &Path, config: &PlannerConfig) -> Result<PathBuf> {
    let path = config_path(root);
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create {}", dir.display()))?;
    }
    let body = toml::to_string_pretty(config).context("Failed to serialize planner config")?;
    std::fs::write(&path, body).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("horizons/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn resolve_config(root: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let planner = load_planner_config(root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(cli_json, user.output.as_deref(), env_format.as_deref());

    Ok(EffectiveConfig {
        planner,
        user,
        resolved_output,
    })
}

fn resolve_output(cli_json: bool, user_output: Option<&str>, env_format: Option<&str>) -> String {
    fn normalize_output_mode(raw: &str) -> Option<&'static str> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pretty" | "human" => Some("pretty"),
            "text" | "plain" => Some("text"),
            "json" => Some("json"),
            _ => None,
        }
    }

    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if std::io::stdout().is_terminal() {
        "pretty".to_string()
    } else {
        "text".to_string()
    }
}

const fn default_true() -> bool {
    true
}

fn default_base_year() -> i32 {
    chrono::Local::now().year()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_planner_config_uses_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let cfg = load_planner_config(root.path()).expect("load should succeed");
        assert!(cfg.completion.cascade_down);
        assert!(cfg.completion.bubble_up);
        assert!(cfg.routines.auto_reset);
        assert_eq!(cfg.calendar.base_year, chrono::Local::now().year());
    }

    #[test]
    fn partial_config_keeps_other_defaults() {
        let root = tempfile::tempdir().expect("temp dir");
        let dir = root.path().join(STATE_DIR);
        std::fs::create_dir_all(&dir).expect("create state dir");
        std::fs::write(
            dir.join("config.toml"),
            "[calendar]\nbase_year = 2020\n\n[completion]\nbubble_up = false\n",
        )
        .expect("write config");

        let cfg = load_planner_config(root.path()).expect("load should succeed");
        assert_eq!(cfg.calendar.base_year, 2020);
        assert!(cfg.completion.cascade_down);
        assert!(!cfg.completion.bubble_up);
        assert!(cfg.routines.auto_reset);
    }

    #[test]
    fn malformed_config_reports_path() {
        let root = tempfile::tempdir().expect("temp dir");
        let dir = root.path().join(STATE_DIR);
        std::fs::create_dir_all(&dir).expect("create state dir");
        std::fs::write(dir.join("config.toml"), "[calendar\nbase_year = ").expect("write");

        let err = load_planner_config(root.path()).expect_err("parse must fail");
        assert!(err.to_string().contains("config.toml"));
    }

    #[test]
    fn written_config_loads_back() {
        let root = tempfile::tempdir().expect("temp dir");
        let mut cfg = PlannerConfig::default();
        cfg.calendar.base_year = 2031;
        cfg.routines.auto_reset = false;

        write_planner_config(root.path(), &cfg).expect("write");
        assert_eq!(load_planner_config(root.path()).expect("load"), cfg);
    }

    #[test]
    fn cli_json_overrides_env_and_config() {
        assert_eq!(resolve_output(true, Some("pretty"), Some("text")), "json");
    }

    #[test]
    fn env_beats_user_config_and_aliases_normalize() {
        assert_eq!(resolve_output(false, Some("json"), Some("human")), "pretty");
        assert_eq!(resolve_output(false, Some("plain"), Some("bogus")), "text");
    }
}
