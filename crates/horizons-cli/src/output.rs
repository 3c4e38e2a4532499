//! Shared output layer for pretty/text/JSON parity across all CLI commands.
//!
//! # Output mode resolution
//!
//! Precedence (highest wins):
//! 1. `--format` / hidden `--json` flag
//! 2. `FORMAT` env var → `"pretty"` | `"text"` | `"json"`
//! 3. `output` in `~/.config/horizons/config.toml`
//! 4. Default: [`OutputMode::Pretty`] if stdout is a TTY; [`OutputMode::Text`] if piped.
//!
//! Steps 2 to 4 are resolved by `horizons_core::config::resolve_config`;
//! this module only layers the flags on top.

use clap::ValueEnum;
use horizons_core::error::ErrorCode;
use serde::Serialize;
use std::io::{self, Write};

/// Shared width for human pretty separators.
pub const PRETTY_RULE_WIDTH: usize = 72;

/// Write a horizontal separator used by pretty human output.
pub fn pretty_rule(w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{:-<width$}", "", width = PRETTY_RULE_WIDTH)
}

/// Write a section heading followed by a separator.
pub fn pretty_section(w: &mut dyn Write, heading: &str) -> io::Result<()> {
    writeln!(w, "{heading}")?;
    pretty_rule(w)
}

/// Render a left-aligned key/value line in human output.
pub fn pretty_kv(w: &mut dyn Write, key: &str, value: impl AsRef<str>) -> io::Result<()> {
    writeln!(w, "{:<12} {}", format!("{key}:"), value.as_ref())
}

/// The three output modes supported by the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Human-optimized output (sections, visual framing).
    Pretty,
    /// Token-efficient plain text for scripts and pipes.
    Text,
    /// Machine-readable JSON.
    Json,
}

impl OutputMode {
    /// Returns `true` if JSON output was requested.
    pub const fn is_json(self) -> bool {
        matches!(self, Self::Json)
    }

    /// Map a resolved mode name; unknown names fall back to text.
    fn from_name(name: &str) -> Self {
        match name {
            "json" => Self::Json,
            "pretty" => Self::Pretty,
            _ => Self::Text,
        }
    }
}

/// Layer the CLI flags over the mode resolved from env and user config.
pub fn resolve_output_mode(
    format_flag: Option<OutputMode>,
    json_flag: bool,
    resolved: &str,
) -> OutputMode {
    if let Some(mode) = format_flag {
        return mode;
    }
    if json_flag {
        return OutputMode::Json;
    }
    OutputMode::from_name(resolved)
}

/// Render a serializable value with explicit pretty/text renderers.
pub fn render_mode<T: Serialize + ?Sized>(
    mode: OutputMode,
    value: &T,
    text_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
    pretty_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Text => text_fn(value, &mut out)?,
        OutputMode::Pretty => pretty_fn(value, &mut out)?,
    }
    Ok(())
}

/// Render a serializable value; pretty and text share one renderer.
pub fn render<T: Serialize + ?Sized>(
    mode: OutputMode,
    value: &T,
    human_fn: impl FnOnce(&T, &mut dyn Write) -> io::Result<()>,
) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            serde_json::to_writer_pretty(&mut out, value)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => human_fn(value, &mut out)?,
    }
    Ok(())
}

/// A structured error with optional suggestion and error code.
#[derive(Debug, Serialize)]
pub struct CliError {
    /// Human-readable error message.
    pub message: String,
    /// Optional suggestion for how to fix the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    /// Machine-readable error code (e.g. "E2003").
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
}

impl CliError {
    /// An error classified by `code`; `detail` is appended to the code's
    /// summary.
    pub fn from_code(code: ErrorCode, detail: impl AsRef<str>) -> Self {
        let detail = detail.as_ref();
        let message = if detail.is_empty() {
            code.message().to_string()
        } else {
            format!("{}: {detail}", code.message())
        };
        Self {
            message,
            suggestion: code.hint().map(str::to_string),
            error_code: Some(code.code().to_string()),
        }
    }
}

/// Render an error to stderr in the requested format.
pub fn render_error(mode: OutputMode, error: &CliError) -> anyhow::Result<()> {
    let stderr = io::stderr();
    let mut out = stderr.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "error": error,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "error: {}", error.message)?;
            if let Some(ref suggestion) = error.suggestion {
                writeln!(out, "  suggestion: {suggestion}")?;
            }
        }
    }
    Ok(())
}

/// Render a coded error and turn it into the command's failure.
pub fn fail(mode: OutputMode, code: ErrorCode, detail: impl AsRef<str>) -> anyhow::Error {
    let error = CliError::from_code(code, detail);
    if let Err(render_err) = render_error(mode, &error) {
        tracing::warn!(error = %render_err, "failed to render error");
    }
    anyhow::anyhow!("{} ({})", error.message, code.code())
}

/// Render a success message to stdout.
pub fn render_success(mode: OutputMode, message: &str) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match mode {
        OutputMode::Json => {
            let wrapper = serde_json::json!({
                "ok": true,
                "message": message,
            });
            serde_json::to_writer_pretty(&mut out, &wrapper)?;
            writeln!(out)?;
        }
        OutputMode::Pretty | OutputMode::Text => {
            writeln!(out, "✓ {message}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_flag_wins_over_json_and_resolved() {
        let mode = resolve_output_mode(Some(OutputMode::Text), true, "pretty");
        assert_eq!(mode, OutputMode::Text);
    }

    #[test]
    fn json_flag_wins_over_resolved() {
        assert_eq!(resolve_output_mode(None, true, "pretty"), OutputMode::Json);
    }

    #[test]
    fn resolved_name_is_used_without_flags() {
        assert_eq!(resolve_output_mode(None, false, "pretty"), OutputMode::Pretty);
        assert_eq!(resolve_output_mode(None, false, "json"), OutputMode::Json);
        assert_eq!(resolve_output_mode(None, false, "text"), OutputMode::Text);
        assert_eq!(resolve_output_mode(None, false, "bogus"), OutputMode::Text);
    }

    #[test]
    fn cli_error_from_code_carries_code_and_hint() {
        let err = CliError::from_code(ErrorCode::ItemNotFound, "t9");
        assert_eq!(err.error_code.as_deref(), Some("E2003"));
        assert!(err.message.ends_with(": t9"));
        assert_eq!(
            err.suggestion.as_deref(),
            ErrorCode::ItemNotFound.hint()
        );
    }

    #[test]
    fn cli_error_json_skips_missing_fields() {
        let err = CliError {
            message: "boom".to_string(),
            suggestion: None,
            error_code: None,
        };
        let json = serde_json::to_value(&err).expect("serialize");
        assert_eq!(json, serde_json::json!({ "message": "boom" }));
    }

    #[test]
    fn pretty_kv_pads_keys() {
        let mut buf = Vec::new();
        pretty_kv(&mut buf, "goal", "ship").expect("write");
        assert_eq!(String::from_utf8(buf).expect("utf8"), "goal:        ship\n");
    }
}
