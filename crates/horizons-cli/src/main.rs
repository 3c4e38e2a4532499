#![forbid(unsafe_code)]

mod cmd;
mod output;
mod session;

use clap::{CommandFactory, Parser, Subcommand};
use horizons_core::config;
use horizons_core::error::ErrorCode;
use output::OutputMode;
use std::env;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::session::Context;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "hz: a seven-level planner from thirty years down to a day",
    long_about = None
)]
struct Cli {
    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON output instead of human-readable text.
    #[arg(long, global = true)]
    json: bool,

    /// Output format; overrides `--json`, `FORMAT`, and the user config.
    #[arg(long, global = true, value_enum)]
    format: Option<OutputMode>,

    /// Snapshot file (default: `$HORIZONS_SNAPSHOT`, then `.horizons/snapshot.json`).
    #[arg(long, global = true)]
    snapshot: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    #[command(
        next_help_heading = "Setup",
        about = "Initialize a planner",
        long_about = "Initialize a planner in the current directory.",
        after_help = "EXAMPLES:\n    # Start the horizon at the current year\n    hz init\n\n    # Start the horizon at 2020\n    hz init --base-year 2020"
    )]
    Init(cmd::init::InitArgs),

    #[command(
        next_help_heading = "Setup",
        about = "Generate shell completions",
        after_help = "EXAMPLES:\n    hz completions bash > ~/.local/share/bash-completion/completions/hz"
    )]
    Completions(cmd::completions::CompletionsArgs),

    #[command(
        next_help_heading = "Browse",
        about = "Show a period",
        long_about = "Show a period's headers, memos, lists, and slots. Refreshes quota routines unless --peek is given.",
        after_help = "EXAMPLES:\n    hz period m-2026-03\n\n    # Read-only\n    hz period d-2026-03-31 --peek --json"
    )]
    Period(cmd::period::PeriodArgs),

    #[command(
        next_help_heading = "Browse",
        about = "Show one item",
        after_help = "EXAMPLES:\n    hz show 3fa9c2d1"
    )]
    Show(cmd::show::ShowArgs),

    #[command(
        next_help_heading = "Browse",
        about = "Navigate the period hierarchy",
        after_help = "EXAMPLES:\n    hz nav children y-2026\n\n    hz nav ancestors d-2026-03-31"
    )]
    Nav(cmd::nav::NavArgs),

    #[command(
        next_help_heading = "Browse",
        about = "List the weeks of a month",
        after_help = "EXAMPLES:\n    hz weeks 2026 3"
    )]
    Weeks(cmd::weeks::WeeksArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Add a todo or routine to a period",
        after_help = "EXAMPLES:\n    hz add y-2026 \"Finish the novel\"\n\n    hz add w-2026-03-02 Gym --routine --target 3\n\n    hz add d-2026-03-31 Stretch --time dawn"
    )]
    Add(cmd::add::AddArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Split an item into a sub-item",
        after_help = "EXAMPLES:\n    hz sub m-2026-03 3fa9c2d1 \"chapter one\""
    )]
    Sub(cmd::sub::SubArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Break an item down into a child period",
        after_help = "EXAMPLES:\n    hz assign m-2026-03 3fa9c2d1 w-2026-03-02\n\n    hz assign m-2026-03 3fa9c2d1 w-2026-03-02 --sub outline"
    )]
    Assign(cmd::assign::AssignArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Move an item between containers of a period",
        after_help = "EXAMPLES:\n    hz move m-2026-03 9b1e0a7c --from slot:w-2026-03-02 --to slot:w-2026-03-03"
    )]
    Move(cmd::move_cmd::MoveArgs),

    #[command(
        next_help_heading = "Plan",
        about = "Set a period's goal, motto, or memo",
        after_help = "EXAMPLES:\n    hz header y-2026 --goal \"Write every day\"\n\n    hz header q-2026-1 --append-memo \"Taxes due in April\""
    )]
    Header(cmd::header::HeaderArgs),

    #[command(
        next_help_heading = "Track",
        about = "Mark an item done",
        after_help = "EXAMPLES:\n    hz done 3fa9c2d1"
    )]
    Done(cmd::done::DoneArgs),

    #[command(
        next_help_heading = "Track",
        about = "Mark an item open again",
        after_help = "EXAMPLES:\n    hz undone 3fa9c2d1"
    )]
    Undone(cmd::done::DoneArgs),

    #[command(
        next_help_heading = "Track",
        about = "Edit an item",
        after_help = "EXAMPLES:\n    hz edit 3fa9c2d1 --content \"Finish the book\"\n\n    # Clear a color\n    hz edit 3fa9c2d1 --color \"\""
    )]
    Edit(cmd::edit::EditArgs),

    #[command(
        next_help_heading = "Track",
        about = "Delete an item and its subtree",
        after_help = "EXAMPLES:\n    hz delete 3fa9c2d1"
    )]
    Delete(cmd::delete::DeleteArgs),

    #[command(
        next_help_heading = "Track",
        about = "Refill routines whose reset period has passed",
        after_help = "EXAMPLES:\n    hz reset w-2026-03-09"
    )]
    Reset(cmd::reset::ResetArgs),
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HORIZONS_LOG").unwrap_or_else(|_| {
        EnvFilter::new(if env::var("DEBUG").is_ok() {
            "horizons=debug,info"
        } else {
            "horizons=info,warn"
        })
    });

    let format = env::var("HORIZONS_LOG_FORMAT").unwrap_or_else(|_| "compact".to_string());

    let registry = tracing_subscriber::registry().with(filter);

    match format.as_str() {
        "json" => {
            registry
                .with(fmt::layer().json().with_ansi(false).with_writer(std::io::stderr))
                .init();
        }
        _ => {
            registry
                .with(fmt::layer().compact().with_writer(std::io::stderr))
                .init();
        }
    }
}

fn build_context(cli: &Cli, root: PathBuf) -> anyhow::Result<Context> {
    let fallback = output::resolve_output_mode(cli.format, cli.json, "");
    let effective = config::resolve_config(&root, cli.json)
        .map_err(|err| output::fail(fallback, ErrorCode::ConfigParseError, format!("{err:#}")))?;
    Ok(Context {
        root,
        snapshot: cli.snapshot.clone(),
        planner: effective.planner,
        output: output::resolve_output_mode(cli.format, cli.json, &effective.resolved_output),
    })
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = Cli::parse();
    if cli.verbose {
        info!("Verbose mode enabled");
    }

    let project_root = env::current_dir()?;

    match &cli.command {
        Commands::Init(args) => {
            let output = output::resolve_output_mode(cli.format, cli.json, "");
            return cmd::init::run_init(args, output, &project_root);
        }
        Commands::Completions(args) => {
            cmd::completions::run_completions(args, &mut Cli::command());
            return Ok(());
        }
        _ => {}
    }

    let ctx = build_context(&cli, project_root)?;
    match &cli.command {
        Commands::Init(_) | Commands::Completions(_) => Ok(()),
        Commands::Period(args) => cmd::period::run_period(args, &ctx),
        Commands::Show(args) => cmd::show::run_show(args, &ctx),
        Commands::Nav(args) => cmd::nav::run_nav(args, &ctx),
        Commands::Weeks(args) => cmd::weeks::run_weeks(args, ctx.output),
        Commands::Add(args) => cmd::add::run_add(args, &ctx),
        Commands::Sub(args) => cmd::sub::run_sub(args, &ctx),
        Commands::Assign(args) => cmd::assign::run_assign(args, &ctx),
        Commands::Move(args) => cmd::move_cmd::run_move(args, &ctx),
        Commands::Header(args) => cmd::header::run_header(args, &ctx),
        Commands::Done(args) => cmd::done::run_set_completed(args, true, &ctx),
        Commands::Undone(args) => cmd::done::run_set_completed(args, false, &ctx),
        Commands::Edit(args) => cmd::edit::run_edit(args, &ctx),
        Commands::Delete(args) => cmd::delete::run_delete(args, &ctx),
        Commands::Reset(args) => cmd::reset::run_reset(args, &ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_flag_parses_after_subcommand() {
        let cli = Cli::parse_from(["hz", "period", "m-2026-03", "--json"]);
        assert!(cli.json);
        assert!(matches!(cli.command, Commands::Period(_)));
    }

    #[test]
    fn format_flag_wins_over_json() {
        let cli = Cli::parse_from(["hz", "--json", "--format", "text", "weeks", "2026", "3"]);
        assert_eq!(
            output::resolve_output_mode(cli.format, cli.json, "pretty"),
            OutputMode::Text
        );
    }

    #[test]
    fn snapshot_flag_parsed() {
        let cli = Cli::parse_from(["hz", "--snapshot", "/tmp/plan.json", "show", "a1"]);
        assert_eq!(cli.snapshot, Some(PathBuf::from("/tmp/plan.json")));
    }

    #[test]
    fn done_and_undone_share_args() {
        let cli = Cli::parse_from(["hz", "undone", "a1"]);
        assert!(matches!(cli.command, Commands::Undone(ref a) if a.id == "a1"));
    }

    #[test]
    fn invalid_period_id_is_rejected() {
        assert!(Cli::try_parse_from(["hz", "period", "m-2026-13"]).is_err());
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }
}
