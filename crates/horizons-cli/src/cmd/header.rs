//! `hz header`: set a period's goal, motto, and memo.

use anyhow::Result;
use clap::Args;
use horizons_core::PeriodId;
use horizons_core::lock::LockMode;

use crate::output::render_success;
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct HeaderArgs {
    pub period: PeriodId,

    #[arg(long)]
    pub goal: Option<String>,

    #[arg(long)]
    pub motto: Option<String>,

    /// Replace the period's free-form memo.
    #[arg(long)]
    pub memo: Option<String>,

    /// Append a memo record that descendants inherit.
    #[arg(long)]
    pub append_memo: Option<String>,
}

pub fn run_header(args: &HeaderArgs, ctx: &Context) -> Result<()> {
    let mut session = Session::open(ctx, LockMode::Exclusive)?;
    let planner = &mut session.planner;
    let period = &args.period;

    let mut changed = false;
    if let Some(goal) = &args.goal {
        changed |= planner.set_goal(period, goal);
    }
    if let Some(motto) = &args.motto {
        changed |= planner.set_motto(period, motto);
    }
    if let Some(memo) = &args.memo {
        changed |= planner.set_memo(period, memo);
    }
    if let Some(text) = &args.append_memo {
        changed |= planner.add_memo(period, text);
    }

    if changed {
        session.save()?;
        render_success(session.output, &format!("Updated {period}"))
    } else {
        render_success(session.output, &format!("{period} unchanged"))
    }
}
