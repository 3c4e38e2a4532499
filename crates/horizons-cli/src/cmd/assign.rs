//! `hz assign`: break an item down into a child period.

use anyhow::Result;
use clap::Args;
use horizons_core::error::ErrorCode;
use horizons_core::lock::LockMode;
use horizons_core::{ItemId, PeriodId};

use crate::output::{self, render};
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct AssignArgs {
    /// Period that lists the source item.
    pub period: PeriodId,

    /// Item to break down.
    pub item: String,

    /// Child period receiving the work, e.g. a week of the month.
    pub target: PeriodId,

    /// Detail appended to the label as `"<label>: <detail>"`.
    #[arg(long = "sub")]
    pub sub_content: Option<String>,
}

pub fn run_assign(args: &AssignArgs, ctx: &Context) -> Result<()> {
    let mut session = Session::open(ctx, LockMode::Exclusive)?;
    let source = ItemId::new(args.item.as_str());

    if session.planner.item(&source).is_none() {
        return Err(output::fail(
            session.output,
            ErrorCode::ItemNotFound,
            source.as_str(),
        ));
    }
    let Some(assignment) = session.planner.assign_to_slot(
        &args.period,
        &source,
        &args.target,
        args.sub_content.as_deref(),
    ) else {
        return Err(output::fail(
            session.output,
            ErrorCode::InvalidTarget,
            format!("{} under {}", args.target, args.period),
        ));
    };
    session.save()?;

    render(session.output, &assignment, |a, w| {
        writeln!(
            w,
            "{} -> {} (slot {}, todo {})",
            source, args.target, a.slot_item_id, a.propagated_item_id
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assign_args_parse_sub() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: AssignArgs,
        }
        let w = Wrapper::parse_from(["test", "m-2026-03", "x1", "w-2026-03-02", "--sub", "draft"]);
        assert_eq!(w.args.target.as_str(), "w-2026-03-02");
        assert_eq!(w.args.sub_content.as_deref(), Some("draft"));
    }
}
