//! `hz move`: move an item between containers of one period.

use anyhow::Result;
use clap::Args;
use horizons_core::error::ErrorCode;
use horizons_core::lock::LockMode;
use horizons_core::{ItemId, PeriodId, Placement};

use crate::output::{self, render_success};
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct MoveArgs {
    pub period: PeriodId,

    pub item: String,

    /// Current container (`todos`, `routines`, `slot:<period>`, `time:<slot>`).
    #[arg(long)]
    pub from: Placement,

    /// Destination container.
    #[arg(long)]
    pub to: Placement,
}

pub fn run_move(args: &MoveArgs, ctx: &Context) -> Result<()> {
    let mut session = Session::open(ctx, LockMode::Exclusive)?;
    let id = ItemId::new(args.item.as_str());

    if !session
        .planner
        .move_between_slots(&args.period, &id, &args.from, &args.to)
    {
        return Err(output::fail(
            session.output,
            ErrorCode::InvalidPlacement,
            format!("{id} from {} to {} in {}", args.from, args.to, args.period),
        ));
    }
    session.save()?;
    render_success(session.output, &format!("Moved {id} to {}", args.to))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn move_args_parse_placements() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: MoveArgs,
        }
        let w = Wrapper::parse_from([
            "test",
            "m-2026-03",
            "x1",
            "--from",
            "slot:w-2026-03-02",
            "--to",
            "slot:w-2026-03-03",
        ]);
        assert!(matches!(w.args.from, Placement::Slot(_)));
        assert!(Wrapper::try_parse_from(["test", "m-2026-03", "x1", "--from", "nowhere", "--to", "todos"]).is_err());
    }
}
