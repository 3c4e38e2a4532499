//! `hz add`: create a root todo or routine in a period.

use anyhow::Result;
use clap::Args;
use horizons_core::error::ErrorCode;
use horizons_core::lock::LockMode;
use horizons_core::{NewItem, PeriodId, Placement, TimeSlot};

use crate::cmd::{ItemView, require_item, write_item_line};
use crate::output::{self, render};
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Period to add the item to.
    pub period: PeriodId,

    /// Item label.
    pub content: String,

    /// Create a routine instead of a todo.
    #[arg(long)]
    pub routine: bool,

    /// Quota per reset bucket (routines only).
    #[arg(long, requires = "routine")]
    pub target: Option<u32>,

    /// Container: `todos`, `routines`, `slot:<child period>`, or `time:<slot>`.
    /// Defaults to `routines` for routines and `todos` otherwise.
    #[arg(long, conflicts_with = "time")]
    pub placement: Option<Placement>,

    /// Shorthand for `--placement time:<slot>` on a day.
    #[arg(long)]
    pub time: Option<TimeSlot>,

    #[arg(long)]
    pub note: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub category: Option<String>,
}

impl AddArgs {
    fn new_item(&self) -> NewItem {
        let mut new = if self.routine {
            NewItem::routine(&self.content, self.target)
        } else {
            NewItem::todo(&self.content)
        };
        new.note.clone_from(&self.note);
        new.color.clone_from(&self.color);
        new.category.clone_from(&self.category);
        new
    }

    fn placement(&self) -> Placement {
        if let Some(slot) = self.time {
            return Placement::Time(slot);
        }
        self.placement.clone().unwrap_or(if self.routine {
            Placement::Routines
        } else {
            Placement::Todos
        })
    }
}

pub fn run_add(args: &AddArgs, ctx: &Context) -> Result<()> {
    if args.content.trim().is_empty() {
        anyhow::bail!("item content must not be empty");
    }
    let mut session = Session::open(ctx, LockMode::Exclusive)?;
    let placement = args.placement();

    let Some(id) = session
        .planner
        .add_item(&args.period, args.new_item(), placement.clone())
    else {
        return Err(output::fail(
            session.output,
            ErrorCode::InvalidPlacement,
            format!("{placement} in {}", args.period),
        ));
    };
    session.save()?;

    let item = require_item(&session.planner, &id, session.output)?;
    let view = ItemView::new(&session.planner, item);
    render(session.output, &view, |v, w| write_item_line(w, "", v))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Wrapper {
        #[command(flatten)]
        args: AddArgs,
    }

    #[test]
    fn defaults_to_todos() {
        let w = Wrapper::parse_from(["test", "y-2026", "Read more"]);
        assert_eq!(w.args.placement(), Placement::Todos);
        assert_eq!(w.args.new_item().content, "Read more");
    }

    #[test]
    fn routine_with_target_defaults_to_routines() {
        let w = Wrapper::parse_from(["test", "w-2026-03-02", "Gym", "--routine", "--target", "3"]);
        assert_eq!(w.args.placement(), Placement::Routines);
        assert_eq!(w.args.new_item().target_count, Some(3));
    }

    #[test]
    fn time_and_slot_placements_parse() {
        let w = Wrapper::parse_from(["test", "d-2026-03-31", "Stretch", "--time", "dawn"]);
        assert_eq!(w.args.placement(), Placement::Time(TimeSlot::Dawn));

        let w = Wrapper::parse_from(["test", "m-2026-03", "Trip", "--placement", "slot:w-2026-03-02"]);
        assert!(matches!(w.args.placement(), Placement::Slot(_)));
    }

    #[test]
    fn target_requires_routine() {
        assert!(Wrapper::try_parse_from(["test", "y-2026", "Read", "--target", "2"]).is_err());
    }
}
