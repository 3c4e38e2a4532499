//! `hz done` / `hz undone`: set an item's completion and propagate it.

use anyhow::Result;
use clap::Args;
use horizons_core::error::ErrorCode;
use horizons_core::lock::LockMode;
use horizons_core::{CompletionChange, ItemId};
use std::io::{self, Write};

use crate::output::{self, render_mode};
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct DoneArgs {
    /// Item ID to mark.
    pub id: String,
}

fn write_text(change: &CompletionChange, w: &mut dyn Write) -> io::Result<()> {
    for id in change.changed_ids() {
        writeln!(w, "{id}\t{}", change.completed)?;
    }
    Ok(())
}

fn write_pretty(change: &CompletionChange, w: &mut dyn Write) -> io::Result<()> {
    let verb = if change.completed { "done" } else { "open" };
    writeln!(w, "✓ Marked {} as {verb}", change.item_id)?;
    if !change.cascaded.is_empty() {
        writeln!(w, "  cascaded to {} descendant(s)", change.cascaded.len())?;
    }
    for id in &change.bubbled {
        writeln!(w, "  {id} is now {verb}")?;
    }
    Ok(())
}

pub fn run_set_completed(args: &DoneArgs, completed: bool, ctx: &Context) -> Result<()> {
    let mut session = Session::open(ctx, LockMode::Exclusive)?;
    let id = ItemId::new(args.id.as_str());

    let Some(change) = session.planner.set_completed(&id, completed) else {
        return Err(output::fail(session.output, ErrorCode::ItemNotFound, id.as_str()));
    };
    session.save()?;
    render_mode(session.output, &change, write_text, write_pretty)
}
