//! `hz delete`: remove an item and its whole subtree.

use anyhow::Result;
use clap::Args;
use horizons_core::error::ErrorCode;
use horizons_core::lock::LockMode;
use horizons_core::ItemId;
use serde::Serialize;

use crate::output::{self, render};
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Item ID to delete (with every descendant).
    pub id: String,
}

#[derive(Debug, Serialize)]
struct DeleteReport {
    removed: Vec<ItemId>,
}

pub fn run_delete(args: &DeleteArgs, ctx: &Context) -> Result<()> {
    let mut session = Session::open(ctx, LockMode::Exclusive)?;
    let id = ItemId::new(args.id.as_str());

    let removed = session.planner.delete_item(&id);
    if removed.is_empty() {
        return Err(output::fail(session.output, ErrorCode::ItemNotFound, id.as_str()));
    }
    session.save()?;

    render(session.output, &DeleteReport { removed }, |r, w| {
        writeln!(w, "✓ Deleted {} item(s)", r.removed.len())
    })
}
