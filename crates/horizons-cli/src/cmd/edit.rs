//! `hz edit`: change an item's text or decoration.
//!
//! Content, color and category follow the item's split chain; the note
//! only changes the item itself. An empty value clears an optional field.

use anyhow::Result;
use clap::Args;
use horizons_core::ItemId;
use horizons_core::error::ErrorCode;
use horizons_core::lock::LockMode;
use serde::Serialize;
use std::collections::BTreeSet;

use crate::output::{self, render};
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Item ID to edit.
    pub id: String,

    #[arg(long)]
    pub content: Option<String>,

    #[arg(long)]
    pub color: Option<String>,

    #[arg(long)]
    pub category: Option<String>,

    #[arg(long)]
    pub note: Option<String>,
}

impl EditArgs {
    const fn is_empty(&self) -> bool {
        self.content.is_none() && self.color.is_none() && self.category.is_none() && self.note.is_none()
    }
}

fn optional(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize)]
struct EditReport {
    id: ItemId,
    changed: BTreeSet<ItemId>,
}

pub fn run_edit(args: &EditArgs, ctx: &Context) -> Result<()> {
    if args.is_empty() {
        anyhow::bail!("nothing to edit: pass --content, --color, --category or --note");
    }
    let mut session = Session::open(ctx, LockMode::Exclusive)?;
    let id = ItemId::new(args.id.as_str());
    if session.planner.item(&id).is_none() {
        return Err(output::fail(session.output, ErrorCode::ItemNotFound, id.as_str()));
    }

    let mut changed = BTreeSet::new();
    if let Some(content) = &args.content {
        changed.extend(session.planner.edit_content(&id, content));
    }
    if let Some(color) = &args.color {
        changed.extend(session.planner.edit_color(&id, optional(color)));
    }
    if let Some(category) = &args.category {
        changed.extend(session.planner.edit_category(&id, optional(category)));
    }
    if let Some(note) = &args.note
        && session.planner.edit_note(&id, optional(note))
    {
        changed.insert(id.clone());
    }
    if !changed.is_empty() {
        session.save()?;
    }

    render(session.output, &EditReport { id, changed }, |r, w| {
        if r.changed.is_empty() {
            writeln!(w, "{} unchanged", r.id)
        } else {
            writeln!(w, "✓ Updated {} item(s)", r.changed.len())
        }
    })
}
