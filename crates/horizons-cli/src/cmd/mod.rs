//! Subcommand handlers. Each module owns its clap `Args` struct and a
//! `run_*` function.

pub mod add;
pub mod assign;
pub mod completions;
pub mod delete;
pub mod done;
pub mod edit;
pub mod header;
pub mod init;
pub mod move_cmd;
pub mod nav;
pub mod period;
pub mod reset;
pub mod show;
pub mod sub;
pub mod weeks;

use horizons_core::error::ErrorCode;
use horizons_core::{Item, ItemId, Planner};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

use crate::output::{self, OutputMode};

/// An item as commands report it: the stored fields plus derived progress.
#[derive(Debug, Serialize)]
pub struct ItemView<'a> {
    #[serde(flatten)]
    pub item: &'a Item,
    pub progress: Option<u8>,
}

impl<'a> ItemView<'a> {
    pub fn new(planner: &Planner, item: &'a Item) -> Self {
        Self {
            item,
            progress: planner.progress(&item.id),
        }
    }
}

/// One-line rendering shared by list output: `[x] id  label  (count) 50%`.
pub fn write_item_line(w: &mut dyn Write, indent: &str, view: &ItemView<'_>) -> io::Result<()> {
    let item = view.item;
    let mark = if item.is_completed { "x" } else { " " };
    write!(w, "{indent}[{mark}] {}  {}", item.id, item.content)?;
    if let (Some(current), Some(target)) = (item.current_count, item.target_count) {
        write!(w, "  ({current}/{target})")?;
    }
    if let Some(progress) = view.progress.filter(|_| !item.is_leaf()) {
        write!(w, "  {progress}%")?;
    }
    writeln!(w)
}

/// Look up an item, reporting `E2003` when it is missing.
pub fn require_item<'p>(
    planner: &'p Planner,
    id: &ItemId,
    output: OutputMode,
) -> anyhow::Result<&'p Item> {
    planner
        .item(id)
        .map(Arc::as_ref)
        .ok_or_else(|| output::fail(output, ErrorCode::ItemNotFound, id.as_str()))
}
