//! `hz show`: one item with its provenance and children.

use anyhow::Result;
use clap::Args;
use horizons_core::ItemId;
use horizons_core::lock::LockMode;
use serde::Serialize;
use std::io::{self, Write};

use crate::cmd::{ItemView, require_item, write_item_line};
use crate::output::{pretty_kv, pretty_section, render_mode};
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Item ID to show.
    pub id: String,
}

#[derive(Debug, Serialize)]
struct ShowReport<'a> {
    #[serde(flatten)]
    view: ItemView<'a>,
    children: Vec<ItemView<'a>>,
}

fn write_text(r: &ShowReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    write_item_line(w, "", &r.view)?;
    for child in &r.children {
        write_item_line(w, "  ", child)?;
    }
    Ok(())
}

fn write_pretty(r: &ShowReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    let item = r.view.item;
    pretty_section(w, &item.content)?;
    pretty_kv(w, "id", item.id.as_str())?;
    pretty_kv(w, "kind", item.source_type.to_string())?;
    pretty_kv(w, "done", item.is_completed.to_string())?;
    if let Some(progress) = r.view.progress {
        pretty_kv(w, "progress", format!("{progress}%"))?;
    }
    if let (Some(current), Some(target)) = (item.current_count, item.target_count) {
        pretty_kv(w, "quota", format!("{current}/{target}"))?;
    }
    if let Some(parent) = &item.parent_id {
        pretty_kv(w, "parent", parent.as_str())?;
    }
    if let Some(origin) = &item.origin_period_id {
        pretty_kv(w, "origin", origin.as_str())?;
    }
    for (key, value) in [("note", &item.note), ("color", &item.color), ("category", &item.category)] {
        if let Some(value) = value {
            pretty_kv(w, key, value)?;
        }
    }
    if !r.children.is_empty() {
        writeln!(w)?;
        writeln!(w, "Children")?;
        for child in &r.children {
            write_item_line(w, "  ", child)?;
        }
    }
    Ok(())
}

pub fn run_show(args: &ShowArgs, ctx: &Context) -> Result<()> {
    let session = Session::open(ctx, LockMode::Shared)?;
    let planner = &session.planner;
    let item = require_item(planner, &ItemId::new(args.id.as_str()), session.output)?;

    let children = item
        .child_ids
        .iter()
        .filter_map(|id| planner.item(id))
        .map(|child| ItemView::new(planner, child))
        .collect();
    let report = ShowReport {
        view: ItemView::new(planner, item),
        children,
    };
    render_mode(session.output, &report, write_text, write_pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use horizons_core::{Item, ItemKind};

    #[test]
    fn text_indents_children() {
        let parent = Item {
            id: ItemId::new("p"),
            content: "Garden".into(),
            child_ids: vec![ItemId::new("c")],
            ..Item::default()
        };
        let child = Item {
            id: ItemId::new("c"),
            content: "Garden: weed".into(),
            is_completed: true,
            source_type: ItemKind::Todo,
            ..Item::default()
        };
        let report = ShowReport {
            view: ItemView {
                item: &parent,
                progress: Some(100),
            },
            children: vec![ItemView {
                item: &child,
                progress: Some(100),
            }],
        };
        let mut buf = Vec::new();
        write_text(&report, &mut buf).expect("write");
        assert_eq!(
            String::from_utf8(buf).expect("utf8"),
            "[ ] p  Garden  100%\n  [x] c  Garden: weed\n"
        );
    }
}
