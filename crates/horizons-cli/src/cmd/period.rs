//! `hz period`: show one period, refreshing its quota routines.

use anyhow::Result;
use clap::Args;
use horizons_core::lock::LockMode;
use horizons_core::model::{ItemList, MemoRecord};
use horizons_core::{Period, PeriodId, Planner};
use serde::Serialize;
use std::io::{self, Write};
use std::sync::Arc;

use crate::cmd::{ItemView, write_item_line};
use crate::output::{pretty_kv, pretty_section, render_mode};
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct PeriodArgs {
    /// Period id, e.g. `m-2026-03` or `d-2026-03-31`.
    pub id: PeriodId,

    /// Show without refreshing quota routines or saving.
    #[arg(long)]
    pub peek: bool,
}

#[derive(Debug, Serialize)]
struct PeriodReport<'a> {
    id: &'a PeriodId,
    level: String,
    parent: Option<PeriodId>,
    goal: &'a str,
    motto: &'a str,
    memo: &'a str,
    memos: &'a [MemoRecord],
    inherited_memos: Vec<MemoRecord>,
    todos: Vec<ItemView<'a>>,
    routines: Vec<ItemView<'a>>,
    slots: Vec<SlotReport<'a>>,
    time_slots: Vec<SlotReport<'a>>,
    refilled: usize,
}

#[derive(Debug, Serialize)]
struct SlotReport<'a> {
    key: String,
    items: Vec<ItemView<'a>>,
}

fn views<'a>(planner: &Planner, list: &'a ItemList) -> Vec<ItemView<'a>> {
    list.iter().map(|item| ItemView::new(planner, item)).collect()
}

fn build<'a>(planner: &Planner, period: &'a Period, refilled: usize) -> PeriodReport<'a> {
    let slots = planner
        .children_of(&period.id)
        .into_iter()
        .filter_map(|child| {
            let list = period.slots.get(&child)?;
            Some(SlotReport {
                key: child.to_string(),
                items: views(planner, list),
            })
        })
        .collect();
    let time_slots = period
        .time_slots
        .iter()
        .flatten()
        .filter(|(_, list)| !list.is_empty())
        .map(|(slot, list)| SlotReport {
            key: slot.to_string(),
            items: views(planner, list),
        })
        .collect();

    PeriodReport {
        id: &period.id,
        level: period.level.to_string(),
        parent: planner.parent_of(&period.id),
        goal: &period.goal,
        motto: &period.motto,
        memo: &period.memo,
        memos: &period.memos,
        inherited_memos: planner.inherited_memos(&period.id),
        todos: views(planner, &period.todos),
        routines: views(planner, &period.routines),
        slots,
        time_slots,
        refilled,
    }
}

fn write_list(w: &mut dyn Write, indent: &str, items: &[ItemView<'_>]) -> io::Result<()> {
    for view in items {
        write_item_line(w, indent, view)?;
    }
    Ok(())
}

fn write_text(r: &PeriodReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    writeln!(w, "{}\t{}", r.id, r.level)?;
    for (label, list) in [("todos", &r.todos), ("routines", &r.routines)] {
        for view in list {
            write!(w, "{label}\t")?;
            write_item_line(w, "", view)?;
        }
    }
    for slot in r.slots.iter().chain(&r.time_slots) {
        for view in &slot.items {
            write!(w, "{}\t", slot.key)?;
            write_item_line(w, "", view)?;
        }
    }
    Ok(())
}

fn write_pretty(r: &PeriodReport<'_>, w: &mut dyn Write) -> io::Result<()> {
    pretty_section(w, &format!("{} ({})", r.id, r.level))?;
    if let Some(parent) = &r.parent {
        pretty_kv(w, "parent", parent.as_str())?;
    }
    for (key, value) in [("goal", r.goal), ("motto", r.motto), ("memo", r.memo)] {
        if !value.is_empty() {
            pretty_kv(w, key, value)?;
        }
    }
    for memo in r.inherited_memos.iter().chain(r.memos) {
        pretty_kv(w, "memo", format!("{} ({})", memo.text, memo.period_id))?;
    }
    if r.refilled > 0 {
        pretty_kv(w, "refilled", r.refilled.to_string())?;
    }

    writeln!(w)?;
    writeln!(w, "Todos")?;
    write_list(w, "  ", &r.todos)?;
    writeln!(w, "Routines")?;
    write_list(w, "  ", &r.routines)?;
    for slot in r.slots.iter().chain(&r.time_slots) {
        writeln!(w, "{}", slot.key)?;
        write_list(w, "  ", &slot.items)?;
    }
    Ok(())
}

pub fn run_period(args: &PeriodArgs, ctx: &Context) -> Result<()> {
    let mode = if args.peek {
        LockMode::Shared
    } else {
        LockMode::Exclusive
    };
    let mut session = Session::open(ctx, mode)?;

    let refilled = if args.peek {
        0
    } else {
        let refilled = if session.planner.config().routines.auto_reset {
            session.planner.reset_routines_for_period(&args.id).len()
        } else {
            0
        };
        session.planner.period(&args.id);
        session.save()?;
        refilled
    };

    let fallback;
    let period = match session.planner.get_period(&args.id).map(Arc::as_ref) {
        Some(period) => period,
        None => {
            fallback = Period::new(args.id.clone());
            &fallback
        }
    };
    let report = build(&session.planner, period, refilled);
    render_mode(session.output, &report, write_text, write_pretty)
}
