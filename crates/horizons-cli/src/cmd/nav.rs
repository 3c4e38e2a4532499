//! `hz nav`: walk the period hierarchy without touching the snapshot.

use anyhow::Result;
use clap::{Args, ValueEnum};
use horizons_core::{Direction, Navigator, PeriodId};
use serde::Serialize;

use crate::output::render;
use crate::session::Context;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Relation {
    Children,
    Parent,
    Next,
    Prev,
    Ancestors,
}

#[derive(Args, Debug)]
pub struct NavArgs {
    pub relation: Relation,

    pub id: PeriodId,
}

#[derive(Debug, Serialize)]
struct NavReport<'a> {
    id: &'a PeriodId,
    periods: Vec<PeriodId>,
}

fn resolve(nav: &Navigator, relation: Relation, id: &PeriodId) -> Vec<PeriodId> {
    match relation {
        Relation::Children => nav.children_of(id),
        Relation::Parent => nav.parent_of(id).into_iter().collect(),
        Relation::Next => nav.adjacent_of(id, Direction::Next).into_iter().collect(),
        Relation::Prev => nav.adjacent_of(id, Direction::Previous).into_iter().collect(),
        Relation::Ancestors => nav.ancestors_of(id),
    }
}

pub fn run_nav(args: &NavArgs, ctx: &Context) -> Result<()> {
    let nav = Navigator::new(ctx.planner.calendar.base_year);
    let report = NavReport {
        id: &args.id,
        periods: resolve(&nav, args.relation, &args.id),
    };
    render(ctx.output, &report, |r, w| {
        for id in &r.periods {
            writeln!(w, "{id}")?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> PeriodId {
        raw.parse().expect("valid period id")
    }

    #[test]
    fn resolves_each_relation() {
        let nav = Navigator::new(2026);
        assert_eq!(resolve(&nav, Relation::Children, &id("y-2026")).len(), 4);
        assert_eq!(resolve(&nav, Relation::Parent, &id("q-2026-1")), [id("y-2026")]);
        assert_eq!(resolve(&nav, Relation::Next, &id("m-2026-12")), [id("m-2027-01")]);
        assert_eq!(resolve(&nav, Relation::Prev, &id("d-2026-03-01")), [id("d-2026-02-28")]);
        assert!(resolve(&nav, Relation::Parent, &PeriodId::root()).is_empty());
    }

    #[test]
    fn nav_args_parse_relation() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: NavArgs,
        }
        let w = Wrapper::parse_from(["test", "ancestors", "d-2026-03-31"]);
        assert_eq!(w.args.relation, Relation::Ancestors);
        assert!(Wrapper::try_parse_from(["test", "sideways", "y-2026"]).is_err());
    }
}
