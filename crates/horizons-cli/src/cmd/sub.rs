//! `hz sub`: split an item into a labelled sub-item.

use anyhow::Result;
use clap::Args;
use horizons_core::error::ErrorCode;
use horizons_core::lock::LockMode;
use horizons_core::{ItemId, PeriodId};

use crate::cmd::{ItemView, require_item, write_item_line};
use crate::output::{self, render};
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct SubArgs {
    /// Period whose list shows the new sub-item.
    pub period: PeriodId,

    /// Parent item id.
    pub parent: String,

    /// Detail appended to the parent's label.
    pub content: String,
}

pub fn run_sub(args: &SubArgs, ctx: &Context) -> Result<()> {
    if args.content.trim().is_empty() {
        anyhow::bail!("sub-item content must not be empty");
    }
    let mut session = Session::open(ctx, LockMode::Exclusive)?;
    let parent = ItemId::new(args.parent.as_str());

    let Some(id) = session
        .planner
        .add_sub_item(&args.period, &parent, &args.content)
    else {
        return Err(output::fail(
            session.output,
            ErrorCode::ItemNotFound,
            parent.as_str(),
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

    #[test]
    fn sub_args_parse() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: SubArgs,
        }
        let w = Wrapper::parse_from(["test", "m-2026-03", "abc123", "weed the beds"]);
        assert_eq!(w.args.parent, "abc123");
        assert_eq!(w.args.content, "weed the beds");
    }
}
