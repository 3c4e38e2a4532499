//! `hz reset`: refill quota routines whose reset bucket has passed.

use anyhow::Result;
use clap::Args;
use horizons_core::lock::LockMode;
use horizons_core::{ItemId, PeriodId};
use serde::Serialize;

use crate::output::render;
use crate::session::{Context, Session};

#[derive(Args, Debug)]
pub struct ResetArgs {
    pub period: PeriodId,
}

#[derive(Debug, Serialize)]
struct ResetReport {
    period: PeriodId,
    refilled: Vec<ItemId>,
}

pub fn run_reset(args: &ResetArgs, ctx: &Context) -> Result<()> {
    let mut session = Session::open(ctx, LockMode::Exclusive)?;
    let refilled = session.planner.reset_routines_for_period(&args.period);
    if !refilled.is_empty() {
        session.save()?;
    }

    let report = ResetReport {
        period: args.period.clone(),
        refilled,
    };
    render(session.output, &report, |r, w| {
        writeln!(w, "Refilled {} routine(s) in {}", r.refilled.len(), r.period)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_args_reject_bad_period() {
        use clap::Parser;

        #[derive(Parser)]
        struct Wrapper {
            #[command(flatten)]
            args: ResetArgs,
        }
        assert!(Wrapper::try_parse_from(["test", "w-2026-03-02"]).is_ok());
        assert!(Wrapper::try_parse_from(["test", "week-two"]).is_err());
    }
}
