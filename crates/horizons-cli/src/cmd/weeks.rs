//! `hz weeks`: show how a month splits into Monday-start weeks.

use anyhow::Result;
use clap::Args;
use horizons_core::calendar::{self, WeekSpan};

use crate::output::{OutputMode, render};

#[derive(Args, Debug)]
pub struct WeeksArgs {
    pub year: i32,

    #[arg(value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: u32,
}

pub fn run_weeks(args: &WeeksArgs, output: OutputMode) -> Result<()> {
    let spans = calendar::weeks_in_month(args.year, args.month);
    render(output, spans.as_slice(), |spans: &[WeekSpan], w| {
        for span in spans {
            writeln!(
                w,
                "w{}  {} .. {}",
                span.number,
                span.start.format("%a %Y-%m-%d"),
                span.end.format("%a %Y-%m-%d")
            )?;
        }
        Ok(())
    })
}
