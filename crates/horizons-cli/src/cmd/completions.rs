//! `hz completions`: emit a shell completion script.

use clap::{Args, Command};
use clap_complete::{Shell, generate};

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    pub shell: Shell,
}

pub fn run_completions(args: &CompletionsArgs, cmd: &mut Command) {
    generate(args.shell, cmd, "hz", &mut std::io::stdout());
}
