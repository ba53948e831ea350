//! Completions command implementation
//!
//! Prints a `clap_complete` completion script for the chosen shell:
//!
//! ```bash
//! vs-emr completions bash > ~/.local/share/bash-completion/completions/vs-emr
//! vs-emr completions zsh > ~/.zfunc/_vs-emr
//! ```

use anyhow::Result;
use clap::{Args, CommandFactory};
use clap_complete::{generate, Shell};
use std::io::{self, Write};

use crate::cli::Cli;

/// Arguments for the completions command
#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Execute the completions command
pub fn execute(args: CompletionsArgs) -> Result<()> {
    write_completions(args.shell, &mut io::stdout())
}

fn write_completions<W: Write>(shell: Shell, out: &mut W) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, out);
    Ok(())
}
