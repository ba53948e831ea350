//! # vs-emr CLI
//!
//! This is the binary entry point for the `vs-emr` command-line tool.
//!
//! Its primary responsibilities are:
//! - Parsing command-line arguments using `clap`.
//! - Setting up logging and the run context.
//! - Executing the appropriate command and reporting failures.
//!
//! The core application logic is defined in the `lib.rs` library crate, ensuring
//! that the binary is a thin wrapper around the reusable library functionality.

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    cli.execute()
}
