//! # CLI Command Implementations
//!
//! This module contains the implementation for each subcommand of the `vs-emr`
//! command-line tool. Each subcommand is defined in its own file.
//!
//! ## Structure
//!
//! Each command module contains:
//! - An `Args` struct that defines the command-specific arguments and options,
//!   derived using `clap`.
//! - An `execute` function that takes the parsed `Args` and the run context
//!   and performs the command's logic by calling into the `vs_emr` library.
//!
//! Commands that talk to the control-plane CLI also expose a `run` function
//! that is generic over the [`vs_emr::exec::CommandRunner`], so tests can
//! observe the commands without spawning processes.

pub mod completions;
pub mod start_cluster;
pub mod stop_cluster;
pub mod submit_cmd;
