//! CLI argument parsing and command dispatch

use anyhow::Result;
use clap::{Parser, Subcommand};
use vs_emr::defaults::AWS_CLI;
use vs_emr::output::{OutputConfig, RunContext};

use crate::commands;

/// vs-emr - Launch EMR clusters and submit Spark steps
#[derive(Parser, Debug)]
#[command(name = "vs-emr")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Print the commands instead of running them
    #[arg(long, global = true)]
    dry_run: bool,

    /// Print the resolved configuration, options and command output
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress progress messages (errors and dry-run commands are still printed)
    #[arg(long, global = true)]
    silent: bool,

    /// Control-plane CLI executable
    #[arg(long, global = true, value_name = "PATH", env = "VS_EMR_AWS_CLI", default_value = AWS_CLI)]
    aws_cli: String,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Start a cluster from the cluster template
    StartCluster(commands::start_cluster::StartClusterArgs),

    /// Terminate a running cluster
    StopCluster(commands::stop_cluster::StopClusterArgs),

    /// Submit a Spark step to a running cluster
    SubmitCmd(commands::submit_cmd::SubmitCmdArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        let level = if self.verbose {
            "debug"
        } else {
            self.log_level.as_str()
        };
        // RUST_LOG takes precedence over the flags.
        let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
            .try_init();

        let context = RunContext {
            dry_run: self.dry_run,
            verbose: self.verbose,
            output: OutputConfig::from_env_and_flag(&self.color, self.silent),
        };

        match self.command {
            Commands::StartCluster(args) => {
                commands::start_cluster::execute(args, &context, &self.aws_cli)
            }
            Commands::StopCluster(args) => {
                commands::stop_cluster::execute(args, &context, &self.aws_cli)
            }
            Commands::SubmitCmd(args) => commands::submit_cmd::execute(args, &context, &self.aws_cli),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }
}
