//! Stop-cluster command implementation
//!
//! Terminates a cluster identified directly or through the file written by
//! `start-cluster --cluster-id-file`.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use vs_emr::cluster::resolve_cluster_id;
use vs_emr::exec::{CommandRunner, Executor, ProcessRunner};
use vs_emr::output::{emoji, RunContext};

/// Arguments for the stop-cluster command
#[derive(Args, Debug, Default)]
pub struct StopClusterArgs {
    /// Id of the cluster to terminate
    #[arg(long, value_name = "ID")]
    pub cluster_id: Option<String>,

    /// File with the saved create-cluster response
    #[arg(long, value_name = "PATH")]
    pub cluster_id_file: Option<PathBuf>,
}

/// Execute the stop-cluster command
pub fn execute(args: StopClusterArgs, context: &RunContext, aws_cli: &str) -> Result<()> {
    run(args, context, aws_cli, &ProcessRunner)
}

/// Run the command with an explicit runner.
pub fn run<R: CommandRunner>(
    args: StopClusterArgs,
    context: &RunContext,
    aws_cli: &str,
    runner: &R,
) -> Result<()> {
    if let (None, Some(path)) = (&args.cluster_id, &args.cluster_id_file) {
        context.echo(format!("Loading cluster info from: {}", path.display()));
    }
    let cluster_id = resolve_cluster_id(args.cluster_id.as_deref(), args.cluster_id_file.as_deref())?;

    context.echo(format!(
        "{} Stopping cluster with id: {}",
        emoji(&context.output, "🛑", "[STOP]"),
        cluster_id
    ));
    let executor = Executor::new(runner, aws_cli, context);
    if let Some(output) = executor.terminate_cluster(&cluster_id)? {
        context.echo(output.trim_end());
    }
    Ok(())
}
