//! Submit-cmd command implementation
//!
//! Adds a Spark step to a running cluster. The step runs the job jar with
//! the given main class; everything after the known flags is passed to the
//! job unchanged.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use vs_emr::cluster::resolve_cluster_id;
use vs_emr::defaults::{JOB_JAR, MAIN_CLASS, STEP_NAME};
use vs_emr::exec::{ActionOnFailure, CommandRunner, Executor, ProcessRunner, SparkStep};
use vs_emr::output::RunContext;

/// Arguments for the submit-cmd command
#[derive(Args, Debug)]
pub struct SubmitCmdArgs {
    /// Id of the cluster to run the step on
    #[arg(long, value_name = "ID")]
    pub cluster_id: Option<String>,

    /// File with the saved create-cluster response
    #[arg(long, value_name = "PATH")]
    pub cluster_id_file: Option<PathBuf>,

    /// Name of the step
    #[arg(long, value_name = "NAME", default_value = STEP_NAME)]
    pub step_name: String,

    /// What the cluster does when the step fails
    #[arg(long, value_enum, default_value_t = ActionOnFailure::Continue)]
    pub action_on_failure: ActionOnFailure,

    /// Options for spark-submit, split with shell quoting rules, e.g. "--driver-memory 4G"
    #[arg(long, value_name = "OPTS", allow_hyphen_values = true)]
    pub spark_opts: Option<String>,

    /// Main class of the job
    #[arg(long, value_name = "CLASS", default_value = MAIN_CLASS)]
    pub main_class: String,

    /// Job jar on the cluster nodes
    #[arg(long, value_name = "PATH", default_value = JOB_JAR)]
    pub jar: String,

    /// Arguments passed to the job
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "ARGS")]
    pub job_args: Vec<String>,
}

impl SubmitCmdArgs {
    /// Step arguments: spark options, the job class and jar, then the job
    /// arguments.
    fn step_args(&self) -> Result<Vec<String>> {
        let opts = self.spark_opts.as_deref().unwrap_or_default();
        let spark_opts = shlex::split(opts)
            .ok_or_else(|| anyhow::anyhow!("Unbalanced quotes in --spark-opts: {}", opts))?;
        Ok(spark_opts
            .into_iter()
            .chain(["--class".to_string(), self.main_class.clone(), self.jar.clone()])
            .chain(self.job_args.iter().cloned())
            .collect())
    }
}

/// Execute the submit-cmd command
pub fn execute(args: SubmitCmdArgs, context: &RunContext, aws_cli: &str) -> Result<()> {
    run(args, context, aws_cli, &ProcessRunner)
}

/// Run the command with an explicit runner.
pub fn run<R: CommandRunner>(
    args: SubmitCmdArgs,
    context: &RunContext,
    aws_cli: &str,
    runner: &R,
) -> Result<()> {
    if let (None, Some(path)) = (&args.cluster_id, &args.cluster_id_file) {
        context.echo(format!("Loading cluster info from: {}", path.display()));
    }
    let cluster_id = resolve_cluster_id(args.cluster_id.as_deref(), args.cluster_id_file.as_deref())?;
    let step_args = args.step_args()?;
    context.echo(format!(
        "At cluster: {} running: {}",
        cluster_id,
        args.job_args.join(" ")
    ));

    let step = SparkStep {
        name: args.step_name.clone(),
        action_on_failure: args.action_on_failure,
        args: step_args,
    };
    let executor = Executor::new(runner, aws_cli, context);
    if let Some(step_id) = executor.add_step(&cluster_id, &step)? {
        context.echo(format!("Step Id: {}", step_id));
    }
    Ok(())
}
