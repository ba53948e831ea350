//! # Command Execution
//!
//! Every interaction with the control-plane CLI goes through this module.
//! Commands are built as a program plus an argument vector ([`AwsCommand`])
//! and handed to a [`CommandRunner`]; nothing is ever re-parsed by a shell.
//!
//! [`Executor`] adds the run context on top of a runner: in dry-run mode it
//! prints the command instead of running it, in verbose mode it echoes the
//! command and its output.

use std::fmt;
use std::process::Command;

use log::debug;
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::options::CommandOption;
use crate::output::RunContext;
use crate::shell;

/// A single invocation of the control-plane CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwsCommand {
    program: String,
    args: Vec<String>,
}

impl AwsCommand {
    /// Start an `emr <subcommand>` invocation of `program`.
    pub fn emr(program: &str, subcommand: &str) -> Self {
        Self {
            program: program.to_string(),
            args: vec!["emr".to_string(), subcommand.to_string()],
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// `emr create-cluster` with the given options.
    pub fn create_cluster(program: &str, options: &[CommandOption]) -> Self {
        Self::emr(program, "create-cluster").args(options.iter().flat_map(CommandOption::args))
    }

    /// `emr terminate-clusters --cluster-id <id>`.
    pub fn terminate_clusters(program: &str, cluster_id: &str) -> Self {
        Self::emr(program, "terminate-clusters")
            .arg("--cluster-id")
            .arg(cluster_id)
    }

    /// `emr add-steps` submitting one Spark step.
    pub fn add_steps(program: &str, cluster_id: &str, step: &SparkStep) -> Self {
        Self::emr(program, "add-steps")
            .arg("--cluster-id")
            .arg(cluster_id)
            .arg("--steps")
            .arg(step.to_string())
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }
}

impl fmt::Display for AwsCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", shell::quote(&self.program))?;
        if !self.args.is_empty() {
            write!(f, " {}", shell::join(&self.args))?;
        }
        Ok(())
    }
}

/// What the cluster does when a step fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ActionOnFailure {
    #[default]
    #[value(name = "CONTINUE")]
    Continue,
    #[value(name = "TERMINATE_CLUSTER")]
    TerminateCluster,
    #[value(name = "CANCEL_AND_WAIT")]
    CancelAndWait,
}

impl ActionOnFailure {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionOnFailure::Continue => "CONTINUE",
            ActionOnFailure::TerminateCluster => "TERMINATE_CLUSTER",
            ActionOnFailure::CancelAndWait => "CANCEL_AND_WAIT",
        }
    }
}

impl fmt::Display for ActionOnFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A Spark step for `add-steps`.
///
/// Displays as the `--steps` shorthand value:
/// `Type=Spark,Name=<name>,ActionOnFailure=<policy>,Args=[a,b,...]`.
///
/// This is the single argument a shell passes for
/// `--steps Type=Spark,Name='<name>',...`; the quotes are not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparkStep {
    pub name: String,
    pub action_on_failure: ActionOnFailure,
    pub args: Vec<String>,
}

impl fmt::Display for SparkStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Type=Spark,Name={},ActionOnFailure={},Args=[{}]",
            self.name,
            self.action_on_failure,
            self.args.join(",")
        )
    }
}

/// Runs a command and returns its standard output.
pub trait CommandRunner {
    fn run(&self, command: &AwsCommand) -> Result<String>;
}

/// Runs commands as child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, command: &AwsCommand) -> Result<String> {
        let output = Command::new(&command.program)
            .args(&command.args)
            .output()
            .map_err(|source| Error::CommandSpawn {
                command: command.to_string(),
                source,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            return Err(Error::CommandFailed {
                command: command.to_string(),
                status: output.status.to_string(),
                stdout,
                stderr,
            });
        }

        if !stderr.trim().is_empty() {
            debug!("stderr of `{}`: {}", command, stderr.trim_end());
        }
        Ok(stdout)
    }
}

/// Runs control-plane commands according to the run context.
pub struct Executor<'a, R: CommandRunner> {
    runner: &'a R,
    program: &'a str,
    context: &'a RunContext,
}

impl<'a, R: CommandRunner> Executor<'a, R> {
    /// `program` is the control-plane CLI executable, usually `aws`.
    pub fn new(runner: &'a R, program: &'a str, context: &'a RunContext) -> Self {
        Self {
            runner,
            program,
            context,
        }
    }

    /// Run `command`, or print it in dry-run mode and return `None`.
    pub fn run(&self, command: &AwsCommand) -> Result<Option<String>> {
        if self.context.dry_run {
            println!("Dry run! Command is: {}", command);
            return Ok(None);
        }

        self.context.detail(format!("Running: {}", command));
        debug!("Running: {:?}", command);
        let output = self.runner.run(command)?;
        self.context.detail(format!("Output: {}", output.trim_end()));
        debug!("Output: {}", output);
        Ok(Some(output))
    }

    /// Create a cluster; returns the raw response.
    pub fn create_cluster(&self, options: &[CommandOption]) -> Result<Option<String>> {
        self.run(&AwsCommand::create_cluster(self.program, options))
    }

    /// Terminate a cluster; returns the raw response.
    pub fn terminate_cluster(&self, cluster_id: &str) -> Result<Option<String>> {
        self.run(&AwsCommand::terminate_clusters(self.program, cluster_id))
    }

    /// Add a Spark step; returns the new step id.
    pub fn add_step(&self, cluster_id: &str, step: &SparkStep) -> Result<Option<String>> {
        self.run(&AwsCommand::add_steps(self.program, cluster_id, step))?
            .map(|output| parse_step_id(&output))
            .transpose()
    }
}

fn parse_response(output: &str, field: &'static str) -> Result<JsonValue> {
    serde_json::from_str(output).map_err(|_| Error::ResponseShape {
        field,
        response: output.trim().to_string(),
    })
}

/// Extract `StepIds[0]` from an `add-steps` response.
pub fn parse_step_id(output: &str) -> Result<String> {
    let response = parse_response(output, "StepIds")?;
    response
        .get("StepIds")
        .and_then(|ids| ids.get(0))
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::ResponseShape {
            field: "StepIds",
            response: output.trim().to_string(),
        })
}

/// Extract `ClusterId` from a `create-cluster` response.
pub fn parse_cluster_id(output: &str) -> Result<String> {
    let response = parse_response(output, "ClusterId")?;
    response
        .get("ClusterId")
        .and_then(JsonValue::as_str)
        .map(str::to_string)
        .ok_or_else(|| Error::ResponseShape {
            field: "ClusterId",
            response: output.trim().to_string(),
        })
}
