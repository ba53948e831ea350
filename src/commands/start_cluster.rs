//! Start-cluster command implementation
//!
//! Resolves the user configuration (stored defaults, profiles, overrides and
//! option flags), renders the cluster template against it and runs
//! `create-cluster` with the resulting options. The response can be saved
//! for later `stop-cluster` and `submit-cmd` invocations.

use anyhow::Result;
use clap::Args;
use log::warn;
use std::path::{Path, PathBuf};

use vs_emr::cluster::save_cluster_info;
use vs_emr::config::{self, option_flags_document, resolve_config, OptionFlag, Overrides};
use vs_emr::defaults::default_config_path;
use vs_emr::exec::{parse_cluster_id, CommandRunner, Executor, ProcessRunner};
use vs_emr::options::to_command_options;
use vs_emr::output::{emoji, RunContext};
use vs_emr::template::{load_template, resolve_template, TemplateRenderer};

/// Arguments for the start-cluster command
#[derive(Args, Debug, Default)]
pub struct StartClusterArgs {
    /// The type of EC2 instance to use for worker nodes, e.g. r4.2xlarge
    #[arg(long, value_name = "TYPE")]
    pub worker_type: Option<String>,

    /// The number of worker instances in the cluster
    #[arg(long, value_name = "COUNT")]
    pub worker_instances: Option<String>,

    /// The maximum spot price for the worker instances
    #[arg(long, value_name = "PRICE")]
    pub worker_bid: Option<String>,

    /// The type of EC2 instance to use for the master node
    #[arg(long, value_name = "TYPE")]
    pub master_type: Option<String>,

    /// The maximum spot price for the master instance
    #[arg(long, value_name = "PRICE")]
    pub master_bid: Option<String>,

    /// Profile from the configuration file (repeatable, applied in order)
    #[arg(long = "profile", value_name = "NAME")]
    pub profiles: Vec<String>,

    /// JSON object merged over the profiles (repeatable)
    #[arg(long, value_name = "JSON")]
    pub conf_json: Vec<String>,

    /// Configuration override as a dotted path, e.g. worker.instanceCount=4 (repeatable)
    #[arg(long, value_name = "KEY=VALUE")]
    pub conf: Vec<String>,

    /// Save the create-cluster response to this file
    #[arg(long, value_name = "PATH")]
    pub cluster_id_file: Option<PathBuf>,

    /// Path to the configuration file (defaults to ~/.vs_emr/config.yaml)
    #[arg(long, value_name = "PATH", env = "VS_EMR_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Cluster template to render instead of the built-in spot cluster template
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,
}

impl StartClusterArgs {
    fn option_flags(&self) -> Vec<(OptionFlag, Option<String>)> {
        OptionFlag::ALL
            .into_iter()
            .map(|flag| {
                let value = match flag {
                    OptionFlag::WorkerType => &self.worker_type,
                    OptionFlag::WorkerInstances => &self.worker_instances,
                    OptionFlag::WorkerBid => &self.worker_bid,
                    OptionFlag::MasterType => &self.master_type,
                    OptionFlag::MasterBid => &self.master_bid,
                };
                (flag, value.clone())
            })
            .collect()
    }
}

/// Execute the start-cluster command
pub fn execute(args: StartClusterArgs, context: &RunContext, aws_cli: &str) -> Result<()> {
    run(args, context, aws_cli, &ProcessRunner, &default_config_path())
}

/// Run the command with an explicit runner and default configuration path.
pub fn run<R: CommandRunner>(
    args: StartClusterArgs,
    context: &RunContext,
    aws_cli: &str,
    runner: &R,
    default_config: &Path,
) -> Result<()> {
    let loaded = config::load(args.config_file.as_deref(), default_config)?;
    if let Some(path) = &loaded.path {
        context.echo(format!("Loading config from: {}", path.display()));
    }

    if !args.profiles.is_empty() {
        context.echo(format!("Using profiles: {}", args.profiles.join(", ")));
    }

    let overrides = Overrides {
        options: option_flags_document(args.option_flags())?,
        profiles: args.profiles,
        conf_json: args.conf_json,
        conf: args.conf,
    };
    let user_config = resolve_config(&loaded.config, &overrides)?;

    let template = load_template(args.template.as_deref())?;
    let renderer = TemplateRenderer::new()?;
    let resolved = resolve_template(&renderer, &template, &user_config)?;
    if context.verbose {
        context.detail(format!(
            "Cluster configuration:\n{}",
            serde_yaml::to_string(&resolved.config)?.trim_end()
        ));
    }

    let options = to_command_options(&resolved.options)?;
    context.detail("AWS options:");
    for option in &options {
        context.detail(format!("  {}", option));
    }

    let executor = Executor::new(runner, aws_cli, context);
    let Some(output) = executor.create_cluster(&options)? else {
        return Ok(());
    };

    if let Some(path) = &args.cluster_id_file {
        context.echo(format!("Saving cluster info to: {}", path.display()));
        save_cluster_info(path, &output)?;
    }
    context.echo(output.trim_end());

    match parse_cluster_id(&output) {
        Ok(cluster_id) => context.echo(format!(
            "{} Started cluster: {}",
            emoji(&context.output, "🚀", "[STARTED]"),
            cluster_id
        )),
        Err(e) => warn!("Could not determine the cluster id: {}", e),
    }
    Ok(())
}
