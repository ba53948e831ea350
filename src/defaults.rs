//! Default values for vs-emr.
//!
//! This module provides centralized default values used across commands,
//! ensuring consistency and avoiding duplication.

use std::path::PathBuf;

/// Executable of the control-plane CLI.
pub const AWS_CLI: &str = "aws";

/// Step name used by `submit-cmd` when none is given.
pub const STEP_NAME: &str = "variant-spark";

/// Main class of the Spark job submitted by `submit-cmd`.
pub const MAIN_CLASS: &str = "au.csiro.variantspark.cli.VariantSparkApp";

/// Location of the job jar on the cluster nodes.
pub const JOB_JAR: &str = "/mnt/variant-spark/variant-spark_2.11-all.jar";

/// Built-in cluster template, used when `--template` is not given.
pub const SPOT_CLUSTER_TEMPLATE: &str = include_str!("../templates/spot-cluster.yaml");

/// Returns the default location of the stored configuration file.
///
/// This is `~/.vs_emr/config.yaml`. Falls back to `.vs_emr/config.yaml` in
/// the current directory if the home directory cannot be determined.
///
/// This can be overridden by the `--config-file` CLI flag or the
/// `VS_EMR_CONFIG` environment variable.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".vs_emr")
        .join("config.yaml")
}
