//! # Error Handling
//!
//! This module defines the centralized error type for the `vs-emr` library.
//! It uses the `thiserror` library to create a single `Error` enum covering
//! every failure mode of a cluster or step invocation, with messages meant
//! to be shown directly to the operator.
//!
//! ## Categories
//!
//! - **User input**: invalid dotted paths, malformed `key=value` overrides,
//!   unknown profile names, missing configuration or template files, a
//!   missing cluster id.
//! - **External process**: the control-plane CLI could not be started or
//!   exited with a non-zero status. The captured output is kept for
//!   diagnosis.
//! - **Response shape**: the control-plane CLI answered, but the JSON it
//!   printed lacks the field we need (`ClusterId`, `StepIds[0]`).
//!
//! Variants that the user can fix carry an optional `hint` which is
//! rendered on its own line.

use std::path::PathBuf;

use thiserror::Error;

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_ref()
        .map(|h| format!("\n  hint: {}", h))
        .unwrap_or_default()
}

/// Main error type for vs-emr operations
#[derive(Error, Debug)]
pub enum Error {
    /// A dotted path key was empty or contained an empty segment.
    #[error("Invalid path: '{path}'")]
    InvalidPath { path: String },

    /// A `--conf` entry was not of the form `key=value`.
    #[error("Invalid configuration override '{entry}': expected key=value{}", hint_suffix(hint))]
    InvalidOverride { entry: String, hint: Option<String> },

    /// A selected profile does not exist in the stored configuration.
    #[error("Profile `{name}` not defined in the configuration{}", hint_suffix(hint))]
    ProfileNotDefined {
        name: String,
        /// Suggested profile name or other guidance
        hint: Option<String>,
    },

    /// A file that was explicitly requested does not exist.
    #[error("{kind} file does not exist: {}", path.display())]
    FileNotFound {
        /// What the file is for ("Config", "Template", "Cluster info")
        kind: &'static str,
        path: PathBuf,
    },

    /// The stored configuration or a `--conf-json` document is malformed.
    #[error("Configuration parsing error: {message}{}", hint_suffix(hint))]
    ConfigParse {
        message: String,
        /// Optional hint for how to fix the configuration issue
        hint: Option<String>,
    },

    /// An error occurred while parsing or rendering a template.
    ///
    /// May include the name of the problematic variable when applicable.
    #[error("Template processing error: {message}{}", variable.as_ref().map(|v| format!(" (variable: {})", v)).unwrap_or_default())]
    Template {
        message: String,
        /// The template variable that caused the error, if applicable
        variable: Option<String>,
    },

    /// A rendered template lacks a required top-level section.
    #[error("Template does not define a `{section}` section")]
    MissingSection { section: &'static str },

    /// Neither a cluster id nor a cluster id file was supplied.
    #[error("--cluster-id or --cluster-id-file is required")]
    ClusterIdRequired,

    /// The cluster info file could not be used to obtain a cluster id.
    #[error("Invalid cluster info in {}: {message}", path.display())]
    ClusterInfo { path: PathBuf, message: String },

    /// The control-plane CLI could not be started.
    #[error("Failed to run `{command}`: {source}")]
    CommandSpawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The control-plane CLI exited with a non-zero status.
    #[error("Command `{command}` failed with {status}\n{}", format_output(stdout, stderr))]
    CommandFailed {
        command: String,
        status: String,
        stdout: String,
        stderr: String,
    },

    /// The control-plane CLI response does not contain an expected field.
    #[error("Unexpected response, missing `{field}`: {response}")]
    ResponseShape { field: &'static str, response: String },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A YAML parsing error, wrapped from `serde_yaml::Error`.
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// A JSON parsing error, wrapped from `serde_json::Error`.
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

fn format_output(stdout: &str, stderr: &str) -> String {
    let mut out = String::new();
    if !stdout.trim().is_empty() {
        out.push_str(&format!("stdout: {}\n", stdout.trim_end()));
    }
    if !stderr.trim().is_empty() {
        out.push_str(&format!("stderr: {}", stderr.trim_end()));
    }
    out
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
