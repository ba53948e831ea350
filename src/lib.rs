//! # vs-emr Library
//!
//! This library implements the `vs-emr` command-line tool, which launches
//! EMR clusters and submits Spark steps to them by driving the AWS
//! command-line interface. The binary is a thin layer over the modules
//! below.
//!
//! ## Quick Example
//!
//! ```
//! use vs_emr::config::{self, Overrides};
//! use vs_emr::options::to_option_tokens;
//! use vs_emr::template::{resolve_template, TemplateRenderer};
//!
//! let stored = config::parse(
//!     r#"
//! default:
//!   cluster:
//!     name: analysis
//! profiles:
//!   small:
//!     worker:
//!       instanceType: r4.large
//! "#,
//! )
//! .unwrap();
//!
//! let overrides = Overrides {
//!     profiles: vec!["small".to_string()],
//!     ..Default::default()
//! };
//! let user_config = config::resolve_config(&stored, &overrides).unwrap();
//!
//! let renderer = TemplateRenderer::new().unwrap();
//! let template = "options:\n  name: \"{{ cluster.name }}\"\n  use-default-roles: true\n";
//! let resolved = resolve_template(&renderer, template, &user_config).unwrap();
//! assert_eq!(
//!     to_option_tokens(&resolved.options).unwrap(),
//!     vec![r#"--name "analysis""#, "--use-default-roles"]
//! );
//! ```
//!
//! ## Core Concepts
//!
//! - **Documents (`merge`)**: configuration is a nested YAML mapping. Dotted
//!   paths address locations inside it and documents are deep-merged, later
//!   documents winning.
//! - **Configuration (`config`)**: the stored configuration file holds a
//!   `default` document and named `profiles`. Profiles, `--conf-json`
//!   documents, `--conf key=value` overrides and explicit option flags are
//!   layered on top, in that order.
//! - **Templates (`template`)**: a cluster template renders to `defaults`
//!   and `options`. Defaults may depend on user values, so the template is
//!   rendered three times with progressively more context.
//! - **Options (`options`)**: the `options` section becomes command-line
//!   options for `create-cluster`.
//! - **Execution (`exec`, `cluster`)**: commands are argument vectors run
//!   through a [`exec::CommandRunner`]. Cluster ids come from the command
//!   line or from the saved `create-cluster` response.

pub mod cluster;
pub mod config;
pub mod defaults;
pub mod error;
pub mod exec;
pub mod merge;
pub mod options;
pub mod output;
pub mod shell;
pub mod suggestions;
pub mod template;

#[cfg(test)]
mod merge_proptest;
