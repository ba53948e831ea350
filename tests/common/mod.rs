//! Shared test utilities for the CLI end-to-end tests.
//!
//! Add `mod common;` to a test file, then use the helpers:
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let fixture = TestFixture::new();
//!     fixture.cmd().args(["stop-cluster", "--cluster-id", "j-1", "--dry-run"]).assert().success();
//! }
//! ```

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use std::path::PathBuf;

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    #[allow(unused_imports)]
    pub use assert_fs::prelude::*;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::configs;
    pub use super::TestFixture;
}

/// Configuration files and responses used across tests.
#[allow(dead_code)]
pub mod configs {
    /// Stored configuration with a default section and two profiles.
    pub const WITH_PROFILES: &str = r#"
default:
  cluster:
    name: analysis
profiles:
  small:
    worker:
      instanceType: r4.large
  spot:
    worker:
      bidPrice: "0.25"
"#;

    /// A `create-cluster` response.
    pub const CREATE_RESPONSE: &str = r#"{
    "ClusterId": "j-3SD91U2E1L2QX",
    "ClusterArn": "arn:aws:elasticmapreduce:us-east-1:123456789012:cluster/j-3SD91U2E1L2QX"
}"#;

    /// An `add-steps` response.
    pub const ADD_STEPS_RESPONSE: &str = r#"{"StepIds": ["s-2ZH6FOA2JJHNJ"]}"#;
}

/// A temporary home directory in which `vs-emr` runs in isolation.
pub struct TestFixture {
    pub temp: TempDir,
}

#[allow(dead_code)]
impl TestFixture {
    pub fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    /// A `vs-emr` command whose home directory is the fixture and whose
    /// environment carries no vs-emr settings.
    pub fn cmd(&self) -> Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("vs-emr");
        cmd.current_dir(self.temp.path())
            .env("HOME", self.temp.path())
            .env("NO_COLOR", "1")
            .env_remove("VS_EMR_CONFIG")
            .env_remove("VS_EMR_AWS_CLI")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Write a file relative to the fixture root and return its path.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let child = self.temp.child(name);
        child.write_str(content).unwrap();
        child.path().to_path_buf()
    }

    /// Write `~/.vs_emr/config.yaml`.
    pub fn with_home_config(self, content: &str) -> Self {
        self.write(".vs_emr/config.yaml", content);
        self
    }

    /// Install a fake control-plane CLI that records its arguments, one per
    /// line, in `aws-args.txt`, prints `response` and exits with `code`.
    #[cfg(unix)]
    pub fn fake_aws(&self, response: &str, code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let log = self.temp.path().join("aws-args.txt");
        let script = format!(
            "#!/bin/sh\nprintf '%s\\n' \"$@\" > '{}'\ncat <<'RESPONSE'\n{}\nRESPONSE\nexit {}\n",
            log.display(),
            response,
            code
        );
        let path = self.write("bin/aws", &script);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Arguments recorded by the fake control-plane CLI.
    pub fn recorded_args(&self) -> Vec<String> {
        std::fs::read_to_string(self.temp.path().join("aws-args.txt"))
            .unwrap()
            .lines()
            .map(str::to_string)
            .collect()
    }
}
