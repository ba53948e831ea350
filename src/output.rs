//! # Run Context and Output
//!
//! Every command receives a [`RunContext`] describing how it was invoked:
//! dry-run, verbose, silent and whether colour is wanted. There is no
//! process-wide state.
//!
//! Colour follows `--color=always|never|auto`. In auto mode the usual
//! environment conventions apply, in this order:
//!
//! | variable           | effect                        |
//! |--------------------|-------------------------------|
//! | `NO_COLOR` (any)   | off                           |
//! | `CLICOLOR=0`       | off                           |
//! | `CLICOLOR_FORCE`   | on, unless empty or `0`       |
//! | `TERM=dumb`        | off                           |
//!
//! Otherwise colour is used when stdout is a colour-capable terminal.
//!
//! ```rust
//! use vs_emr::output::{emoji, OutputConfig};
//!
//! let config = OutputConfig::from_env_and_flag("never", false);
//! config.echo(format!("{} Stopping cluster", emoji(&config, "🛑", "[STOP]")));
//! ```

use std::env;
use std::ffi::OsString;

/// How user-facing messages are printed.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    /// Use emojis and colour.
    pub use_color: bool,
    /// Suppress progress messages.
    pub silent: bool,
}

impl OutputConfig {
    /// `color_flag` is the `--color` value; anything other than `always` or
    /// `never` (case-insensitive) means auto-detection.
    pub fn from_env_and_flag(color_flag: &str, silent: bool) -> Self {
        let use_color = if color_flag.eq_ignore_ascii_case("always") {
            true
        } else if color_flag.eq_ignore_ascii_case("never") {
            false
        } else {
            color_from_env(|name| env::var_os(name))
                .unwrap_or_else(|| console::Term::stdout().features().colors_supported())
        };
        Self { use_color, silent }
    }

    /// Print a progress message unless silent.
    pub fn echo(&self, message: impl AsRef<str>) {
        if !self.silent {
            println!("{}", message.as_ref());
        }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self {
            use_color: false,
            silent: true,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto", false)
    }
}

/// Colour decision from environment conventions; `None` leaves it to the
/// terminal.
fn color_from_env<F>(var: F) -> Option<bool>
where
    F: Fn(&str) -> Option<OsString>,
{
    let is = |name: &str, value: &str| var(name).is_some_and(|v| v == value);

    if var("NO_COLOR").is_some() || is("CLICOLOR", "0") {
        return Some(false);
    }
    if var("CLICOLOR_FORCE").is_some_and(|v| !v.is_empty() && v != "0") {
        return Some(true);
    }
    if is("TERM", "dumb") {
        return Some(false);
    }
    None
}

/// How a command was invoked.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Print commands instead of executing them.
    pub dry_run: bool,
    /// Print the resolved configuration, option list and command output.
    pub verbose: bool,
    pub output: OutputConfig,
}

impl RunContext {
    pub fn echo(&self, message: impl AsRef<str>) {
        self.output.echo(message);
    }

    /// Print a message only in verbose mode.
    pub fn detail(&self, message: impl AsRef<str>) {
        if self.verbose {
            self.output.echo(message);
        }
    }
}

/// `emoji_str` when colour is on, `plain` otherwise.
pub fn emoji<'a>(config: &OutputConfig, emoji_str: &'a str, plain: &'a str) -> &'a str {
    if config.use_color {
        emoji_str
    } else {
        plain
    }
}
