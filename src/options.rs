//! # Command-Option Formatting
//!
//! Turns the `options` section of a rendered template into command-line
//! options for the control-plane CLI. Each top-level key becomes one
//! [`CommandOption`], chosen by the type of its value:
//!
//! | value                  | rendered as                      |
//! |------------------------|----------------------------------|
//! | `tags` mapping         | `--tags 'k1=v1' 'k2=v2'`         |
//! | `true` / `false`       | `--key` / `--no-key`             |
//! | sequence or mapping    | `--key '<json>'`                 |
//! | string, number, null   | `--key <json>`                   |
//!
//! Order follows the document; nothing is sorted. JSON is written with
//! `", "` and `": "` separators.
//!
//! The table is the display form. The argument vector carries what a
//! shell would have passed for it, so a string scalar shown as
//! `--name "analysis"` is the two arguments `--name` and `analysis`.

use std::fmt;

use serde::Serialize;
use serde_json::ser::Formatter;
use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::merge::Document;
use crate::shell;

/// Key whose mapping value is rendered as `key=value` arguments.
pub const TAGS_KEY: &str = "tags";

/// One option of the control-plane CLI.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOption {
    /// `--name` when enabled, `--no-name` otherwise.
    Flag { name: String, enabled: bool },
    /// `--tags k=v ...`
    Tags { entries: Vec<(String, String)> },
    /// A sequence passed as one JSON argument.
    List { name: String, json: String },
    /// A mapping passed as one JSON argument.
    Map { name: String, json: String },
    /// A scalar passed as one plain argument and displayed as JSON.
    Scalar {
        name: String,
        text: String,
        json: String,
    },
}

impl CommandOption {
    /// Build the option for one `key: value` entry.
    pub fn from_entry(name: &str, value: &YamlValue) -> Result<Self> {
        if name == TAGS_KEY {
            let map = value.as_mapping().ok_or_else(|| Error::ConfigParse {
                message: format!("`{}` option must be a mapping", TAGS_KEY),
                hint: Some("Write tags as `tags: {key: value}` in the template".to_string()),
            })?;
            let entries = map
                .iter()
                .map(|(k, v)| -> Result<(String, String)> { Ok((scalar_text(k)?, scalar_text(v)?)) })
                .collect::<Result<Vec<_>>>()?;
            return Ok(CommandOption::Tags { entries });
        }

        let name = name.to_string();
        Ok(match value {
            YamlValue::Bool(enabled) => CommandOption::Flag {
                name,
                enabled: *enabled,
            },
            YamlValue::Sequence(_) => CommandOption::List {
                name,
                json: to_json(value)?,
            },
            YamlValue::Mapping(_) => CommandOption::Map {
                name,
                json: to_json(value)?,
            },
            _ => CommandOption::Scalar {
                name,
                text: scalar_text(value)?,
                json: to_json(value)?,
            },
        })
    }

    /// The option name without leading dashes.
    pub fn name(&self) -> &str {
        match self {
            CommandOption::Tags { .. } => TAGS_KEY,
            CommandOption::Flag { name, .. }
            | CommandOption::List { name, .. }
            | CommandOption::Map { name, .. }
            | CommandOption::Scalar { name, .. } => name,
        }
    }

    /// Arguments this option contributes to the argument vector.
    pub fn args(&self) -> Vec<String> {
        match self {
            CommandOption::Flag { name, enabled: true } => vec![format!("--{}", name)],
            CommandOption::Flag { name, enabled: false } => vec![format!("--no-{}", name)],
            CommandOption::Tags { entries } => std::iter::once(format!("--{}", TAGS_KEY))
                .chain(entries.iter().map(|(k, v)| format!("{}={}", k, v)))
                .collect(),
            CommandOption::List { name, json } | CommandOption::Map { name, json } => {
                vec![format!("--{}", name), json.clone()]
            }
            CommandOption::Scalar { name, text, .. } => vec![format!("--{}", name), text.clone()],
        }
    }
}

impl fmt::Display for CommandOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommandOption::Flag { name, enabled: true } => write!(f, "--{}", name),
            CommandOption::Flag { name, enabled: false } => write!(f, "--no-{}", name),
            CommandOption::Tags { entries } => {
                write!(f, "--{}", TAGS_KEY)?;
                for (k, v) in entries {
                    write!(f, " {}", shell::quote_always(&format!("{}={}", k, v)))?;
                }
                Ok(())
            }
            CommandOption::List { name, json } | CommandOption::Map { name, json } => {
                write!(f, "--{} {}", name, shell::quote_always(json))
            }
            CommandOption::Scalar { name, json, .. } => write!(f, "--{} {}", name, json),
        }
    }
}

/// Convert every top-level entry of `options` into a [`CommandOption`].
pub fn to_command_options(options: &Document) -> Result<Vec<CommandOption>> {
    options
        .iter()
        .map(|(key, value)| CommandOption::from_entry(&scalar_text(key)?, value))
        .collect()
}

/// Render `options` as display tokens, one per top-level key.
pub fn to_option_tokens(options: &Document) -> Result<Vec<String>> {
    Ok(to_command_options(options)?
        .iter()
        .map(ToString::to_string)
        .collect())
}

/// Plain text of a scalar: strings verbatim, everything else as JSON.
fn scalar_text(value: &YamlValue) -> Result<String> {
    match value {
        YamlValue::String(s) => Ok(s.clone()),
        other => to_json(other),
    }
}

/// JSON formatter matching the common `json.dumps` layout: single line with
/// a space after every separator.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()>
    where
        W: ?Sized + std::io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> std::io::Result<()>
    where
        W: ?Sized + std::io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> std::io::Result<()>
    where
        W: ?Sized + std::io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Encode a YAML value as single-line JSON.
pub fn to_json(value: &YamlValue) -> Result<String> {
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut serializer)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(yaml: &str) -> Document {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn tokens(yaml: &str) -> Vec<String> {
        to_option_tokens(&doc(yaml)).unwrap()
    }

    #[test]
    fn test_boolean_true_is_bare_flag() {
        assert_eq!(tokens("foo: true"), vec!["--foo"]);
    }

    #[test]
    fn test_boolean_false_is_negated_flag() {
        assert_eq!(tokens("foo: false"), vec!["--no-foo"]);
    }

    #[test]
    fn test_tags_render_quoted_pairs() {
        assert_eq!(tokens("tags: {env: prod}"), vec!["--tags 'env=prod'"]);
        assert_eq!(
            tokens("tags: {env: prod, owner: data team}"),
            vec!["--tags 'env=prod' 'owner=data team'"]
        );
    }

    #[test]
    fn test_tags_must_be_mapping() {
        let err = to_option_tokens(&doc("tags: [a, b]")).unwrap_err();
        assert!(err.to_string().contains("`tags` option must be a mapping"));
    }

    #[test]
    fn test_list_is_json_encoded() {
        assert_eq!(tokens("list: [1, 2]"), vec!["--list '[1, 2]'"]);
    }

    #[test]
    fn test_mapping_is_json_encoded() {
        assert_eq!(
            tokens("ec2-attributes: {KeyName: key, SubnetId: subnet-1}"),
            vec![r#"--ec2-attributes '{"KeyName": "key", "SubnetId": "subnet-1"}'"#]
        );
    }

    #[test]
    fn test_nested_json_encoding() {
        let value: YamlValue =
            serde_yaml::from_str("[{InstanceGroupType: MASTER, InstanceCount: 1}]").unwrap();
        assert_eq!(
            to_json(&value).unwrap(),
            r#"[{"InstanceGroupType": "MASTER", "InstanceCount": 1}]"#
        );
    }

    #[test]
    fn test_scalars() {
        assert_eq!(tokens("release-label: emr-5.8.0"), vec![r#"--release-label "emr-5.8.0""#]);
        assert_eq!(tokens("name: My cluster"), vec![r#"--name "My cluster""#]);
        assert_eq!(tokens("count: 4"), vec!["--count 4"]);
        assert_eq!(tokens("price: 0.5"), vec!["--price 0.5"]);
        assert_eq!(tokens("instance-count: '4'"), vec![r#"--instance-count "4""#]);
    }

    #[test]
    fn test_scalar_display_is_json_but_argument_is_raw() {
        let options = to_command_options(&doc(r#"name: say "hi""#)).unwrap();
        assert_eq!(options[0].to_string(), r#"--name "say \"hi\"""#);
        assert_eq!(options[0].args(), vec!["--name", r#"say "hi""#]);
    }

    #[test]
    fn test_order_follows_document() {
        let rendered = tokens("b: 1\na: true\nc: [x]");
        assert_eq!(rendered, vec!["--b 1", "--a", r#"--c '["x"]'"#]);
    }

    #[test]
    fn test_args_match_what_the_shell_would_see() {
        let options = to_command_options(&doc(
            "name: My cluster\ntags: {env: prod}\nlist: [1, 2]\nuse-default-roles: true\nauto-terminate: false",
        ))
        .unwrap();
        let args: Vec<String> = options.iter().flat_map(|o| o.args()).collect();
        assert_eq!(
            args,
            vec![
                "--name",
                "My cluster",
                "--tags",
                "env=prod",
                "--list",
                "[1, 2]",
                "--use-default-roles",
                "--no-auto-terminate",
            ]
        );
    }

    #[test]
    fn test_variant_selection() {
        let options = to_command_options(&doc("a: true\ntags: {}\nb: [1]\nc: {d: 1}\ne: x")).unwrap();
        assert!(matches!(options[0], CommandOption::Flag { enabled: true, .. }));
        assert!(matches!(&options[1], CommandOption::Tags { entries } if entries.is_empty()));
        assert!(matches!(options[2], CommandOption::List { .. }));
        assert!(matches!(options[3], CommandOption::Map { .. }));
        assert!(matches!(options[4], CommandOption::Scalar { .. }));
        let names: Vec<&str> = options.iter().map(CommandOption::name).collect();
        assert_eq!(names, vec!["a", "tags", "b", "c", "e"]);
    }

    #[test]
    fn test_null_scalar_renders_as_json_null() {
        assert_eq!(tokens("log-uri: null"), vec!["--log-uri null"]);
    }
}
