//! # Stored Configuration and Resolution
//!
//! The stored configuration is a YAML file with two optional top-level keys:
//!
//! ```yaml
//! default:
//!   worker:
//!     instanceType: r4.2xlarge
//! profiles:
//!   large:
//!     worker:
//!       instanceCount: 10
//!   spot:
//!     worker:
//!       bidPrice: "0.4"
//! ```
//!
//! [`resolve_config`] combines it with what the user typed on the command
//! line. Precedence, lowest to highest:
//!
//! 1. the `default` document
//! 2. every selected profile, in the order given
//! 3. `--conf-json` documents, in the order given
//! 4. `--conf key=value` overrides (values are always strings)
//! 5. explicit option flags such as `--worker-type`
//!
//! All layers are combined with the deep merge from
//! [`crate::merge::yaml`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::{Deserialize, Deserializer};
use serde_yaml::Value as YamlValue;

use crate::error::{Error, Result};
use crate::merge::yaml::merge_all;
use crate::merge::{set_path, Document};
use crate::suggestions;

/// Contents of the stored configuration file.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoredConfig {
    /// Base document applied to every invocation.
    #[serde(deserialize_with = "null_as_default")]
    pub default: Document,

    /// Named fragments selected with `--profile`. A profile without a body
    /// is empty.
    #[serde(deserialize_with = "null_profiles_as_empty")]
    pub profiles: BTreeMap<String, Document>,
}

fn null_profiles_as_empty<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<String, Document>, D::Error>
where
    D: Deserializer<'de>,
{
    let profiles: BTreeMap<String, Option<Document>> = null_as_default(deserializer)?;
    Ok(profiles
        .into_iter()
        .map(|(name, body)| (name, body.unwrap_or_default()))
        .collect())
}

fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl StoredConfig {
    /// Look up a profile by name.
    ///
    /// # Errors
    ///
    /// Returns `Error::ProfileNotDefined`, with a suggestion when a defined
    /// profile has a similar name.
    pub fn profile(&self, name: &str) -> Result<&Document> {
        self.profiles.get(name).ok_or_else(|| {
            let defined: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
            Error::ProfileNotDefined {
                name: name.to_string(),
                hint: suggestions::profile_hint(name, &defined),
            }
        })
    }
}

/// Parse a stored configuration from YAML text.
///
/// Empty text is an empty configuration.
pub fn parse(yaml_content: &str) -> Result<StoredConfig> {
    let raw: YamlValue = serde_yaml::from_str(yaml_content)?;
    if raw.is_null() {
        return Ok(StoredConfig::default());
    }
    serde_yaml::from_value(raw).map_err(|err| Error::ConfigParse {
        message: err.to_string(),
        hint: Some("The file must be a mapping with optional `default` and `profiles` keys".to_string()),
    })
}

/// Read and parse a stored configuration file.
pub fn from_file<P: AsRef<Path>>(path: P) -> Result<StoredConfig> {
    let content = std::fs::read_to_string(path).map_err(Error::Io)?;
    parse(&content)
}

/// A stored configuration together with the file it came from.
#[derive(Debug, Clone, Default)]
pub struct LoadedConfig {
    pub config: StoredConfig,
    /// `None` when no file was found and the empty configuration is used.
    pub path: Option<PathBuf>,
}

/// Load the stored configuration.
///
/// With an explicit path the file must exist. Without one, `default_path` is
/// tried and a missing file silently yields an empty configuration.
pub fn load(explicit: Option<&Path>, default_path: &Path) -> Result<LoadedConfig> {
    let path = explicit.unwrap_or(default_path);

    if path.exists() {
        info!("Loading config from: {}", path.display());
        let config = from_file(path)?;
        debug!("Configuration is: {:?}", config);
        return Ok(LoadedConfig {
            config,
            path: Some(path.to_path_buf()),
        });
    }

    if explicit.is_some() {
        return Err(Error::FileNotFound {
            kind: "Config",
            path: path.to_path_buf(),
        });
    }

    warn!(
        "Default config file not found at: {}. Running with empty configuration",
        path.display()
    );
    Ok(LoadedConfig::default())
}

/// Command-line flags that map onto fixed configuration paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionFlag {
    WorkerType,
    WorkerInstances,
    WorkerBid,
    MasterType,
    MasterBid,
}

impl OptionFlag {
    pub const ALL: [OptionFlag; 5] = [
        OptionFlag::WorkerType,
        OptionFlag::WorkerInstances,
        OptionFlag::WorkerBid,
        OptionFlag::MasterType,
        OptionFlag::MasterBid,
    ];

    /// Dotted configuration path the flag writes to.
    pub fn config_path(self) -> &'static str {
        match self {
            OptionFlag::WorkerType => "worker.instanceType",
            OptionFlag::WorkerInstances => "worker.instanceCount",
            OptionFlag::WorkerBid => "worker.bidPrice",
            OptionFlag::MasterType => "master.instanceType",
            OptionFlag::MasterBid => "master.bidPrice",
        }
    }
}

/// Build a document from explicitly supplied option flags.
///
/// Flags whose value is `None` were not given and do not participate.
pub fn option_flags_document<I>(flags: I) -> Result<Document>
where
    I: IntoIterator<Item = (OptionFlag, Option<String>)>,
{
    let mut doc = Document::new();
    for (flag, value) in flags {
        if let Some(value) = value {
            set_path(&mut doc, flag.config_path(), YamlValue::String(value))?;
        }
    }
    Ok(doc)
}

/// Build a document from `key=value` override strings.
///
/// Each entry is split at the first `=`; the key is a dotted path and the
/// value is kept as a string.
pub fn parse_overrides<S: AsRef<str>>(entries: &[S]) -> Result<Document> {
    let mut doc = Document::new();
    for entry in entries {
        let entry = entry.as_ref();
        let (key, value) = entry.split_once('=').ok_or_else(|| Error::InvalidOverride {
            entry: entry.to_string(),
            hint: Some(suggestions::override_hint(entry)),
        })?;
        set_path(&mut doc, key, YamlValue::String(value.to_string()))?;
    }
    Ok(doc)
}

/// Parse a `--conf-json` argument into a document.
pub fn parse_json_override(text: &str) -> Result<Document> {
    serde_json::from_str(text).map_err(|err| Error::ConfigParse {
        message: format!("Invalid --conf-json document: {}", err),
        hint: Some("Pass a JSON object, e.g. --conf-json '{\"worker\": {\"instanceCount\": 4}}'".to_string()),
    })
}

/// Everything the user supplied on top of the stored configuration.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Profile names, applied left to right.
    pub profiles: Vec<String>,
    /// JSON object documents, applied left to right.
    pub conf_json: Vec<String>,
    /// `key=value` entries.
    pub conf: Vec<String>,
    /// Document built from explicit option flags.
    pub options: Document,
}

/// Combine the stored configuration with user overrides.
pub fn resolve_config(stored: &StoredConfig, overrides: &Overrides) -> Result<Document> {
    let mut layers: Vec<&Document> = vec![&stored.default];

    for name in &overrides.profiles {
        layers.push(stored.profile(name)?);
    }

    let json_docs = overrides
        .conf_json
        .iter()
        .map(|text| parse_json_override(text))
        .collect::<Result<Vec<_>>>()?;
    layers.extend(json_docs.iter());

    let conf_doc = parse_overrides(&overrides.conf)?;
    layers.push(&conf_doc);
    layers.push(&overrides.options);

    let config = merge_all(layers);
    debug!("Resolved configuration: {:?}", config);
    Ok(config)
}
