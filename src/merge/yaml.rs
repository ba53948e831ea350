//! Deep merge of configuration documents
//!
//! Later documents override earlier ones at the leaf level:
//!
//! - Mappings on both sides are merged recursively.
//! - Anything else is replaced wholesale by the overlay value. Sequences are
//!   replaced, never concatenated.
//!
//! Both [`merge`] and [`merge_all`] are pure: inputs are never mutated.
//!
//! ## Example
//!
//! ```
//! use vs_emr::merge::{yaml::merge, Document};
//!
//! let base: Document = serde_yaml::from_str("worker: {instanceType: r4.xlarge, instanceCount: 2}").unwrap();
//! let overlay: Document = serde_yaml::from_str("worker: {instanceCount: 8}").unwrap();
//! let merged = merge(&base, &overlay);
//! assert_eq!(merged["worker"]["instanceType"], "r4.xlarge");
//! assert_eq!(merged["worker"]["instanceCount"], 8);
//! ```

use log::{trace, warn};
use serde_yaml::Value as YamlValue;

use super::Document;

/// Return a new document with every key of `overlay` laid over `base`.
pub fn merge(base: &Document, overlay: &Document) -> Document {
    let mut target = base.clone();
    merge_mappings(&mut target, overlay, "");
    target
}

/// Fold [`merge`] left-to-right over `docs`, starting from an empty
/// document. Later documents win ties.
pub fn merge_all<'a, I>(docs: I) -> Document
where
    I: IntoIterator<Item = &'a Document>,
{
    docs.into_iter().fold(Document::new(), |acc, doc| {
        let mut target = acc;
        merge_mappings(&mut target, doc, "");
        target
    })
}

/// Recursively merge `source` into `target` in place.
///
/// `path` is the dotted location of `target` and is only used for logging.
fn merge_mappings(target: &mut Document, source: &Document, path: &str) {
    for (key, value) in source {
        let key_str = match key {
            YamlValue::String(s) => s.clone(),
            _ => format!("{:?}", key),
        };
        let new_path = if path.is_empty() {
            key_str
        } else {
            format!("{}.{}", path, key_str)
        };

        match (target.get_mut(key), value) {
            (Some(YamlValue::Mapping(existing)), YamlValue::Mapping(incoming)) => {
                merge_mappings(existing, incoming, &new_path);
            }
            (Some(existing), _) => {
                if existing.is_mapping() != value.is_mapping() && !existing.is_null() && !value.is_null() {
                    warn!(
                        "Type mismatch at path '{}': replacing {} with {}",
                        new_path,
                        get_yaml_type_name(existing),
                        get_yaml_type_name(value)
                    );
                } else {
                    trace!("Overriding value at path '{}'", new_path);
                }
                *existing = value.clone();
            }
            (None, _) => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Get a human-readable type name for a YAML value
///
/// Used for logging and error messages to describe the type of a value.
pub fn get_yaml_type_name(value: &YamlValue) -> &'static str {
    match value {
        YamlValue::Null => "Null",
        YamlValue::Bool(_) => "Bool",
        YamlValue::Number(_) => "Number",
        YamlValue::String(_) => "String",
        YamlValue::Sequence(_) => "Sequence",
        YamlValue::Mapping(_) => "Mapping",
        YamlValue::Tagged(_) => "Tagged",
    }
}
