//! Configuration documents and path-addressed mutation
//!
//! A configuration document is a YAML mapping whose values are scalars,
//! sequences or further mappings. Documents come from the stored
//! configuration file, from rendered templates and from command-line
//! overrides; they are combined with the deep merge in [`yaml`].
//!
//! Locations inside a document are addressed with dotted paths such as
//! `worker.instanceType`. Splitting on `.` yields the segment keys, the last
//! segment being the leaf.

pub mod yaml;

use serde_yaml::{Mapping, Value as YamlValue};

use crate::error::{Error, Result};

/// A configuration document: a nested mapping with string keys.
pub type Document = Mapping;

/// Split a dotted path key into its segments.
///
/// Every segment must be non-empty, so `""`, `"a."` and `"a..b"` are
/// rejected with `Error::InvalidPath`.
///
/// # Examples
///
/// ```
/// use vs_emr::merge::split_path;
///
/// assert_eq!(split_path("worker.instanceType").unwrap(), vec!["worker", "instanceType"]);
/// assert!(split_path("").is_err());
/// ```
pub fn split_path(path: &str) -> Result<Vec<&str>> {
    let segments: Vec<&str> = path.split('.').collect();
    if segments.iter().any(|segment| segment.is_empty()) {
        return Err(Error::InvalidPath {
            path: path.to_string(),
        });
    }
    Ok(segments)
}

/// Write `value` into `doc` at the dotted `path`, creating intermediate
/// mappings as needed.
///
/// An intermediate segment that already holds something other than a
/// mapping is silently replaced by a new mapping. Mutates `doc` in place
/// and returns it so calls can be chained.
///
/// # Examples
///
/// ```
/// use serde_yaml::Value;
/// use vs_emr::merge::{set_path, Document};
///
/// let mut doc = Document::new();
/// set_path(&mut doc, "worker.instanceCount", Value::from("4")).unwrap();
/// assert_eq!(doc["worker"]["instanceCount"], Value::from("4"));
/// ```
pub fn set_path<'a>(doc: &'a mut Document, path: &str, value: YamlValue) -> Result<&'a mut Document> {
    let segments = split_path(path)?;
    let (leaf, parents) = segments
        .split_last()
        .ok_or_else(|| Error::InvalidPath {
            path: path.to_string(),
        })?;

    let mut current: &mut Document = doc;
    for segment in parents {
        let entry = current
            .entry(YamlValue::from(*segment))
            .or_insert_with(|| YamlValue::Mapping(Mapping::new()));
        if !entry.is_mapping() {
            *entry = YamlValue::Mapping(Mapping::new());
        }
        current = match entry {
            YamlValue::Mapping(map) => map,
            _ => unreachable!("intermediate segment was just replaced by a mapping"),
        };
    }
    current.insert(YamlValue::from(*leaf), value);

    Ok(doc)
}

/// Look up the value at a dotted path, if every segment exists.
pub fn get_path<'a>(doc: &'a Document, path: &str) -> Option<&'a YamlValue> {
    let segments = split_path(path).ok()?;
    let (first, rest) = segments.split_first()?;
    let mut current = doc.get(*first)?;
    for segment in rest {
        current = current.as_mapping()?.get(*segment)?;
    }
    Some(current)
}
