//! Cluster identifiers and the cluster info file.
//!
//! `start-cluster --cluster-id-file` stores the `create-cluster` response
//! verbatim. Later commands read the `ClusterId` field back from it.

use std::fs;
use std::path::Path;

use log::{debug, info};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};

/// Resolve the cluster id from an explicit value or a cluster info file.
///
/// The explicit id wins. Without either, this is a
/// [`Error::ClusterIdRequired`] error.
pub fn resolve_cluster_id(explicit: Option<&str>, info_file: Option<&Path>) -> Result<String> {
    if let Some(id) = explicit {
        return Ok(id.to_string());
    }
    let path = info_file.ok_or(Error::ClusterIdRequired)?;
    load_cluster_id(path)
}

/// Read the `ClusterId` field of a cluster info file.
pub fn load_cluster_id(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(Error::FileNotFound {
            kind: "Cluster info",
            path: path.to_path_buf(),
        });
    }

    info!("Loading cluster info from: {}", path.display());
    let content = fs::read_to_string(path)?;
    let info: JsonValue = serde_json::from_str(&content).map_err(|e| Error::ClusterInfo {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    debug!("Cluster info is: {}", info);

    match info.get("ClusterId") {
        Some(JsonValue::String(id)) => Ok(id.clone()),
        Some(other) => Err(Error::ClusterInfo {
            path: path.to_path_buf(),
            message: format!("`ClusterId` is not a string: {}", other),
        }),
        None => Err(Error::ClusterInfo {
            path: path.to_path_buf(),
            message: "missing `ClusterId`".to_string(),
        }),
    }
}

/// Write a `create-cluster` response to `path` unchanged.
pub fn save_cluster_info(path: &Path, response: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, response)?;
    Ok(())
}
