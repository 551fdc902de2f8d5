//! Template store: loads link resources from a directory of YAML files.
//!
//! Files may hold multiple YAML documents. Documents whose `kind` is not
//! [`LINK_KIND`](crate::link::LINK_KIND) are skipped silently; files or
//! documents that fail to read or decode are skipped with a warning so one
//! bad template does not block the rest.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use crate::link::{Link, LINK_KIND};

/// Loads every link resource found in YAML files directly under `dir`.
///
/// Files are visited in sorted name order so the resulting template list is
/// deterministic, which matters because patching selects the first link with
/// a matching name.
///
/// # Errors
///
/// Returns an error string if the directory itself cannot be listed.
pub fn load_links_in_dir(dir: &Path) -> Result<Vec<Link>, String> {
    let mut paths: Vec<PathBuf> = std::fs::read_dir(dir)
        .map_err(|e| format!("Failed to list templates directory {}: {e}", dir.display()))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| is_yaml(path))
        .collect();
    paths.sort();

    let mut links = Vec::new();
    for path in &paths {
        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping unreadable template file");
                continue;
            }
        };
        links.extend(links_in_document(&contents, path));
    }
    Ok(links)
}

/// Decodes every link resource in a (possibly multi-document) YAML string.
fn links_in_document(contents: &str, path: &Path) -> Vec<Link> {
    let mut links = Vec::new();
    for document in serde_yaml::Deserializer::from_str(contents) {
        let value = match serde_yaml::Value::deserialize(document) {
            Ok(value) => value,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping undecodable YAML document");
                continue;
            }
        };
        if value.get("kind").and_then(serde_yaml::Value::as_str) != Some(LINK_KIND) {
            continue;
        }
        match serde_yaml::from_value::<Link>(value) {
            Ok(link) => links.push(link),
            Err(e) => {
                warn!(file = %path.display(), error = %e, "skipping malformed link resource");
            }
        }
    }
    links
}

fn is_yaml(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    )
}
