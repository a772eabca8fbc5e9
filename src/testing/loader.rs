//! Scenario discovery
//!
//! Walks the scenarios directory for `.yaml`/`.yml` files (following
//! symlinks) and parses every document in each file. Documents without a
//! `name` or with an empty `steps` list are skipped silently. A document
//! whose steps cannot be read is logged and skipped on its own; a file
//! that is not valid YAML is logged and skipped as a whole.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use walkdir::WalkDir;

use crate::common::{Error, Result};

use super::config::{Scenario, ScenarioDef};

const SCENARIO_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Load every valid scenario under `root`, in sorted path order
///
/// Fails when `root` does not exist or when no valid scenario is found.
pub fn load_scenarios(root: &Path) -> Result<Vec<Scenario>> {
    if !root.is_dir() {
        return Err(Error::ScenariosDirNotFound(root.to_path_buf()));
    }

    let mut scenarios = Vec::new();
    for path in discover_files(root) {
        let relative = path.strip_prefix(root).unwrap_or(&path).to_path_buf();

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(file = %relative.display(), error = %e, "Skipping unreadable scenario file");
                continue;
            }
        };

        match parse_scenarios(&content, &relative) {
            Ok(found) => {
                tracing::debug!(file = %relative.display(), count = found.len(), "Loaded scenario file");
                scenarios.extend(found);
            }
            Err(e) => {
                tracing::warn!(file = %relative.display(), error = %e, "Skipping scenario file that failed to parse");
            }
        }
    }

    if scenarios.is_empty() {
        return Err(Error::NoScenarios(root.to_path_buf()));
    }

    Ok(scenarios)
}

/// Recursively list scenario files under `root`, sorted by path
fn discover_files(root: &Path) -> Vec<PathBuf> {
    WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "Skipping unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_scenario_extension(path))
        .collect()
}

fn has_scenario_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SCENARIO_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Parse all documents in one file
///
/// Only invalid YAML fails the file. A scenario document with a malformed
/// step is skipped with a warning and its siblings are kept.
pub fn parse_scenarios(content: &str, source_file: &Path) -> Result<Vec<Scenario>> {
    let mut scenarios = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(content).enumerate() {
        let value = serde_yaml::Value::deserialize(document)?;
        if !is_scenario_document(&value) {
            continue;
        }
        match serde_yaml::from_value::<ScenarioDef>(value) {
            Ok(def) => scenarios.push(Scenario::from_def(def, source_file.to_path_buf())),
            Err(e) => {
                tracing::warn!(
                    file = %source_file.display(),
                    document = index + 1,
                    error = %e,
                    "Skipping scenario document with malformed steps"
                );
            }
        }
    }

    Ok(scenarios)
}

fn is_scenario_document(value: &serde_yaml::Value) -> bool {
    let has_name = value.get("name").map(|n| n.is_string()).unwrap_or(false);
    let has_steps = value
        .get("steps")
        .and_then(|s| s.as_sequence())
        .map(|s| !s.is_empty())
        .unwrap_or(false);
    has_name && has_steps
}
