//! Test scenario configuration types
//!
//! Defines the data structures for deserializing YAML test scenarios.
//! Request bodies and expected values are arbitrary nested data, kept as
//! `serde_json::Value` so they can be templated and compared uniformly.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use std::str::FromStr;

/// Importance of a scenario, used only for sorting and aggregate counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Critical,
    Important,
    NiceToHave,
    Unknown,
}

impl Priority {
    /// Sort rank: critical first, unknown last
    pub fn rank(self) -> u8 {
        match self {
            Priority::Critical => 0,
            Priority::Important => 1,
            Priority::NiceToHave => 2,
            Priority::Unknown => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::Important => "important",
            Priority::NiceToHave => "nice-to-have",
            Priority::Unknown => "unknown",
        }
    }

    /// Infer priority from the top-level directory of a path relative to
    /// the discovery root (`critical/login.yaml` is critical)
    pub fn from_relative_path(path: &Path) -> Self {
        let mut components = path.components();
        let first = components.next();
        // A bare file name has no directory to infer from
        if components.next().is_none() {
            return Priority::Unknown;
        }
        match first {
            Some(Component::Normal(segment)) => segment
                .to_str()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Priority::Unknown),
            _ => Priority::Unknown,
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Priority::Critical),
            "important" => Ok(Priority::Important),
            "nice-to-have" => Ok(Priority::NiceToHave),
            "unknown" => Ok(Priority::Unknown),
            other => Err(format!("unrecognized priority '{}'", other)),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scenario document as written in a YAML file
#[derive(Deserialize, Debug)]
pub struct ScenarioDef {
    /// Name of the test scenario
    pub name: String,
    /// Optional description of what the scenario verifies
    pub description: Option<String>,
    /// Explicit priority; overrides the directory-based guess when valid
    pub priority: Option<String>,
    /// The sequence of steps to execute
    pub steps: Vec<Step>,
}

/// A scenario ready to run
#[derive(Debug, Clone)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub steps: Vec<Step>,
    /// Source file relative to the discovery root, for reporting only
    pub source_file: PathBuf,
}

impl Scenario {
    /// Build a scenario from its definition and relative source path
    pub fn from_def(def: ScenarioDef, source_file: PathBuf) -> Self {
        let priority = def
            .priority
            .as_deref()
            .and_then(|p| p.parse().ok())
            .unwrap_or_else(|| Priority::from_relative_path(&source_file));

        Self {
            name: def.name,
            description: def.description,
            priority,
            steps: def.steps,
            source_file,
        }
    }
}

/// A single HTTP interaction
#[derive(Deserialize, Debug, Clone)]
pub struct Step {
    /// Display name (default: "{method} {path}")
    pub name: Option<String>,
    /// HTTP method (default: GET)
    #[serde(default = "default_method")]
    pub method: String,
    /// Request path appended to the API base URL
    #[serde(default)]
    pub path: String,
    /// Extra request headers, merged over `Content-Type: application/json`
    #[serde(default, deserialize_with = "scalar_strings")]
    pub headers: BTreeMap<String, String>,
    /// JSON request body, ignored for GET and HEAD
    pub body: Option<Value>,
    /// Assertions on the response
    pub expect: Option<Expectation>,
    /// Variable name to dot-path into the response body
    #[serde(default)]
    pub capture: BTreeMap<String, String>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// Accept any scalar as a header value: `X-Api-Version: 2` becomes "2"
fn scalar_strings<'de, D>(deserializer: D) -> Result<BTreeMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
    Ok(raw
        .into_iter()
        .map(|(key, value)| {
            let value = match value {
                Value::String(s) => s,
                Value::Null => String::new(),
                other => other.to_string(),
            };
            (key, value)
        })
        .collect())
}

impl Step {
    /// Upper-cased HTTP method
    pub fn method(&self) -> String {
        self.method.to_uppercase()
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("{} {}", self.method(), self.path),
        }
    }
}

/// Expectations for a step's response
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
pub struct Expectation {
    /// Exact status code; anything but an integer never matches
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    /// Substrings that must appear in the serialized body
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub body_contains: Vec<String>,
    /// Field path to regex the stringified field must match
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub body_matches: BTreeMap<String, String>,
    /// Field path to value the field must structurally equal
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub body_equals: BTreeMap<String, Value>,
}
