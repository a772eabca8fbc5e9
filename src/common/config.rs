//! Configuration file handling

use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::paths::config_path;
use super::{Error, Result};

/// Main configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Default run settings, overridden by command-line flags
    #[serde(default)]
    pub defaults: Defaults,

    /// Extra builtin variables available to every scenario
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

/// Default settings
#[derive(Debug, Deserialize)]
pub struct Defaults {
    /// Root directory searched for scenario files
    #[serde(default = "default_scenarios_dir")]
    pub scenarios_dir: PathBuf,

    /// Base URL of the API under test
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Where the JSON report is written
    #[serde(default = "default_report_file")]
    pub report_file: PathBuf,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            scenarios_dir: default_scenarios_dir(),
            api_url: default_api_url(),
            report_file: default_report_file(),
        }
    }
}

fn default_scenarios_dir() -> PathBuf {
    PathBuf::from(".scenarios")
}
fn default_api_url() -> String {
    "http://localhost:3000".to_string()
}
fn default_report_file() -> PathBuf {
    PathBuf::from("reports/scenario-report.json")
}

/// Auth tokens seeded into every run, matching the mock auth backend
const SEEDED_TOKENS: &[(&str, &str)] = &[
    ("admin_token", "mock-admin-token"),
    ("user_token", "mock-user-token"),
    ("analyst_token", "mock-analyst-token"),
];

impl Config {
    /// Load configuration
    ///
    /// An explicitly named file must exist. The default config file is
    /// optional; defaults are returned when it is absent.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::Config(format!(
                    "Config file '{}' not found",
                    path.display()
                )));
            }
            return Self::from_file(path);
        }

        match config_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::file_read(path, e))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::ConfigParse(e.to_string()))
    }

    /// Build the read-only builtin variable set for a run
    ///
    /// Seeded tokens come first, then `[variables]` from the config file.
    /// `api_url` always reflects the effective base URL.
    pub fn builtin_variables(&self, api_url: &str) -> HashMap<String, String> {
        let mut vars: HashMap<String, String> = SEEDED_TOKENS
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        vars.extend(self.variables.iter().map(|(k, v)| (k.clone(), v.clone())));
        vars.insert("api_url".to_string(), api_url.to_string());
        vars
    }
}
