//! Error types for the scenario runner
//!
//! Only loader-level and driver-level conditions are errors. Step and
//! scenario failures are recorded as data in the results, never raised.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the scenario runner
#[derive(Error, Debug)]
pub enum Error {
    // === Discovery Errors ===
    #[error("Scenarios directory '{}' does not exist", .0.display())]
    ScenariosDirNotFound(PathBuf),

    #[error("No valid scenarios found under '{}'. Each scenario needs a 'name' and a non-empty 'steps' list", .0.display())]
    NoScenarios(PathBuf),

    // === Configuration Errors ===
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration file: {0}")]
    ConfigParse(String),

    // === IO Errors ===
    #[error("Failed to read file '{path}': {error}")]
    FileRead { path: String, error: String },

    #[error("Failed to write report '{path}': {error}")]
    ReportWrite { path: String, error: String },

    // === HTTP Errors ===
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),

    // === Serialization Errors ===
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Create a file read error for the given path
    pub fn file_read(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::FileRead {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }

    /// Create a report write error for the given path
    pub fn report_write(path: &std::path::Path, error: impl std::fmt::Display) -> Self {
        Self::ReportWrite {
            path: path.display().to_string(),
            error: error.to_string(),
        }
    }
}
