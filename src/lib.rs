//! Scenario Runner - declarative HTTP scenario testing
//!
//! This library discovers YAML scenario definitions, executes their steps
//! against a JSON API, and produces a console summary and a JSON report.

pub mod cli;
pub mod commands;
pub mod common;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result};
pub use testing::{Report, Scenario, ScenarioResult, Step, StepResult};
