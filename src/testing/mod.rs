//! Scenario test runner
//!
//! Reads declarative YAML scenarios, runs their HTTP steps against an API,
//! carries captured values between steps of the same scenario, and scores
//! and reports the outcome.

mod assertions;
mod config;
mod executor;
mod loader;
mod report;
mod runner;
mod variables;

pub use assertions::{check_expectations, lookup_path, ResponseBody};
pub use config::*;
pub use executor::{ActualResponse, StepExecutor, StepResult};
pub use loader::{load_scenarios, parse_scenarios};
pub use report::{render_table, sorted_by_priority, Report, Summary};
pub use runner::{satisfaction, ScenarioResult, ScenarioRunner};
pub use variables::{Builtins, CapturedScope, Resolver};
