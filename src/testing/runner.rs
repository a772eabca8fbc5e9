//! Scenario runner
//!
//! Runs a scenario's steps in order against a fresh captured scope. A
//! failing step never stops the scenario; later steps run with whatever
//! was captured so far.

use std::path::PathBuf;

use colored::Colorize;
use serde::Serialize;

use super::config::{Priority, Scenario};
use super::executor::{StepExecutor, StepResult};
use super::variables::CapturedScope;

/// Result of a scenario run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScenarioResult {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: Priority,
    pub passed: bool,
    /// Percentage of steps passed, 0 to 100
    pub satisfaction: u32,
    pub steps_total: usize,
    pub steps_passed: usize,
    pub steps: Vec<StepResult>,
    pub file: PathBuf,
}

impl ScenarioResult {
    /// Score a scenario from its step results
    pub fn from_steps(scenario: &Scenario, steps: Vec<StepResult>) -> Self {
        let steps_total = steps.len();
        let steps_passed = steps.iter().filter(|s| s.passed).count();

        Self {
            name: scenario.name.clone(),
            description: scenario.description.clone(),
            priority: scenario.priority,
            passed: steps_total > 0 && steps_passed == steps_total,
            satisfaction: satisfaction(steps_passed, steps_total),
            steps_total,
            steps_passed,
            steps,
            file: scenario.source_file.clone(),
        }
    }
}

/// round(100 * passed / total), 0 for an empty scenario
pub fn satisfaction(passed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    (100.0 * passed as f64 / total as f64).round() as u32
}

/// Drives scenarios through a step executor
pub struct ScenarioRunner<'a> {
    executor: &'a StepExecutor,
    verbose: bool,
}

impl<'a> ScenarioRunner<'a> {
    pub fn new(executor: &'a StepExecutor, verbose: bool) -> Self {
        Self { executor, verbose }
    }

    /// Run one scenario to completion
    pub async fn run(&self, scenario: &Scenario) -> ScenarioResult {
        let mut captured = CapturedScope::new();
        let mut results = Vec::with_capacity(scenario.steps.len());

        tracing::info!(
            scenario = %scenario.name,
            priority = %scenario.priority,
            steps = scenario.steps.len(),
            "Running scenario"
        );

        if self.verbose {
            eprintln!(
                "\n{} {} {}",
                "Scenario:".blue().bold(),
                scenario.name.white().bold(),
                format!("[{}]", scenario.priority).dimmed()
            );
            if let Some(desc) = &scenario.description {
                eprintln!("  {}", desc.dimmed());
            }
        }

        for (i, step) in scenario.steps.iter().enumerate() {
            let result = self.executor.execute(step, &mut captured).await;
            if self.verbose {
                eprint!("{}", format_step(i + 1, &result));
            }
            results.push(result);
        }

        let result = ScenarioResult::from_steps(scenario, results);
        tracing::info!(
            scenario = %result.name,
            passed = result.passed,
            satisfaction = result.satisfaction,
            "Scenario finished"
        );
        result
    }
}

/// Verbose progress lines for one step, errors indented under failures
fn format_step(step_num: usize, result: &StepResult) -> String {
    let latency = format!("({} ms)", result.latency_ms);
    let marker = if result.passed { "✓".green() } else { "✗".red() };

    let mut out = format!(
        "  {} Step {}: {} {}\n",
        marker,
        step_num,
        result.name,
        latency.dimmed()
    );
    if !result.passed {
        for error in &result.errors {
            out.push_str(&format!("      {}\n", error.red()));
        }
    }
    out
}
