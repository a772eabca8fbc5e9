//! Aggregation and reporting
//!
//! Summarizes scenario results, renders the console table (sorted by
//! priority) and writes the JSON report (in run order).

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use colored::Colorize;
use serde::Serialize;

use crate::common::{Error, Result};

use super::config::Priority;
use super::runner::ScenarioResult;

/// Aggregate counts over a run
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub critical_total: usize,
    pub critical_passed: usize,
    pub critical_failed: usize,
    pub avg_satisfaction: u32,
}

impl Summary {
    pub fn from_results(results: &[ScenarioResult]) -> Self {
        let total = results.len();
        let passed = results.iter().filter(|r| r.passed).count();
        let critical: Vec<&ScenarioResult> = results
            .iter()
            .filter(|r| r.priority == Priority::Critical)
            .collect();
        let critical_passed = critical.iter().filter(|r| r.passed).count();

        let avg_satisfaction = if total == 0 {
            0
        } else {
            let sum: u64 = results.iter().map(|r| u64::from(r.satisfaction)).sum();
            (sum as f64 / total as f64).round() as u32
        };

        Self {
            total,
            passed,
            failed: total - passed,
            critical_total: critical.len(),
            critical_passed,
            critical_failed: critical.len() - critical_passed,
            avg_satisfaction,
        }
    }
}

/// The machine-readable artifact of a run
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub timestamp: String,
    pub api_url: String,
    pub scenarios_dir: PathBuf,
    pub summary: Summary,
    /// Results in execution order
    pub scenarios: Vec<ScenarioResult>,
}

impl Report {
    pub fn new(api_url: &str, scenarios_dir: &Path, scenarios: Vec<ScenarioResult>) -> Self {
        Self::at(Utc::now(), api_url, scenarios_dir, scenarios)
    }

    /// Build a report with an explicit timestamp
    pub fn at(
        timestamp: DateTime<Utc>,
        api_url: &str,
        scenarios_dir: &Path,
        scenarios: Vec<ScenarioResult>,
    ) -> Self {
        Self {
            timestamp: timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            api_url: api_url.to_string(),
            scenarios_dir: scenarios_dir.to_path_buf(),
            summary: Summary::from_results(&scenarios),
            scenarios,
        }
    }

    /// Write the report as pretty JSON, creating parent directories
    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::report_write(path, e))?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| Error::report_write(path, e))?;
        tracing::info!(path = %path.display(), "Report written");
        Ok(())
    }
}

/// Results ordered for display: critical first, otherwise run order
pub fn sorted_by_priority(results: &[ScenarioResult]) -> Vec<&ScenarioResult> {
    let mut sorted: Vec<&ScenarioResult> = results.iter().collect();
    sorted.sort_by_key(|r| r.priority.rank());
    sorted
}

/// Render the console table with a summary footer
pub fn render_table(results: &[ScenarioResult], summary: &Summary) -> String {
    let name_width = results
        .iter()
        .map(|r| r.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Scenario".len());

    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}",
        format!(
            "{:<name_width$}  {:<12}  {:>6}  {:>7}  {}",
            "Scenario", "Priority", "Score", "Steps", "Result"
        )
        .bold()
    );
    let _ = writeln!(out, "{}", "-".repeat(name_width + 45).dimmed());

    for r in sorted_by_priority(results) {
        let marker = if r.passed {
            "✓ PASS".green()
        } else {
            "✗ FAIL".red()
        };
        let _ = writeln!(
            out,
            "{:<name_width$}  {:<12}  {:>5}%  {:>7}  {}",
            r.name,
            r.priority.as_str(),
            r.satisfaction,
            format!("{}/{}", r.steps_passed, r.steps_total),
            marker
        );
    }

    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "{} {}/{} passed, critical {}/{}, average satisfaction {}%",
        "Summary:".cyan().bold(),
        summary.passed,
        summary.total,
        summary.critical_passed,
        summary.critical_total,
        summary.avg_satisfaction
    );

    out
}
