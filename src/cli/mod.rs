//! Top-level driver
//!
//! Loads configuration, discovers scenarios, runs them one after another,
//! prints the results table and writes the report.

use std::path::PathBuf;

use colored::Colorize;

use crate::commands::RunArgs;
use crate::common::config::Config;
use crate::common::{normalize_base_url, Result};
use crate::testing::{
    load_scenarios, render_table, Builtins, Report, ScenarioRunner, StepExecutor,
};

/// Effective settings after merging flags, config file and defaults
#[derive(Debug, Clone, PartialEq)]
pub struct RunSettings {
    pub scenarios_dir: PathBuf,
    pub api_url: String,
    pub report_file: PathBuf,
    pub verbose: bool,
}

impl RunSettings {
    pub fn resolve(args: &RunArgs, config: &Config) -> Self {
        let api_url = args
            .api_url
            .clone()
            .unwrap_or_else(|| config.defaults.api_url.clone());

        Self {
            scenarios_dir: args
                .scenarios_dir
                .clone()
                .unwrap_or_else(|| config.defaults.scenarios_dir.clone()),
            api_url: normalize_base_url(&api_url),
            report_file: args
                .report_file
                .clone()
                .unwrap_or_else(|| config.defaults.report_file.clone()),
            verbose: args.verbose,
        }
    }
}

/// Run every discovered scenario and return the report
///
/// Scenario failures are part of the report; only discovery and
/// configuration problems are returned as errors. Writing the report is
/// left to the caller.
pub async fn run(settings: &RunSettings, config: &Config) -> Result<Report> {
    let scenarios = load_scenarios(&settings.scenarios_dir)?;
    tracing::info!(
        count = scenarios.len(),
        dir = %settings.scenarios_dir.display(),
        "Discovered scenarios"
    );

    let builtins = Builtins::new(config.builtin_variables(&settings.api_url));
    let executor = StepExecutor::new(&settings.api_url, builtins)?;
    let runner = ScenarioRunner::new(&executor, settings.verbose);

    let mut results = Vec::with_capacity(scenarios.len());
    for scenario in &scenarios {
        results.push(runner.run(scenario).await);
    }

    Ok(Report::new(executor.api_url(), &settings.scenarios_dir, results))
}

/// Entry point used by the binary
pub async fn dispatch(args: RunArgs) -> Result<()> {
    let config = Config::load(args.config.as_deref())?;
    let settings = RunSettings::resolve(&args, &config);

    println!(
        "{} {} {} {}",
        "Running scenarios from".cyan(),
        settings.scenarios_dir.display().to_string().white().bold(),
        "against".cyan(),
        settings.api_url.white().bold()
    );

    let report = run(&settings, &config).await?;

    println!();
    print!("{}", render_table(&report.scenarios, &report.summary));

    report.write(&settings.report_file)?;
    println!(
        "{} {}",
        "Report:".cyan(),
        settings.report_file.display().to_string().dimmed()
    );

    Ok(())
}
