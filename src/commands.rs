//! CLI argument definitions
//!
//! Unset options fall back to the config file, then to built-in defaults.

use clap::Args;
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// Directory searched recursively for scenario YAML files
    #[arg(long)]
    pub scenarios_dir: Option<PathBuf>,

    /// Base URL of the API under test (trailing slash is stripped)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Path of the JSON report to write
    #[arg(long)]
    pub report_file: Option<PathBuf>,

    /// Config file to use instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print per-step progress
    #[arg(long, short)]
    pub verbose: bool,
}
