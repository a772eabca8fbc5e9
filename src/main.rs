//! Scenario Runner CLI
//!
//! Runs declarative HTTP scenarios against an API and reports how many
//! of their steps were satisfied.

use clap::Parser;
use scenario_runner::cli;
use scenario_runner::commands::RunArgs;
use scenario_runner::common::logging;

#[derive(Parser)]
#[command(name = "scenario-runner", about = "Declarative HTTP scenario runner")]
#[command(version, long_about = None)]
struct Cli {
    #[command(flatten)]
    args: RunArgs,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_cli(cli.args.verbose);

    // Unexpected failures share the fatal exit code
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_hook(info);
        std::process::exit(2);
    }));

    if let Err(e) = cli::dispatch(cli.args).await {
        eprintln!("Error: {e}");
        std::process::exit(2);
    }
}
