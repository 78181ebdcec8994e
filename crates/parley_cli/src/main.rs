//! CLI entry point for parley.

mod cli;
mod commands;
mod output;

use clap::Parser;
use parley_observability::ObservabilityConfig;

use crate::cli::Cli;

/// Load the nearest `.env`, walking up from the working directory.
fn load_dotenv() {
    let Ok(cwd) = std::env::current_dir() else {
        return;
    };
    for dir in cwd.ancestors().take(32) {
        let env_file = dir.join(".env");
        if env_file.exists() {
            let _ = dotenvy::from_path(&env_file);
            break;
        }
    }
}

fn init_logging(verbose: bool) {
    let mut config = ObservabilityConfig::from_env().with_stderr(true);
    if verbose {
        config = config.with_log_level("debug");
    } else if config.log_level.is_none() {
        config = config.with_log_level("warn");
    }
    // A second subscriber is only possible in tests; nothing to do then.
    let _ = parley_observability::init(config);
}

#[tokio::main]
async fn main() {
    load_dotenv();
    let cli = Cli::parse();
    output::init(cli.output);
    init_logging(cli.verbose);

    if let Err(e) = commands::handle(cli).await {
        output::error(&format!("{e:#}"));
        std::process::exit(1);
    }
}
