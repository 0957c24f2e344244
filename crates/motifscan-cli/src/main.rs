mod cli;
mod commands;
mod config;
mod error;
mod export;
mod logging;
mod paths;
mod provider;
mod store;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!(version = env!("CARGO_PKG_VERSION"), "motifscan starting.");
    debug!("Parsed arguments: {:?}", &cli);

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .map_err(|e| CliError::Other(anyhow::anyhow!("Failed to size the worker pool: {}", e)))?;
        info!(threads, "Worker pool configured.");
    }

    let outcome = match cli.command {
        Commands::Scan(args) => commands::scan::run(args),
        Commands::Motifs(args) => commands::motifs::run(args),
    };
    if let Err(e) = &outcome {
        error!("Command failed: {}", e);
    }
    outcome
}
