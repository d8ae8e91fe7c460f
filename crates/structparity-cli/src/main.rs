mod cli;
mod commands;
mod config;
mod data;
mod error;
mod logging;
mod utils;

use crate::cli::{Cli, Commands, CorpusSize};
use crate::config::PartialConfig;
use crate::data::DataManager;
use crate::error::{CliError, Result};
use clap::Parser;
use std::path::Path;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run_app().await {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

async fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook.install().map_err(|e| CliError::Other(e.into()))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!(
        "🚀 structparity CLI v{} starting up.",
        env!("CARGO_PKG_VERSION")
    );
    debug!("Full CLI arguments parsed: {:?}", &cli);

    if let Some(num_threads) = cli.threads {
        info!(
            "Setting Rayon global thread pool to {} threads.",
            num_threads
        );
        rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .map_err(|e| {
                CliError::Other(anyhow::anyhow!("Failed to build global thread pool: {}", e))
            })?;
    }

    let storage_root = cli.storage_root.as_deref();
    let config_path = cli.config.as_deref();
    let command_result = match cli.command {
        Commands::Large(args) => {
            info!("Dispatching to 'large' command.");
            let (data_manager, config) = load_config(config_path)?;
            commands::run::run(args, CorpusSize::Large, config, storage_root, &data_manager).await
        }
        Commands::VeryLarge(args) => {
            info!("Dispatching to 'very-large' command.");
            let (data_manager, config) = load_config(config_path)?;
            commands::run::run(args, CorpusSize::VeryLarge, config, storage_root, &data_manager)
                .await
        }
        Commands::Check(args) => {
            info!("Dispatching to 'check' command.");
            let (_, config) = load_config(config_path)?;
            commands::check::run(args, config, storage_root).await
        }
        Commands::Lint(args) => {
            info!("Dispatching to 'lint' command.");
            commands::lint::run(args).await
        }
    };

    match &command_result {
        Ok(_) => {
            info!("✅ Command completed successfully.");
            println!("✅ Command completed successfully.");
        }
        Err(e) => {
            error!("❌ Command failed: {}", e);
        }
    }

    command_result
}

fn load_config(path: Option<&Path>) -> Result<(DataManager, PartialConfig)> {
    let data_manager = DataManager::new()?;
    let config = PartialConfig::load(path, &data_manager)?;
    Ok((data_manager, config))
}
