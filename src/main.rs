//! trimx-remote
//!
//! Trim a local video through a remote trim backend.
//!
//! # Usage
//!
//! ```bash
//! trimx-remote probe --input movie.mov
//! trimx-remote trim --input movie.mov --start 1:05 --end 1:40.5
//! trimx-remote edit --input movie.mov --output-dir clips
//! ```

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use trimx_remote::app::DefaultAppContainer;
use trimx_remote::cli::{commands, Cli, Commands};
use trimx_remote::config_initialization::initialize_configuration_hierarchy;
use trimx_remote::utils::logging::LoggingSystem;

/// Main entry point for the trimx-remote CLI application
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let (config, sources) =
        initialize_configuration_hierarchy(cli.config.as_deref(), cli.config_overrides())
            .context("Failed to load configuration")?;

    let logging = LoggingSystem::new(config.log_level, config.log_format);
    logging.initialize()?;
    logging.log_system_info();
    sources.log();
    info!(backend = %config.backend_url, download_dir = %config.download_dir.display(), "Configuration loaded");

    let container =
        DefaultAppContainer::new(&config).context("Failed to initialize application")?;

    // Execute the requested command
    match cli.command {
        Commands::Probe(args) => {
            info!("Executing probe command");
            commands::probe(&container, args).await?;
        }
        Commands::Trim(args) => {
            info!("Executing trim command");
            commands::trim(&container, args).await?;
        }
        Commands::Edit(args) => {
            info!("Executing edit command");
            commands::edit(&container, args).await?;
        }
    }

    info!("trimx-remote completed successfully");
    Ok(())
}
