//! CLI module for trimx-remote
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config_initialization::ConfigOverrides;

pub mod args;
pub mod commands;

/// trimx-remote
///
/// Pick a time range in a local video and have a trim backend cut it,
/// saving the result next to your other downloads.
#[derive(Parser, Debug)]
#[command(name = "trimx-remote")]
#[command(about = "Trim videos through a remote trim backend")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Configuration file (default: trimx-remote.toml when present)
    #[arg(long, global = true, env = "TRIMX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log output format (pretty, compact, json)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Trim backend base URL
    #[arg(long, global = true)]
    pub backend: Option<String>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a video's type, size and duration
    Probe(args::ProbeArgs),
    /// Trim a range out of a video in one shot
    Trim(args::TrimArgs),
    /// Pick a range interactively, then export
    Edit(args::EditArgs),
}

impl Cli {
    /// Settings given on the command line, highest in precedence
    pub fn config_overrides(&self) -> ConfigOverrides {
        let (download_dir, overwrite) = match &self.command {
            Commands::Trim(args) => (args.output_dir.clone(), args.overwrite.then_some(true)),
            Commands::Edit(args) => (args.output_dir.clone(), args.overwrite.then_some(true)),
            Commands::Probe(_) => (None, None),
        };
        ConfigOverrides {
            backend_url: self.backend.clone(),
            download_dir,
            overwrite,
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
            ..Default::default()
        }
    }
}
