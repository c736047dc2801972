//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Arguments for the probe command
#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output format (text, json, yaml)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

/// Arguments for the trim command
#[derive(Args, Debug)]
pub struct TrimArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Start time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long, allow_hyphen_values = true)]
    pub start: String,

    /// End time (HH:MM:SS.ms, MM:SS.ms, or seconds)
    #[arg(short, long, allow_hyphen_values = true)]
    pub end: String,

    /// Directory the trimmed video is saved into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Replace an existing file instead of picking a numbered name
    #[arg(long)]
    pub overwrite: bool,
}

/// Arguments for the edit command
#[derive(Args, Debug)]
pub struct EditArgs {
    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Directory exported videos are saved into
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Replace existing files instead of picking numbered names
    #[arg(long)]
    pub overwrite: bool,
}
