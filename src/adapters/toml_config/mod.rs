// TOML config adapter - Reads the `[trimx]` table of a configuration file

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::config_initialization::ConfigOverrides;
use crate::error::{ClientError, ClientResult};

/// File looked up in the working directory when no `--config` is given
pub const DEFAULT_CONFIG_FILE: &str = "trimx-remote.toml";

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    trimx: ConfigOverrides,
}

/// TOML configuration adapter
pub struct TomlConfigAdapter {
    path: PathBuf,
}

impl TomlConfigAdapter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Adapter for the explicit path, else for the default file if it exists
    pub fn locate(explicit: Option<&Path>) -> Option<Self> {
        match explicit {
            Some(path) => Some(Self::new(path)),
            None => {
                let default = PathBuf::from(DEFAULT_CONFIG_FILE);
                default.is_file().then(|| Self::new(default))
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the file
    pub fn load(&self) -> ClientResult<ConfigOverrides> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ClientError::config(format!(
                "Failed to read config file {}: {}",
                self.path.display(),
                e
            ))
        })?;
        let overrides = parse_config(&content)?;
        debug!(path = %self.path.display(), "Parsed configuration file");
        Ok(overrides)
    }
}

/// Parse TOML text with settings under `[trimx]`
pub fn parse_config(content: &str) -> ClientResult<ConfigOverrides> {
    let file: ConfigFile = toml::from_str(content)
        .map_err(|e| ClientError::config(format!("Failed to parse TOML config: {}", e)))?;
    Ok(file.trimx)
}
