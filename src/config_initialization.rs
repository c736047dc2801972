//! Configuration initialization and hierarchy management

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::adapters::toml_config::TomlConfigAdapter;
use crate::error::{ClientError, ClientResult};
use crate::utils::logging::{LogFormat, LogLevel};

/// Effective client settings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientConfig {
    pub backend_url: String,
    pub trim_path: String,
    pub request_timeout_secs: u64,
    pub probe_timeout_secs: u64,
    pub download_dir: PathBuf,
    pub overwrite: bool,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".to_string(),
            trim_path: "/api/trim-video".to_string(),
            request_timeout_secs: 300,
            probe_timeout_secs: 10,
            download_dir: PathBuf::from("."),
            overwrite: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Pretty,
        }
    }
}

impl ClientConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Layer one source of overrides on top of the current values
    pub fn apply(&mut self, overrides: ConfigOverrides) -> ClientResult<()> {
        if let Some(url) = overrides.backend_url {
            self.backend_url = url;
        }
        if let Some(path) = overrides.trim_path {
            self.trim_path = path;
        }
        if let Some(secs) = overrides.request_timeout_secs {
            self.request_timeout_secs = secs;
        }
        if let Some(secs) = overrides.probe_timeout_secs {
            self.probe_timeout_secs = secs;
        }
        if let Some(dir) = overrides.download_dir {
            self.download_dir = dir;
        }
        if let Some(overwrite) = overrides.overwrite {
            self.overwrite = overwrite;
        }
        if let Some(level) = overrides.log_level {
            self.log_level = LogLevel::parse(&level).map_err(ClientError::config)?;
        }
        if let Some(format) = overrides.log_format {
            self.log_format = LogFormat::parse(&format).map_err(ClientError::config)?;
        }
        Ok(())
    }

    /// Reject settings that cannot produce a working client
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.backend_url.trim();
        if url.is_empty() {
            return Err(ClientError::config("backend_url cannot be empty"));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::config(format!(
                "backend_url must start with http:// or https://, got {}",
                url
            )));
        }
        if !self.trim_path.starts_with('/') {
            return Err(ClientError::config(format!(
                "trim_path must start with '/', got {}",
                self.trim_path
            )));
        }
        if self.request_timeout_secs == 0 {
            return Err(ClientError::config("request_timeout_secs must be greater than 0"));
        }
        if self.probe_timeout_secs == 0 {
            return Err(ClientError::config("probe_timeout_secs must be greater than 0"));
        }
        Ok(())
    }
}

/// Optional values from one configuration source
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigOverrides {
    pub backend_url: Option<String>,
    pub trim_path: Option<String>,
    pub request_timeout_secs: Option<u64>,
    pub probe_timeout_secs: Option<u64>,
    pub download_dir: Option<PathBuf>,
    pub overwrite: Option<bool>,
    pub log_level: Option<String>,
    pub log_format: Option<String>,
}

/// Environment variables and the settings they override
pub const ENV_MAPPINGS: &[(&str, &str)] = &[
    ("TRIMX_BACKEND_URL", "backend_url"),
    ("TRIMX_TRIM_PATH", "trim_path"),
    ("TRIMX_REQUEST_TIMEOUT_SECS", "request_timeout_secs"),
    ("TRIMX_PROBE_TIMEOUT_SECS", "probe_timeout_secs"),
    ("TRIMX_DOWNLOAD_DIR", "download_dir"),
    ("TRIMX_OVERWRITE", "overwrite"),
    ("TRIMX_LOG_LEVEL", "log_level"),
];

/// Collect overrides from environment variables through `lookup`
pub fn overrides_from_env(lookup: impl Fn(&str) -> Option<String>) -> ClientResult<ConfigOverrides> {
    let mut overrides = ConfigOverrides::default();
    for (var, key) in ENV_MAPPINGS {
        let Some(value) = lookup(var) else { continue };
        match *key {
            "backend_url" => overrides.backend_url = Some(value),
            "trim_path" => overrides.trim_path = Some(value),
            "request_timeout_secs" => {
                overrides.request_timeout_secs = Some(parse_env(var, &value)?)
            }
            "probe_timeout_secs" => overrides.probe_timeout_secs = Some(parse_env(var, &value)?),
            "download_dir" => overrides.download_dir = Some(PathBuf::from(value)),
            "overwrite" => overrides.overwrite = Some(parse_env(var, &value)?),
            "log_level" => overrides.log_level = Some(value),
            _ => {}
        }
    }
    Ok(overrides)
}

fn parse_env<T: std::str::FromStr>(var: &str, value: &str) -> ClientResult<T>
where
    T::Err: std::fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e| ClientError::config(format!("Invalid value for {}: {} ({})", var, value, e)))
}

/// Where the effective configuration came from
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigSources {
    pub file: Option<PathBuf>,
    pub env_vars: Vec<&'static str>,
}

impl ConfigSources {
    /// Report the sources; call once the subscriber is installed
    pub fn log(&self) {
        match &self.file {
            Some(path) => info!(path = %path.display(), "Loaded configuration file"),
            None => info!("No configuration file found, using defaults"),
        }
        for var in &self.env_vars {
            info!("Found environment override: {}", var);
        }
    }
}

/// Build configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration_hierarchy(
    config_path: Option<&Path>,
    cli_overrides: ConfigOverrides,
) -> ClientResult<(ClientConfig, ConfigSources)> {
    let mut config = ClientConfig::default();
    let mut sources = ConfigSources::default();

    if let Some(adapter) = TomlConfigAdapter::locate(config_path) {
        config.apply(adapter.load()?)?;
        sources.file = Some(adapter.path().to_path_buf());
    }

    config.apply(overrides_from_env(|var| std::env::var(var).ok())?)?;
    sources.env_vars = ENV_MAPPINGS
        .iter()
        .map(|(var, _)| *var)
        .filter(|var| std::env::var_os(var).is_some())
        .collect();

    config.apply(cli_overrides)?;
    config.validate()?;

    Ok((config, sources))
}
