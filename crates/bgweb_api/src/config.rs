//! Server configuration.

use crate::pipeline::PipelineSettings;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Settings for the HTTP server, read from an optional TOML file.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind to.
    #[serde(default = "default_host")]
    host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    port: u16,

    /// Directory holding the engine's weight files.
    #[serde(default = "default_data_dir")]
    data_dir: PathBuf,

    /// Upper bound on a single engine call, in milliseconds.
    #[serde(default = "default_engine_timeout_ms")]
    engine_timeout_ms: u64,

    /// Return engine error detail to callers instead of a generic message.
    #[serde(default)]
    expose_engine_errors: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./data")
}

fn default_engine_timeout_ms() -> u64 {
    5000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: default_data_dir(),
            engine_timeout_ms: default_engine_timeout_ms(),
            expose_engine_errors: false,
        }
    }
}

impl ServerConfig {
    /// Loads configuration from a TOML file. Missing keys take their defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("Failed to read config file: {}", e))
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| {
            ConfigError::new(format!("Failed to parse config: {}", e))
        })?;

        if config.engine_timeout_ms == 0 {
            return Err(ConfigError::new("engine-timeout-ms must be positive"));
        }

        info!(
            port = config.port,
            data_dir = %config.data_dir.display(),
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Replaces the listed settings where a value is given.
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
        data_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            self.port = port;
        }
        if let Some(data_dir) = data_dir {
            self.data_dir = data_dir;
        }
        self
    }

    /// Engine timeout as a duration.
    pub fn engine_timeout(&self) -> Duration {
        Duration::from_millis(self.engine_timeout_ms)
    }

    /// Settings handed to the request pipeline.
    pub fn pipeline_settings(&self) -> PipelineSettings {
        PipelineSettings {
            engine_timeout: self.engine_timeout(),
            expose_engine_errors: self.expose_engine_errors,
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
