//! Command-line interface for the API server.

use crate::config::{ConfigError, ServerConfig};
use clap::Parser;
use std::path::PathBuf;
use tracing::instrument;

/// Backgammon move-query API server
#[derive(Parser, Debug)]
#[command(name = "bgweb_api")]
#[command(about = "HTTP API returning ranked legal backgammon moves", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Folder containing the engine's weight files [default: ./data]
    #[arg(long)]
    pub datadir: Option<PathBuf>,

    /// Port for HTTP server [default: 8080]
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Host to bind to [default: 0.0.0.0]
    #[arg(long)]
    pub host: Option<String>,

    /// Optional TOML config file; command-line flags take precedence
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Merges the config file (if any) with command-line overrides.
    #[instrument(skip(self))]
    pub fn resolve(&self) -> Result<ServerConfig, ConfigError> {
        let base = match &self.config {
            Some(path) => ServerConfig::from_file(path)?,
            None => ServerConfig::default(),
        };
        Ok(base.with_overrides(self.host.clone(), self.port, self.datadir.clone()))
    }
}
