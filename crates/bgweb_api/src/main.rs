//! bgweb API server binary.

use anyhow::{Context, Result};
use bgweb_api::{AppState, Cli, MoveQueryService, serve};
use bgweb_engine::{DirAssets, Engine};
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    initialize_tracing();

    let config = cli.resolve()?;
    info!(?config, "Starting bgweb API");

    let assets = DirAssets::new(config.data_dir());
    let engine = Engine::initialize(&assets).with_context(|| {
        format!(
            "failed to initialize engine from {}",
            config.data_dir().display()
        )
    })?;

    let service = MoveQueryService::new(Arc::new(engine));
    let state = AppState::new(Arc::new(service), config.pipeline_settings());

    let listener = TcpListener::bind((config.host().as_str(), *config.port()))
        .await
        .with_context(|| format!("failed to bind {}:{}", config.host(), config.port()))?;

    serve(listener, state).await
}

fn initialize_tracing() {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,bgweb_api=debug,bgweb_engine=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
