//! HTTP server setup.

use crate::pipeline::{AppState, router};
use anyhow::Result;
use axum::extract::Request;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tracing::{error, info, instrument};

/// Serves the API on `listener` until Ctrl+C.
#[instrument(skip_all)]
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let app = router(state).layer(ServiceBuilder::new().map_request(|req: Request| {
        info!(
            method = %req.method(),
            uri = %req.uri(),
            "Incoming HTTP request"
        );
        req
    }));

    info!(addr = %listener.local_addr()?, "Server ready");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_on(tokio::signal::ctrl_c()))
        .await?;

    Ok(())
}

/// Resolves once `signal` fires. If the signal handler could not be
/// installed the server keeps running until the process is stopped externally.
async fn shutdown_on(signal: impl Future<Output = std::io::Result<()>>) {
    match signal.await {
        Ok(()) => info!("Shutting down"),
        Err(e) => {
            error!(error = %e, "Failed to install Ctrl+C handler, graceful shutdown disabled");
            std::future::pending::<()>().await;
        }
    }
}
