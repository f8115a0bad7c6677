//! Request pipeline: decode, query, encode.

use crate::query::{MoveQuery, MoveQueryService, QueryError, QueryErrorKind};
use crate::wire::{ErrorBody, MoveArgs, MoveBody, encode_moves};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use derive_more::{Display, Error};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Route of the move-query endpoint.
pub const GET_MOVES_PATH: &str = "/api/v1/getmoves";

/// Message returned for engine failures unless detail exposure is enabled.
pub const ENGINE_FAILURE_MESSAGE: &str = "internal engine error while computing moves";

/// Per-request behaviour of the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineSettings {
    /// Upper bound on a single engine call.
    pub engine_timeout: Duration,
    /// Put the engine's error detail in 500 responses.
    pub expose_engine_errors: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            engine_timeout: Duration::from_millis(5000),
            expose_engine_errors: false,
        }
    }
}

/// Shared handler state: the service and pipeline settings.
#[derive(Debug, Clone)]
pub struct AppState {
    service: Arc<MoveQueryService>,
    settings: PipelineSettings,
}

impl AppState {
    /// Bundles an initialized service with pipeline settings.
    #[instrument(skip(service))]
    pub fn new(service: Arc<MoveQueryService>, settings: PipelineSettings) -> Self {
        Self { service, settings }
    }

    /// The move query service.
    pub fn service(&self) -> &Arc<MoveQueryService> {
        &self.service
    }

    /// Pipeline settings.
    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }
}

/// Builds the API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(GET_MOVES_PATH, post(get_moves))
        .with_state(state)
}

/// Error response: a status and a message for the caller.
#[derive(Debug, Clone, Display, Error)]
#[display("{}: {}", status, message)]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Message for the caller.
    pub message: String,
}

impl ApiError {
    /// The body could not be decoded.
    pub fn decode(message: impl Into<String>) -> Self {
        let message = message.into();
        debug!(reason = %message, "Rejected undecodable request");
        Self {
            status: StatusCode::BAD_REQUEST,
            message,
        }
    }

    /// Maps a query failure; engine detail is withheld unless `expose` is set.
    pub fn from_query(err: QueryError, expose: bool) -> Self {
        match err.kind {
            QueryErrorKind::InvalidInput(message) => Self {
                status: StatusCode::BAD_REQUEST,
                message,
            },
            QueryErrorKind::EngineFailure(detail) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: if expose {
                    detail
                } else {
                    ENGINE_FAILURE_MESSAGE.to_string()
                },
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                message: self.message,
            }),
        )
            .into_response()
    }
}

/// Handles `POST /api/v1/getmoves`.
///
/// The engine runs on the blocking pool under the configured timeout and is
/// invoked exactly once per request.
#[instrument(skip_all)]
pub async fn get_moves(
    State(state): State<AppState>,
    payload: Result<Json<MoveArgs>, JsonRejection>,
) -> Result<Json<Vec<MoveBody>>, ApiError> {
    let Json(args) = payload.map_err(|rejection| ApiError::decode(rejection.body_text()))?;
    let query = MoveQuery::try_from(args).map_err(|e| ApiError::decode(e.message))?;

    let settings = *state.settings();
    let service = Arc::clone(state.service());
    let task = tokio::task::spawn_blocking(move || service.compute_moves(&query));

    let outcome = match tokio::time::timeout(settings.engine_timeout, task).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(join_error)) => Err(QueryError::engine_failure(format!(
            "engine task failed: {}",
            join_error
        ))),
        Err(_) => Err(QueryError::engine_failure(format!(
            "engine call exceeded {:?}",
            settings.engine_timeout
        ))),
    };

    let result = outcome.map_err(|e| ApiError::from_query(e, settings.expose_engine_errors))?;
    info!(count = result.len(), "Returning ranked moves");
    Ok(Json(encode_moves(&result)))
}
