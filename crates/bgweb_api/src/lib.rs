//! bgweb API - ranked legal backgammon moves over HTTP
//!
//! # Architecture
//!
//! - **Query**: [`MoveQueryService`] validates a position and roll and ranks
//!   the engine's candidates
//! - **Wire**: JSON bodies of `POST /api/v1/getmoves`
//! - **Pipeline**: decode, query on the blocking pool, encode
//! - **Server**: router, request logging, listener
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use bgweb_api::{AppState, MoveQueryService, PipelineSettings, serve};
//! use bgweb_engine::{DirAssets, Engine};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let engine = Engine::initialize(&DirAssets::new("./data"))?;
//! let service = MoveQueryService::new(Arc::new(engine));
//! let state = AppState::new(Arc::new(service), PipelineSettings::default());
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//! serve(listener, state).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod config;
mod pipeline;
mod query;
mod server;
mod wire;

// Crate-level exports - Configuration
pub use cli::Cli;
pub use config::{ConfigError, ServerConfig};

// Crate-level exports - Move query service
pub use query::{
    MoveOptions, MoveQuery, MoveQueryService, MoveResultSet, Position, QueryError,
    QueryErrorKind, RankedMove, Side,
};

// Crate-level exports - Wire format
pub use wire::{
    BoardArgs, CheckerMap, CheckerMove, DecodeError, ErrorBody, EvalInfo, EvaluationBody,
    MoveArgs, MoveBody, ProbabilityBody, encode_moves,
};

// Crate-level exports - Request pipeline and server
pub use pipeline::{
    ApiError, AppState, ENGINE_FAILURE_MESSAGE, GET_MOVES_PATH, PipelineSettings, get_moves,
    router,
};
pub use server::serve;
