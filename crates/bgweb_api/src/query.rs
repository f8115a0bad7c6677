//! Move query service: validates a position and roll, then asks the engine.

use bgweb_engine::{
    Board, BoardError, Dice, Layout, MoveCandidate, MoveEngine, Play, Probabilities,
};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

/// One of the two players.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    /// Player X.
    #[display("x")]
    X,
    /// Player O.
    #[display("o")]
    O,
}

/// A position as received, before structural validation.
///
/// Each layout uses its owner's point numbering.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Position {
    x: Layout,
    o: Layout,
    turn: Side,
}

impl Position {
    /// Creates an unvalidated position.
    pub fn new(x: Layout, o: Layout, turn: Side) -> Self {
        Self { x, o, turn }
    }

    /// Validates the position and orients it towards the side on roll.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] if the position cannot occur in a game.
    pub fn to_board(&self) -> Result<Board, BoardError> {
        match self.turn {
            Side::X => Board::from_layouts(self.x, self.o),
            Side::O => Board::from_layouts(self.o, self.x),
        }
    }
}

/// Caller-selected shaping of the result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveOptions {
    /// Keep at most this many moves; `None` or `Some(0)` keeps all.
    pub max_moves: Option<usize>,
    /// Whether evaluations are reported to the caller.
    pub score_moves: bool,
    /// Whether the caller asked for cube-aware evaluation.
    pub cubeful: bool,
}

impl Default for MoveOptions {
    fn default() -> Self {
        Self {
            max_moves: None,
            score_moves: true,
            cubeful: false,
        }
    }
}

/// Everything the service needs for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveQuery {
    /// Board and side on roll.
    pub position: Position,
    /// The two die values, unvalidated.
    pub dice: (u8, u8),
    /// Result shaping.
    pub options: MoveOptions,
}

/// A ranked candidate.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct RankedMove {
    play: Play,
    notation: String,
    probabilities: Probabilities,
    equity: f64,
    /// Equity relative to the best move; zero or negative.
    diff: f64,
}

/// Moves ordered best-first.
#[derive(Debug, Clone, PartialEq, Getters)]
pub struct MoveResultSet {
    moves: Vec<RankedMove>,
    /// Search depth of the evaluations.
    plies: u8,
    /// Options the query was made with.
    options: MoveOptions,
}

impl MoveResultSet {
    /// Number of moves kept.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether no legal move exists.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Iterates best-first.
    pub fn iter(&self) -> impl Iterator<Item = &RankedMove> {
        self.moves.iter()
    }
}

/// Why a query failed.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum QueryErrorKind {
    /// The position or roll is impossible; nothing was computed.
    #[display("Invalid input: {_0}")]
    InvalidInput(String),
    /// The engine faulted while computing moves.
    #[display("Engine failure: {_0}")]
    EngineFailure(String),
}

/// Move query error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("{} at {}:{}", kind, file, line)]
pub struct QueryError {
    /// What went wrong.
    pub kind: QueryErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl QueryError {
    /// Rejects a query before any engine work.
    #[track_caller]
    pub fn invalid_input(message: impl Into<String>) -> Self {
        let message = message.into();
        debug!(reason = %message, "Rejected move query");
        Self::with_kind(QueryErrorKind::InvalidInput(message))
    }

    /// Reports an engine fault. Logged with full detail.
    #[track_caller]
    pub fn engine_failure(message: impl Into<String>) -> Self {
        let message = message.into();
        error!(detail = %message, "Engine failed while computing moves");
        Self::with_kind(QueryErrorKind::EngineFailure(message))
    }

    #[track_caller]
    fn with_kind(kind: QueryErrorKind) -> Self {
        let loc = panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Whether the caller is at fault.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self.kind, QueryErrorKind::InvalidInput(_))
    }
}

/// The single call surface from request handling into the engine.
#[derive(Debug, Clone)]
pub struct MoveQueryService {
    engine: Arc<dyn MoveEngine>,
}

impl MoveQueryService {
    /// Wraps an initialized engine.
    #[instrument(skip(engine))]
    pub fn new(engine: Arc<dyn MoveEngine>) -> Self {
        info!("Creating move query service");
        Self { engine }
    }

    /// Computes every legal move for the query, best first.
    ///
    /// Equal equities are ordered by the lexical order of the play notation,
    /// so identical queries always produce identical results.
    ///
    /// # Errors
    ///
    /// Returns [`QueryErrorKind::InvalidInput`] for an out-of-range die or an
    /// impossible position, without calling the engine. Returns
    /// [`QueryErrorKind::EngineFailure`] if the engine errors, panics, or
    /// produces a non-finite score.
    #[instrument(skip(self, query), fields(turn = %query.position.turn, dice = ?query.dice))]
    pub fn compute_moves(&self, query: &MoveQuery) -> Result<MoveResultSet, QueryError> {
        let (first, second) = query.dice;
        let dice = Dice::new(first, second).map_err(|e| QueryError::invalid_input(e.message))?;
        let board = query
            .position
            .to_board()
            .map_err(|e| QueryError::invalid_input(e.message))?;

        let engine = &self.engine;
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| engine.find_moves(&board, dice)));
        let candidates = match outcome {
            Ok(Ok(candidates)) => candidates,
            Ok(Err(e)) => return Err(QueryError::engine_failure(e.to_string())),
            Err(payload) => {
                return Err(QueryError::engine_failure(format!(
                    "engine panicked: {}",
                    panic_message(payload.as_ref())
                )));
            }
        };

        if let Some(bad) = candidates.iter().find(|c| !c.equity().is_finite()) {
            return Err(QueryError::engine_failure(format!(
                "non-finite equity for play {}",
                bad.play()
            )));
        }

        let result = rank(candidates, query.options, self.engine.plies());
        debug!(count = result.len(), "Ranked moves");
        Ok(result)
    }
}

fn rank(candidates: Vec<MoveCandidate>, options: MoveOptions, plies: u8) -> MoveResultSet {
    let mut scored: Vec<_> = candidates
        .into_iter()
        .map(|candidate| (candidate.play().notation(), candidate))
        .collect();
    scored.sort_by(|(a_name, a), (b_name, b)| {
        b.equity()
            .total_cmp(&a.equity())
            .then_with(|| a_name.cmp(b_name))
    });

    let best = scored.first().map(|(_, c)| c.equity()).unwrap_or_default();
    let limit = match options.max_moves {
        None | Some(0) => usize::MAX,
        Some(n) => n,
    };

    let moves = scored
        .into_iter()
        .take(limit)
        .map(|(notation, candidate)| {
            let equity = candidate.equity();
            RankedMove {
                play: candidate.play().clone(),
                notation,
                probabilities: *candidate.probabilities(),
                equity,
                diff: equity - best,
            }
        })
        .collect();

    MoveResultSet {
        moves,
        plies,
        options,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
