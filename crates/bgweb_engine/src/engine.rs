//! Engine binding and the move-search contract.

use crate::assets::AssetSource;
use crate::board::Board;
use crate::dice::Dice;
use crate::error::{EngineError, InitError};
use crate::eval::{Evaluator, Probabilities, Weights};
use crate::movegen::legal_plays;
use crate::moves::Play;
use derive_getters::Getters;
use derive_new::new;
use tracing::{debug, info, instrument};

/// One legal play with its evaluation.
#[derive(Debug, Clone, PartialEq, Getters, new)]
pub struct MoveCandidate {
    play: Play,
    probabilities: Probabilities,
}

impl MoveCandidate {
    /// Cubeless equity of the position after the play.
    pub fn equity(&self) -> f64 {
        self.probabilities.equity()
    }
}

/// Narrow call surface into a move-evaluation engine.
///
/// Implementations must be safe to call from many threads at once. An
/// engine that keeps mutable search state must serialize calls internally.
pub trait MoveEngine: Send + Sync + std::fmt::Debug {
    /// Enumerates and scores every legal play of `dice` on `board`.
    ///
    /// Candidates may be returned in any order; callers rank them.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError`] on an internal fault.
    fn find_moves(&self, board: &Board, dice: Dice) -> Result<Vec<MoveCandidate>, EngineError>;

    /// Search depth reported alongside evaluations.
    fn plies(&self) -> u8 {
        0
    }
}

/// The bundled engine: full legal-move generation with a 0-ply evaluator.
///
/// Only obtainable through [`Engine::initialize`], so every value of this
/// type is ready to answer queries.
#[derive(Debug, Clone)]
pub struct Engine {
    evaluator: Evaluator,
}

impl Engine {
    /// Loads the engine's reference data from `assets`.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] if any required asset is missing or malformed.
    /// Nothing is partially initialized on failure.
    #[instrument(skip(assets), fields(assets = ?assets))]
    pub fn initialize(assets: &dyn AssetSource) -> Result<Self, InitError> {
        info!("Initializing move engine");
        let weights = Weights::load(assets)?;
        info!("Move engine ready");
        Ok(Self {
            evaluator: Evaluator::new(weights),
        })
    }
}

impl MoveEngine for Engine {
    #[instrument(skip_all, fields(dice = %dice))]
    fn find_moves(&self, board: &Board, dice: Dice) -> Result<Vec<MoveCandidate>, EngineError> {
        let candidates: Vec<_> = legal_plays(board, dice)
            .into_iter()
            .map(|(play, result)| {
                let probabilities = self.evaluator.evaluate(&result);
                MoveCandidate::new(play, probabilities)
            })
            .collect();

        debug!(count = candidates.len(), "Scored legal plays");
        Ok(candidates)
    }
}
