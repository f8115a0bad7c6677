//! Backgammon engine behind the bgweb move-query API.
//!
//! # Architecture
//!
//! - **Board**: validated positions seen from the side on roll
//! - **Move generation**: every legal play for a roll, one per resulting position
//! - **Evaluation**: 0-ply outcome probabilities from asset-loaded weights
//! - **Engine**: [`MoveEngine`] call contract and the bundled [`Engine`]
//!
//! # Example
//!
//! ```no_run
//! use bgweb_engine::{Board, Dice, DirAssets, Engine, MoveEngine};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = Engine::initialize(&DirAssets::new("./data"))?;
//! let moves = engine.find_moves(&Board::starting(), Dice::new(3, 1)?)?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod assets;
mod board;
mod dice;
mod engine;
mod error;
mod eval;
mod movegen;
mod moves;

// Crate-level exports - Board model
pub use board::{
    BAR, Board, BoardError, CHECKERS_PER_SIDE, Layout, STARTING_LAYOUT, all_home, borne_off,
    in_play, pip_count,
};

// Crate-level exports - Dice and plays
pub use dice::{Dice, DiceError};
pub use moves::{Location, Play, Step};
pub use movegen::legal_plays;

// Crate-level exports - Evaluation
pub use eval::{
    ContactWeights, Evaluator, GammonWeights, Probabilities, RaceWeights, WEIGHTS_VERSION,
    WeightFile, Weights, is_contact,
};

// Crate-level exports - Engine binding
pub use assets::{AssetSource, DirAssets, MemoryAssets};
pub use engine::{Engine, MoveCandidate, MoveEngine};
pub use error::{EngineError, InitError, InitErrorKind};
