//! Board representation from the perspective of the side on roll.

use derive_more::{Display, Error};
use tracing::instrument;

/// Checkers each side starts with.
pub const CHECKERS_PER_SIDE: u8 = 15;

/// Index of the bar in a [`Layout`]. Indices `0..24` hold points 1 through 24.
pub const BAR: usize = 24;

/// Checker counts for one side, indexed from that side's own perspective.
///
/// Index `i` in `0..24` is the side's point `i + 1`; its point 1 is the
/// last point before bearing off. Index [`BAR`] is the bar.
pub type Layout = [u8; 25];

/// Layout of either side at the start of a game.
pub const STARTING_LAYOUT: Layout = {
    let mut layout = [0u8; 25];
    layout[5] = 5;
    layout[7] = 3;
    layout[12] = 5;
    layout[23] = 2;
    layout
};

/// A validated backgammon board.
///
/// Side `0` is the player on roll ("mine"), side `1` the opponent.
/// Both layouts use their owner's point numbering, so my point `q`
/// is the opponent's point `25 - q`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    sides: [Layout; 2],
}

impl Board {
    /// Validates and builds a board.
    ///
    /// # Errors
    ///
    /// Returns [`BoardError`] when a side has more than
    /// [`CHECKERS_PER_SIDE`] checkers in play, when either side has no
    /// checker left in play, or when both sides hold the same point.
    #[instrument(level = "trace")]
    pub fn from_layouts(mine: Layout, theirs: Layout) -> Result<Self, BoardError> {
        for (label, layout) in [("player on roll", &mine), ("opponent", &theirs)] {
            let count = in_play(layout);
            if count > u32::from(CHECKERS_PER_SIDE) {
                return Err(BoardError::new(format!(
                    "{} has {} checkers in play, at most {} allowed",
                    label, count, CHECKERS_PER_SIDE
                )));
            }
            if count == 0 {
                return Err(BoardError::new(format!(
                    "{} has borne off every checker, the game is over",
                    label
                )));
            }
        }

        for point in 1..=24usize {
            if mine[point - 1] > 0 && theirs[24 - point] > 0 {
                return Err(BoardError::new(format!(
                    "point {} is occupied by both sides",
                    point
                )));
            }
        }

        Ok(Self {
            sides: [mine, theirs],
        })
    }

    /// The standard opening position.
    pub fn starting() -> Self {
        Self {
            sides: [STARTING_LAYOUT; 2],
        }
    }

    /// Layout of the player on roll.
    pub fn mine(&self) -> &Layout {
        &self.sides[0]
    }

    /// Layout of the opponent.
    pub fn theirs(&self) -> &Layout {
        &self.sides[1]
    }

    pub(crate) fn mine_mut(&mut self) -> &mut Layout {
        &mut self.sides[0]
    }

    pub(crate) fn theirs_mut(&mut self) -> &mut Layout {
        &mut self.sides[1]
    }
}

/// Total pips a side still has to travel.
pub fn pip_count(layout: &Layout) -> u32 {
    layout
        .iter()
        .enumerate()
        .map(|(i, &n)| (i as u32 + 1) * u32::from(n))
        .sum()
}

/// Checkers on the board or the bar.
pub fn in_play(layout: &Layout) -> u32 {
    layout.iter().map(|&n| u32::from(n)).sum()
}

/// Checkers already borne off.
pub fn borne_off(layout: &Layout) -> u32 {
    u32::from(CHECKERS_PER_SIDE).saturating_sub(in_play(layout))
}

/// Whether every checker in play sits in the home board.
pub fn all_home(layout: &Layout) -> bool {
    layout[6..].iter().all(|&n| n == 0)
}

/// Rearmost occupied point (25 for the bar), or `None` with nothing in play.
pub fn rearmost(layout: &Layout) -> Option<usize> {
    layout.iter().rposition(|&n| n > 0).map(|i| i + 1)
}

/// Error raised when a board is structurally impossible.
#[derive(Debug, Clone, Display, Error)]
#[display("Board error: {} at {}:{}", message, file, line)]
pub struct BoardError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoardError {
    /// Creates a new board error with caller location tracking.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
