//! Validated dice rolls.

use derive_more::{Display, Error};
use tracing::instrument;

/// A roll of two dice, each in `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display("{}-{}", high, low)]
pub struct Dice {
    high: u8,
    low: u8,
}

impl Dice {
    /// Validates a roll. Order of the two values does not matter.
    ///
    /// # Errors
    ///
    /// Returns [`DiceError`] if either value is outside `1..=6`.
    #[instrument(level = "trace")]
    pub fn new(first: u8, second: u8) -> Result<Self, DiceError> {
        for value in [first, second] {
            if !(1..=6).contains(&value) {
                return Err(DiceError::new(format!(
                    "die value {} is outside 1..=6",
                    value
                )));
            }
        }
        Ok(Self {
            high: first.max(second),
            low: first.min(second),
        })
    }

    /// The larger die.
    pub fn high(&self) -> u8 {
        self.high
    }

    /// Whether both dice show the same value.
    pub fn is_double(&self) -> bool {
        self.high == self.low
    }

    /// Orders in which the dice may be played. A double is played four times.
    pub fn orders(&self) -> Vec<Vec<u8>> {
        if self.is_double() {
            vec![vec![self.high; 4]]
        } else {
            vec![vec![self.high, self.low], vec![self.low, self.high]]
        }
    }
}

/// Error raised for an out-of-range die value.
#[derive(Debug, Clone, Display, Error)]
#[display("Dice error: {} at {}:{}", message, file, line)]
pub struct DiceError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DiceError {
    /// Creates a new dice error with caller location tracking.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dice_are_unordered() {
        assert_eq!(Dice::new(1, 3).unwrap(), Dice::new(3, 1).unwrap());
    }

    #[test]
    fn rejects_values_outside_range() {
        assert!(Dice::new(7, 2).is_err());
        assert!(Dice::new(0, 2).is_err());
    }

    #[test]
    fn doubles_play_four_times() {
        let dice = Dice::new(4, 4).unwrap();
        assert_eq!(dice.orders(), vec![vec![4, 4, 4, 4]]);
    }
}
