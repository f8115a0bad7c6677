//! Checker movements and complete plays.

use derive_more::Display;
use std::fmt;

/// Where a checker moves from or to, in the mover's point numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
pub enum Location {
    /// Borne off.
    #[display("off")]
    Off,
    /// A point, 1 through 24.
    #[display("{_0}")]
    Point(u8),
    /// The bar.
    #[display("bar")]
    Bar,
}

/// One checker moved by one die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Step {
    /// Source of the checker.
    pub from: Location,
    /// Destination of the checker.
    pub to: Location,
    /// Die value used.
    pub die: u8,
    /// Whether an opposing blot was sent to the bar.
    pub hit: bool,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.from, self.to)?;
        if self.hit {
            f.write_str("*")?;
        }
        Ok(())
    }
}

/// A complete play for one roll: the steps in the order they are made.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Play {
    steps: Vec<Step>,
}

impl Play {
    /// Wraps a sequence of steps.
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Steps in playing order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Number of dice used.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Whether no die could be played.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Canonical notation, e.g. `8/5 6/5` or `13/7* 7/4`.
    ///
    /// Steps are listed from the rearmost source down so that plays reaching
    /// the same result through a different step order read the same.
    pub fn notation(&self) -> String {
        let mut steps = self.steps.clone();
        steps.sort_by(|a, b| b.from.cmp(&a.from).then(b.to.cmp(&a.to)));
        steps
            .iter()
            .map(Step::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Play {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            f.write_str("(no play)")
        } else {
            f.write_str(&self.notation())
        }
    }
}
