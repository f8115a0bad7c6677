//! 0-ply position evaluation.
//!
//! Positions are scored from the side that just moved, with the opponent
//! on roll. Contact positions use a linear model over structural features,
//! races use an effective pip lead, and both feed a logistic to obtain the
//! probability of winning. Gammon chances come from a separate model.

mod weights;

pub use weights::{
    ContactWeights, GammonWeights, RaceWeights, WEIGHTS_VERSION, WeightFile, Weights,
};

use crate::board::{BAR, Board, Layout, borne_off, in_play, pip_count, rearmost};
use derive_getters::Getters;
use derive_new::new;

/// Cumulative outcome probabilities for the side that moved.
///
/// Gammon figures include backgammons, and `win + lose == 1`.
#[derive(Debug, Clone, Copy, PartialEq, Getters, new)]
pub struct Probabilities {
    win: f64,
    win_gammon: f64,
    win_backgammon: f64,
    lose: f64,
    lose_gammon: f64,
    lose_backgammon: f64,
}

impl Probabilities {
    /// Cubeless money equity.
    pub fn equity(&self) -> f64 {
        2.0 * self.win - 1.0 + self.win_gammon + self.win_backgammon
            - self.lose_gammon
            - self.lose_backgammon
    }
}

/// Evaluates positions with a fixed weight set.
#[derive(Debug, Clone)]
pub struct Evaluator {
    weights: Weights,
}

impl Evaluator {
    /// Creates an evaluator from loaded weights.
    pub fn new(weights: Weights) -> Self {
        Self { weights }
    }

    /// Evaluates `board` for side `0`, which has just moved.
    pub fn evaluate(&self, board: &Board) -> Probabilities {
        let mine = board.mine();
        let theirs = board.theirs();

        if in_play(mine) == 0 {
            return finished(theirs);
        }

        let win = if is_contact(board) {
            sigmoid(self.contact_logit(board))
        } else {
            sigmoid(self.race_logit(board))
        };
        let lose = 1.0 - win;

        let (win_gammon, win_backgammon) = self.gammon_share(mine, theirs);
        let (lose_gammon, lose_backgammon) = self.gammon_share(theirs, mine);

        Probabilities {
            win,
            win_gammon: win * win_gammon,
            win_backgammon: win * win_backgammon,
            lose,
            lose_gammon: lose * lose_gammon,
            lose_backgammon: lose * lose_backgammon,
        }
    }

    fn contact_logit(&self, board: &Board) -> f64 {
        let w = &self.weights.contact;
        let mine = board.mine();
        let theirs = board.theirs();
        let blots = blot_exposure(mine, theirs);
        let home_points = made_points(&mine[0..6]) as f64;

        let closeout = if theirs[BAR] > 0 {
            home_points / 6.0
        } else {
            0.0
        };

        w.bias
            + w.pip_lead * pip_lead(mine, theirs) / 100.0
            + w.blot_direct * blots.direct as f64
            + w.blot_indirect * blots.indirect as f64
            + w.home_points * home_points
            + w.prime * longest_prime(mine) as f64
            + w.anchors * made_points(&mine[18..24]) as f64
            + w.bar_mine * f64::from(mine[BAR])
            + w.bar_theirs * f64::from(theirs[BAR])
            + w.borne_off * (f64::from(borne_off(mine)) - f64::from(borne_off(theirs))) / 15.0
            + w.stacking * stacked(mine) as f64
            + w.closeout * closeout
    }

    fn race_logit(&self, board: &Board) -> f64 {
        let w = &self.weights.race;
        let mine = f64::from(pip_count(board.mine()));
        let theirs = f64::from(pip_count(board.theirs()));
        let lead = theirs - w.on_roll_pips - mine;
        w.bias + w.pip_lead * lead / (mine + theirs).sqrt().max(1.0)
    }

    /// Fractions of `winner`'s wins that are gammons and backgammons.
    fn gammon_share(&self, winner: &Layout, loser: &Layout) -> (f64, f64) {
        if borne_off(loser) > 0 {
            return (0.0, 0.0);
        }
        let w = &self.weights.gammon;
        let outside: u32 = loser[6..].iter().map(|&n| u32::from(n)).sum();
        let gammon = sigmoid(
            w.bias
                + w.pip_lead * pip_lead(winner, loser) / 100.0
                + w.outside * f64::from(outside) / 15.0,
        );
        let backgammon = if trapped(loser) {
            gammon * w.backgammon_ratio
        } else {
            0.0
        };
        (gammon, backgammon)
    }
}

/// Exact outcome once the side that moved has borne off every checker.
fn finished(theirs: &Layout) -> Probabilities {
    let gammon = borne_off(theirs) == 0;
    let backgammon = gammon && trapped(theirs);
    Probabilities {
        win: 1.0,
        win_gammon: if gammon { 1.0 } else { 0.0 },
        win_backgammon: if backgammon { 1.0 } else { 0.0 },
        lose: 0.0,
        lose_gammon: 0.0,
        lose_backgammon: 0.0,
    }
}

/// Whether a loser still has checkers on the bar or in the winner's home board.
fn trapped(loser: &Layout) -> bool {
    loser[18..].iter().any(|&n| n > 0)
}

fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

fn pip_lead(mine: &Layout, theirs: &Layout) -> f64 {
    f64::from(pip_count(theirs)) - f64::from(pip_count(mine))
}

/// Whether any checker of one side still has to pass an opposing checker.
pub fn is_contact(board: &Board) -> bool {
    match (rearmost(board.mine()), rearmost(board.theirs())) {
        (Some(mine), Some(theirs)) => mine + theirs > 25,
        _ => false,
    }
}

fn made_points(points: &[u8]) -> usize {
    points.iter().filter(|&&n| n >= 2).count()
}

fn longest_prime(layout: &Layout) -> usize {
    let mut best = 0;
    let mut run = 0;
    for &n in &layout[..BAR] {
        run = if n >= 2 { run + 1 } else { 0 };
        best = best.max(run);
    }
    best
}

fn stacked(layout: &Layout) -> u32 {
    layout[..BAR]
        .iter()
        .map(|&n| u32::from(n.saturating_sub(3)))
        .sum()
}

struct BlotExposure {
    direct: usize,
    indirect: usize,
}

/// Counts own blots by the closest opposing checker able to hit them.
///
/// Opposing checkers move up through my point numbers; one on my point `r`
/// reaches my point `q` after `q - r` pips, and the bar acts as point 0.
fn blot_exposure(mine: &Layout, theirs: &Layout) -> BlotExposure {
    let shooter_at = |r: usize| -> bool {
        if r == 0 {
            theirs[BAR] > 0
        } else {
            theirs[24 - r] > 0
        }
    };

    let mut exposure = BlotExposure {
        direct: 0,
        indirect: 0,
    };
    for q in 1..=24usize {
        if mine[q - 1] != 1 {
            continue;
        }
        let nearest = (0..q).rev().find(|&r| shooter_at(r)).map(|r| q - r);
        match nearest {
            Some(distance) if distance <= 6 => exposure.direct += 1,
            Some(distance) if distance <= 12 => exposure.indirect += 1,
            _ => {}
        }
    }
    exposure
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::STARTING_LAYOUT;

    fn layout(points: &[(usize, u8)]) -> Layout {
        let mut layout = [0u8; 25];
        for &(point, count) in points {
            let index = if point == 25 { BAR } else { point - 1 };
            layout[index] = count;
        }
        layout
    }

    #[test]
    fn opening_position_is_contact() {
        assert!(is_contact(&Board::starting()));
    }

    #[test]
    fn passed_checkers_are_a_race() {
        let board = Board::from_layouts(layout(&[(3, 5)]), layout(&[(4, 5)])).unwrap();
        assert!(!is_contact(&board));
    }

    #[test]
    fn blot_in_front_of_shooter_is_direct() {
        // My blot on my 5 point, opposing checker on my 1 point (their 24).
        let mine = layout(&[(5, 1), (6, 5)]);
        let theirs = layout(&[(24, 2)]);
        let exposure = blot_exposure(&mine, &theirs);
        assert_eq!(exposure.direct, 1);
        assert_eq!(exposure.indirect, 0);
    }

    #[test]
    fn starting_layout_has_no_prime_longer_than_one() {
        assert_eq!(longest_prime(&STARTING_LAYOUT), 1);
    }

    #[test]
    fn equity_of_a_certain_gammon_is_two() {
        let probabilities = Probabilities::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0);
        assert!((probabilities.equity() - 2.0).abs() < 1e-12);
    }
}
