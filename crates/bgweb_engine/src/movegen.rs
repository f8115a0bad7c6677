//! Legal play enumeration.

use crate::board::{BAR, Board, all_home};
use crate::dice::Dice;
use crate::moves::{Location, Play, Step};
use std::collections::HashSet;
use tracing::{debug, instrument};

/// Enumerates every legal play for the player on roll.
///
/// Each returned play leads to a distinct resulting board; when several
/// step sequences reach the same board only the first one found is kept.
/// Plays use as many dice as the position allows, and when only one die of
/// a non-double can be played the larger one is required if it is playable.
/// Returns an empty list when no die can be played.
#[instrument(skip_all, fields(dice = %dice))]
pub fn legal_plays(board: &Board, dice: Dice) -> Vec<(Play, Board)> {
    let mut found = Vec::new();
    for order in dice.orders() {
        let mut steps = Vec::with_capacity(order.len());
        extend(board, &order, &mut steps, &mut found);
    }

    let longest = found.iter().map(|(steps, _)| steps.len()).max().unwrap_or(0);
    if longest == 0 {
        debug!("No legal play");
        return Vec::new();
    }

    let mut candidates: Vec<_> = found
        .into_iter()
        .filter(|(steps, _)| steps.len() == longest)
        .collect();

    if longest == 1 && !dice.is_double() {
        let uses_high = |steps: &Vec<Step>| steps[0].die == dice.high();
        if candidates.iter().any(|(steps, _)| uses_high(steps)) {
            candidates.retain(|(steps, _)| uses_high(steps));
        }
    }

    let mut seen = HashSet::new();
    let plays: Vec<_> = candidates
        .into_iter()
        .filter(|(_, result)| seen.insert(*result))
        .map(|(steps, result)| (Play::new(steps), result))
        .collect();

    debug!(count = plays.len(), dice_used = longest, "Enumerated legal plays");
    plays
}

fn extend(board: &Board, dice: &[u8], steps: &mut Vec<Step>, found: &mut Vec<(Vec<Step>, Board)>) {
    let Some((&die, rest)) = dice.split_first() else {
        found.push((steps.clone(), *board));
        return;
    };

    let mut moved = false;
    for from in sources(board) {
        if let Some((next, step)) = try_step(board, from, die) {
            moved = true;
            steps.push(step);
            extend(&next, rest, steps, found);
            steps.pop();
        }
    }

    if !moved {
        found.push((steps.clone(), *board));
    }
}

/// Layout indices holding checkers that may move, bar first then rearmost points.
fn sources(board: &Board) -> Vec<usize> {
    let mine = board.mine();
    if mine[BAR] > 0 {
        return vec![BAR];
    }
    (0..BAR).rev().filter(|&i| mine[i] > 0).collect()
}

/// Moves one checker from layout index `from` by `die`, if legal.
fn try_step(board: &Board, from: usize, die: u8) -> Option<(Board, Step)> {
    let mine = board.mine();
    if mine[from] == 0 || (from != BAR && mine[BAR] > 0) {
        return None;
    }

    let from_point = from as i32 + 1;
    let dest = from_point - i32::from(die);
    let source = if from == BAR {
        Location::Bar
    } else {
        Location::Point(from_point as u8)
    };

    let mut next = *board;
    if dest >= 1 {
        let opposing = 24 - dest as usize;
        let blockers = board.theirs()[opposing];
        if blockers >= 2 {
            return None;
        }
        next.mine_mut()[from] -= 1;
        next.mine_mut()[dest as usize - 1] += 1;
        let hit = blockers == 1;
        if hit {
            next.theirs_mut()[opposing] = 0;
            next.theirs_mut()[BAR] += 1;
        }
        return Some((
            next,
            Step {
                from: source,
                to: Location::Point(dest as u8),
                die,
                hit,
            },
        ));
    }

    if !all_home(mine) {
        return None;
    }
    if dest < 0 && mine[from + 1..6].iter().any(|&n| n > 0) {
        return None;
    }
    next.mine_mut()[from] -= 1;
    Some((
        next,
        Step {
            from: source,
            to: Location::Off,
            die,
            hit: false,
        },
    ))
}
