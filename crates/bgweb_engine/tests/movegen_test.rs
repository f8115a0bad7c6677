//! Tests for legal play enumeration.

use bgweb_engine::{BAR, Board, Dice, Layout, legal_plays};
use std::collections::BTreeSet;

/// Builds a layout from `(point, count)` pairs; point 25 is the bar.
fn layout(points: &[(usize, u8)]) -> Layout {
    let mut layout = [0u8; 25];
    for &(point, count) in points {
        let index = if point == 25 { BAR } else { point - 1 };
        layout[index] = count;
    }
    layout
}

fn notations(board: &Board, dice: Dice) -> BTreeSet<String> {
    legal_plays(board, dice)
        .into_iter()
        .map(|(play, _)| play.notation())
        .collect()
}

#[test]
fn test_opening_roll_uses_both_dice() {
    let plays = legal_plays(&Board::starting(), Dice::new(3, 1).unwrap());
    assert!(!plays.is_empty());
    assert!(plays.iter().all(|(play, _)| play.len() == 2));

    let names: BTreeSet<_> = plays.iter().map(|(play, _)| play.notation()).collect();
    assert!(names.contains("8/5 6/5"));
    assert!(names.contains("24/23 24/21"));
}

#[test]
fn test_plays_lead_to_distinct_positions() {
    let plays = legal_plays(&Board::starting(), Dice::new(5, 2).unwrap());
    let results: BTreeSet<_> = plays.iter().map(|(_, board)| format!("{:?}", board)).collect();
    assert_eq!(results.len(), plays.len());
}

#[test]
fn test_doubles_play_four_checkers() {
    let plays = legal_plays(&Board::starting(), Dice::new(6, 6).unwrap());
    assert!(plays.iter().all(|(play, _)| play.len() == 4));
    let names: BTreeSet<_> = plays.iter().map(|(play, _)| play.notation()).collect();
    assert!(names.contains("24/18 24/18 13/7 13/7"));
}

#[test]
fn test_bar_checker_must_enter_first() {
    let mine = layout(&[(25, 1), (6, 14)]);
    // Opponent holds its 6 point (my 19) and keeps the rest on its 8 point.
    let theirs = layout(&[(6, 2), (8, 13)]);
    let board = Board::from_layouts(mine, theirs).unwrap();

    let names = notations(&board, Dice::new(6, 5).unwrap());
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["bar/20 20/14"]);
}

#[test]
fn test_closed_board_leaves_no_play() {
    let mine = layout(&[(25, 1), (6, 14)]);
    let theirs = layout(&[(1, 2), (2, 2), (3, 2), (4, 2), (5, 2), (6, 2), (8, 3)]);
    let board = Board::from_layouts(mine, theirs).unwrap();

    assert!(legal_plays(&board, Dice::new(4, 2).unwrap()).is_empty());
}

#[test]
fn test_larger_die_required_when_only_one_can_play() {
    let mine = layout(&[(13, 1)]);
    // Opponent blocks my 2 point (its 23), so 13/7/2 and 13/8/2 are both shut.
    let theirs = layout(&[(23, 2)]);
    let board = Board::from_layouts(mine, theirs).unwrap();

    let names = notations(&board, Dice::new(6, 5).unwrap());
    assert_eq!(names.into_iter().collect::<Vec<_>>(), vec!["13/7"]);
}

#[test]
fn test_hit_sends_blot_to_bar() {
    let mine = layout(&[(13, 1)]);
    // Opponent blot on my 10 point (its 15).
    let theirs = layout(&[(15, 1)]);
    let board = Board::from_layouts(mine, theirs).unwrap();

    let plays = legal_plays(&board, Dice::new(3, 1).unwrap());
    assert_eq!(plays.len(), 2);

    let (_, after_hit) = plays
        .iter()
        .find(|(play, _)| play.notation() == "13/10* 10/9")
        .expect("hitting play should be generated");
    assert_eq!(after_hit.theirs()[BAR], 1);
    assert_eq!(after_hit.theirs()[14], 0);

    let (_, quiet) = plays
        .iter()
        .find(|(play, _)| play.notation() == "13/12 12/9")
        .expect("quiet play should be generated");
    assert_eq!(quiet.theirs()[BAR], 0);
}

#[test]
fn test_bear_off_only_overbears_from_highest_point() {
    let mine = layout(&[(5, 1), (2, 2)]);
    let theirs = layout(&[(1, 1)]);
    let board = Board::from_layouts(mine, theirs).unwrap();

    let names = notations(&board, Dice::new(6, 1).unwrap());
    let expected: BTreeSet<String> = ["5/off 2/1", "5/4 4/off"]
        .into_iter()
        .map(String::from)
        .collect();
    assert_eq!(names, expected);
}

#[test]
fn test_no_bear_off_with_checkers_outside_home() {
    let mine = layout(&[(7, 1), (1, 1)]);
    let theirs = layout(&[(1, 1)]);
    let board = Board::from_layouts(mine, theirs).unwrap();

    let plays = legal_plays(&board, Dice::new(2, 1).unwrap());
    // 1/off is only possible once the checker on 7 has come home.
    for (play, _) in &plays {
        let first = play.steps()[0];
        assert!(
            !(first.from == bgweb_engine::Location::Point(1)
                && first.to == bgweb_engine::Location::Off),
            "bore off before all checkers were home: {}",
            play
        );
    }
    assert!(plays.iter().any(|(play, _)| play.notation() == "7/6 6/4"
        || play.notation() == "7/5 5/4"));
}
