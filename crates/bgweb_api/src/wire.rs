//! JSON request and response bodies of the move-query endpoint.

use crate::query::{MoveOptions, MoveQuery, MoveResultSet, Position, Side};
use bgweb_engine::{BAR, Layout};
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// Checker counts keyed by point (`"1"` to `"24"`) or `"bar"`.
pub type CheckerMap = BTreeMap<String, u8>;

/// Both sides' checkers, each in its own point numbering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardArgs {
    /// Player X's checkers.
    pub x: CheckerMap,
    /// Player O's checkers.
    pub o: CheckerMap,
}

/// Body of `POST /api/v1/getmoves`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct MoveArgs {
    /// The board.
    pub board: BoardArgs,
    /// The two dice.
    pub dice: [u8; 2],
    /// Side on roll.
    pub player: Side,
    /// Request cube-aware evaluation.
    #[serde(default)]
    pub cubeful: bool,
    /// Maximum number of moves to return; 0 returns all.
    #[serde(default)]
    pub max_moves: Option<usize>,
    /// Include evaluations in the response.
    #[serde(default = "default_score_moves")]
    pub score_moves: bool,
}

fn default_score_moves() -> bool {
    true
}

/// A single checker movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckerMove {
    /// Source point, or `"bar"`.
    pub from: String,
    /// Destination point, or `"off"`.
    pub to: String,
}

/// How an evaluation was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalInfo {
    /// Whether the cube was taken into account.
    pub cubeful: bool,
    /// Search depth.
    pub plies: u8,
}

/// Outcome probabilities for the side that moved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityBody {
    /// Any win.
    pub win: f64,
    /// Gammon or better.
    #[serde(rename = "winG")]
    pub win_gammon: f64,
    /// Backgammon.
    #[serde(rename = "winBG")]
    pub win_backgammon: f64,
    /// Any loss.
    pub lose: f64,
    /// Gammon loss or worse.
    #[serde(rename = "loseG")]
    pub lose_gammon: f64,
    /// Backgammon loss.
    #[serde(rename = "loseBG")]
    pub lose_backgammon: f64,
}

/// Evaluation attached to a move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvaluationBody {
    /// How the evaluation was produced.
    pub info: EvalInfo,
    /// Equity after the move.
    pub eq: f64,
    /// Equity relative to the best move.
    pub diff: f64,
    /// Outcome probabilities.
    pub probability: ProbabilityBody,
}

/// One ranked move in the response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoveBody {
    /// Checker movements in playing order.
    pub play: Vec<CheckerMove>,
    /// Present unless the request disabled scoring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub evaluation: Option<EvaluationBody>,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable reason.
    pub message: String,
}

/// Error raised when a syntactically valid body does not fit the schema.
#[derive(Debug, Clone, Display, Error)]
#[display("Decode error: {} at {}:{}", message, file, line)]
pub struct DecodeError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl DecodeError {
    /// Creates a new decode error with caller location tracking.
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

impl TryFrom<MoveArgs> for MoveQuery {
    type Error = DecodeError;

    #[instrument(skip_all, fields(player = %args.player))]
    fn try_from(args: MoveArgs) -> Result<Self, Self::Error> {
        let x = layout(Side::X, &args.board.x)?;
        let o = layout(Side::O, &args.board.o)?;
        Ok(MoveQuery {
            position: Position::new(x, o, args.player),
            dice: (args.dice[0], args.dice[1]),
            options: MoveOptions {
                max_moves: args.max_moves,
                score_moves: args.score_moves,
                cubeful: args.cubeful,
            },
        })
    }
}

fn layout(side: Side, checkers: &CheckerMap) -> Result<Layout, DecodeError> {
    let mut layout = [0u8; 25];
    for (key, &count) in checkers {
        let index = match key.as_str() {
            "bar" => BAR,
            point => point
                .parse::<usize>()
                .ok()
                .filter(|p| (1..=24).contains(p) && p.to_string() == point)
                .map(|p| p - 1)
                .ok_or_else(|| {
                    DecodeError::new(format!(
                        "board.{}: '{}' is not a point (1-24) or 'bar'",
                        side, key
                    ))
                })?,
        };
        layout[index] = count;
    }
    Ok(layout)
}

/// Converts a ranked result set into response bodies, keeping the order.
pub fn encode_moves(result: &MoveResultSet) -> Vec<MoveBody> {
    let info = EvalInfo {
        cubeful: false,
        plies: *result.plies(),
    };
    let score_moves = result.options().score_moves;

    result
        .iter()
        .map(|ranked| {
            let play = ranked
                .play()
                .steps()
                .iter()
                .map(|step| CheckerMove {
                    from: step.from.to_string(),
                    to: step.to.to_string(),
                })
                .collect();

            let evaluation = score_moves.then(|| {
                let p = ranked.probabilities();
                EvaluationBody {
                    info,
                    eq: *ranked.equity(),
                    diff: *ranked.diff(),
                    probability: ProbabilityBody {
                        win: *p.win(),
                        win_gammon: *p.win_gammon(),
                        win_backgammon: *p.win_backgammon(),
                        lose: *p.lose(),
                        lose_gammon: *p.lose_gammon(),
                        lose_backgammon: *p.lose_backgammon(),
                    },
                }
            });

            MoveBody { play, evaluation }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opening_args() -> serde_json::Value {
        json!({
            "board": {
                "x": {"24": 2, "13": 5, "8": 3, "6": 5},
                "o": {"24": 2, "13": 5, "8": 3, "6": 5}
            },
            "dice": [3, 1],
            "player": "x"
        })
    }

    #[test]
    fn decodes_board_keys_into_layout() {
        let args: MoveArgs = serde_json::from_value(opening_args()).unwrap();
        let query = MoveQuery::try_from(args).unwrap();
        assert_eq!(query.position.x()[23], 2);
        assert_eq!(query.position.x()[5], 5);
        assert_eq!(query.dice, (3, 1));
        assert!(query.options.score_moves);
        assert_eq!(query.options.max_moves, None);
    }

    #[test]
    fn rejects_unknown_point() {
        let mut value = opening_args();
        value["board"]["o"]["25"] = json!(1);
        let args: MoveArgs = serde_json::from_value(value).unwrap();
        let err = MoveQuery::try_from(args).unwrap_err();
        assert!(err.message.contains("board.o"));
    }

    #[test]
    fn rejects_non_canonical_point_spellings() {
        for key in ["06", "+8", " 6", "6.0"] {
            let mut value = opening_args();
            value["board"]["x"][key] = json!(9);
            let args: MoveArgs = serde_json::from_value(value).unwrap();
            let err = MoveQuery::try_from(args).unwrap_err();
            assert!(err.message.contains(key), "key {:?}: {}", key, err.message);
        }
    }

    #[test]
    fn reads_bar_key() {
        let mut value = opening_args();
        value["board"]["x"]["bar"] = json!(1);
        let args: MoveArgs = serde_json::from_value(value).unwrap();
        let query = MoveQuery::try_from(args).unwrap();
        assert_eq!(query.position.x()[BAR], 1);
    }

    #[test]
    fn kebab_case_options() {
        let mut value = opening_args();
        value["max-moves"] = json!(2);
        value["score-moves"] = json!(false);
        let args: MoveArgs = serde_json::from_value(value).unwrap();
        assert_eq!(args.max_moves, Some(2));
        assert!(!args.score_moves);
    }
}
