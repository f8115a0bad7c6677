//! Shared fixtures for API tests.

#![allow(dead_code)]

use bgweb_api::{MoveOptions, MoveQuery, Position, Side};
use bgweb_engine::{
    BAR, Board, Dice, DirAssets, Engine, EngineError, Layout, Location, MoveCandidate, MoveEngine,
    Play, Probabilities, STARTING_LAYOUT, Step,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// The bundled engine, loaded from the workspace data directory.
pub fn bundled_engine() -> Arc<Engine> {
    let dir = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../data");
    Arc::new(Engine::initialize(&DirAssets::new(dir)).expect("bundled data should load"))
}

/// What a [`CountingEngine`] does when called.
#[derive(Debug, Clone)]
pub enum Behavior {
    /// Return these candidates.
    Fixed(Vec<MoveCandidate>),
    /// Return an engine error.
    Fail(String),
    /// Panic with this message.
    Panic(String),
    /// Sleep, then return nothing.
    Stall(Duration),
}

/// Engine double that counts calls.
#[derive(Debug)]
pub struct CountingEngine {
    calls: AtomicUsize,
    behavior: Behavior,
}

impl CountingEngine {
    pub fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            behavior,
        })
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl MoveEngine for CountingEngine {
    fn find_moves(&self, _board: &Board, _dice: Dice) -> Result<Vec<MoveCandidate>, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            Behavior::Fixed(candidates) => Ok(candidates.clone()),
            Behavior::Fail(message) => Err(EngineError::new(message.clone())),
            Behavior::Panic(message) => panic!("{}", message),
            Behavior::Stall(duration) => {
                std::thread::sleep(*duration);
                Ok(Vec::new())
            }
        }
    }
}

/// A one-step candidate `from/to` whose win probability is `win`.
pub fn candidate(from: u8, to: u8, win: f64) -> MoveCandidate {
    let play = Play::new(vec![Step {
        from: Location::Point(from),
        to: Location::Point(to),
        die: from - to,
        hit: false,
    }]);
    MoveCandidate::new(play, Probabilities::new(win, 0.0, 0.0, 1.0 - win, 0.0, 0.0))
}

/// Query for the opening position with X on roll.
pub fn opening_query(first: u8, second: u8) -> MoveQuery {
    MoveQuery {
        position: Position::new(STARTING_LAYOUT, STARTING_LAYOUT, Side::X),
        dice: (first, second),
        options: MoveOptions::default(),
    }
}

/// Request body for the opening position.
pub fn opening_body(dice: [i64; 2]) -> Value {
    json!({
        "board": {
            "x": {"24": 2, "13": 5, "8": 3, "6": 5},
            "o": {"24": 2, "13": 5, "8": 3, "6": 5}
        },
        "dice": dice,
        "player": "x"
    })
}

/// Wire map for a layout: `"1"`..`"24"` and `"bar"`, non-empty slots only.
pub fn checker_map(layout: &Layout) -> Value {
    let mut map = serde_json::Map::new();
    for (index, &count) in layout.iter().enumerate() {
        if count == 0 {
            continue;
        }
        let key = if index == BAR {
            "bar".to_string()
        } else {
            (index + 1).to_string()
        };
        map.insert(key, json!(count));
    }
    Value::Object(map)
}

/// Request body for an arbitrary position.
pub fn position_body(position: &Position, dice: (u8, u8)) -> Value {
    json!({
        "board": {
            "x": checker_map(position.x()),
            "o": checker_map(position.o())
        },
        "dice": [dice.0, dice.1],
        "player": position.turn().to_string()
    })
}

/// Opening layout with one back checker moved from the 24 point to `point`.
pub fn split_back_checker(point: usize) -> Layout {
    let mut layout = STARTING_LAYOUT;
    layout[23] -= 1;
    layout[point - 1] += 1;
    layout
}
