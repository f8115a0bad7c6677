//! Evaluator weight tables and their on-disk format.

use crate::assets::AssetSource;
use crate::error::{InitError, InitErrorKind};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use strum::{EnumIter, IntoStaticStr};
use tracing::{debug, info, instrument};

/// Format version every weight file must declare.
pub const WEIGHTS_VERSION: u32 = 1;

/// Weight files the engine requires, by asset name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum WeightFile {
    /// Positions where the sides can still hit each other.
    #[strum(serialize = "contact.toml")]
    Contact,
    /// Pure races.
    #[strum(serialize = "race.toml")]
    Race,
    /// Gammon and backgammon likelihood.
    #[strum(serialize = "gammon.toml")]
    Gammon,
}

impl WeightFile {
    /// Asset name of this file.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

/// Linear weights for contact positions, applied to the mover's features.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContactWeights {
    /// Constant term.
    pub bias: f64,
    /// Pip lead, per 100 pips.
    pub pip_lead: f64,
    /// Blots within direct range of an opposing checker.
    pub blot_direct: f64,
    /// Blots only within indirect range.
    pub blot_indirect: f64,
    /// Made points in the home board.
    pub home_points: f64,
    /// Longest run of consecutive made points.
    pub prime: f64,
    /// Made points in the opponent's home board.
    pub anchors: f64,
    /// Own checkers on the bar.
    pub bar_mine: f64,
    /// Opposing checkers on the bar.
    pub bar_theirs: f64,
    /// Borne-off lead, per 15 checkers.
    pub borne_off: f64,
    /// Checkers beyond the third on a point.
    pub stacking: f64,
    /// Home board strength while the opponent is on the bar, per 6 points.
    pub closeout: f64,
}

/// Weights for pure races.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RaceWeights {
    /// Constant term.
    pub bias: f64,
    /// Effective pip lead scaled by the square root of total pips.
    pub pip_lead: f64,
    /// Pips credited to the side on roll.
    pub on_roll_pips: f64,
}

/// Weights for the fraction of wins that are gammons.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GammonWeights {
    /// Constant term.
    pub bias: f64,
    /// Winner's pip lead, per 100 pips.
    pub pip_lead: f64,
    /// Loser's checkers outside its home board, per 15 checkers.
    pub outside: f64,
    /// Share of gammons that are backgammons when the loser still has
    /// checkers in the winner's home board or on the bar.
    pub backgammon_ratio: f64,
}

/// The full weight set used by the evaluator.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    /// Contact weights.
    pub contact: ContactWeights,
    /// Race weights.
    pub race: RaceWeights,
    /// Gammon weights.
    pub gammon: GammonWeights,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WeightDocument<T> {
    version: u32,
    weights: T,
}

trait Finite {
    fn values(&self) -> Vec<(&'static str, f64)>;
}

impl Finite for ContactWeights {
    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("bias", self.bias),
            ("pip_lead", self.pip_lead),
            ("blot_direct", self.blot_direct),
            ("blot_indirect", self.blot_indirect),
            ("home_points", self.home_points),
            ("prime", self.prime),
            ("anchors", self.anchors),
            ("bar_mine", self.bar_mine),
            ("bar_theirs", self.bar_theirs),
            ("borne_off", self.borne_off),
            ("stacking", self.stacking),
            ("closeout", self.closeout),
        ]
    }
}

impl Finite for RaceWeights {
    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("bias", self.bias),
            ("pip_lead", self.pip_lead),
            ("on_roll_pips", self.on_roll_pips),
        ]
    }
}

impl Finite for GammonWeights {
    fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("bias", self.bias),
            ("pip_lead", self.pip_lead),
            ("outside", self.outside),
            ("backgammon_ratio", self.backgammon_ratio),
        ]
    }
}

impl Weights {
    /// Loads and validates every weight file from `assets`.
    ///
    /// # Errors
    ///
    /// Returns [`InitError`] if any file is missing, unparsable, declares a
    /// different version, or holds a non-finite weight.
    #[instrument(skip(assets))]
    pub fn load(assets: &dyn AssetSource) -> Result<Self, InitError> {
        let contact: ContactWeights = load_file(assets, WeightFile::Contact)?;
        let race: RaceWeights = load_file(assets, WeightFile::Race)?;
        let gammon: GammonWeights = load_file(assets, WeightFile::Gammon)?;

        if !(0.0..=1.0).contains(&gammon.backgammon_ratio) {
            return Err(InitError::new(
                InitErrorKind::Malformed(WeightFile::Gammon.name().to_string()),
                format!(
                    "backgammon_ratio {} is outside 0..=1",
                    gammon.backgammon_ratio
                ),
            ));
        }

        info!("Evaluator weights loaded");
        Ok(Self {
            contact,
            race,
            gammon,
        })
    }
}

#[instrument(skip(assets))]
fn load_file<T>(assets: &dyn AssetSource, file: WeightFile) -> Result<T, InitError>
where
    T: DeserializeOwned + Finite,
{
    let name = file.name();
    let bytes = assets
        .read(name)
        .map_err(|e| InitError::new(InitErrorKind::Missing(name.to_string()), e.to_string()))?;

    let text = std::str::from_utf8(&bytes).map_err(|e| {
        InitError::new(InitErrorKind::Malformed(name.to_string()), e.to_string())
    })?;

    let document: WeightDocument<T> = toml::from_str(text).map_err(|e| {
        InitError::new(InitErrorKind::Malformed(name.to_string()), e.to_string())
    })?;

    if document.version != WEIGHTS_VERSION {
        return Err(InitError::new(
            InitErrorKind::Incompatible(name.to_string()),
            format!(
                "version {} found, version {} required",
                document.version, WEIGHTS_VERSION
            ),
        ));
    }

    if let Some((key, value)) = document
        .weights
        .values()
        .into_iter()
        .find(|(_, value)| !value.is_finite())
    {
        return Err(InitError::new(
            InitErrorKind::Malformed(name.to_string()),
            format!("weight '{}' is not finite ({})", key, value),
        ));
    }

    debug!(asset = name, "Weight file accepted");
    Ok(document.weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::MemoryAssets;
    use strum::IntoEnumIterator;

    const CONTACT: &str = "version = 1\n[weights]\nbias = 0.0\npip_lead = 1.6\n\
        blot_direct = -0.3\nblot_indirect = -0.1\nhome_points = 0.2\nprime = 0.15\n\
        anchors = 0.12\nbar_mine = -0.35\nbar_theirs = 0.4\nborne_off = 1.5\n\
        stacking = -0.05\ncloseout = 0.3\n";
    const RACE: &str = "version = 1\n[weights]\nbias = 0.0\npip_lead = 0.9\non_roll_pips = 4.0\n";

    fn gammon(ratio: f64) -> String {
        format!(
            "version = 1\n[weights]\nbias = -3.0\npip_lead = 2.5\noutside = 2.0\n\
             backgammon_ratio = {:?}\n",
            ratio
        )
    }

    fn assets(gammon_text: String) -> MemoryAssets {
        MemoryAssets::new()
            .with_file("contact.toml", CONTACT)
            .with_file("race.toml", RACE)
            .with_file("gammon.toml", gammon_text)
    }

    #[test]
    fn weight_file_names() {
        let names: Vec<&str> = WeightFile::iter().map(WeightFile::name).collect();
        assert_eq!(names, vec!["contact.toml", "race.toml", "gammon.toml"]);
    }

    #[test]
    fn loads_complete_set() {
        let weights = Weights::load(&assets(gammon(0.2))).unwrap();
        assert_eq!(weights.race.on_roll_pips, 4.0);
        assert_eq!(weights.gammon.backgammon_ratio, 0.2);
    }

    #[test]
    fn rejects_backgammon_ratio_above_one() {
        let err = Weights::load(&assets(gammon(1.5))).unwrap_err();
        assert_eq!(
            err.kind,
            InitErrorKind::Malformed("gammon.toml".to_string())
        );
    }
}
