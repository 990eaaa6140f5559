use serde::{Deserialize, Serialize};

use crate::bank::Difficulty;
use crate::error::SettingsError;

fn default_difficulty() -> Difficulty {
    Difficulty::Normal
}
fn default_rounds() -> u32 {
    5
}
fn default_time_per_round() -> u32 {
    10
}

/// User-configurable game parameters.
///
/// The fields are plain data; [`Settings::validate`] is applied by
/// [`crate::GameEngine::update_settings`] and by the config loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_difficulty")]
    pub difficulty: Difficulty,
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    /// Seconds per round.
    #[serde(default = "default_time_per_round")]
    pub time_per_round: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: default_difficulty(),
            rounds: default_rounds(),
            time_per_round: default_time_per_round(),
        }
    }
}

impl Settings {
    pub fn new(difficulty: Difficulty, rounds: u32, time_per_round: u32) -> Self {
        Self {
            difficulty,
            rounds,
            time_per_round,
        }
    }

    /// Build settings from untyped presentation input.
    ///
    /// # Errors
    /// Fails on an unknown difficulty tag or a non-positive count.
    pub fn from_raw(difficulty: &str, rounds: i64, time_per_round: i64) -> Result<Self, SettingsError> {
        let difficulty = difficulty.parse::<Difficulty>()?;
        let rounds = positive("rounds", rounds)?;
        let time_per_round = positive("time_per_round", time_per_round)?;
        Ok(Self::new(difficulty, rounds, time_per_round))
    }

    /// # Errors
    /// Returns [`SettingsError::ZeroRounds`] or [`SettingsError::ZeroTimePerRound`].
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rounds == 0 {
            return Err(SettingsError::ZeroRounds);
        }
        if self.time_per_round == 0 {
            return Err(SettingsError::ZeroTimePerRound);
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: i64) -> Result<u32, SettingsError> {
    match u32::try_from(value) {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(SettingsError::NonPositive { field, value }),
    }
}
