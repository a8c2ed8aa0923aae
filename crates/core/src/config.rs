//! Immutable run configuration and its validation.
//! This module exists so the simulator and runner receive one explicit value instead of globals.
//! It does not read files or parse flags; front ends build these values.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::strategy::Strategy;

pub const DEFAULT_NUM_BOXES: usize = 30;
pub const DEFAULT_MIMIC_COUNT: usize = 4;
pub const DEFAULT_TRIALS: u64 = 1_000_000;
pub const DEFAULT_SUCKER_PUNCH_CHANCE: f64 = 0.02;
pub const DEFAULT_SAFE_PICKS: usize = 2;

/// Board and rule parameters for a single game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub num_boxes: usize,
    pub mimic_count: usize,
    pub sucker_punch_chance: f64,
    /// Number of opening picks on which a mimic is neutralized for free.
    pub safe_picks: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            num_boxes: DEFAULT_NUM_BOXES,
            mimic_count: DEFAULT_MIMIC_COUNT,
            sucker_punch_chance: DEFAULT_SUCKER_PUNCH_CHANCE,
            safe_picks: DEFAULT_SAFE_PICKS,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // One saver, one multiplier, the mimics, and at least one box left over.
        if self.num_boxes <= self.mimic_count + 1 {
            return Err(ConfigError::TooFewBoxes {
                num_boxes: self.num_boxes,
                mimic_count: self.mimic_count,
            });
        }
        if !self.sucker_punch_chance.is_finite() || !(0.0..=1.0).contains(&self.sucker_punch_chance)
        {
            return Err(ConfigError::InvalidSuckerPunchChance(self.sucker_punch_chance));
        }
        if self.safe_picks > self.num_boxes {
            return Err(ConfigError::TooManySafePicks {
                safe_picks: self.safe_picks,
                num_boxes: self.num_boxes,
            });
        }
        Ok(())
    }
}

/// A full experiment: rules, trial count, seed, worker count and strategy list.
#[derive(Clone, Debug, PartialEq)]
pub struct ExperimentConfig {
    pub game: GameConfig,
    pub trials: u64,
    pub seed: u64,
    /// Worker threads for the trial loop; `None` uses the rayon default.
    pub threads: Option<usize>,
    pub strategies: Vec<Strategy>,
}

impl Default for ExperimentConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            trials: DEFAULT_TRIALS,
            seed: 0,
            threads: None,
            strategies: Strategy::DEFAULT_SET.to_vec(),
        }
    }
}

impl ExperimentConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.game.validate()?;
        if self.trials == 0 {
            return Err(ConfigError::NoTrials);
        }
        if self.strategies.is_empty() {
            return Err(ConfigError::NoStrategies);
        }
        if self.threads == Some(0) {
            return Err(ConfigError::NoThreads);
        }
        Ok(())
    }
}
