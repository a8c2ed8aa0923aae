pub mod config;
pub mod error;
pub mod experiment;
pub mod game;
pub mod layout;
pub mod report;
pub mod report_file;
pub mod rng;
pub mod stats;
pub mod strategy;
pub mod trace;

pub use config::{ExperimentConfig, GameConfig};
pub use error::{ConfigError, LayoutError, PickOrderError, SimError, SimResult};
pub use experiment::{ExperimentReport, run_experiment};
pub use game::{Game, GameStatus, PickEvent, PickRecord, TrialOutcome, play, play_traced};
pub use layout::{BoxContent, BoxLayout};
pub use rng::RandomSource;
pub use stats::{StrategyStats, StrategySummary};
pub use strategy::{Strategy, validate_pick_order};
