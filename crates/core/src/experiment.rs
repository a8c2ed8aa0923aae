//! Repeated-trial experiment runner.
//! This module exists to drive layouts, strategies and the simulator over many trials
//! and reduce the outcomes into per-strategy statistics.
//! It does not format results; see `report`.

use std::hash::Hasher;
use std::time::Instant;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use xxhash_rust::xxh3::Xxh3;

use crate::config::{ExperimentConfig, GameConfig};
use crate::error::{SimError, SimResult};
use crate::game::play_validated;
use crate::layout::BoxLayout;
use crate::rng::block_rng;
use crate::stats::{StrategyStats, StrategySummary};
use crate::strategy::{Strategy, validate_pick_order};

/// Trials sharing one random stream. Fixed so results do not depend on thread count.
pub const TRIALS_PER_BLOCK: u64 = 4096;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExperimentReport {
    pub seed: u64,
    pub trials: u64,
    pub game: GameConfig,
    pub strategies: Vec<StrategySummary>,
}

impl ExperimentReport {
    /// Stable hash of the seed, the rules and every integer aggregate.
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        hasher.write_u64(self.seed);
        hasher.write_u64(self.trials);
        hasher.write_u64(self.game.num_boxes as u64);
        hasher.write_u64(self.game.mimic_count as u64);
        // Parts per billion, so a JSON round trip cannot shift the hash.
        hasher.write_u64((self.game.sucker_punch_chance * 1e9).round() as u64);
        hasher.write_u64(self.game.safe_picks as u64);
        for summary in &self.strategies {
            hasher.write(summary.strategy.name().as_bytes());
            hasher.write_u64(summary.trials);
            hasher.write_u64(summary.wins);
            hasher.write_u64(summary.min_boxes);
            hasher.write_u64(summary.max_boxes);
            hasher.write_u64(summary.total_boxes_opened);
            hasher.write_u64(summary.min_mimics);
            hasher.write_u64(summary.max_mimics);
            hasher.write_u64(summary.total_mimics_encountered);
            hasher.write_u64(summary.total_sucker_punch_kills);
        }
        hasher.finish()
    }

    pub fn summary(&self, strategy: Strategy) -> Option<&StrategySummary> {
        self.strategies.iter().find(|summary| summary.strategy == strategy)
    }
}

/// Validates `config`, then runs every configured strategy in order.
pub fn run_experiment(config: &ExperimentConfig) -> SimResult<ExperimentReport> {
    config.validate()?;

    let pool = match config.threads {
        Some(threads) => rayon::ThreadPoolBuilder::new().num_threads(threads).build(),
        None => rayon::ThreadPoolBuilder::new().build(),
    }
    .map_err(|err| SimError::ThreadPool(err.to_string()))?;

    info!(
        seed = config.seed,
        trials = config.trials,
        boxes = config.game.num_boxes,
        mimics = config.game.mimic_count,
        threads = pool.current_num_threads(),
        "starting experiment"
    );

    let mut strategies = Vec::with_capacity(config.strategies.len());
    for (slot, &strategy) in config.strategies.iter().enumerate() {
        let started = Instant::now();
        let stats = pool.install(|| run_strategy(config, strategy, slot as u64))?;
        let summary = stats.summarize(strategy);
        info!(
            strategy = strategy.name(),
            win_rate = summary.win_rate,
            avg_boxes = summary.avg_boxes,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "strategy finished"
        );
        strategies.push(summary);
    }

    Ok(ExperimentReport {
        seed: config.seed,
        trials: config.trials,
        game: config.game.clone(),
        strategies,
    })
}

/// Runs all trials of one strategy on the current rayon pool.
/// `slot` selects the strategy's family of random streams.
pub fn run_strategy(
    config: &ExperimentConfig,
    strategy: Strategy,
    slot: u64,
) -> SimResult<StrategyStats> {
    let blocks = config.trials.div_ceil(TRIALS_PER_BLOCK);
    (0..blocks)
        .into_par_iter()
        .map(|block| {
            let start = block * TRIALS_PER_BLOCK;
            let count = TRIALS_PER_BLOCK.min(config.trials - start);
            run_block(config, strategy, slot, block, count)
        })
        .try_reduce(StrategyStats::new, |left, right| Ok(left.merge(right)))
}

fn run_block(
    config: &ExperimentConfig,
    strategy: Strategy,
    slot: u64,
    block: u64,
    count: u64,
) -> SimResult<StrategyStats> {
    let game = &config.game;
    let mut rng = block_rng(config.seed, slot, block);
    let mut stats = StrategyStats::new();

    for _ in 0..count {
        let layout = BoxLayout::generate(game, &mut rng)?;
        let order = strategy.pick_order(&layout, game.safe_picks, &mut rng);
        validate_pick_order(&order, layout.num_boxes()).map_err(|source| {
            SimError::InvalidPickOrder { strategy: strategy.name(), source }
        })?;
        let outcome = play_validated(game, &layout, &order, &mut rng)?;
        stats.record(&outcome);
    }

    debug!(strategy = strategy.name(), block, trials = count, wins = stats.wins, "block done");
    Ok(stats)
}
