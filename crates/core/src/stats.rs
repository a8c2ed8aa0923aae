//! Per-strategy aggregate statistics over many trials.

use serde::{Deserialize, Serialize};

use crate::game::TrialOutcome;
use crate::strategy::Strategy;

/// Running totals for one strategy. Partial accumulators merge associatively.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StrategyStats {
    pub trials: u64,
    pub wins: u64,
    pub total_boxes_opened: u64,
    pub min_boxes: u64,
    pub max_boxes: u64,
    pub total_mimics_encountered: u64,
    pub min_mimics: u64,
    pub max_mimics: u64,
    pub total_sucker_punch_kills: u64,
}

impl Default for StrategyStats {
    fn default() -> Self {
        Self::new()
    }
}

impl StrategyStats {
    pub fn new() -> Self {
        Self {
            trials: 0,
            wins: 0,
            total_boxes_opened: 0,
            min_boxes: u64::MAX,
            max_boxes: 0,
            total_mimics_encountered: 0,
            min_mimics: u64::MAX,
            max_mimics: 0,
            total_sucker_punch_kills: 0,
        }
    }

    pub fn record(&mut self, outcome: &TrialOutcome) {
        let boxes = outcome.boxes_opened as u64;
        let mimics = outcome.mimics_encountered as u64;
        self.trials += 1;
        self.wins += u64::from(outcome.won);
        self.total_boxes_opened += boxes;
        self.min_boxes = self.min_boxes.min(boxes);
        self.max_boxes = self.max_boxes.max(boxes);
        self.total_mimics_encountered += mimics;
        self.min_mimics = self.min_mimics.min(mimics);
        self.max_mimics = self.max_mimics.max(mimics);
        self.total_sucker_punch_kills += outcome.sucker_punch_kills as u64;
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.trials += other.trials;
        self.wins += other.wins;
        self.total_boxes_opened += other.total_boxes_opened;
        self.min_boxes = self.min_boxes.min(other.min_boxes);
        self.max_boxes = self.max_boxes.max(other.max_boxes);
        self.total_mimics_encountered += other.total_mimics_encountered;
        self.min_mimics = self.min_mimics.min(other.min_mimics);
        self.max_mimics = self.max_mimics.max(other.max_mimics);
        self.total_sucker_punch_kills += other.total_sucker_punch_kills;
        self
    }

    pub fn summarize(&self, strategy: Strategy) -> StrategySummary {
        let per_trial = |total: u64| {
            if self.trials == 0 { 0.0 } else { total as f64 / self.trials as f64 }
        };
        let observed = |value: u64| if self.trials == 0 { 0 } else { value };
        StrategySummary {
            strategy,
            trials: self.trials,
            wins: self.wins,
            win_rate: per_trial(self.wins),
            min_boxes: observed(self.min_boxes),
            max_boxes: self.max_boxes,
            avg_boxes: per_trial(self.total_boxes_opened),
            min_mimics: observed(self.min_mimics),
            max_mimics: self.max_mimics,
            avg_mimics: per_trial(self.total_mimics_encountered),
            total_boxes_opened: self.total_boxes_opened,
            total_mimics_encountered: self.total_mimics_encountered,
            total_sucker_punch_kills: self.total_sucker_punch_kills,
            avg_sucker_punch_kills: per_trial(self.total_sucker_punch_kills),
        }
    }
}

/// Finalized statistics for one strategy, ready for reporting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StrategySummary {
    pub strategy: Strategy,
    pub trials: u64,
    pub wins: u64,
    pub win_rate: f64,
    /// Fewest boxes opened in any trial (the worst run).
    pub min_boxes: u64,
    /// Most boxes opened in any trial (the best run).
    pub max_boxes: u64,
    pub avg_boxes: f64,
    pub min_mimics: u64,
    pub max_mimics: u64,
    pub avg_mimics: f64,
    pub total_boxes_opened: u64,
    pub total_mimics_encountered: u64,
    pub total_sucker_punch_kills: u64,
    pub avg_sucker_punch_kills: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(won: bool, boxes_opened: usize, mimics: usize, kills: usize) -> TrialOutcome {
        TrialOutcome { won, boxes_opened, mimics_encountered: mimics, sucker_punch_kills: kills }
    }

    #[test]
    fn records_sums_and_extremes() {
        let mut stats = StrategyStats::new();
        stats.record(&outcome(true, 30, 4, 0));
        stats.record(&outcome(false, 3, 1, 0));
        stats.record(&outcome(true, 30, 4, 1));

        assert_eq!(stats.trials, 3);
        assert_eq!(stats.wins, 2);
        assert_eq!(stats.total_boxes_opened, 63);
        assert_eq!((stats.min_boxes, stats.max_boxes), (3, 30));
        assert_eq!((stats.min_mimics, stats.max_mimics), (1, 4));
        assert_eq!(stats.total_sucker_punch_kills, 1);

        let summary = stats.summarize(Strategy::DynamicSequential);
        assert!((summary.win_rate - 2.0 / 3.0).abs() < 1e-12);
        assert!((summary.avg_boxes - 21.0).abs() < 1e-12);
        assert!((summary.avg_mimics - 3.0).abs() < 1e-12);
        assert!(summary.min_boxes as f64 <= summary.avg_boxes);
        assert!(summary.avg_boxes <= summary.max_boxes as f64);
    }

    #[test]
    fn merge_matches_sequential_recording() {
        let outcomes = [
            outcome(true, 30, 4, 0),
            outcome(false, 7, 2, 1),
            outcome(false, 3, 1, 0),
            outcome(true, 30, 3, 2),
        ];

        let mut whole = StrategyStats::new();
        outcomes.iter().for_each(|item| whole.record(item));

        let mut left = StrategyStats::new();
        let mut right = StrategyStats::new();
        outcomes[..1].iter().for_each(|item| left.record(item));
        outcomes[1..].iter().for_each(|item| right.record(item));

        assert_eq!(left.clone().merge(right.clone()), whole);
        assert_eq!(right.merge(left), whole);
        assert_eq!(whole.clone().merge(StrategyStats::new()), whole);
    }

    #[test]
    fn empty_accumulator_summarizes_to_zeroes() {
        let summary = StrategyStats::new().summarize(Strategy::RefinedDynamic);
        assert_eq!(summary.trials, 0);
        assert_eq!(summary.min_boxes, 0);
        assert_eq!(summary.min_mimics, 0);
        assert_eq!(summary.win_rate, 0.0);
    }
}
