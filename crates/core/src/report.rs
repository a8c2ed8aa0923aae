//! Plain-text rendering of experiment reports.

use std::fmt::Write;

use crate::experiment::ExperimentReport;
use crate::stats::StrategySummary;

/// Format a fingerprint as `0x` followed by exactly 16 lowercase hex digits.
pub fn format_fingerprint(hash: u64) -> String {
    format!("0x{hash:016x}")
}

pub fn render_text(report: &ExperimentReport) -> String {
    let mut out = String::new();
    let game = &report.game;
    // Writing into a String cannot fail.
    let _ = writeln!(
        out,
        "Seed: {} | Trials per strategy: {} | Boxes: {} | Mimics: {} | Safe picks: {} | Sucker punch: {:.2}%",
        report.seed,
        report.trials,
        game.num_boxes,
        game.mimic_count,
        game.safe_picks,
        game.sucker_punch_chance * 100.0,
    );
    out.push_str("Simulation results:\n");
    for summary in &report.strategies {
        render_summary(&mut out, summary);
    }
    let _ = writeln!(out, "Fingerprint: {}", format_fingerprint(report.fingerprint()));
    out
}

fn render_summary(out: &mut String, summary: &StrategySummary) {
    let _ = writeln!(out, "{}: {:.2}% win rate", summary.strategy, summary.win_rate * 100.0);
    let _ = writeln!(out, "  Worst: {} boxes opened", summary.min_boxes);
    let _ = writeln!(out, "  Best: {} boxes opened", summary.max_boxes);
    let _ = writeln!(out, "  Average: {:.2} boxes opened", summary.avg_boxes);
    let _ = writeln!(
        out,
        "  Mimics Encountered - Worst: {}, Best: {}, Average: {:.2}",
        summary.min_mimics, summary.max_mimics, summary.avg_mimics
    );
    let _ = writeln!(out, "  Average Sucker Punch Kills: {:.2}", summary.avg_sucker_punch_kills);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::game::TrialOutcome;
    use crate::stats::StrategyStats;
    use crate::strategy::Strategy;

    fn sample_report() -> ExperimentReport {
        let mut stats = StrategyStats::new();
        for (won, boxes, mimics) in [(true, 30, 4), (false, 3, 1), (false, 9, 2), (true, 30, 4)] {
            stats.record(&TrialOutcome {
                won,
                boxes_opened: boxes,
                mimics_encountered: mimics,
                sucker_punch_kills: 0,
            });
        }
        ExperimentReport {
            seed: 42,
            trials: 4,
            game: GameConfig::default(),
            strategies: vec![stats.summarize(Strategy::DynamicSequential)],
        }
    }

    #[test]
    fn format_fingerprint_is_16_hex_digits() {
        assert_eq!(format_fingerprint(0), "0x0000000000000000");
        assert_eq!(format_fingerprint(0xDEADBEEF), "0x00000000deadbeef");
        assert_eq!(format_fingerprint(u64::MAX), "0xffffffffffffffff");
    }

    #[test]
    fn renders_one_block_per_strategy() {
        let text = render_text(&sample_report());
        let expected_block = "\
Simulation results:
dynamic_sequential: 50.00% win rate
  Worst: 3 boxes opened
  Best: 30 boxes opened
  Average: 18.00 boxes opened
  Mimics Encountered - Worst: 1, Best: 4, Average: 2.75
  Average Sucker Punch Kills: 0.00
";
        assert!(text.contains(expected_block), "unexpected report:\n{text}");
        assert!(text.starts_with("Seed: 42 | Trials per strategy: 4 | Boxes: 30 | Mimics: 4"));
        assert!(text.trim_end().ends_with(&format_fingerprint(sample_report().fingerprint())));
    }
}
