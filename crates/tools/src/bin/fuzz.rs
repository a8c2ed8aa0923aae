use std::io;

use anyhow::{Context, Result, ensure};
use boxhunt_core::{
    BoxLayout, GameConfig, GameStatus, Strategy, TrialOutcome, play_traced, validate_pick_order,
};
use clap::Parser;
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    layouts: u32,
}

fn random_board(rng: &mut ChaCha8Rng) -> GameConfig {
    let mimic_count = rng.next_u64() as usize % 6;
    let num_boxes = mimic_count + 2 + rng.next_u64() as usize % 40;
    let safe_picks = (rng.next_u64() as usize % 4).min(num_boxes);
    let sucker_punch_chance = (rng.next_u64() % 101) as f64 / 100.0;
    GameConfig { num_boxes, mimic_count, sucker_punch_chance, safe_picks }
}

fn check_strategy(
    config: &GameConfig,
    layout: &BoxLayout,
    strategy: Strategy,
    rng: &mut ChaCha8Rng,
) -> Result<TrialOutcome> {
    let order = strategy.pick_order(layout, config.safe_picks, rng);
    validate_pick_order(&order, config.num_boxes)?;
    if strategy.is_deterministic() {
        let again = strategy.pick_order(layout, config.safe_picks, rng);
        ensure!(again == order, "order changed on a replayed layout");
    }

    let mut replay_rng = rng.clone();
    let (outcome, records) = play_traced(config, layout, &order, rng)?;
    let (replayed, _) = play_traced(config, layout, &order, &mut replay_rng)?;
    ensure!(outcome == replayed, "not reproducible from the same stream");

    ensure!(outcome.boxes_opened <= config.num_boxes, "opened too many boxes");
    ensure!(outcome.mimics_encountered <= config.mimic_count, "met more mimics than were placed");
    ensure!(
        outcome.sucker_punch_kills <= outcome.mimics_encountered,
        "sucker punched a mimic it never met"
    );
    if outcome.won {
        ensure!(outcome.boxes_opened == config.num_boxes, "won with boxes left");
        ensure!(outcome.mimics_encountered == config.mimic_count, "won with uncredited mimics");
    }

    let mut remaining = config.mimic_count;
    for (turn, record) in records.iter().enumerate() {
        ensure!(record.turn == turn, "turn {} recorded as {}", turn, record.turn);
        ensure!(record.mimics_remaining <= remaining, "a neutralized mimic came back");
        remaining = record.mimics_remaining;
        let last = turn + 1 == records.len();
        ensure!(
            last || record.status == GameStatus::InProgress,
            "kept picking after the game ended"
        );
    }
    Ok(outcome)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    println!("Starting Fuzz harness on seed {} for {} layouts...", args.seed, args.layouts);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut games = 0_u64;
    let mut wins = 0_u64;
    for step in 0..args.layouts {
        let config = random_board(&mut rng);
        config.validate()?;
        let layout = BoxLayout::generate(&config, &mut rng)?;

        for strategy in Strategy::ALL {
            let outcome = check_strategy(&config, &layout, strategy, &mut rng).with_context(|| {
                format!(
                    "Invariant failed for {strategy} at layout {step}: {config:?}, saver={}, multiplier={}, mimics={:?}",
                    layout.saver_position(),
                    layout.multiplier_position(),
                    layout.mimic_positions()
                )
            })?;
            games += 1;
            wins += u64::from(outcome.won);
        }
    }

    println!("Fuzzing completed successfully: {games} games, {wins} won.");
    Ok(())
}
