use std::io;

use anyhow::{Context, Result, bail};
use boxhunt_core::trace::render_trace;
use boxhunt_core::{BoxLayout, GameConfig, Strategy, play_traced};
use clap::Parser;
use rand_chacha::{ChaCha8Rng, rand_core::SeedableRng};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Print one box-hunt game pick by pick")]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(long, default_value_t = Strategy::RefinedDynamic)]
    strategy: Strategy,
    #[arg(long, default_value_t = GameConfig::default().num_boxes)]
    boxes: usize,
    #[arg(long, default_value_t = GameConfig::default().mimic_count)]
    mimics: usize,
    #[arg(long, default_value_t = GameConfig::default().safe_picks)]
    safe_picks: usize,
    #[arg(long, default_value_t = GameConfig::default().sucker_punch_chance)]
    sucker_punch_chance: f64,
    /// Saver position; with --multiplier and --mimic, replaces the random layout
    #[arg(long, requires = "multiplier")]
    saver: Option<usize>,
    #[arg(long, requires = "saver")]
    multiplier: Option<usize>,
    /// Mimic position (repeatable)
    #[arg(long = "mimic")]
    mimics_at: Vec<usize>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let mut config = GameConfig {
        num_boxes: args.boxes,
        mimic_count: args.mimics,
        sucker_punch_chance: args.sucker_punch_chance,
        safe_picks: args.safe_picks,
    };
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let layout = match (args.saver, args.multiplier) {
        (Some(saver), Some(multiplier)) => {
            config.mimic_count = args.mimics_at.len();
            BoxLayout::from_positions(config.num_boxes, saver, multiplier, &args.mimics_at)
                .context("Invalid layout")?
        }
        _ => {
            if !args.mimics_at.is_empty() {
                bail!("--mimic needs --saver and --multiplier");
            }
            BoxLayout::generate(&config, &mut rng).context("Invalid game configuration")?
        }
    };
    config.validate().context("Invalid game configuration")?;

    debug!(
        seed = args.seed,
        strategy = args.strategy.name(),
        saver = layout.saver_position(),
        multiplier = layout.multiplier_position(),
        "tracing game"
    );

    let order = args.strategy.pick_order(&layout, config.safe_picks, &mut rng);
    let (outcome, records) = play_traced(&config, &layout, &order, &mut rng)
        .with_context(|| format!("Strategy {} produced an unplayable order", args.strategy))?;

    println!("Strategy: {} | Seed: {}", args.strategy, args.seed);
    print!("{}", render_trace(&layout, &records, &outcome));
    Ok(())
}
