use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use boxhunt_core::config::DEFAULT_TRIALS;
use boxhunt_core::report::render_text;
use boxhunt_core::rng::generate_runtime_seed;
use boxhunt_core::{ExperimentConfig, GameConfig, Strategy, run_experiment};
use clap::Parser;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Compare box-hunt pick strategies over many random trials")]
struct Args {
    /// TOML file with experiment settings; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Number of boxes on the board
    #[arg(long)]
    boxes: Option<usize>,
    /// Number of mimics hidden among the boxes
    #[arg(long)]
    mimics: Option<usize>,
    /// Trials per strategy
    #[arg(short, long)]
    trials: Option<u64>,
    /// Chance to survive a mimic without a saver charge
    #[arg(long)]
    sucker_punch_chance: Option<f64>,
    /// Opening picks on which a mimic dies for free
    #[arg(long)]
    safe_picks: Option<usize>,
    /// Seed for every random draw; generated when absent
    #[arg(short, long)]
    seed: Option<u64>,
    /// Worker threads for the trial loop
    #[arg(long)]
    threads: Option<usize>,
    /// Strategy to run (repeatable); defaults to the dynamic and refined strategies
    #[arg(long = "strategy")]
    strategies: Vec<Strategy>,
    /// Run every known strategy, including the static ones
    #[arg(long, conflicts_with = "strategies")]
    all_strategies: bool,
    /// Also write the report as JSON to this path
    #[arg(long)]
    json: Option<PathBuf>,
}

/// Settings accepted in the `--config` file. Missing keys keep their defaults.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    game: GameConfig,
    trials: Option<u64>,
    seed: Option<u64>,
    threads: Option<usize>,
    strategies: Option<Vec<Strategy>>,
}

fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

fn resolve_config(args: &Args) -> Result<ExperimentConfig> {
    let file = match &args.config {
        Some(path) => load_config_file(path)?,
        None => ConfigFile::default(),
    };
    let mut config = ExperimentConfig {
        game: file.game,
        trials: file.trials.unwrap_or(DEFAULT_TRIALS),
        threads: file.threads,
        strategies: file.strategies.unwrap_or_else(|| Strategy::DEFAULT_SET.to_vec()),
        ..ExperimentConfig::default()
    };

    if let Some(boxes) = args.boxes {
        config.game.num_boxes = boxes;
    }
    if let Some(mimics) = args.mimics {
        config.game.mimic_count = mimics;
    }
    if let Some(chance) = args.sucker_punch_chance {
        config.game.sucker_punch_chance = chance;
    }
    if let Some(safe_picks) = args.safe_picks {
        config.game.safe_picks = safe_picks;
    }
    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if args.threads.is_some() {
        config.threads = args.threads;
    }
    if args.all_strategies {
        config.strategies = Strategy::ALL.to_vec();
    } else if !args.strategies.is_empty() {
        config.strategies = args.strategies.clone();
    }
    config.seed = args.seed.or(file.seed).unwrap_or_else(generate_runtime_seed);

    config.validate().context("Invalid experiment configuration")?;
    Ok(config)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    let report = run_experiment(&config).context("Simulation aborted")?;
    print!("{}", render_text(&report));

    if let Some(path) = &args.json {
        report
            .write_atomic(path)
            .with_context(|| format!("Failed to write report: {}", path.display()))?;
        info!(path = %path.display(), "report written");
    }

    Ok(())
}
