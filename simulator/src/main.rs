use anyhow::{Context, Result};
use arcade_simulator::{run, SimulatorConfig};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// YAML config file (defaults are used when omitted).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed override.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long)]
    crash_rounds: Option<u64>,

    #[arg(long)]
    block_games: Option<u64>,

    /// Directory for persisted table stats.
    #[arg(long)]
    stats_dir: Option<PathBuf>,

    /// Write the JSON report here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn build_config(args: &Args) -> Result<SimulatorConfig> {
    let mut config = match &args.config {
        Some(path) => SimulatorConfig::load(path)?,
        None => SimulatorConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(rounds) = args.crash_rounds {
        config.crash_rounds = rounds;
    }
    if let Some(games) = args.block_games {
        config.block_games = games;
    }
    if let Some(dir) = &args.stats_dir {
        config.stats_dir = Some(dir.clone());
    }
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    let config = build_config(&args)?;

    tracing_subscriber::fmt()
        .with_max_level(config.log_level()?)
        .with_writer(std::io::stderr)
        .init();

    let report = run(&config)?;
    let json = serde_json::to_string_pretty(&report).context("Could not serialize report")?;
    match &args.output {
        Some(path) => std::fs::write(path, json)
            .with_context(|| format!("Could not write report to {}", path.display()))?,
        None => println!("{json}"),
    }
    Ok(())
}
