//! Headless simulation of the arcade games.
//!
//! The simulator drives a [`CrashTable`] and a [`BlockTable`] with simple automated players,
//! collects outcome statistics and returns a serializable [`Report`]. Every round draws from
//! its own [`GameRng`] stream, so a run is fully determined by its [`SimulatorConfig`].

use anyhow::{Context, Result};
use arcade_execution::{
    elapsed_for_multiplier, BlockTable, BombHistogram, CrashTable, CrashTick, DistributionStats,
    FileStore, GameRng, RandomSource, Reveal, RoundError,
};
use arcade_types::{BlockTableStats, DistributionSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, info};

mod config;
pub use config::{SimulatorConfig, SimulatorConfigError};

/// Keeps block game streams apart from crash round streams of the same seed.
const BLOCK_SEED_SALT: u64 = 0x626c_6f63_6b73;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CrashReport {
    /// Rounds actually played.
    pub rounds: u64,
    pub wins: u64,
    pub losses: u64,
    /// The player ran out of balance before playing every configured round.
    pub busted: bool,
    pub starting_balance_cents: u64,
    pub final_balance_cents: u64,
    /// Balance relative to the table's initial balance.
    pub total_profit_cents: i64,
    pub distribution: DistributionSnapshot,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct BlockReport {
    pub games: u64,
    pub games_won: u64,
    pub bombs_hit: u64,
    pub rounds_dealt: u64,
    /// Score banked during this run.
    pub banked_score: u64,
    /// Table stats after the run, including anything loaded from the store.
    pub stats: BlockTableStats,
    /// Bomb placement counts keyed by the number of blocks dealt.
    pub bomb_positions: BTreeMap<usize, Vec<u64>>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Report {
    pub seed: u64,
    pub crash: CrashReport,
    pub block: BlockReport,
}

/// Play `config.crash_rounds` crash rounds, cashing out at `config.auto_cashout`.
///
/// Stops early if the balance can no longer cover the bet.
pub fn simulate_crash(config: &SimulatorConfig, table: &mut CrashTable) -> Result<CrashReport> {
    let cashout_ms = elapsed_for_multiplier(config.auto_cashout);
    let mut distribution = DistributionStats::new(config.report_every);
    let starting_balance_cents = table.balance_cents();
    let (mut wins, mut losses, mut busted) = (0u64, 0u64, false);

    for round in 0..config.crash_rounds {
        if table.balance_cents() < config.bet_cents {
            busted = true;
            info!(round, balance_cents = table.balance_cents(), "player busted");
            break;
        }
        let mut rng = GameRng::new(config.seed, round);
        table
            .start_round(config.bet_cents, &mut rng)
            .context("failed to start crash round")?;
        let crash_point = table.crash_point().context("round did not start")?;
        distribution.record(crash_point);

        let mut elapsed = 0;
        let mut cashed_out = false;
        loop {
            if !cashed_out && elapsed >= cashout_ms {
                match table.cash_out(elapsed) {
                    Ok(_) => {
                        wins += 1;
                        cashed_out = true;
                    }
                    Err(RoundError::Crashed { .. }) => {
                        losses += 1;
                        break;
                    }
                    Err(err) => return Err(err).context("failed to cash out"),
                }
            }
            match table.tick(elapsed)? {
                CrashTick::Running { .. } => elapsed += config.tick_ms,
                CrashTick::Crashed { cashed_out: None, .. } => {
                    losses += 1;
                    break;
                }
                CrashTick::Crashed { .. } => break,
            }
        }
        debug!(round, crash_point, elapsed, cashed_out, "crash round simulated");
    }

    Ok(CrashReport {
        rounds: wins + losses,
        wins,
        losses,
        busted,
        starting_balance_cents,
        final_balance_cents: table.balance_cents(),
        total_profit_cents: table.total_profit_cents(),
        distribution: distribution.snapshot(),
    })
}

/// Play `config.block_games` block games, revealing one random block per round and planting
/// after `config.plant_after` safe rounds.
pub fn simulate_blocks(config: &SimulatorConfig, table: &mut BlockTable) -> Result<BlockReport> {
    let mut histograms: BTreeMap<usize, BombHistogram> = BTreeMap::new();
    let (mut games_won, mut bombs_hit, mut rounds_dealt, mut banked_score) = (0u64, 0u64, 0u64, 0u64);

    for game in 0..config.block_games {
        let mut rng = GameRng::new(config.seed ^ BLOCK_SEED_SALT, game);
        table.start_game(&mut rng)?;
        rounds_dealt += 1;
        record_deal(&mut histograms, table)?;

        let mut safe_rounds = 0;
        loop {
            let pick = rng.next_index(table.num_blocks());
            match table.reveal(pick)? {
                Reveal::Bomb { .. } => {
                    bombs_hit += 1;
                    break;
                }
                Reveal::Safe { .. } => {
                    safe_rounds += 1;
                    if safe_rounds >= config.plant_after {
                        banked_score += table.plant()?;
                        games_won += 1;
                        break;
                    }
                    table.next_round(&mut rng)?;
                    rounds_dealt += 1;
                    record_deal(&mut histograms, table)?;
                }
            }
        }
    }

    Ok(BlockReport {
        games: config.block_games,
        games_won,
        bombs_hit,
        rounds_dealt,
        banked_score,
        stats: table.stats(),
        bomb_positions: histograms
            .into_iter()
            .map(|(num_blocks, histogram)| (num_blocks, histogram.counts().to_vec()))
            .collect(),
    })
}

fn record_deal(histograms: &mut BTreeMap<usize, BombHistogram>, table: &BlockTable) -> Result<()> {
    let bomb = table.bomb().context("no bomb dealt")?;
    histograms
        .entry(table.num_blocks())
        .or_insert_with(|| BombHistogram::new(table.num_blocks()))
        .record(bomb);
    Ok(())
}

/// Run both simulations, loading and saving table stats when `stats_dir` is set.
pub fn run(config: &SimulatorConfig) -> Result<Report> {
    config.validate()?;
    info!(
        seed = config.seed,
        crash_rounds = config.crash_rounds,
        block_games = config.block_games,
        "starting simulation"
    );

    let mut store = match &config.stats_dir {
        Some(dir) => Some(FileStore::open(dir)?),
        None => None,
    };
    let (mut crash_table, mut block_table) = match &store {
        Some(store) => (
            CrashTable::load_from(config.crash, store)?,
            BlockTable::load_from(config.block, store)?,
        ),
        None => (CrashTable::new(config.crash)?, BlockTable::new(config.block)?),
    };

    let crash = simulate_crash(config, &mut crash_table)?;
    let block = simulate_blocks(config, &mut block_table)?;

    if let Some(store) = store.as_mut() {
        crash_table
            .save_to(store)
            .context("failed to save crash stats")?;
        block_table
            .save_to(store)
            .context("failed to save block stats")?;
    }

    info!(
        crash_rounds = crash.rounds,
        crash_wins = crash.wins,
        final_balance_cents = crash.final_balance_cents,
        block_games_won = block.games_won,
        banked_score = block.banked_score,
        "simulation complete"
    );
    Ok(Report {
        seed: config.seed,
        crash,
        block,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use arcade_execution::{load_stats, StatsStore};
    use arcade_types::{CrashTableStats, BLOCK_STATS_KEY, CRASH_STATS_KEY, INITIAL_BALANCE_CENTS};

    fn small_config() -> SimulatorConfig {
        SimulatorConfig {
            crash_rounds: 200,
            block_games: 200,
            report_every: 0,
            ..SimulatorConfig::default()
        }
    }

    #[test]
    fn test_crash_simulation_accounts_for_every_round() {
        let config = small_config();
        let mut table = CrashTable::new(config.crash).unwrap();
        let report = simulate_crash(&config, &mut table).unwrap();

        assert_eq!(report.wins + report.losses, report.rounds);
        assert_eq!(report.distribution.total, report.rounds);
        assert_eq!(report.starting_balance_cents, INITIAL_BALANCE_CENTS);
        assert_eq!(report.final_balance_cents, table.balance_cents());
        assert_eq!(
            report.total_profit_cents,
            report.final_balance_cents as i64 - INITIAL_BALANCE_CENTS as i64
        );
        if !report.busted {
            assert_eq!(report.rounds, config.crash_rounds);
        }
        assert!(report.wins > 0);
        assert!(report.losses > 0);
        assert!(!table.is_running());
    }

    #[test]
    fn test_crash_simulation_busts_when_balance_runs_out() {
        // No crash point can reach 100x, so the only bet is always lost.
        let config = SimulatorConfig {
            bet_cents: INITIAL_BALANCE_CENTS,
            auto_cashout: 100.0,
            ..small_config()
        };
        let mut table = CrashTable::new(config.crash).unwrap();
        let report = simulate_crash(&config, &mut table).unwrap();

        assert_eq!(report.rounds, 1);
        assert_eq!(report.losses, 1);
        assert!(report.busted);
        assert_eq!(report.final_balance_cents, 0);
    }

    #[test]
    fn test_block_simulation_accounts_for_every_game() {
        let config = small_config();
        let mut table = BlockTable::new(config.block).unwrap();
        let report = simulate_blocks(&config, &mut table).unwrap();

        assert_eq!(report.games_won + report.bombs_hit, report.games);
        assert_eq!(report.stats.games_won, report.games_won);
        assert_eq!(report.stats.total_score, report.banked_score);
        assert!(report.rounds_dealt >= report.games);

        let placements: u64 = report
            .bomb_positions
            .values()
            .map(|counts| counts.iter().sum::<u64>())
            .sum();
        assert_eq!(placements, report.rounds_dealt);
        for (num_blocks, counts) in &report.bomb_positions {
            assert!((3..=10).contains(num_blocks));
            assert_eq!(counts.len(), *num_blocks);
        }
    }

    #[test]
    fn test_runs_are_reproducible() {
        let config = small_config();
        let first = run(&config).unwrap();
        let second = run(&config).unwrap();
        assert_eq!(first, second);

        let other = run(&SimulatorConfig {
            seed: config.seed + 1,
            ..config
        })
        .unwrap();
        assert_ne!(first.crash.distribution, other.crash.distribution);
    }

    #[test]
    fn test_run_rejects_invalid_config() {
        let config = SimulatorConfig {
            tick_ms: 0,
            ..small_config()
        };
        assert!(run(&config).is_err());
    }

    #[test]
    fn test_run_persists_stats() {
        let dir = tempfile::tempdir().unwrap();
        let config = SimulatorConfig {
            stats_dir: Some(dir.path().to_path_buf()),
            ..small_config()
        };

        let first = run(&config).unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(store.load(CRASH_STATS_KEY).unwrap().is_some());
        let crash_stats: CrashTableStats = load_stats(&store, CRASH_STATS_KEY);
        assert_eq!(crash_stats.balance_cents, first.crash.final_balance_cents);
        let block_stats: BlockTableStats = load_stats(&store, BLOCK_STATS_KEY);
        assert_eq!(block_stats, first.block.stats);

        // The second run resumes from the saved stats.
        let second = run(&config).unwrap();
        assert_eq!(
            second.crash.starting_balance_cents,
            first.crash.final_balance_cents
        );
        assert_eq!(second.block.banked_score, first.block.banked_score);
        assert_eq!(second.block.stats.total_score, 2 * first.block.stats.total_score);
        assert_eq!(second.block.stats.games_won, 2 * first.block.stats.games_won);
    }

    #[test]
    fn test_report_serializes() {
        let report = run(&small_config()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["seed"], 42);
        assert!(json["crash"]["distribution"]["counts"].is_array());
        assert!(json["block"]["bomb_positions"].is_object());
    }
}
