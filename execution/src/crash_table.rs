//! Crash table round controller.
//!
//! A round starts with a bet, samples its crash point once, and then runs on caller-supplied
//! elapsed time. The displayed multiplier grows as `e^(0.15 * seconds)`; the round crashes as
//! soon as it reaches the crash point. A player who cashed out is paid immediately, but the
//! round keeps running until the crash so the curve can be finished.
//!
//! ## Round lifecycle
//! 1. **Idle** - [`CrashTable::start_round`] debits the bet and samples the crash point
//! 2. **Running** - [`CrashTable::tick`] / [`CrashTable::cash_out`] against elapsed time
//! 3. **Crashed** - history is updated and the table returns to idle
//!
//! Balances are tracked in integer cents.

use crate::error::RoundError;
use crate::games::CrashPointGenerator;
use crate::rng::RandomSource;
use crate::store::{load_stats, save_stats, StatsStore};
use arcade_types::{
    ConfigError, CrashHistoryEntry, CrashTableStats, DistributionConfig, CRASH_STATS_KEY,
    HISTORY_LIMIT, INITIAL_BALANCE_CENTS, MULTIPLIER_GROWTH_RATE,
};
use std::collections::VecDeque;
use tracing::{debug, info};

/// Displayed multiplier after `elapsed_ms` of a running round.
pub fn multiplier_at(elapsed_ms: u64) -> f64 {
    (MULTIPLIER_GROWTH_RATE * elapsed_ms as f64 / 1_000.0).exp()
}

/// First elapsed millisecond at which the displayed multiplier reaches `multiplier`.
pub fn elapsed_for_multiplier(multiplier: f64) -> u64 {
    if multiplier <= 1.0 {
        return 0;
    }
    let mut elapsed = (multiplier.ln() / MULTIPLIER_GROWTH_RATE * 1_000.0).ceil() as u64;
    // Absorb rounding in ln/exp.
    while multiplier_at(elapsed) < multiplier {
        elapsed += 1;
    }
    while elapsed > 0 && multiplier_at(elapsed - 1) >= multiplier {
        elapsed -= 1;
    }
    elapsed
}

/// State of a running round after a clock update.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CrashTick {
    Running {
        multiplier: f64,
    },
    Crashed {
        crash_point: f64,
        /// Multiplier the player cashed out at, if they did.
        cashed_out: Option<f64>,
    },
}

/// A successful cash-out.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CashOut {
    pub multiplier: f64,
    pub payout_cents: u64,
}

#[derive(Clone, Copy, Debug)]
struct LiveRound {
    id: u64,
    bet_cents: u64,
    crash_point: f64,
    cashed_out: Option<f64>,
}

/// Balance, history and the live round of one crash player.
#[derive(Clone, Debug)]
pub struct CrashTable {
    generator: CrashPointGenerator,
    balance_cents: u64,
    history: VecDeque<CrashHistoryEntry>,
    rounds_played: u64,
    live: Option<LiveRound>,
}

impl CrashTable {
    pub fn new(config: DistributionConfig) -> Result<Self, ConfigError> {
        Self::with_stats(config, CrashTableStats::default())
    }

    /// Resume a table from persisted stats.
    pub fn with_stats(config: DistributionConfig, stats: CrashTableStats) -> Result<Self, ConfigError> {
        let generator = CrashPointGenerator::new(config)?;
        let mut table = Self {
            generator,
            balance_cents: INITIAL_BALANCE_CENTS,
            history: VecDeque::with_capacity(HISTORY_LIMIT),
            rounds_played: 0,
            live: None,
        };
        table.restore(stats);
        Ok(table)
    }

    /// Resume a table from `store`, falling back to a fresh table when nothing is stored.
    pub fn load_from<S: StatsStore + ?Sized>(
        config: DistributionConfig,
        store: &S,
    ) -> Result<Self, ConfigError> {
        Self::with_stats(config, load_stats(store, CRASH_STATS_KEY))
    }

    pub fn save_to<S: StatsStore + ?Sized>(&self, store: &mut S) -> anyhow::Result<()> {
        save_stats(store, CRASH_STATS_KEY, &self.stats())
    }

    pub fn generator(&self) -> &CrashPointGenerator {
        &self.generator
    }

    pub fn balance_cents(&self) -> u64 {
        self.balance_cents
    }

    /// Balance change since the table was created with the initial balance.
    pub fn total_profit_cents(&self) -> i64 {
        self.balance_cents as i64 - INITIAL_BALANCE_CENTS as i64
    }

    /// Settled rounds, newest first.
    pub fn history(&self) -> impl Iterator<Item = &CrashHistoryEntry> {
        self.history.iter()
    }

    pub fn is_running(&self) -> bool {
        self.live.is_some()
    }

    /// Crash point of the live round.
    pub fn crash_point(&self) -> Option<f64> {
        self.live.map(|live| live.crash_point)
    }

    /// Stake of the live round.
    pub fn current_bet_cents(&self) -> Option<u64> {
        self.live.map(|live| live.bet_cents)
    }

    pub fn cashed_out_at(&self) -> Option<f64> {
        self.live.and_then(|live| live.cashed_out)
    }

    /// Debit `bet_cents` and start a round. Returns the round id.
    pub fn start_round<R: RandomSource + ?Sized>(
        &mut self,
        bet_cents: u64,
        rng: &mut R,
    ) -> Result<u64, RoundError> {
        if self.live.is_some() {
            return Err(RoundError::RoundInProgress);
        }
        if bet_cents == 0 {
            return Err(RoundError::InvalidBet);
        }
        if bet_cents > self.balance_cents {
            return Err(RoundError::InsufficientBalance {
                bet_cents,
                balance_cents: self.balance_cents,
            });
        }

        self.balance_cents -= bet_cents;
        self.rounds_played += 1;
        let crash_point = self.generator.generate(rng).value;
        let id = self.rounds_played;
        self.live = Some(LiveRound {
            id,
            bet_cents,
            crash_point,
            cashed_out: None,
        });
        debug!(round = id, bet_cents, crash_point, "crash round started");
        Ok(id)
    }

    /// Advance the live round to `elapsed_ms`.
    pub fn tick(&mut self, elapsed_ms: u64) -> Result<CrashTick, RoundError> {
        let live = self.live.ok_or(RoundError::NoActiveRound)?;
        let multiplier = multiplier_at(elapsed_ms);
        if multiplier >= live.crash_point {
            return Ok(self.settle_crash(live));
        }
        Ok(CrashTick::Running { multiplier })
    }

    /// Cash out the live round at `elapsed_ms`.
    ///
    /// If the multiplier has already reached the crash point, the round is settled as a crash
    /// and [`RoundError::Crashed`] is returned.
    pub fn cash_out(&mut self, elapsed_ms: u64) -> Result<CashOut, RoundError> {
        let live = self.live.ok_or(RoundError::NoActiveRound)?;
        if live.cashed_out.is_some() {
            return Err(RoundError::AlreadyCashedOut);
        }
        let multiplier = multiplier_at(elapsed_ms);
        if multiplier >= live.crash_point {
            self.settle_crash(live);
            return Err(RoundError::Crashed {
                crash_point: live.crash_point,
            });
        }

        let payout_cents = (live.bet_cents as f64 * multiplier).round() as u64;
        self.balance_cents = self.balance_cents.saturating_add(payout_cents);
        self.live = Some(LiveRound {
            cashed_out: Some(multiplier),
            ..live
        });
        self.push_history(CrashHistoryEntry {
            round: live.id,
            won: true,
            multiplier,
            payout_cents,
            bet_cents: live.bet_cents,
        });
        info!(
            round = live.id,
            multiplier,
            payout_cents,
            balance_cents = self.balance_cents,
            "cashed out"
        );
        Ok(CashOut {
            multiplier,
            payout_cents,
        })
    }

    /// Restore the initial balance and clear history, abandoning any live round.
    pub fn reset(&mut self) {
        self.restore(CrashTableStats::default());
        self.live = None;
        info!(balance_cents = self.balance_cents, "crash table reset");
    }

    pub fn stats(&self) -> CrashTableStats {
        CrashTableStats {
            balance_cents: self.balance_cents,
            history: self.history.iter().cloned().collect(),
        }
    }

    fn restore(&mut self, stats: CrashTableStats) {
        self.balance_cents = stats.balance_cents;
        self.history = stats.history.into_iter().take(HISTORY_LIMIT).collect();
        self.rounds_played = self.history.front().map(|entry| entry.round).unwrap_or(0);
    }

    fn settle_crash(&mut self, live: LiveRound) -> CrashTick {
        self.live = None;
        if live.cashed_out.is_none() {
            self.push_history(CrashHistoryEntry {
                round: live.id,
                won: false,
                multiplier: live.crash_point,
                payout_cents: 0,
                bet_cents: live.bet_cents,
            });
        }
        info!(
            round = live.id,
            crash_point = live.crash_point,
            cashed_out = live.cashed_out.is_some(),
            balance_cents = self.balance_cents,
            "crashed"
        );
        CrashTick::Crashed {
            crash_point: live.crash_point,
            cashed_out: live.cashed_out,
        }
    }

    fn push_history(&mut self, entry: CrashHistoryEntry) {
        self.history.push_front(entry);
        self.history.truncate(HISTORY_LIMIT);
    }
}
