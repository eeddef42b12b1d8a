use serde::{Deserialize, Serialize};

use super::{CrashBucket, INITIAL_BALANCE_CENTS};

/// One settled crash round.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrashHistoryEntry {
    /// Sequential round number on the table.
    pub round: u64,
    /// Player cashed out before the crash.
    pub won: bool,
    /// Cash-out multiplier on a win, crash point on a loss.
    pub multiplier: f64,
    /// Amount credited back (zero on a loss).
    pub payout_cents: u64,
    /// Amount staked.
    pub bet_cents: u64,
}

impl CrashHistoryEntry {
    /// Payout minus stake.
    pub fn net_profit_cents(&self) -> i64 {
        self.payout_cents as i64 - self.bet_cents as i64
    }
}

/// Persisted state of a crash table.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrashTableStats {
    pub balance_cents: u64,
    /// Newest first.
    pub history: Vec<CrashHistoryEntry>,
}

impl Default for CrashTableStats {
    fn default() -> Self {
        Self {
            balance_cents: INITIAL_BALANCE_CENTS,
            history: Vec::new(),
        }
    }
}

/// Persisted state of a block table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockTableStats {
    pub total_score: u64,
    pub games_won: u64,
}

/// Point-in-time view of bucketed crash statistics.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DistributionSnapshot {
    pub total: u64,
    /// Indexed by [`CrashBucket::index`].
    pub counts: [u64; 4],
    pub max_observed: f64,
}

impl DistributionSnapshot {
    pub fn count(&self, bucket: CrashBucket) -> u64 {
        self.counts[bucket.index()]
    }

    /// Share of observations in `bucket` (0 when nothing was observed).
    pub fn fraction(&self, bucket: CrashBucket) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.count(bucket) as f64 / self.total as f64
    }
}
