//! Diagnostic statistics over sampled outcomes.
//!
//! Nothing here feeds back into sampling. A [`DistributionStats`] belongs to a single owner;
//! it is not meant to be shared across threads.

use arcade_types::{
    BombOutcome, CrashBucket, CrashOutcome, DistributionSnapshot, DEFAULT_REPORT_EVERY,
};
use tracing::info;

/// Receives every crash point produced by [`super::CrashPointGenerator::generate_observed`].
pub trait CrashObserver {
    fn observe(&mut self, outcome: &CrashOutcome, draw: f64);
}

impl<F: FnMut(&CrashOutcome, f64)> CrashObserver for F {
    fn observe(&mut self, outcome: &CrashOutcome, draw: f64) {
        self(outcome, draw)
    }
}

/// Bucketed counters over crash outcomes.
#[derive(Clone, Debug)]
pub struct DistributionStats {
    snapshot: DistributionSnapshot,
    report_every: u64,
}

impl Default for DistributionStats {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_EVERY)
    }
}

impl DistributionStats {
    /// Create empty stats that self-report every `report_every` observations (0 never reports).
    pub fn new(report_every: u64) -> Self {
        Self {
            snapshot: DistributionSnapshot::default(),
            report_every,
        }
    }

    pub fn record(&mut self, value: f64) {
        let snapshot = &mut self.snapshot;
        snapshot.total += 1;
        snapshot.counts[CrashBucket::for_value(value).index()] += 1;
        if value > snapshot.max_observed {
            snapshot.max_observed = value;
        }
        if self.report_every > 0 && snapshot.total % self.report_every == 0 {
            self.report();
        }
    }

    pub fn total(&self) -> u64 {
        self.snapshot.total
    }

    pub fn count(&self, bucket: CrashBucket) -> u64 {
        self.snapshot.count(bucket)
    }

    pub fn fraction(&self, bucket: CrashBucket) -> f64 {
        self.snapshot.fraction(bucket)
    }

    pub fn max_observed(&self) -> f64 {
        self.snapshot.max_observed
    }

    pub fn snapshot(&self) -> DistributionSnapshot {
        self.snapshot.clone()
    }

    pub fn reset(&mut self) {
        self.snapshot = DistributionSnapshot::default();
    }

    /// Emit the current distribution as a structured log event.
    pub fn report(&self) {
        let pct = |bucket| self.fraction(bucket) * 100.0;
        info!(
            total = self.snapshot.total,
            low_pct = pct(CrashBucket::Low),
            medium_pct = pct(CrashBucket::Medium),
            high_pct = pct(CrashBucket::High),
            very_high_pct = pct(CrashBucket::VeryHigh),
            max_observed = self.snapshot.max_observed,
            "crash point distribution"
        );
    }
}

impl CrashObserver for DistributionStats {
    fn observe(&mut self, outcome: &CrashOutcome, _draw: f64) {
        self.record(outcome.value);
    }
}

/// Per-slot counts of bomb placements.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BombHistogram {
    counts: Vec<u64>,
    total: u64,
}

impl BombHistogram {
    pub fn new(slots: usize) -> Self {
        Self {
            counts: vec![0; slots],
            total: 0,
        }
    }

    /// Count a placement, growing the histogram if the slot is new.
    pub fn record(&mut self, outcome: BombOutcome) {
        if outcome.index >= self.counts.len() {
            self.counts.resize(outcome.index + 1, 0);
        }
        self.counts[outcome.index] += 1;
        self.total += 1;
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn frequency(&self, index: usize) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.counts.get(index).copied().unwrap_or(0) as f64 / self.total as f64
    }
}
