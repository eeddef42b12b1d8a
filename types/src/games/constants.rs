/// Lowest crash multiplier a round can ever produce.
pub const CRASH_FLOOR: f64 = 1.0;

/// Default lower bound of the crash mapping.
pub const DEFAULT_MIN_CRASH: f64 = 1.0;

/// Default upper bound of the crash mapping (approached asymptotically).
pub const DEFAULT_MAX_CRASH: f64 = 20.0;

/// Default rate of the exponential variate.
pub const DEFAULT_LAMBDA: f64 = 0.5;

/// Default house edge (10%).
pub const DEFAULT_HOUSE_EDGE: f64 = 0.1;

/// Default saturation divisor of the bounded mapping.
pub const DEFAULT_SATURATION: f64 = 50.0;

/// Upper bounds (exclusive) of the diagnostic crash buckets. Values at or above the last
/// bound fall into the final bucket.
pub const CRASH_BUCKET_BOUNDS: [f64; 3] = [1.2, 1.5, 3.0];

/// Distribution reports are emitted every this many observations.
pub const DEFAULT_REPORT_EVERY: u64 = 10;

/// Fewest blocks dealt in a block round.
pub const DEFAULT_MIN_BLOCKS: usize = 3;

/// Most blocks dealt in a block round.
pub const DEFAULT_MAX_BLOCKS: usize = 10;

/// Starting balance of a crash table ($1000.00).
pub const INITIAL_BALANCE_CENTS: u64 = 100_000;

/// Number of settled crash rounds kept in history.
pub const HISTORY_LIMIT: usize = 10;

/// Exponent growth per second of the displayed crash multiplier.
pub const MULTIPLIER_GROWTH_RATE: f64 = 0.15;

/// Store key for crash table stats.
pub const CRASH_STATS_KEY: &str = "crash_game_stats";

/// Store key for block table stats.
pub const BLOCK_STATS_KEY: &str = "block_game_stats";
