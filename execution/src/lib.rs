//! Arcade execution layer.
//!
//! This crate contains the outcome samplers for the crash and block games and the round
//! controllers that consume them.
//!
//! ## Determinism requirements
//! - Samplers never read a clock or a global generator; every draw comes from the
//!   [`RandomSource`] passed in.
//! - Round controllers take elapsed time from the caller.
//! - A round's outcome is sampled once, when the round starts, and never changes.
//!
//! Diagnostic observers (see [`games::DistributionStats`]) only read outcomes.
//!
//! ## Example
//! ```rust
//! use arcade_execution::{games::CrashPointGenerator, rng::GameRng};
//! use arcade_types::DistributionConfig;
//!
//! let generator = CrashPointGenerator::new(DistributionConfig::default()).unwrap();
//! let mut rng = GameRng::new(42, 0);
//! let outcome = generator.generate(&mut rng);
//! assert!(outcome.value >= 1.0);
//! ```

pub mod block_table;
pub mod crash_table;
pub mod games;
pub mod rng;
pub mod store;

mod error;

pub use block_table::{BlockTable, Reveal};
pub use crash_table::{elapsed_for_multiplier, multiplier_at, CashOut, CrashTable, CrashTick};
pub use error::RoundError;
pub use games::{
    generate_crash_point, generate_crash_point_random, place_bomb, place_bomb_random,
    BombHistogram, CrashObserver, CrashPointGenerator, DistributionStats, WeightTable,
};
pub use rng::{EntropyRng, FixedDraws, FixedDrawsError, GameRng, RandomSource};
pub use store::{load_stats, save_stats, FileStore, MemoryStore, StatsStore};
