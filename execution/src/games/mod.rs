//! Outcome sampling for the arcade games.
//!
//! Both samplers are pure: `configuration × uniform draw → outcome`. They hold no round state
//! and are called once per round by the table controllers, which keep the outcome fixed for
//! the rest of the round.

pub mod bomb;
pub mod crash;
pub mod distribution;

pub use bomb::{place_bomb, place_bomb_random, WeightTable};
pub use crash::{generate_crash_point, generate_crash_point_random, CrashPointGenerator};
pub use distribution::{BombHistogram, CrashObserver, DistributionStats};
