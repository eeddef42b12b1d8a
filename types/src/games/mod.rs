//! Game domain types.
//!
//! Defines crash/block configuration, outcomes, persisted stats and constants used by the
//! execution layer and the simulator.

mod block;
mod constants;
mod crash;
mod error;
mod stats;

pub use block::*;
pub use constants::*;
pub use crash::*;
pub use error::*;
pub use stats::*;
