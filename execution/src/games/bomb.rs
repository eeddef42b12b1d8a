//! Weighted bomb placement for the block game.
//!
//! Slot `i` (0-based) carries weight `i + 1`, so higher-numbered blocks are proportionally
//! more likely to hold the bomb. Placement walks the normalized weights in index order and
//! returns the first slot whose cumulative probability covers the draw. If rounding leaves
//! the draw uncovered after the last slot, the last slot is returned.

use crate::rng::{EntropyRng, RandomSource};
use arcade_types::{BombOutcome, ConfigError};
use tracing::debug;

/// Normalized linear weights for one round.
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTable {
    probabilities: Vec<f64>,
}

impl WeightTable {
    /// Build the table for `num_blocks` slots with weights `1..=num_blocks`.
    pub fn linear(num_blocks: usize) -> Result<Self, ConfigError> {
        if num_blocks == 0 {
            return Err(ConfigError::NoBlocks);
        }
        let total = (num_blocks * (num_blocks + 1) / 2) as f64;
        let probabilities = (1..=num_blocks).map(|w| w as f64 / total).collect();
        Ok(Self { probabilities })
    }

    pub fn len(&self) -> usize {
        self.probabilities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.probabilities.is_empty()
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Unnormalized weight of `index`.
    pub fn weight(&self, index: usize) -> Option<usize> {
        (index < self.len()).then_some(index + 1)
    }

    /// Map a uniform draw to a slot.
    pub fn sample(&self, draw: f64) -> BombOutcome {
        let mut cumulative = 0.0;
        for (index, probability) in self.probabilities.iter().enumerate() {
            cumulative += probability;
            if draw <= cumulative {
                return BombOutcome { index };
            }
        }
        BombOutcome {
            index: self.len() - 1,
        }
    }
}

/// Place the bomb among `num_blocks` slots using `rng`.
pub fn place_bomb<R: RandomSource + ?Sized>(
    num_blocks: usize,
    rng: &mut R,
) -> Result<BombOutcome, ConfigError> {
    let table = WeightTable::linear(num_blocks)?;
    let draw = rng.next_unit();
    let outcome = table.sample(draw);
    debug!(num_blocks, draw, bomb = outcome.index, "placed bomb");
    Ok(outcome)
}

/// Place the bomb among `num_blocks` slots using thread-local entropy.
pub fn place_bomb_random(num_blocks: usize) -> Result<BombOutcome, ConfigError> {
    place_bomb(num_blocks, &mut EntropyRng::new())
}
