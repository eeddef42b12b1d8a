use serde::{Deserialize, Serialize};

use super::{ConfigError, DEFAULT_MAX_BLOCKS, DEFAULT_MIN_BLOCKS};

/// Range of block counts dealt per round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlockConfig {
    pub min_blocks: usize,
    pub max_blocks: usize,
}

impl Default for BlockConfig {
    fn default() -> Self {
        Self {
            min_blocks: DEFAULT_MIN_BLOCKS,
            max_blocks: DEFAULT_MAX_BLOCKS,
        }
    }
}

impl BlockConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_blocks == 0 {
            return Err(ConfigError::NoBlocks);
        }
        if self.max_blocks < self.min_blocks {
            return Err(ConfigError::BlockRangeInverted {
                min_blocks: self.min_blocks,
                max_blocks: self.max_blocks,
            });
        }
        Ok(())
    }

    /// Number of distinct block counts a round can be dealt with.
    pub fn span(&self) -> usize {
        self.max_blocks - self.min_blocks + 1
    }
}

/// Slot holding the bomb for one round (0-based).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BombOutcome {
    pub index: usize,
}

impl BombOutcome {
    /// Number printed on the bomb block (1-based, also its weight).
    pub fn block_number(&self) -> usize {
        self.index + 1
    }
}
