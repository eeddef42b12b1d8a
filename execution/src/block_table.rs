//! Block ("bomb") table round controller.
//!
//! Each round deals between `min_blocks` and `max_blocks` numbered blocks and hides a bomb
//! under one of them, weighted toward the higher numbers. Revealing a safe block adds its
//! number to the current score; revealing the bomb forfeits it. After at least one safe
//! reveal the player may deal the next round or plant, banking the current score.

use crate::error::RoundError;
use crate::games::place_bomb;
use crate::rng::RandomSource;
use crate::store::{load_stats, save_stats, StatsStore};
use arcade_types::{BlockConfig, BlockTableStats, BombOutcome, ConfigError, BLOCK_STATS_KEY};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Result of revealing one block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Reveal {
    Safe { points: u64, current_score: u64 },
    Bomb { forfeited: u64 },
}

#[derive(Clone, Debug)]
struct Deal {
    num_blocks: usize,
    bomb: BombOutcome,
    revealed: BTreeSet<usize>,
    safe_reveals: usize,
}

#[derive(Clone, Debug)]
pub struct BlockTable {
    config: BlockConfig,
    stats: BlockTableStats,
    current_score: u64,
    round: u64,
    active: bool,
    deal: Option<Deal>,
}

impl BlockTable {
    pub fn new(config: BlockConfig) -> Result<Self, ConfigError> {
        Self::with_stats(config, BlockTableStats::default())
    }

    pub fn with_stats(config: BlockConfig, stats: BlockTableStats) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            stats,
            current_score: 0,
            round: 0,
            active: false,
            deal: None,
        })
    }

    pub fn load_from<S: StatsStore + ?Sized>(
        config: BlockConfig,
        store: &S,
    ) -> Result<Self, ConfigError> {
        Self::with_stats(config, load_stats(store, BLOCK_STATS_KEY))
    }

    pub fn save_to<S: StatsStore + ?Sized>(&self, store: &mut S) -> anyhow::Result<()> {
        save_stats(store, BLOCK_STATS_KEY, &self.stats)
    }

    pub fn stats(&self) -> BlockTableStats {
        self.stats
    }

    pub fn current_score(&self) -> u64 {
        self.current_score
    }

    /// Zero-based round number within the current game.
    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Blocks dealt this round (0 before the first game).
    pub fn num_blocks(&self) -> usize {
        self.deal.as_ref().map(|deal| deal.num_blocks).unwrap_or(0)
    }

    /// Bomb position of the current deal.
    pub fn bomb(&self) -> Option<BombOutcome> {
        self.deal.as_ref().map(|deal| deal.bomb)
    }

    pub fn is_revealed(&self, index: usize) -> bool {
        self.deal
            .as_ref()
            .is_some_and(|deal| deal.revealed.contains(&index))
    }

    /// Whether the player may deal the next round or plant.
    pub fn can_continue(&self) -> bool {
        self.active
            && self
                .deal
                .as_ref()
                .is_some_and(|deal| deal.safe_reveals > 0)
    }

    /// Start a new game, discarding any unbanked score. Returns the number of blocks dealt.
    pub fn start_game<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<usize, RoundError> {
        self.current_score = 0;
        self.round = 0;
        self.active = true;
        self.deal_round(rng)
    }

    /// Deal the next round of the current game. Returns the number of blocks dealt.
    pub fn next_round<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<usize, RoundError> {
        self.ensure_can_continue()?;
        self.round += 1;
        self.deal_round(rng)
    }

    pub fn reveal(&mut self, index: usize) -> Result<Reveal, RoundError> {
        if !self.active {
            return Err(RoundError::NoActiveRound);
        }
        let deal = self.deal.as_mut().ok_or(RoundError::NoActiveRound)?;
        if index >= deal.num_blocks {
            return Err(RoundError::BlockOutOfRange {
                index,
                num_blocks: deal.num_blocks,
            });
        }
        if !deal.revealed.insert(index) {
            return Err(RoundError::AlreadyRevealed { index });
        }

        if index == deal.bomb.index {
            self.active = false;
            info!(
                round = self.round,
                bomb = index,
                forfeited = self.current_score,
                "bomb revealed"
            );
            return Ok(Reveal::Bomb {
                forfeited: self.current_score,
            });
        }

        deal.safe_reveals += 1;
        let points = (index + 1) as u64;
        self.current_score += points;
        debug!(round = self.round, index, points, current_score = self.current_score, "safe block");
        Ok(Reveal::Safe {
            points,
            current_score: self.current_score,
        })
    }

    /// Bank the current score and end the game. Returns the banked amount.
    pub fn plant(&mut self) -> Result<u64, RoundError> {
        self.ensure_can_continue()?;
        let banked = self.current_score;
        self.stats.total_score += banked;
        self.stats.games_won += 1;
        self.active = false;
        info!(
            banked,
            total_score = self.stats.total_score,
            games_won = self.stats.games_won,
            "planted"
        );
        Ok(banked)
    }

    /// Zero all stats and end any game in progress.
    pub fn reset(&mut self) {
        self.stats = BlockTableStats::default();
        self.current_score = 0;
        self.round = 0;
        self.active = false;
        self.deal = None;
    }

    fn ensure_can_continue(&self) -> Result<(), RoundError> {
        if !self.active {
            return Err(RoundError::NoActiveRound);
        }
        if !self.can_continue() {
            return Err(RoundError::NoSafeReveal);
        }
        Ok(())
    }

    fn deal_round<R: RandomSource + ?Sized>(&mut self, rng: &mut R) -> Result<usize, RoundError> {
        let num_blocks = self.config.min_blocks + rng.next_index(self.config.span());
        let bomb = place_bomb(num_blocks, rng)?;
        self.deal = Some(Deal {
            num_blocks,
            bomb,
            revealed: BTreeSet::new(),
            safe_reveals: 0,
        });
        debug!(round = self.round, num_blocks, "dealt blocks");
        Ok(num_blocks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedDraws, GameRng};
    use crate::store::MemoryStore;

    fn table() -> BlockTable {
        BlockTable::new(BlockConfig::default()).unwrap()
    }

    /// First draw picks the block count, second places the bomb.
    fn draws(values: Vec<f64>) -> FixedDraws {
        FixedDraws::new(values).unwrap()
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = BlockConfig {
            min_blocks: 0,
            max_blocks: 3,
        };
        assert_eq!(BlockTable::new(config).unwrap_err(), ConfigError::NoBlocks);
    }

    #[test]
    fn test_block_count_within_config() {
        let mut table = table();
        let mut rng = GameRng::new(8, 0);
        let mut seen = BTreeSet::new();
        for _ in 0..2_000 {
            let n = table.start_game(&mut rng).unwrap();
            assert!((3..=10).contains(&n));
            assert!(table.bomb().unwrap().index < n);
            seen.insert(n);
        }
        assert_eq!(seen.len(), 8);
    }

    #[test]
    fn test_fixed_draws_deal() {
        let mut table = table();
        // 0.0 -> 3 blocks; 0.99 -> bomb on the last block.
        let mut rng = draws(vec![0.0, 0.99]);
        assert_eq!(table.start_game(&mut rng), Ok(3));
        assert_eq!(table.bomb(), Some(BombOutcome { index: 2 }));

        // 0.999 -> 10 blocks; 0.0 -> bomb on the first block.
        let mut rng = draws(vec![0.999, 0.0]);
        assert_eq!(table.start_game(&mut rng), Ok(10));
        assert_eq!(table.bomb(), Some(BombOutcome { index: 0 }));
    }

    #[test]
    fn test_safe_reveals_accumulate_then_plant() {
        let mut table = table();
        let mut rng = draws(vec![0.0, 0.99]);
        table.start_game(&mut rng).unwrap();
        assert!(!table.can_continue());
        assert_eq!(table.plant(), Err(RoundError::NoSafeReveal));

        assert_eq!(
            table.reveal(0),
            Ok(Reveal::Safe {
                points: 1,
                current_score: 1
            })
        );
        assert_eq!(
            table.reveal(1),
            Ok(Reveal::Safe {
                points: 2,
                current_score: 3
            })
        );
        assert!(table.is_revealed(1));
        assert_eq!(table.reveal(1), Err(RoundError::AlreadyRevealed { index: 1 }));
        assert_eq!(
            table.reveal(3),
            Err(RoundError::BlockOutOfRange {
                index: 3,
                num_blocks: 3
            })
        );

        assert_eq!(table.plant(), Ok(3));
        assert!(!table.is_active());
        assert_eq!(
            table.stats(),
            BlockTableStats {
                total_score: 3,
                games_won: 1
            }
        );
        assert_eq!(table.plant(), Err(RoundError::NoActiveRound));
        assert_eq!(table.reveal(2), Err(RoundError::NoActiveRound));
    }

    #[test]
    fn test_bomb_forfeits_score() {
        let mut table = table();
        let mut rng = draws(vec![0.0, 0.99]);
        table.start_game(&mut rng).unwrap();
        table.reveal(0).unwrap();
        assert_eq!(table.next_round(&mut rng), Ok(3));
        assert_eq!(table.round(), 1);
        assert!(!table.can_continue());
        assert_eq!(table.reveal(2), Ok(Reveal::Bomb { forfeited: 1 }));
        assert!(!table.is_active());
        assert_eq!(table.stats(), BlockTableStats::default());
        assert_eq!(table.next_round(&mut rng), Err(RoundError::NoActiveRound));
    }

    #[test]
    fn test_next_round_requires_safe_reveal() {
        let mut table = table();
        let mut rng = GameRng::new(4, 0);
        assert_eq!(table.reveal(0), Err(RoundError::NoActiveRound));
        table.start_game(&mut rng).unwrap();
        assert_eq!(table.next_round(&mut rng), Err(RoundError::NoSafeReveal));
    }

    #[test]
    fn test_start_game_discards_unbanked_score() {
        let mut table = table();
        let mut rng = draws(vec![0.0, 0.99]);
        table.start_game(&mut rng).unwrap();
        table.reveal(1).unwrap();
        assert_eq!(table.current_score(), 2);
        table.start_game(&mut rng).unwrap();
        assert_eq!(table.current_score(), 0);
        assert_eq!(table.round(), 0);
        assert!(!table.is_revealed(1));
    }

    #[test]
    fn test_reset_zeroes_stats() {
        let mut table = BlockTable::with_stats(
            BlockConfig::default(),
            BlockTableStats {
                total_score: 40,
                games_won: 4,
            },
        )
        .unwrap();
        table.reset();
        assert_eq!(table.stats(), BlockTableStats::default());
        assert_eq!(table.num_blocks(), 0);
        assert!(table.bomb().is_none());
    }

    #[test]
    fn test_single_block_config_always_bombs() {
        let config = BlockConfig {
            min_blocks: 1,
            max_blocks: 1,
        };
        let mut table = BlockTable::new(config).unwrap();
        let mut rng = GameRng::new(5, 0);
        for _ in 0..100 {
            assert_eq!(table.start_game(&mut rng), Ok(1));
            assert_eq!(table.reveal(0), Ok(Reveal::Bomb { forfeited: 0 }));
        }
    }

    #[test]
    fn test_stats_persist() {
        let mut store = MemoryStore::new();
        let mut table = table();
        let mut rng = draws(vec![0.0, 0.99]);
        table.start_game(&mut rng).unwrap();
        table.reveal(0).unwrap();
        table.plant().unwrap();
        table.save_to(&mut store).unwrap();

        let resumed = BlockTable::load_from(BlockConfig::default(), &store).unwrap();
        assert_eq!(resumed.stats(), table.stats());
        assert!(!resumed.is_active());
    }
}
