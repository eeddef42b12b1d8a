//! Uniform random sources for outcome sampling.
//!
//! Every sampler takes its randomness through [`RandomSource`] so rounds can be replayed from
//! a seed and tests can pin individual draws.

use rand::{rngs::ThreadRng, Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use thiserror::Error as ThisError;

/// A source of uniform draws in `[0, 1)`.
pub trait RandomSource {
    /// Next uniform draw in `[0, 1)`.
    fn next_unit(&mut self) -> f64;

    /// Uniform index in `[0, bound)`, computed as `floor(next_unit() * bound)`.
    ///
    /// Returns 0 when `bound` is 0.
    fn next_index(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        let index = (self.next_unit() * bound as f64) as usize;
        index.min(bound - 1)
    }
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_unit(&mut self) -> f64 {
        (**self).next_unit()
    }
}

/// Deterministic ChaCha20 stream keyed by a seed and a stream id.
///
/// The same `(seed, stream)` pair always yields the same draw sequence; distinct streams of
/// one seed are independent.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha20Rng,
}

impl GameRng {
    pub fn new(seed: u64, stream: u64) -> Self {
        let mut inner = ChaCha20Rng::seed_from_u64(seed);
        inner.set_stream(stream);
        Self { inner }
    }

    pub fn stream(&self) -> u64 {
        self.inner.get_stream()
    }
}

impl RandomSource for GameRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

/// Thread-local, OS-seeded randomness for callers that do not need replay.
#[derive(Clone, Debug, Default)]
pub struct EntropyRng {
    inner: ThreadRng,
}

impl EntropyRng {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RandomSource for EntropyRng {
    fn next_unit(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }
}

#[derive(Debug, ThisError, Clone, Copy, PartialEq)]
pub enum FixedDrawsError {
    #[error("at least one draw is required")]
    Empty,
    #[error("draw {index} must be in [0, 1) (got {value})")]
    OutOfRange { index: usize, value: f64 },
}

/// Replays a fixed list of draws, wrapping around at the end.
#[derive(Clone, Debug)]
pub struct FixedDraws {
    draws: Vec<f64>,
    cursor: usize,
}

impl FixedDraws {
    pub fn new(draws: Vec<f64>) -> Result<Self, FixedDrawsError> {
        if draws.is_empty() {
            return Err(FixedDrawsError::Empty);
        }
        if let Some((index, &value)) = draws
            .iter()
            .enumerate()
            .find(|(_, value)| !(0.0..1.0).contains(*value))
        {
            return Err(FixedDrawsError::OutOfRange { index, value });
        }
        Ok(Self { draws, cursor: 0 })
    }

    /// Number of draws consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }
}

impl RandomSource for FixedDraws {
    fn next_unit(&mut self) -> f64 {
        let value = self.draws[self.cursor % self.draws.len()];
        self.cursor += 1;
        value
    }
}
