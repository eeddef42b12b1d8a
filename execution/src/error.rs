use arcade_types::ConfigError;
use thiserror::Error as ThisError;

/// A table action that is not allowed in the current round state.
#[derive(Debug, ThisError, Clone, Copy, PartialEq)]
pub enum RoundError {
    #[error("bet must be greater than zero")]
    InvalidBet,
    #[error("insufficient balance (bet={bet_cents}, balance={balance_cents})")]
    InsufficientBalance { bet_cents: u64, balance_cents: u64 },
    #[error("a round is already in progress")]
    RoundInProgress,
    #[error("no active round")]
    NoActiveRound,
    #[error("already cashed out this round")]
    AlreadyCashedOut,
    #[error("round crashed at {crash_point:.2}x")]
    Crashed { crash_point: f64 },
    #[error("block {index} out of range (num_blocks={num_blocks})")]
    BlockOutOfRange { index: usize, num_blocks: usize },
    #[error("block {index} already revealed")]
    AlreadyRevealed { index: usize },
    #[error("no safe block revealed this round")]
    NoSafeReveal,
    #[error(transparent)]
    Config(#[from] ConfigError),
}
