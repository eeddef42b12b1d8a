use thiserror::Error as ThisError;

/// Rejected game configuration.
///
/// Raised when a caller hands the sampling core parameters outside its domain. Sampling
/// itself never fails once a configuration has been accepted.
#[derive(Debug, ThisError, Clone, Copy, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be finite (got {value})")]
    NonFinite { field: &'static str, value: f64 },
    #[error("min_crash must be >= 1.0 (got {min_crash})")]
    MinCrashBelowFloor { min_crash: f64 },
    #[error("max_crash must be greater than min_crash (min_crash={min_crash}, max_crash={max_crash})")]
    MaxCrashNotAboveMin { min_crash: f64, max_crash: f64 },
    #[error("lambda must be > 0 (got {lambda})")]
    NonPositiveLambda { lambda: f64 },
    #[error("house_edge must be in [0, 1) (got {house_edge})")]
    HouseEdgeOutOfRange { house_edge: f64 },
    #[error("saturation must be > 0 (got {saturation})")]
    NonPositiveSaturation { saturation: f64 },
    #[error("at least one block is required")]
    NoBlocks,
    #[error("max_blocks must be >= min_blocks (min_blocks={min_blocks}, max_blocks={max_blocks})")]
    BlockRangeInverted { min_blocks: usize, max_blocks: usize },
}
