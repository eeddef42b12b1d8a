use serde::{Deserialize, Serialize};

use super::{
    ConfigError, CRASH_BUCKET_BOUNDS, CRASH_FLOOR, DEFAULT_HOUSE_EDGE, DEFAULT_LAMBDA,
    DEFAULT_MAX_CRASH, DEFAULT_MIN_CRASH, DEFAULT_SATURATION,
};

/// Parameters of the crash multiplier distribution.
///
/// A crash point is produced by drawing an exponential variate with rate `lambda`, mapping
/// it into `[min_crash, max_crash)` with a saturating transform scaled by `saturation`,
/// shrinking the result by `house_edge` and finally clamping to [`CRASH_FLOOR`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DistributionConfig {
    /// Lower end of the mapped range (>= 1.0).
    pub min_crash: f64,
    /// Upper end of the mapped range, approached but never reached.
    pub max_crash: f64,
    /// Rate of the exponential variate (> 0).
    pub lambda: f64,
    /// Fraction removed from every raw outcome, in `[0, 1)`.
    pub house_edge: f64,
    /// Divisor controlling how quickly the mapping saturates toward `max_crash`.
    pub saturation: f64,
}

impl Default for DistributionConfig {
    fn default() -> Self {
        Self {
            min_crash: DEFAULT_MIN_CRASH,
            max_crash: DEFAULT_MAX_CRASH,
            lambda: DEFAULT_LAMBDA,
            house_edge: DEFAULT_HOUSE_EDGE,
            saturation: DEFAULT_SATURATION,
        }
    }
}

impl DistributionConfig {
    /// Check every parameter against its domain.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("min_crash", self.min_crash),
            ("max_crash", self.max_crash),
            ("lambda", self.lambda),
            ("house_edge", self.house_edge),
            ("saturation", self.saturation),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NonFinite { field, value });
            }
        }
        if self.min_crash < CRASH_FLOOR {
            return Err(ConfigError::MinCrashBelowFloor {
                min_crash: self.min_crash,
            });
        }
        if self.max_crash <= self.min_crash {
            return Err(ConfigError::MaxCrashNotAboveMin {
                min_crash: self.min_crash,
                max_crash: self.max_crash,
            });
        }
        if self.lambda <= 0.0 {
            return Err(ConfigError::NonPositiveLambda {
                lambda: self.lambda,
            });
        }
        if !(0.0..1.0).contains(&self.house_edge) {
            return Err(ConfigError::HouseEdgeOutOfRange {
                house_edge: self.house_edge,
            });
        }
        if self.saturation <= 0.0 {
            return Err(ConfigError::NonPositiveSaturation {
                saturation: self.saturation,
            });
        }
        Ok(())
    }

    /// Crash point produced by a zero draw: `min_crash` after the edge, clamped to the floor.
    pub fn lowest_outcome(&self) -> f64 {
        (self.min_crash * (1.0 - self.house_edge)).max(CRASH_FLOOR)
    }

    /// Supremum of all crash points: `max_crash` after the edge, clamped to the floor.
    pub fn outcome_ceiling(&self) -> f64 {
        (self.max_crash * (1.0 - self.house_edge)).max(CRASH_FLOOR)
    }
}

/// A realized crash multiplier for one round.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CrashOutcome {
    pub value: f64,
}

impl CrashOutcome {
    /// Diagnostic bucket this outcome falls into.
    pub fn bucket(&self) -> CrashBucket {
        CrashBucket::for_value(self.value)
    }
}

/// Ranges used to summarize the shape of the crash distribution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CrashBucket {
    /// `[1.0, 1.2)`
    Low,
    /// `[1.2, 1.5)`
    Medium,
    /// `[1.5, 3.0)`
    High,
    /// `[3.0, ∞)`
    VeryHigh,
}

impl CrashBucket {
    pub const ALL: [CrashBucket; 4] = [Self::Low, Self::Medium, Self::High, Self::VeryHigh];

    pub fn for_value(value: f64) -> Self {
        if value < CRASH_BUCKET_BOUNDS[0] {
            Self::Low
        } else if value < CRASH_BUCKET_BOUNDS[1] {
            Self::Medium
        } else if value < CRASH_BUCKET_BOUNDS[2] {
            Self::High
        } else {
            Self::VeryHigh
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Low => "1.0-1.2x",
            Self::Medium => "1.2-1.5x",
            Self::High => "1.5-3.0x",
            Self::VeryHigh => "3.0x+",
        }
    }
}
