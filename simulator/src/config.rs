use anyhow::{Context, Result};
use arcade_types::{BlockConfig, ConfigError, DistributionConfig, DEFAULT_REPORT_EVERY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error as ThisError;
use tracing::Level;

#[derive(Debug, ThisError, PartialEq)]
pub enum SimulatorConfigError {
    #[error("invalid log level: {value}")]
    InvalidLogLevel { value: String },
    #[error("{field} must be > 0")]
    InvalidNonZero { field: &'static str },
    #[error("auto_cashout must be a finite multiplier above 1.0 (got {value})")]
    InvalidAutoCashout { value: f64 },
    #[error("invalid crash distribution: {0}")]
    Crash(#[source] ConfigError),
    #[error("invalid block range: {0}")]
    Block(#[source] ConfigError),
}

/// Simulation settings, loaded from YAML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SimulatorConfig {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_crash_rounds")]
    pub crash_rounds: u64,
    #[serde(default = "default_bet_cents")]
    pub bet_cents: u64,
    /// Multiplier at which the simulated player cashes out.
    #[serde(default = "default_auto_cashout")]
    pub auto_cashout: f64,
    /// Simulated frame interval.
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default)]
    pub crash: DistributionConfig,
    /// Distribution reports are logged every this many rounds (0 disables).
    #[serde(default = "default_report_every")]
    pub report_every: u64,

    #[serde(default = "default_block_games")]
    pub block_games: u64,
    /// Safe rounds after which the simulated player plants.
    #[serde(default = "default_plant_after")]
    pub plant_after: u64,
    #[serde(default)]
    pub block: BlockConfig,

    /// Directory for persisted table stats (disabled when omitted).
    #[serde(default)]
    pub stats_dir: Option<PathBuf>,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            log_level: default_log_level(),
            crash_rounds: default_crash_rounds(),
            bet_cents: default_bet_cents(),
            auto_cashout: default_auto_cashout(),
            tick_ms: default_tick_ms(),
            crash: DistributionConfig::default(),
            report_every: default_report_every(),
            block_games: default_block_games(),
            plant_after: default_plant_after(),
            block: BlockConfig::default(),
            stats_dir: None,
        }
    }
}

impl SimulatorConfig {
    /// Read and validate a YAML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Could not read config file {}", path.display()))?;
        let config: Self =
            serde_yaml::from_str(&contents).context("Could not parse config file")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), SimulatorConfigError> {
        self.log_level()?;
        if self.bet_cents == 0 {
            return Err(SimulatorConfigError::InvalidNonZero { field: "bet_cents" });
        }
        if self.tick_ms == 0 {
            return Err(SimulatorConfigError::InvalidNonZero { field: "tick_ms" });
        }
        if self.plant_after == 0 {
            return Err(SimulatorConfigError::InvalidNonZero {
                field: "plant_after",
            });
        }
        if !self.auto_cashout.is_finite() || self.auto_cashout <= 1.0 {
            return Err(SimulatorConfigError::InvalidAutoCashout {
                value: self.auto_cashout,
            });
        }
        self.crash.validate().map_err(SimulatorConfigError::Crash)?;
        self.block.validate().map_err(SimulatorConfigError::Block)?;
        Ok(())
    }

    pub fn log_level(&self) -> Result<Level, SimulatorConfigError> {
        Level::from_str(&self.log_level).map_err(|_| SimulatorConfigError::InvalidLogLevel {
            value: self.log_level.clone(),
        })
    }
}

fn default_seed() -> u64 {
    42
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_crash_rounds() -> u64 {
    10_000
}

fn default_bet_cents() -> u64 {
    100
}

fn default_auto_cashout() -> f64 {
    1.5
}

fn default_tick_ms() -> u64 {
    16
}

fn default_report_every() -> u64 {
    DEFAULT_REPORT_EVERY * 100
}

fn default_block_games() -> u64 {
    10_000
}

fn default_plant_after() -> u64 {
    3
}
