//! Configuration types for parlay-engine

use crate::math::{Amount, FeeSchedule};
use crate::risk::{RiskProfile, RiskTolerance};
use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub risk: RiskConfig,
    #[serde(default)]
    pub cashout: CashoutConfig,
    #[serde(default)]
    pub settler: SettlerConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Quote pricing configuration
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    /// Flat house edge in basis points
    #[serde(default = "default_base_fee_bps")]
    pub base_fee_bps: u32,

    /// House edge added per leg in basis points
    #[serde(default = "default_per_leg_fee_bps")]
    pub per_leg_fee_bps: u32,

    /// Minimum stake in whole currency units
    #[serde(default = "default_min_stake")]
    pub min_stake: Decimal,

    /// Fewest legs in a parlay
    #[serde(default = "default_min_legs")]
    pub min_legs: usize,

    /// Most legs in a parlay
    #[serde(default = "default_max_legs")]
    pub max_legs: usize,
}

fn default_base_fee_bps() -> u32 {
    100
}
fn default_per_leg_fee_bps() -> u32 {
    50
}
fn default_min_stake() -> Decimal {
    Decimal::ONE
}
fn default_min_legs() -> usize {
    2
}
fn default_max_legs() -> usize {
    5
}

impl PricingConfig {
    /// Fee constants as a schedule for the math module
    pub fn fees(&self) -> FeeSchedule {
        FeeSchedule {
            base_fee_bps: self.base_fee_bps,
            per_leg_fee_bps: self.per_leg_fee_bps,
        }
    }

    /// Minimum stake as a fixed-point amount (negative values clamp to zero)
    pub fn min_stake_amount(&self) -> Amount {
        Amount::from_decimal(self.min_stake).unwrap_or(Amount::ZERO)
    }
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_fee_bps: 100,
            per_leg_fee_bps: 50,
            min_stake: Decimal::ONE,
            min_legs: 2,
            max_legs: 5,
        }
    }
}

/// Risk advisory configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RiskConfig {
    /// Profile used when a request does not name one
    #[serde(default)]
    pub default_tolerance: RiskTolerance,

    #[serde(default = "RiskProfile::conservative")]
    pub conservative: RiskProfile,

    #[serde(default = "RiskProfile::moderate")]
    pub moderate: RiskProfile,

    #[serde(default = "RiskProfile::aggressive")]
    pub aggressive: RiskProfile,
}

impl RiskConfig {
    /// Caps for a tolerance level
    pub fn profile(&self, tolerance: RiskTolerance) -> &RiskProfile {
        match tolerance {
            RiskTolerance::Conservative => &self.conservative,
            RiskTolerance::Moderate => &self.moderate,
            RiskTolerance::Aggressive => &self.aggressive,
        }
    }
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            default_tolerance: RiskTolerance::default(),
            conservative: RiskProfile::conservative(),
            moderate: RiskProfile::moderate(),
            aggressive: RiskProfile::aggressive(),
        }
    }
}

/// Early cashout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CashoutConfig {
    /// Penalty applied when every leg is still open, in basis points
    #[serde(default = "default_penalty_bps")]
    pub penalty_bps: u32,

    /// Tolerance between the displayed estimate and the submitted floor
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,
}

fn default_penalty_bps() -> u32 {
    1_500 // 15%
}
fn default_slippage_bps() -> u32 {
    500 // minOut = 95% of estimate
}

impl Default for CashoutConfig {
    fn default() -> Self {
        Self {
            penalty_bps: 1_500,
            slippage_bps: 500,
        }
    }
}

/// Settlement agent configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SettlerConfig {
    /// Interval between settlement passes (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    10_000
}

impl Default for SettlerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 10_000,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Prometheus scrape port; metrics are recorded but not exported when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
