//! Risk advisory types

use crate::math::{Advisory, Multiplier};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bettor risk appetite
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskTolerance {
    Conservative,
    #[default]
    Moderate,
    Aggressive,
}

impl FromStr for RiskTolerance {
    type Err = RiskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "conservative" => Ok(RiskTolerance::Conservative),
            "moderate" => Ok(RiskTolerance::Moderate),
            "aggressive" => Ok(RiskTolerance::Aggressive),
            other => Err(RiskError::UnknownTolerance(other.to_string())),
        }
    }
}

impl fmt::Display for RiskTolerance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskTolerance::Conservative => "conservative",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::Aggressive => "aggressive",
        };
        write!(f, "{}", name)
    }
}

/// Caps applied for one tolerance level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    /// Largest Kelly fraction the profile will suggest
    pub max_kelly: f64,
    /// Most legs before the parlay is avoided
    pub max_legs: usize,
    /// Lowest acceptable win probability
    pub min_win_prob: f64,
}

impl RiskProfile {
    pub fn conservative() -> Self {
        Self {
            max_kelly: 0.05,
            max_legs: 3,
            min_win_prob: 0.15,
        }
    }

    pub fn moderate() -> Self {
        Self {
            max_kelly: 0.15,
            max_legs: 4,
            min_win_prob: 0.05,
        }
    }

    pub fn aggressive() -> Self {
        Self {
            max_kelly: 1.0,
            max_legs: 5,
            min_win_prob: 0.0,
        }
    }
}

/// Advisory verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskAction {
    Buy,
    ReduceStake,
    Avoid,
}

impl RiskAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskAction::Buy => "BUY",
            RiskAction::ReduceStake => "REDUCE_STAKE",
            RiskAction::Avoid => "AVOID",
        }
    }
}

/// Advisory assessment of a priced parlay. Every float is display-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub action: RiskAction,
    pub tolerance: RiskTolerance,
    pub kelly_fraction: Advisory,
    pub win_probability: Advisory,
    /// Expected profit in currency units at the proposed stake
    pub expected_value: Advisory,
    /// UI hint in [0.5, 1.0], not a probability
    pub confidence: Advisory,
    /// Kelly-sized stake in currency units
    pub suggested_stake: Advisory,
    pub reasoning: String,
    pub warnings: Vec<String>,
    pub fair_multiplier: Multiplier,
    pub net_multiplier: Multiplier,
    pub edge_bps: u32,
}

/// Risk request errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskError {
    /// Risk tolerance name not recognised
    #[error("unknown risk tolerance: {0}")]
    UnknownTolerance(String),
    /// Category labels do not line up with legs
    #[error("categories must match legIds length ({legs} legs, {categories} categories)")]
    CategoryMismatch { legs: usize, categories: usize },
    /// Bankroll missing value or not positive
    #[error("bankroll must be positive")]
    NonPositiveBankroll,
}
