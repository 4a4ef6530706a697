//! JSON request and response shapes (camelCase on the wire)
//!
//! Multipliers are PPM integers and amounts are raw six-decimal integers, both
//! sent as strings so no client has to parse them through a float.

use crate::catalog::LegId;
use crate::quote::{Quote, RejectReason};
use crate::risk::RiskAssessment;
use serde::{Deserialize, Serialize};

/// `POST /quote` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequestBody {
    pub leg_ids: Vec<LegId>,
    pub outcomes: Vec<String>,
    /// Decimal string, e.g. "10" or "2.5"
    pub stake: String,
}

/// `POST /risk-assess` body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessRequestBody {
    pub leg_ids: Vec<LegId>,
    pub outcomes: Vec<String>,
    pub stake: String,
    #[serde(default)]
    pub bankroll: Option<String>,
    #[serde(default)]
    pub risk_tolerance: Option<String>,
    /// One label per leg; defaults to the catalog categories
    #[serde(default)]
    pub categories: Option<Vec<String>>,
    /// PPM probability of each leg's Yes side; skips the catalog when present
    #[serde(default)]
    pub probabilities: Option<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponseBody {
    pub valid: bool,
    /// Net multiplier in PPM
    pub multiplier: String,
    pub fair_multiplier: String,
    pub potential_payout: String,
    pub fee_paid: String,
    pub edge_bps: u32,
}

impl From<&Quote> for QuoteResponseBody {
    fn from(quote: &Quote) -> Self {
        Self {
            valid: true,
            multiplier: quote.net_multiplier.ppm().to_string(),
            fair_multiplier: quote.fair_multiplier.ppm().to_string(),
            potential_payout: quote.potential_payout.raw().to_string(),
            fee_paid: quote.fee_paid.raw().to_string(),
            edge_bps: quote.edge_bps,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionBody {
    pub valid: bool,
    pub reason: String,
    pub message: String,
}

impl RejectionBody {
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            valid: false,
            reason: reason.into(),
            message: message.into(),
        }
    }
}

impl From<&RejectReason> for RejectionBody {
    fn from(reason: &RejectReason) -> Self {
        Self::new(reason.code(), reason.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskResponseBody {
    pub action: String,
    pub risk_tolerance: String,
    pub kelly_fraction: f64,
    pub win_probability: f64,
    pub expected_value: f64,
    pub confidence: f64,
    pub suggested_stake: f64,
    pub reasoning: String,
    pub warnings: Vec<String>,
    pub fair_multiplier: String,
    pub net_multiplier: String,
    pub edge_bps: u32,
}

impl From<&RiskAssessment> for RiskResponseBody {
    fn from(a: &RiskAssessment) -> Self {
        Self {
            action: a.action.as_str().to_string(),
            risk_tolerance: a.tolerance.to_string(),
            kelly_fraction: a.kelly_fraction.rounded(4).value(),
            win_probability: a.win_probability.rounded(6).value(),
            expected_value: a.expected_value.rounded(2).value(),
            confidence: a.confidence.rounded(2).value(),
            suggested_stake: a.suggested_stake.rounded(2).value(),
            reasoning: a.reasoning.clone(),
            warnings: a.warnings.clone(),
            fair_multiplier: a.fair_multiplier.ppm().to_string(),
            net_multiplier: a.net_multiplier.ppm().to_string(),
            edge_bps: a.edge_bps,
        }
    }
}
