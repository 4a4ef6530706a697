//! Kelly-based risk assessment of priced parlays

use super::kelly::KellyCalculator;
use super::types::{RiskAction, RiskAssessment, RiskError, RiskProfile, RiskTolerance};
use crate::config::RiskConfig;
use crate::math::{self, Advisory, Amount, Multiplier};
use crate::quote::Quote;
use crate::telemetry;
use std::collections::BTreeMap;
use tracing::debug;

/// Per-request risk parameters
#[derive(Debug, Clone, Default)]
pub struct RiskParams {
    pub tolerance: RiskTolerance,
    /// Bankroll used for Kelly sizing; no sizing when absent
    pub bankroll: Option<Amount>,
    /// Category label per leg, in leg order
    pub categories: Option<Vec<String>>,
}

/// Turns a quote into a buy / reduce / avoid recommendation
#[derive(Debug, Clone, Default)]
pub struct RiskAssessor {
    config: RiskConfig,
}

/// Everything the classifier looks at, in advisory units
#[derive(Debug, Clone, Copy)]
struct Classification {
    overflow: bool,
    leg_count: usize,
    win_probability: f64,
    kelly_fraction: f64,
    suggested_stake: Option<f64>,
    proposed_stake: f64,
    edge_bps: u32,
}

impl RiskAssessor {
    /// Create a new risk assessor
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Assess a priced quote under a tolerance profile
    pub fn assess(&self, quote: &Quote, params: &RiskParams) -> Result<RiskAssessment, RiskError> {
        let leg_count = quote.leg_count();
        if let Some(categories) = &params.categories {
            if categories.len() != leg_count {
                return Err(RiskError::CategoryMismatch {
                    legs: leg_count,
                    categories: categories.len(),
                });
            }
        }
        if params.bankroll == Some(Amount::ZERO) {
            return Err(RiskError::NonPositiveBankroll);
        }

        let profile = self.config.profile(params.tolerance);
        let overflow = !math::within_safe_ceiling(quote.fair_multiplier);

        let fair = quote.fair_multiplier.as_advisory().value();
        let net = quote.net_multiplier.as_advisory().value();
        let win_probability = if fair > 0.0 { 1.0 / fair } else { 0.0 };
        let proposed_stake = quote.stake.as_advisory().value();
        let expected_value = (win_probability * net - 1.0) * proposed_stake;

        let kelly_fraction = if overflow {
            0.0
        } else {
            KellyCalculator::new(profile.max_kelly).fraction(win_probability, net)
        };
        let suggested_stake = params
            .bankroll
            .map(|bankroll| kelly_fraction * bankroll.as_advisory().value());

        let mut warnings = profile_warnings(params.tolerance, profile, leg_count, win_probability);
        if params.bankroll.is_none() {
            warnings.push("No bankroll supplied; stake sizing skipped".to_string());
        }
        if let Some(categories) = &params.categories {
            warnings.extend(correlation_warnings(categories));
        }

        let (action, reasoning) = classify(
            params.tolerance,
            profile,
            Classification {
                overflow,
                leg_count,
                win_probability,
                kelly_fraction,
                suggested_stake,
                proposed_stake,
                edge_bps: quote.edge_bps,
            },
        );

        metrics::counter!(telemetry::RISK_ASSESSMENTS_TOTAL, "action" => action.as_str())
            .increment(1);
        debug!(
            action = action.as_str(),
            tolerance = %params.tolerance,
            legs = leg_count,
            win_probability,
            kelly_fraction,
            "Risk assessed"
        );

        Ok(RiskAssessment {
            action,
            tolerance: params.tolerance,
            kelly_fraction: Advisory::new(kelly_fraction),
            win_probability: Advisory::new(win_probability),
            expected_value: Advisory::new(expected_value),
            confidence: Advisory::new(confidence(leg_count)),
            suggested_stake: Advisory::new(suggested_stake.unwrap_or(0.0)),
            reasoning,
            warnings,
            fair_multiplier: quote.fair_multiplier,
            net_multiplier: quote.net_multiplier,
            edge_bps: quote.edge_bps,
        })
    }

    /// Assessment for a combination too extreme to price at all.
    ///
    /// `multipliers` is the fair multiplier and edge when those could still be
    /// computed, so the response can echo them.
    pub fn overflow(
        &self,
        params: &RiskParams,
        leg_count: usize,
        multipliers: Option<(Multiplier, u32)>,
    ) -> RiskAssessment {
        let (fair_multiplier, edge_bps) = multipliers.unwrap_or((Multiplier(0), 0));
        metrics::counter!(telemetry::RISK_ASSESSMENTS_TOTAL, "action" => RiskAction::Avoid.as_str())
            .increment(1);
        RiskAssessment {
            action: RiskAction::Avoid,
            tolerance: params.tolerance,
            kelly_fraction: Advisory::ZERO,
            win_probability: Advisory::ZERO,
            expected_value: Advisory::ZERO,
            confidence: Advisory::new(confidence(leg_count)),
            suggested_stake: Advisory::ZERO,
            reasoning: overflow_reasoning(),
            warnings: Vec::new(),
            fair_multiplier,
            net_multiplier: math::apply_edge(fair_multiplier, edge_bps),
            edge_bps,
        }
    }
}

fn overflow_reasoning() -> String {
    "overflow: combined multiplier exceeds the safely representable range".to_string()
}

/// Priority-ordered classification
fn classify(
    tolerance: RiskTolerance,
    profile: &RiskProfile,
    c: Classification,
) -> (RiskAction, String) {
    let win_pct = c.win_probability * 100.0;

    if c.overflow {
        return (RiskAction::Avoid, overflow_reasoning());
    }
    if c.win_probability < profile.min_win_prob || c.leg_count > profile.max_legs {
        return (
            RiskAction::Avoid,
            format!(
                "{}-leg parlay at {:.2}% win probability exceeds {} risk tolerance limits.",
                c.leg_count, win_pct, tolerance
            ),
        );
    }
    if c.kelly_fraction <= 0.0 {
        return (
            RiskAction::ReduceStake,
            format!(
                "House edge ({}bps) exceeds fair edge. Kelly suggests 0. Bet only if you believe your true win probability exceeds {:.2}%.",
                c.edge_bps, win_pct
            ),
        );
    }
    match c.suggested_stake {
        Some(suggested) if suggested < c.proposed_stake => (
            RiskAction::ReduceStake,
            format!(
                "Kelly criterion suggests {:.2} ({:.2}% of bankroll). Proposed stake of {:.2} exceeds this.",
                suggested,
                c.kelly_fraction * 100.0,
                c.proposed_stake
            ),
        ),
        Some(suggested) => (
            RiskAction::Buy,
            format!(
                "{}-leg parlay at {:.2}% win probability. Kelly suggests {:.2}% of bankroll = {:.2}.",
                c.leg_count,
                win_pct,
                c.kelly_fraction * 100.0,
                suggested
            ),
        ),
        None => (
            RiskAction::Buy,
            format!(
                "{}-leg parlay at {:.2}% win probability. Kelly suggests {:.2}% of bankroll.",
                c.leg_count,
                win_pct,
                c.kelly_fraction * 100.0
            ),
        ),
    }
}

fn profile_warnings(
    tolerance: RiskTolerance,
    profile: &RiskProfile,
    leg_count: usize,
    win_probability: f64,
) -> Vec<String> {
    let mut warnings = Vec::new();
    if leg_count > profile.max_legs {
        warnings.push(format!(
            "{} profile recommends max {} legs, you have {}",
            tolerance, profile.max_legs, leg_count
        ));
    }
    if win_probability < profile.min_win_prob {
        warnings.push(format!(
            "Win probability {:.2}% is below {} minimum of {:.0}%",
            win_probability * 100.0,
            tolerance,
            profile.min_win_prob * 100.0
        ));
    }
    warnings
}

/// One warning per category holding more than one leg
fn correlation_warnings(categories: &[String]) -> Vec<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for category in categories {
        *counts.entry(category.as_str()).or_default() += 1;
    }
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(category, count)| format!("{} legs in category \"{}\" may be correlated", count, category))
        .collect()
}

/// UI confidence hint, always within [0.5, 1.0]
fn confidence(leg_count: usize) -> f64 {
    (1.0 - (leg_count as f64 - 2.0) * 0.1).clamp(0.5, 1.0)
}
