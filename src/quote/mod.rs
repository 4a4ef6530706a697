//! Quote module
//!
//! Validates parlay requests against the catalog and prices them with the
//! fixed-point math. A [`Quote`] is only valid at the moment it was computed.

mod service;

pub use service::QuoteService;

use crate::catalog::{LegId, Outcome};
use crate::config::PricingConfig;
use crate::math::{self, Amount, MathError, Multiplier, Probability};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// A request to price a parlay
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub leg_ids: Vec<LegId>,
    pub outcomes: Vec<Outcome>,
    pub stake: Amount,
}

/// A priced parlay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub leg_ids: Vec<LegId>,
    pub outcomes: Vec<Outcome>,
    /// Effective probability of each chosen outcome
    pub probabilities: Vec<Probability>,
    pub stake: Amount,
    pub fair_multiplier: Multiplier,
    pub net_multiplier: Multiplier,
    pub edge_bps: u32,
    pub potential_payout: Amount,
    pub fee_paid: Amount,
}

impl Quote {
    /// Price explicit outcome probabilities.
    ///
    /// Runs the structural checks (lengths, leg count, duplicates, stake) but
    /// not the safe-ceiling check, so the risk path can classify an overflow
    /// instead of rejecting it.
    pub fn price(
        leg_ids: Vec<LegId>,
        outcomes: Vec<Outcome>,
        probabilities: Vec<Probability>,
        stake: Amount,
        pricing: &PricingConfig,
    ) -> Result<Self, RejectReason> {
        validate_shape(&leg_ids, outcomes.len(), stake, pricing)?;
        if probabilities.len() != leg_ids.len() {
            return Err(RejectReason::LengthMismatch);
        }

        let fair_multiplier = math::combined_multiplier(&probabilities)?;
        let edge_bps = math::edge_bps(probabilities.len(), &pricing.fees());
        let net_multiplier = math::apply_edge(fair_multiplier, edge_bps);
        let potential_payout = math::payout(stake, net_multiplier)?;
        let fair_payout = math::payout(stake, fair_multiplier)?;

        Ok(Self {
            leg_ids,
            outcomes,
            probabilities,
            stake,
            fair_multiplier,
            net_multiplier,
            edge_bps,
            potential_payout,
            fee_paid: fair_payout.saturating_sub(potential_payout),
        })
    }

    /// Number of legs in the parlay
    pub fn leg_count(&self) -> usize {
        self.leg_ids.len()
    }
}

/// Checks that need no catalog access, in the order the service applies them
pub(crate) fn validate_shape(
    leg_ids: &[LegId],
    outcome_count: usize,
    stake: Amount,
    pricing: &PricingConfig,
) -> Result<(), RejectReason> {
    if leg_ids.len() != outcome_count {
        return Err(RejectReason::LengthMismatch);
    }
    if leg_ids.len() < pricing.min_legs {
        return Err(RejectReason::TooFewLegs {
            min: pricing.min_legs,
            got: leg_ids.len(),
        });
    }
    if leg_ids.len() > pricing.max_legs.min(math::MAX_PRICED_LEGS) {
        return Err(RejectReason::TooManyLegs {
            max: pricing.max_legs.min(math::MAX_PRICED_LEGS),
            got: leg_ids.len(),
        });
    }
    let mut seen = HashSet::with_capacity(leg_ids.len());
    if let Some(dup) = leg_ids.iter().find(|id| !seen.insert(**id)) {
        return Err(RejectReason::DuplicateLeg(*dup));
    }
    let min_stake = pricing.min_stake_amount();
    if stake < min_stake {
        return Err(RejectReason::StakeBelowMinimum { min: min_stake });
    }
    Ok(())
}

/// Why a quote was refused
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("leg {0} not found")]
    LegNotFound(LegId),
    #[error("leg {0} is not active")]
    LegInactive(LegId),
    #[error("parlay needs at least {min} legs, got {got}")]
    TooFewLegs { min: usize, got: usize },
    #[error("parlay allows at most {max} legs, got {got}")]
    TooManyLegs { max: usize, got: usize },
    #[error("stake must be at least {min}")]
    StakeBelowMinimum { min: Amount },
    #[error("duplicate leg {0}")]
    DuplicateLeg(LegId),
    #[error("legIds and outcomes must have the same length")]
    LengthMismatch,
    #[error("probability must be between 0 and 1000000 exclusive")]
    InvalidProbability,
    #[error("invalid outcome: {0}")]
    InvalidOutcome(String),
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
    #[error("combined multiplier exceeds the safely representable range")]
    ProbabilityOverflow,
    #[error("catalog unavailable: {0}")]
    CatalogUnavailable(String),
}

impl RejectReason {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            RejectReason::LegNotFound(_) => "leg_not_found",
            RejectReason::LegInactive(_) => "leg_inactive",
            RejectReason::TooFewLegs { .. } => "too_few_legs",
            RejectReason::TooManyLegs { .. } => "too_many_legs",
            RejectReason::StakeBelowMinimum { .. } => "stake_below_minimum",
            RejectReason::DuplicateLeg(_) => "duplicate_leg",
            RejectReason::LengthMismatch => "length_mismatch",
            RejectReason::InvalidProbability => "invalid_probability",
            RejectReason::InvalidOutcome(_) => "invalid_outcome",
            RejectReason::InvalidAmount(_) => "invalid_amount",
            RejectReason::ProbabilityOverflow => "probability_overflow",
            RejectReason::CatalogUnavailable(_) => "catalog_unavailable",
        }
    }

    /// HTTP-equivalent status for the rejection
    pub fn status_code(&self) -> u16 {
        match self {
            RejectReason::LegNotFound(_) => 404,
            RejectReason::CatalogUnavailable(_) => 503,
            _ => 400,
        }
    }
}

impl From<MathError> for RejectReason {
    fn from(err: MathError) -> Self {
        match err {
            MathError::ProbabilityOutOfRange(_) => RejectReason::InvalidProbability,
            MathError::Empty => RejectReason::TooFewLegs { min: 1, got: 0 },
            MathError::TooManyLegs(got) => RejectReason::TooManyLegs {
                max: math::MAX_PRICED_LEGS,
                got,
            },
            MathError::Overflow => RejectReason::ProbabilityOverflow,
            MathError::InvalidAmount(s) => RejectReason::InvalidAmount(s),
        }
    }
}
