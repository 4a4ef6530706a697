//! Parlay pricing arithmetic
//!
//! Every function truncates toward zero so the house never over-pays. These
//! are the reference formulas the ledger-of-record must agree with bit-for-bit:
//!
//! - fair multiplier: `PPM^(n+1) / Π p_i`
//! - edge: `base_bps + n * per_leg_bps`
//! - net multiplier: `fair * (BPS - edge) / BPS`
//! - payout: `stake * multiplier / PPM`

use super::types::{Amount, MathError, Multiplier, Probability, BPS, PPM};
use serde::{Deserialize, Serialize};

/// Widest combination the u128 path can price (`PPM^6 ≈ 10^36 < 2^128`)
pub const MAX_PRICED_LEGS: usize = 5;

/// Largest multiplier (in PPM) exactly representable as an f64.
///
/// Anything above this cannot round-trip through a browser or the advisory
/// float path and is reported as an overflow instead of a wrong number.
pub const SAFE_MULTIPLIER_CEILING: u128 = 1 << 53;

/// Protocol fee schedule in basis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Flat edge charged on every ticket
    pub base_fee_bps: u32,
    /// Additional edge per leg
    pub per_leg_fee_bps: u32,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            base_fee_bps: 100,
            per_leg_fee_bps: 50,
        }
    }
}

/// Fair multiplier implied by the combined leg probabilities
pub fn combined_multiplier(probs: &[Probability]) -> Result<Multiplier, MathError> {
    if probs.is_empty() {
        return Err(MathError::Empty);
    }
    if probs.len() > MAX_PRICED_LEGS {
        return Err(MathError::TooManyLegs(probs.len()));
    }

    let ppm = PPM as u128;
    let mut numerator = ppm;
    let mut denominator: u128 = 1;
    for p in probs {
        numerator = numerator.checked_mul(ppm).ok_or(MathError::Overflow)?;
        denominator = denominator
            .checked_mul(p.ppm() as u128)
            .ok_or(MathError::Overflow)?;
    }

    Ok(Multiplier(numerator / denominator))
}

/// House edge for a ticket with `num_legs` legs
pub fn edge_bps(num_legs: usize, fees: &FeeSchedule) -> u32 {
    let legs = u32::try_from(num_legs).unwrap_or(u32::MAX);
    fees.base_fee_bps
        .saturating_add(legs.saturating_mul(fees.per_leg_fee_bps))
}

/// Remove the house edge from a fair multiplier
pub fn apply_edge(fair: Multiplier, edge_bps: u32) -> Multiplier {
    let keep = BPS.saturating_sub(edge_bps) as u128;
    let bps = BPS as u128;
    // PPM^6 * 10^4 does not fit in u128; split so the result is still floor(fair * keep / BPS)
    let (q, r) = (fair.ppm() / bps, fair.ppm() % bps);
    Multiplier(q * keep + r * keep / bps)
}

/// Payout for a stake at the given multiplier
pub fn payout(stake: Amount, multiplier: Multiplier) -> Result<Amount, MathError> {
    stake
        .raw()
        .checked_mul(multiplier.ppm())
        .map(|v| Amount(v / PPM as u128))
        .ok_or(MathError::Overflow)
}

/// Protocol fee withheld from the stake at purchase: `stake * edge / BPS`
pub fn stake_fee(stake: Amount, edge_bps: u32) -> Result<Amount, MathError> {
    let edge = edge_bps.min(BPS) as u128;
    stake
        .raw()
        .checked_mul(edge)
        .map(|scaled| Amount(scaled / BPS as u128))
        .ok_or(MathError::Overflow)
}

/// Whether a multiplier can be shown and reasoned about without precision loss
pub fn within_safe_ceiling(multiplier: Multiplier) -> bool {
    multiplier.ppm() <= SAFE_MULTIPLIER_CEILING
}

/// Slippage floor submitted alongside an estimate: `estimate * (BPS - slip) / BPS`,
/// never below one unit
pub fn min_out(estimate: Amount, slippage_bps: u32) -> Amount {
    let keep = BPS.saturating_sub(slippage_bps) as u128;
    let floor = estimate.raw().saturating_mul(keep) / BPS as u128;
    Amount(floor.max(1))
}
