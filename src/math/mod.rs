//! Probability math module
//!
//! Pure fixed-point pricing shared by quoting, risk advisory and cashout

mod probability;
mod types;

pub use probability::{
    apply_edge, combined_multiplier, edge_bps, min_out, payout, stake_fee, within_safe_ceiling,
    FeeSchedule, MAX_PRICED_LEGS, SAFE_MULTIPLIER_CEILING,
};
pub use types::{Advisory, Amount, MathError, Multiplier, Probability, AMOUNT_DECIMALS, BPS, PPM};
