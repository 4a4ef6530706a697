//! Fixed-point value types
//!
//! Money and probabilities are integers. Floats only ever appear wrapped in
//! [`Advisory`], which has no conversion back into [`Amount`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Parts-per-million scale (1_000_000 = 100% or 1.00x)
pub const PPM: u32 = 1_000_000;

/// Basis-point scale (10_000 = 100%)
pub const BPS: u32 = 10_000;

/// Decimal places carried by [`Amount`]
pub const AMOUNT_DECIMALS: u32 = 6;

const AMOUNT_SCALE: u128 = 1_000_000;

/// Math and value-construction errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MathError {
    /// Probability outside the open interval (0, PPM)
    #[error("probability {0} ppm outside (0, {PPM})")]
    ProbabilityOutOfRange(u32),
    /// No probabilities supplied
    #[error("no probabilities supplied")]
    Empty,
    /// More legs than the fixed-point width supports
    #[error("{0} legs exceeds the supported maximum of {max}", max = super::MAX_PRICED_LEGS)]
    TooManyLegs(usize),
    /// Intermediate product left the u128 range
    #[error("fixed-point overflow")]
    Overflow,
    /// Decimal string could not be turned into an amount
    #[error("invalid amount: {0}")]
    InvalidAmount(String),
}

/// Probability of a leg outcome in parts-per-million
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Probability(u32);

impl Probability {
    /// Create a probability, rejecting 0 and PPM (certainty breaks the multiplier)
    pub fn new(ppm: u32) -> Result<Self, MathError> {
        if ppm == 0 || ppm >= PPM {
            return Err(MathError::ProbabilityOutOfRange(ppm));
        }
        Ok(Self(ppm))
    }

    /// Raw PPM value
    pub fn ppm(self) -> u32 {
        self.0
    }

    /// Probability of the opposite outcome
    pub fn complement(self) -> Self {
        Self(PPM - self.0)
    }

    /// Display-only fraction in (0, 1)
    pub fn as_advisory(self) -> Advisory {
        Advisory::new(self.0 as f64 / PPM as f64)
    }
}

impl TryFrom<u32> for Probability {
    type Error = MathError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Probability> for u32 {
    fn from(p: Probability) -> Self {
        p.0
    }
}

/// Payout multiplier scaled by PPM (1_000_000 = 1.00x)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Multiplier(pub u128);

impl Multiplier {
    /// 1.00x
    pub const ONE: Multiplier = Multiplier(PPM as u128);

    /// Raw PPM-scaled value
    pub fn ppm(self) -> u128 {
        self.0
    }

    /// Display-only multiplier (e.g. 3.7037)
    pub fn as_advisory(self) -> Advisory {
        Advisory::new(self.0 as f64 / PPM as f64)
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / PPM as u128;
        let frac = self.0 % PPM as u128;
        write!(f, "{}.{:06}x", whole, frac)
    }
}

/// Fixed-point currency amount with six decimals (1_000_000 = 1 unit)
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Amount(pub u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Smallest representable amount
    pub const DUST: Amount = Amount(1);

    /// Raw fixed-point value
    pub fn raw(self) -> u128 {
        self.0
    }

    /// Whole currency units (e.g. `Amount::from_units(10)` is 10.000000)
    pub fn from_units(units: u64) -> Self {
        Self(units as u128 * AMOUNT_SCALE)
    }

    /// Convert a decimal value, truncating digits beyond six decimals
    pub fn from_decimal(value: Decimal) -> Result<Self, MathError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(MathError::InvalidAmount(value.to_string()));
        }
        let scaled = value
            .checked_mul(Decimal::from(AMOUNT_SCALE as u64))
            .ok_or_else(|| MathError::InvalidAmount(value.to_string()))?
            .trunc();
        scaled
            .to_u128()
            .map(Self)
            .ok_or_else(|| MathError::InvalidAmount(value.to_string()))
    }

    /// Back to a decimal in whole units
    pub fn to_decimal(self) -> Decimal {
        // Values beyond Decimal's 96-bit mantissa are not produced by any
        // in-range quote (max payout is stake * 2^53 / PPM).
        let mantissa = i128::try_from(self.0).unwrap_or(i128::MAX);
        Decimal::try_from_i128_with_scale(mantissa, AMOUNT_DECIMALS).unwrap_or(Decimal::MAX)
    }

    /// Display-only value in whole units
    pub fn as_advisory(self) -> Advisory {
        Advisory::new(self.0 as f64 / AMOUNT_SCALE as f64)
    }

    pub fn saturating_sub(self, other: Amount) -> Amount {
        Amount(self.0.saturating_sub(other.0))
    }

    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }
}

impl FromStr for Amount {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value =
            Decimal::from_str(s.trim()).map_err(|_| MathError::InvalidAmount(s.to_string()))?;
        Self::from_decimal(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / AMOUNT_SCALE;
        let frac = self.0 % AMOUNT_SCALE;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:06}", frac);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

/// Display-only float. Guaranteed finite; never used to move money.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Advisory(f64);

impl Advisory {
    pub const ZERO: Advisory = Advisory(0.0);

    /// Wrap a float, mapping NaN to 0 and clamping infinities to f64 bounds
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            Self(0.0)
        } else {
            Self(value.clamp(f64::MIN, f64::MAX))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Round to `places` decimals for display
    pub fn rounded(self, places: i32) -> Self {
        let factor = 10f64.powi(places);
        Self::new((self.0 * factor).round() / factor)
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
