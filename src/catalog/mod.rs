//! Leg catalog module
//!
//! Read-only view of the legs bettors can combine. The catalog is owned by an
//! external collaborator; this crate only looks legs up by id.

mod seed;

pub use seed::SeedCatalog;

use crate::math::Probability;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Leg identifier
pub type LegId = u64;

/// A single binary-outcome proposition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    /// Unique leg identifier
    pub id: LegId,
    /// Human-readable question
    pub question: String,
    /// Probability that the proposition resolves Yes
    pub probability: Probability,
    /// Last moment tickets may include this leg
    pub cutoff_time: DateTime<Utc>,
    /// Earliest moment the oracle may resolve the leg
    pub earliest_resolve_time: DateTime<Utc>,
    /// Oracle adapter responsible for resolving the leg
    pub oracle_ref: String,
    /// Market category the leg belongs to
    pub category: String,
    /// Whether the leg is open for new tickets
    pub active: bool,
}

impl Leg {
    /// Probability that `outcome` wins
    pub fn effective_probability(&self, outcome: Outcome) -> Probability {
        match outcome {
            Outcome::Yes => self.probability,
            Outcome::No => self.probability.complement(),
        }
    }
}

/// A bettor's choice on one leg
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Yes,
    No,
}

impl FromStr for Outcome {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yes" | "y" | "1" => Ok(Outcome::Yes),
            "no" | "n" | "2" => Ok(Outcome::No),
            other => Err(CatalogError::InvalidOutcome(other.to_string())),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Yes => write!(f, "yes"),
            Outcome::No => write!(f, "no"),
        }
    }
}

/// Catalog lookup errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// Catalog backend could not be reached
    #[error("catalog unavailable: {0}")]
    Unavailable(String),
    /// Outcome string is neither yes nor no
    #[error("invalid outcome: {0}")]
    InvalidOutcome(String),
    /// Only `active` may change once a leg is listed
    #[error("leg {0} already exists with different terms")]
    ImmutableLeg(LegId),
}

/// Synchronous leg lookup
///
/// `Ok(None)` means the leg does not exist; `Err` means the catalog itself
/// could not answer.
pub trait LegCatalog: Send + Sync {
    /// Fetch a leg by id
    fn leg(&self, id: LegId) -> Result<Option<Leg>, CatalogError>;
    /// All known legs
    fn legs(&self) -> Result<Vec<Leg>, CatalogError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_parse() {
        assert_eq!("Yes".parse::<Outcome>().unwrap(), Outcome::Yes);
        assert_eq!(" no ".parse::<Outcome>().unwrap(), Outcome::No);
        assert_eq!("2".parse::<Outcome>().unwrap(), Outcome::No);
        assert!("maybe".parse::<Outcome>().is_err());
    }

    #[test]
    fn test_effective_probability() {
        let catalog = SeedCatalog::default();
        let leg = catalog.leg(4).unwrap().unwrap();
        assert_eq!(leg.effective_probability(Outcome::Yes).ppm(), 600_000);
        assert_eq!(leg.effective_probability(Outcome::No).ppm(), 400_000);
    }
}
