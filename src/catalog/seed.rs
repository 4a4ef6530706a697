//! In-memory leg catalog

use super::{CatalogError, Leg, LegCatalog, LegId};
use crate::math::Probability;
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::sync::RwLock;

/// (id, question, probability ppm, oracle, category)
const SEED_LEGS: &[(LegId, &str, u32, &str, &str)] = &[
    (1, "Will ETH be above $3000 by March 1?", 550_000, "price-feed", "crypto"),
    (2, "Will Base TVL exceed $15B?", 500_000, "defillama", "crypto"),
    (3, "Will Vitalik attend ETHDenver?", 450_000, "social", "crypto"),
    (4, "Will Uniswap v4 launch on Base?", 600_000, "uniswap-gov", "defi"),
    (5, "Will total DEX volume hit $500B monthly?", 450_000, "dune", "defi"),
    (6, "Will a new stablecoin enter top 5 by mcap?", 400_000, "coingecko", "defi"),
    (7, "Will an onchain game hit 100K DAU?", 400_000, "dappradar", "nft"),
    (8, "Will NFT trading volume recover to $2B monthly?", 350_000, "nftgo", "nft"),
    (9, "Will a DAO acquire a real-world asset over $10M?", 400_000, "dao-news", "nft"),
];

const SEED_CUTOFF: i64 = 1_740_000_000;
const SEED_EARLIEST_RESOLVE: i64 = 1_740_100_000;

/// Catalog backed by a map, seeded with a fixed market set
pub struct SeedCatalog {
    legs: RwLock<BTreeMap<LegId, Leg>>,
}

impl SeedCatalog {
    /// Create an empty catalog
    pub fn empty() -> Self {
        Self {
            legs: RwLock::new(BTreeMap::new()),
        }
    }

    /// Create a catalog from explicit legs
    pub fn from_legs(legs: impl IntoIterator<Item = Leg>) -> Self {
        Self {
            legs: RwLock::new(legs.into_iter().map(|leg| (leg.id, leg)).collect()),
        }
    }

    /// Add a leg. Re-inserting a listed leg may only toggle `active`.
    pub fn insert(&self, leg: Leg) -> Result<(), CatalogError> {
        let mut legs = self.legs.write().map_err(poisoned)?;
        if let Some(existing) = legs.get_mut(&leg.id) {
            let active = leg.active;
            if (Leg { active: existing.active, ..leg }) != *existing {
                return Err(CatalogError::ImmutableLeg(existing.id));
            }
            existing.active = active;
            return Ok(());
        }
        legs.insert(leg.id, leg);
        Ok(())
    }

    /// Open or close a leg for new tickets
    pub fn set_active(&self, id: LegId, active: bool) -> Result<bool, CatalogError> {
        let mut legs = self.legs.write().map_err(poisoned)?;
        match legs.get_mut(&id) {
            Some(leg) => {
                leg.active = active;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl Default for SeedCatalog {
    fn default() -> Self {
        let cutoff = DateTime::<Utc>::from_timestamp(SEED_CUTOFF, 0).unwrap_or_default();
        let earliest = DateTime::<Utc>::from_timestamp(SEED_EARLIEST_RESOLVE, 0).unwrap_or_default();

        let legs = SEED_LEGS
            .iter()
            .filter_map(|&(id, question, ppm, oracle, category)| {
                let probability = Probability::new(ppm).ok()?;
                Some(Leg {
                    id,
                    question: question.to_string(),
                    probability,
                    cutoff_time: cutoff,
                    earliest_resolve_time: earliest,
                    oracle_ref: oracle.to_string(),
                    category: category.to_string(),
                    active: true,
                })
            });
        Self::from_legs(legs)
    }
}

impl LegCatalog for SeedCatalog {
    fn leg(&self, id: LegId) -> Result<Option<Leg>, CatalogError> {
        let legs = self.legs.read().map_err(poisoned)?;
        Ok(legs.get(&id).cloned())
    }

    fn legs(&self) -> Result<Vec<Leg>, CatalogError> {
        let legs = self.legs.read().map_err(poisoned)?;
        Ok(legs.values().cloned().collect())
    }
}

fn poisoned<T>(_: std::sync::PoisonError<T>) -> CatalogError {
    CatalogError::Unavailable("catalog lock poisoned".to_string())
}
