//! Leg resolution oracles
//!
//! A leg names its oracle by `oracle_ref`; the ledger looks the oracle up in an
//! [`OracleSet`] and asks it for the leg's status when settling.

use super::types::{LegResolution, LegStatus};
use crate::catalog::{CatalogError, LegCatalog, LegId};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Oracle failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("no oracle registered as {0:?}")]
    UnknownOracle(String),
    #[error("oracle unavailable: {0}")]
    Unavailable(String),
}

/// Source of truth for leg outcomes
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Current status of a leg; `Unresolved` when unknown
    async fn status(&self, leg: LegId) -> Result<LegStatus, OracleError>;
    /// Whether the leg has a final result
    async fn can_resolve(&self, leg: LegId) -> Result<bool, OracleError> {
        Ok(self.status(leg).await?.is_resolved())
    }
}

/// In-memory oracle fed by an operator or a test
#[derive(Default)]
pub struct PaperOracle {
    results: Arc<RwLock<HashMap<LegId, LegStatus>>>,
}

impl PaperOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a leg's result.
    ///
    /// Returns `Ok(true)` only when the status changed. A final result is
    /// never overwritten: any later resolution of that leg is a no-op, and a
    /// conflicting one is logged.
    pub async fn resolve(&self, leg: LegId, status: LegStatus) -> Result<bool, OracleError> {
        let mut results = self.results.write().await;
        match results.get(&leg).copied() {
            Some(existing) if existing == status => Ok(false),
            Some(existing) if existing.is_resolved() => {
                warn!(leg, ?existing, requested = ?status, "Conflicting resolution ignored");
                Ok(false)
            }
            _ => {
                results.insert(leg, status);
                info!(leg, ?status, "Leg resolved");
                Ok(true)
            }
        }
    }

    /// Every leg that has a final result
    pub async fn resolutions(&self) -> Vec<LegResolution> {
        let results = self.results.read().await;
        let mut out: Vec<LegResolution> = results
            .iter()
            .filter(|(_, s)| s.is_resolved())
            .map(|(&leg_id, &status)| LegResolution { leg_id, status })
            .collect();
        out.sort_by_key(|r| r.leg_id);
        out
    }
}

#[async_trait]
impl Oracle for PaperOracle {
    async fn status(&self, leg: LegId) -> Result<LegStatus, OracleError> {
        let results = self.results.read().await;
        Ok(results.get(&leg).copied().unwrap_or_default())
    }
}

/// Registry of oracles keyed by the `oracle_ref` legs carry
#[derive(Clone, Default)]
pub struct OracleSet {
    oracles: HashMap<String, Arc<dyn Oracle>>,
}

impl OracleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an oracle under a reference name
    pub fn with(mut self, oracle_ref: impl Into<String>, oracle: Arc<dyn Oracle>) -> Self {
        self.oracles.insert(oracle_ref.into(), oracle);
        self
    }

    /// Route every oracle reference in the catalog to a single oracle
    pub fn for_catalog(
        catalog: &dyn LegCatalog,
        oracle: Arc<dyn Oracle>,
    ) -> Result<Self, CatalogError> {
        let oracles = catalog
            .legs()?
            .into_iter()
            .map(|leg| (leg.oracle_ref, Arc::clone(&oracle)))
            .collect();
        Ok(Self { oracles })
    }

    pub fn get(&self, oracle_ref: &str) -> Result<&Arc<dyn Oracle>, OracleError> {
        self.oracles
            .get(oracle_ref)
            .ok_or_else(|| OracleError::UnknownOracle(oracle_ref.to_string()))
    }

    pub fn len(&self) -> usize {
        self.oracles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oracles.is_empty()
    }
}
