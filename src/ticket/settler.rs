//! Settlement agent
//!
//! Polls the ledger for active tickets and settles any whose legs can all be
//! resolved. Several settlers may race on the same ledger; `settle` is
//! idempotent so a lost race is reported as already settled, not a failure.

use super::ledger::{Ledger, SettleOutcome};
use super::oracle::OracleSet;
use super::types::Ticket;
use crate::catalog::LegCatalog;
use crate::telemetry;
use anyhow::{anyhow, Result};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Counters for one settlement pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SettleStats {
    pub scanned: usize,
    pub settled: usize,
    pub already_settled: usize,
    /// Tickets with at least one leg still open
    pub pending: usize,
    pub failed: usize,
}

/// Permissionless settlement bot
pub struct Settler {
    ledger: Arc<dyn Ledger>,
    catalog: Arc<dyn LegCatalog>,
    oracles: OracleSet,
}

impl Settler {
    pub fn new(ledger: Arc<dyn Ledger>, catalog: Arc<dyn LegCatalog>, oracles: OracleSet) -> Self {
        Self {
            ledger,
            catalog,
            oracles,
        }
    }

    /// Whether every leg of the ticket reports `can_resolve`
    async fn ready(&self, ticket: &Ticket) -> Result<bool> {
        for &id in &ticket.leg_ids {
            let leg = self
                .catalog
                .leg(id)?
                .ok_or_else(|| anyhow!("leg {} missing from catalog", id))?;
            if !self.oracles.get(&leg.oracle_ref)?.can_resolve(id).await? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Run a single pass over the active tickets.
    ///
    /// A failing ticket is logged and counted; the pass continues.
    pub async fn run_once(&self) -> Result<SettleStats> {
        let started = Instant::now();
        let tickets = self.ledger.active_tickets().await?;
        let mut stats = SettleStats {
            scanned: tickets.len(),
            ..Default::default()
        };

        for ticket in &tickets {
            match self.ready(ticket).await {
                Ok(true) => {}
                Ok(false) => {
                    stats.pending += 1;
                    continue;
                }
                Err(e) => {
                    warn!(ticket = ticket.id, error = %e, "Resolvability check failed");
                    stats.failed += 1;
                    continue;
                }
            }

            match self.ledger.settle(ticket.id).await {
                Ok(SettleOutcome::Settled(status)) => {
                    debug!(ticket = ticket.id, %status, "Settled");
                    stats.settled += 1;
                }
                Ok(SettleOutcome::AlreadySettled(_)) => stats.already_settled += 1,
                Err(e) => {
                    warn!(ticket = ticket.id, error = %e, "Settle failed");
                    stats.failed += 1;
                }
            }
        }

        metrics::histogram!(telemetry::SETTLER_PASS_SECONDS).record(started.elapsed().as_secs_f64());
        if stats.settled > 0 || stats.failed > 0 {
            info!(
                scanned = stats.scanned,
                settled = stats.settled,
                pending = stats.pending,
                failed = stats.failed,
                "Settlement pass complete"
            );
        }
        Ok(stats)
    }

    /// Poll until `shutdown` flips to true or its sender is dropped
    pub async fn run(&self, interval: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(interval);
        info!(interval_ms = interval.as_millis() as u64, "Settler started");

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(e) = self.run_once().await {
                        warn!(error = %e, "Settlement pass failed");
                    }
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!("Settler stopped");
    }
}
