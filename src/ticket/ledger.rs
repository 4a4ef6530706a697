//! Ledger-of-record collaborator and its paper implementation
//!
//! The ledger owns tickets and balances and computes every authoritative
//! amount. Each money-moving call carries a floor computed by the caller; the
//! call fails with [`LedgerError::Slippage`] rather than pay less.

use super::lifecycle::{self, LifecycleError};
use super::oracle::{OracleError, OracleSet};
use super::types::{LegStatus, LegVerdict, PayoutMode, Ticket, TicketId, TicketStatus};
use crate::cashout::{self, CashoutError};
use crate::catalog::{CatalogError, Leg, LegId, Outcome};
use crate::math::{self, Amount, MathError};
use crate::quote::{QuoteRequest, QuoteService, RejectReason};
use crate::telemetry;
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// A ticket purchase
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyOrder {
    pub buyer: String,
    pub leg_ids: Vec<LegId>,
    pub outcomes: Vec<Outcome>,
    pub stake: Amount,
    pub payout_mode: PayoutMode,
    /// Lowest potential payout the buyer accepts
    pub min_payout: Amount,
}

/// Result of a settle call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// This call moved the ticket out of `Active`
    Settled(TicketStatus),
    /// Someone else already did; nothing changed
    AlreadySettled(TicketStatus),
}

impl SettleOutcome {
    pub fn status(self) -> TicketStatus {
        match self {
            SettleOutcome::Settled(s) | SettleOutcome::AlreadySettled(s) => s,
        }
    }
}

/// Ledger failures
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("quote rejected: {0}")]
    Rejected(#[from] RejectReason),
    #[error("ticket {0} not found")]
    NotFound(TicketId),
    #[error("ticket {ticket}: leg {leg} is not resolvable yet")]
    NotResolvable { ticket: TicketId, leg: LegId },
    #[error("ticket {0} is not settled")]
    NotSettled(TicketId),
    #[error("ticket {0} has nothing to claim")]
    NothingToClaim(TicketId),
    #[error("ticket {ticket} is {mode:?}, operation not allowed")]
    WrongMode { ticket: TicketId, mode: PayoutMode },
    #[error("ticket {0} is no longer active")]
    NotActive(TicketId),
    #[error("ticket {ticket}: leg {leg} resolved against the bettor")]
    LegLost { ticket: TicketId, leg: LegId },
    #[error("leg {0} is not in the catalog")]
    UnknownLeg(LegId),
    #[error("slippage: would pay {actual}, floor is {min_out}")]
    Slippage { min_out: Amount, actual: Amount },
    #[error(transparent)]
    Oracle(#[from] OracleError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Cashout(#[from] CashoutError),
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Ledger-of-record operations
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Price and record a new ticket
    async fn buy(&self, order: BuyOrder) -> Result<Ticket, LedgerError>;
    async fn ticket(&self, id: TicketId) -> Result<Option<Ticket>, LedgerError>;
    /// Tickets still in `Active`
    async fn active_tickets(&self) -> Result<Vec<Ticket>, LedgerError>;
    /// Permissionless settlement once every leg is resolvable; idempotent
    async fn settle(&self, id: TicketId) -> Result<SettleOutcome, LedgerError>;
    /// Pay out a Won or Voided ticket
    async fn claim(&self, id: TicketId, min_out: Amount) -> Result<Amount, LedgerError>;
    /// Pay out value unlocked by won legs on an Active progressive ticket
    async fn claim_progressive(&self, id: TicketId, min_out: Amount)
        -> Result<Amount, LedgerError>;
    /// Exit an Active early-cashout ticket at the ledger's valuation
    async fn cashout(&self, id: TicketId, min_out: Amount) -> Result<Amount, LedgerError>;
}

#[derive(Default)]
struct LedgerState {
    next_id: TicketId,
    tickets: BTreeMap<TicketId, Ticket>,
    disbursed: HashMap<String, Amount>,
}

impl LedgerState {
    fn ticket_mut(&mut self, id: TicketId) -> Result<&mut Ticket, LedgerError> {
        self.tickets.get_mut(&id).ok_or(LedgerError::NotFound(id))
    }

    fn disburse(&mut self, buyer: &str, amount: Amount) -> Result<(), LedgerError> {
        let total = self.disbursed.entry(buyer.to_string()).or_default();
        *total = total.checked_add(amount).ok_or(MathError::Overflow)?;
        Ok(())
    }
}

/// Point-in-time view of a ticket's legs
struct LegSnapshot {
    legs: Vec<Option<Leg>>,
    statuses: Vec<LegStatus>,
}

/// In-memory ledger used for simulation and tests
pub struct PaperLedger {
    quotes: QuoteService,
    oracles: OracleSet,
    cashout_penalty_bps: u32,
    state: RwLock<LedgerState>,
}

impl PaperLedger {
    pub fn new(quotes: QuoteService, oracles: OracleSet, cashout_penalty_bps: u32) -> Self {
        Self {
            quotes,
            oracles,
            cashout_penalty_bps,
            state: RwLock::new(LedgerState {
                next_id: 1,
                ..Default::default()
            }),
        }
    }

    /// Total paid out to a buyer so far
    pub async fn disbursed(&self, buyer: &str) -> Amount {
        let state = self.state.read().await;
        state.disbursed.get(buyer).copied().unwrap_or_default()
    }

    /// Read every leg of a ticket from the catalog and its oracle.
    ///
    /// Settlement never proceeds on a leg the catalog no longer knows.
    async fn snapshot(&self, ticket: &Ticket) -> Result<LegSnapshot, LedgerError> {
        let mut legs = Vec::with_capacity(ticket.leg_count());
        let mut statuses = Vec::with_capacity(ticket.leg_count());
        for &id in &ticket.leg_ids {
            let leg = self
                .quotes
                .catalog()
                .leg(id)?
                .ok_or(LedgerError::UnknownLeg(id))?;
            let status = self.oracles.get(&leg.oracle_ref)?.status(id).await?;
            legs.push(Some(leg));
            statuses.push(status);
        }
        Ok(LegSnapshot { legs, statuses })
    }

    fn check_floor(min_out: Amount, actual: Amount) -> Result<(), LedgerError> {
        if actual < min_out {
            return Err(LedgerError::Slippage { min_out, actual });
        }
        Ok(())
    }
}

#[async_trait]
impl Ledger for PaperLedger {
    async fn buy(&self, order: BuyOrder) -> Result<Ticket, LedgerError> {
        let quote = self.quotes.quote(&QuoteRequest {
            leg_ids: order.leg_ids,
            outcomes: order.outcomes,
            stake: order.stake,
        })?;
        Self::check_floor(order.min_payout, quote.potential_payout)?;

        let mut state = self.state.write().await;
        let id = state.next_id;
        state.next_id += 1;

        let ticket = Ticket {
            id,
            buyer: order.buyer,
            stake: quote.stake,
            fee_paid: math::stake_fee(quote.stake, quote.edge_bps)?,
            leg_ids: quote.leg_ids,
            outcomes: quote.outcomes,
            probabilities: quote.probabilities,
            multiplier: quote.net_multiplier,
            potential_payout: quote.potential_payout,
            payout_mode: order.payout_mode,
            status: TicketStatus::Active,
            claimed_amount: Amount::ZERO,
            cashout_penalty_bps: self.cashout_penalty_bps,
            created_at: Utc::now(),
        };
        state.tickets.insert(id, ticket.clone());

        info!(
            ticket = id,
            buyer = %ticket.buyer,
            legs = ticket.leg_count(),
            stake = %ticket.stake,
            potential = %ticket.potential_payout,
            mode = ?ticket.payout_mode,
            "Ticket bought"
        );
        Ok(ticket)
    }

    async fn ticket(&self, id: TicketId) -> Result<Option<Ticket>, LedgerError> {
        let state = self.state.read().await;
        Ok(state.tickets.get(&id).cloned())
    }

    async fn active_tickets(&self) -> Result<Vec<Ticket>, LedgerError> {
        let state = self.state.read().await;
        Ok(state
            .tickets
            .values()
            .filter(|t| t.status == TicketStatus::Active)
            .cloned()
            .collect())
    }

    async fn settle(&self, id: TicketId) -> Result<SettleOutcome, LedgerError> {
        let mut state = self.state.write().await;
        let ticket = state.ticket_mut(id)?;
        if ticket.status.is_settled() {
            debug!(ticket = id, status = %ticket.status, "Ticket already settled");
            return Ok(SettleOutcome::AlreadySettled(ticket.status));
        }

        let snapshot = self.snapshot(ticket).await?;
        let next = lifecycle::settle_status(&ticket.outcomes, &snapshot.statuses).map_err(
            |e| match e {
                LifecycleError::NotResolvable { position } => LedgerError::NotResolvable {
                    ticket: id,
                    leg: ticket.leg_ids[position],
                },
                other => other.into(),
            },
        )?;
        ticket.transition(next)?;

        metrics::counter!(telemetry::SETTLEMENTS_TOTAL, "status" => next.to_string()).increment(1);
        info!(ticket = id, status = %next, "Ticket settled");
        Ok(SettleOutcome::Settled(next))
    }

    async fn claim(&self, id: TicketId, min_out: Amount) -> Result<Amount, LedgerError> {
        let mut state = self.state.write().await;
        let ticket = state.ticket_mut(id)?;
        match ticket.status {
            TicketStatus::Won | TicketStatus::Voided => {}
            TicketStatus::Active => return Err(LedgerError::NotSettled(id)),
            TicketStatus::Lost | TicketStatus::Claimed => {
                return Err(LedgerError::NothingToClaim(id))
            }
        }

        let snapshot = self.snapshot(ticket).await?;
        let verdicts = lifecycle::verdicts(&ticket.outcomes, &snapshot.statuses)?;
        let entitled = lifecycle::settled_entitlement(
            ticket,
            &verdicts,
            &ticket.probabilities,
            &self.quotes.pricing().fees(),
        )?;
        let owed = entitled.saturating_sub(ticket.claimed_amount);
        Self::check_floor(min_out, owed)?;

        ticket.transition(TicketStatus::Claimed)?;
        ticket.claimed_amount = ticket.claimed_amount.checked_add(owed).ok_or(MathError::Overflow)?;
        let buyer = ticket.buyer.clone();
        state.disburse(&buyer, owed)?;

        metrics::counter!(telemetry::SETTLEMENTS_TOTAL, "status" => "Claimed").increment(1);
        info!(ticket = id, %buyer, amount = %owed, "Ticket claimed");
        Ok(owed)
    }

    async fn claim_progressive(
        &self,
        id: TicketId,
        min_out: Amount,
    ) -> Result<Amount, LedgerError> {
        let mut state = self.state.write().await;
        let ticket = state.ticket_mut(id)?;
        if ticket.payout_mode != PayoutMode::Progressive {
            return Err(LedgerError::WrongMode {
                ticket: id,
                mode: ticket.payout_mode,
            });
        }
        if ticket.status != TicketStatus::Active {
            return Err(LedgerError::NotActive(id));
        }

        let snapshot = self.snapshot(ticket).await?;
        let verdicts = lifecycle::verdicts(&ticket.outcomes, &snapshot.statuses)?;

        let mut won = Vec::new();
        for (i, verdict) in verdicts.iter().enumerate() {
            match verdict {
                LegVerdict::Miss => {
                    return Err(LedgerError::LegLost {
                        ticket: id,
                        leg: ticket.leg_ids[i],
                    })
                }
                LegVerdict::Hit => won.push(
                    *ticket
                        .probabilities
                        .get(i)
                        .ok_or(LedgerError::UnknownLeg(ticket.leg_ids[i]))?,
                ),
                LegVerdict::Pending | LegVerdict::Void => {}
            }
        }

        let claimable = lifecycle::progressive_claimable(ticket, &won)?;
        if claimable == Amount::ZERO {
            return Err(LedgerError::NothingToClaim(id));
        }
        Self::check_floor(min_out, claimable)?;

        ticket.claimed_amount = ticket
            .claimed_amount
            .checked_add(claimable)
            .ok_or(MathError::Overflow)?;
        let buyer = ticket.buyer.clone();
        state.disburse(&buyer, claimable)?;

        info!(ticket = id, %buyer, amount = %claimable, won = won.len(), "Progressive claim paid");
        Ok(claimable)
    }

    async fn cashout(&self, id: TicketId, min_out: Amount) -> Result<Amount, LedgerError> {
        let mut state = self.state.write().await;
        let ticket = state.ticket_mut(id)?;

        let snapshot = self.snapshot(ticket).await?;
        let inputs = cashout::cashout_inputs(ticket, &snapshot.legs, &snapshot.statuses)?;
        let value = cashout::cashout_value(&inputs)?;
        Self::check_floor(min_out, value)?;

        ticket.transition(TicketStatus::Claimed)?;
        ticket.claimed_amount = value;
        let buyer = ticket.buyer.clone();
        state.disburse(&buyer, value)?;

        metrics::counter!(telemetry::SETTLEMENTS_TOTAL, "status" => "CashedOut").increment(1);
        info!(ticket = id, %buyer, amount = %value, %min_out, "Ticket cashed out");
        Ok(value)
    }
}
