//! Early-cashout valuation
//!
//! Produces a client-side estimate of what the ledger-of-record will pay for
//! exiting an `EarlyCashout` ticket now. The estimate always travels with a
//! `min_out` floor; the ledger's own computation is authoritative.

mod valuator;

pub use valuator::{cashout_inputs, cashout_value, CashoutValuator};

use crate::catalog::LegId;
use crate::math::{Amount, MathError, Probability};
use crate::ticket::{PayoutMode, TicketStatus};
use serde::Serialize;
use thiserror::Error;

/// Point-in-time inputs to the cashout formula
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CashoutInputs {
    /// Stake net of the protocol fee
    pub effective_stake: Amount,
    /// Effective probabilities of the legs already won by the bettor
    pub won_probabilities: Vec<Probability>,
    /// Legs still open (voided legs included)
    pub unresolved: usize,
    pub total_legs: usize,
    pub potential_payout: Amount,
    pub penalty_bps: u32,
}

/// Estimated cashout value and the floor to submit with it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CashoutEstimate {
    pub value: Amount,
    pub min_out: Amount,
}

/// Reasons a cashout cannot be estimated
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CashoutError {
    #[error("ticket payout mode {0:?} does not allow early cashout")]
    WrongMode(PayoutMode),
    #[error("ticket is {0}, not Active")]
    NotActive(TicketStatus),
    #[error("no leg has been won yet")]
    NoWonLegs,
    #[error("leg {0} resolved against the ticket")]
    LegLost(LegId),
    #[error("probability unknown for leg {0}")]
    ProbabilityUnknown(LegId),
    #[error("leg snapshot does not match the ticket")]
    SnapshotMismatch,
    #[error("{won} won and {unresolved} unresolved legs do not fit a {total}-leg ticket")]
    InconsistentCounts {
        won: usize,
        unresolved: usize,
        total: usize,
    },
    #[error(transparent)]
    Math(#[from] MathError),
}
