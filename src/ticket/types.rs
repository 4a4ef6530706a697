//! Ticket and leg-resolution types

use crate::catalog::{LegId, Outcome};
use crate::math::{Amount, Multiplier, Probability};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ticket identifier assigned by the ledger
pub type TicketId = u64;

/// How a ticket pays out
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayoutMode {
    /// Paid in full once every leg has won
    #[default]
    Classic,
    /// Won-leg value claimable while other legs are still open
    Progressive,
    /// May be sold back at an estimated present value while Active
    EarlyCashout,
}

/// Ticket lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TicketStatus {
    Active,
    Won,
    Lost,
    Voided,
    Claimed,
}

impl TicketStatus {
    /// No further settlement can happen from this status
    pub fn is_settled(self) -> bool {
        !matches!(self, TicketStatus::Active)
    }

    /// Whether `next` is a legal successor
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (self, next),
            (Active, Won) | (Active, Lost) | (Active, Voided) | (Active, Claimed)
                | (Won, Claimed) | (Voided, Claimed)
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Oracle result for a leg's proposition (Won = the proposition came true)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegStatus {
    #[default]
    Unresolved,
    Won,
    Lost,
    Voided,
}

impl LegStatus {
    pub fn is_resolved(self) -> bool {
        !matches!(self, LegStatus::Unresolved)
    }

    /// Result of this leg for a bettor holding `outcome`
    pub fn verdict(self, outcome: Outcome) -> LegVerdict {
        match (self, outcome) {
            (LegStatus::Unresolved, _) => LegVerdict::Pending,
            (LegStatus::Voided, _) => LegVerdict::Void,
            (LegStatus::Won, Outcome::Yes) | (LegStatus::Lost, Outcome::No) => LegVerdict::Hit,
            (LegStatus::Won, Outcome::No) | (LegStatus::Lost, Outcome::Yes) => LegVerdict::Miss,
        }
    }
}

/// A leg's resolution as reported by its oracle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegResolution {
    pub leg_id: LegId,
    pub status: LegStatus,
}

/// A leg's result relative to the bettor's chosen outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegVerdict {
    Pending,
    Hit,
    Miss,
    Void,
}

/// A parlay ticket as recorded by the ledger-of-record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: TicketId,
    pub buyer: String,
    pub stake: Amount,
    pub leg_ids: Vec<LegId>,
    pub outcomes: Vec<Outcome>,
    /// Effective probability of each chosen outcome, locked at purchase
    pub probabilities: Vec<Probability>,
    /// Net multiplier locked at purchase
    pub multiplier: Multiplier,
    pub potential_payout: Amount,
    /// Protocol fee taken from the stake at purchase
    pub fee_paid: Amount,
    pub payout_mode: PayoutMode,
    pub status: TicketStatus,
    /// Total disbursed so far; only ever increases
    pub claimed_amount: Amount,
    /// Cashout penalty snapshotted at purchase
    pub cashout_penalty_bps: u32,
    pub created_at: DateTime<Utc>,
}

impl Ticket {
    /// Stake net of the protocol fee
    pub fn effective_stake(&self) -> Amount {
        self.stake.saturating_sub(self.fee_paid)
    }

    pub fn leg_count(&self) -> usize {
        self.leg_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdicts() {
        assert_eq!(LegStatus::Won.verdict(Outcome::Yes), LegVerdict::Hit);
        assert_eq!(LegStatus::Won.verdict(Outcome::No), LegVerdict::Miss);
        assert_eq!(LegStatus::Lost.verdict(Outcome::No), LegVerdict::Hit);
        assert_eq!(LegStatus::Lost.verdict(Outcome::Yes), LegVerdict::Miss);
        assert_eq!(LegStatus::Voided.verdict(Outcome::Yes), LegVerdict::Void);
        assert_eq!(LegStatus::Unresolved.verdict(Outcome::No), LegVerdict::Pending);
    }

    #[test]
    fn test_status_transitions() {
        use TicketStatus::*;
        assert!(Active.can_transition_to(Won));
        assert!(Active.can_transition_to(Lost));
        assert!(Won.can_transition_to(Claimed));
        assert!(Voided.can_transition_to(Claimed));
        assert!(!Lost.can_transition_to(Claimed));
        assert!(!Claimed.can_transition_to(Active));
        assert!(!Won.can_transition_to(Lost));
        assert!(!Active.can_transition_to(Active));
    }

    #[test]
    fn test_settled() {
        assert!(!TicketStatus::Active.is_settled());
        assert!(TicketStatus::Lost.is_settled());
        assert!(TicketStatus::Claimed.is_settled());
    }

    #[test]
    fn test_payout_mode_serde() {
        let json = serde_json::to_string(&PayoutMode::EarlyCashout).unwrap();
        assert_eq!(json, "\"early_cashout\"");
    }
}
