//! Ticket state machine and settlement rules
//!
//! `Active -> {Won, Lost, Voided} -> Claimed`. Early cashout exits straight
//! from `Active` to `Claimed`. Everything here is pure; the ledger applies it.

use super::types::{LegStatus, LegVerdict, Ticket, TicketStatus};
use crate::catalog::Outcome;
use crate::math::{self, Amount, FeeSchedule, MathError, Probability};
use thiserror::Error;

/// State machine errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// Outcomes and resolutions are not the same length
    #[error("ticket has {legs} legs but {resolutions} resolutions")]
    ResolutionMismatch { legs: usize, resolutions: usize },
    /// At least one leg has no result yet
    #[error("leg at position {position} is not resolved")]
    NotResolvable { position: usize },
    /// Transition not allowed by the state machine
    #[error("cannot move ticket from {from} to {to}")]
    IllegalTransition { from: TicketStatus, to: TicketStatus },
    #[error(transparent)]
    Math(#[from] MathError),
}

/// Per-leg verdicts for a ticket
pub fn verdicts(
    outcomes: &[Outcome],
    statuses: &[LegStatus],
) -> Result<Vec<LegVerdict>, LifecycleError> {
    if outcomes.len() != statuses.len() {
        return Err(LifecycleError::ResolutionMismatch {
            legs: outcomes.len(),
            resolutions: statuses.len(),
        });
    }
    Ok(statuses
        .iter()
        .zip(outcomes)
        .map(|(status, outcome)| status.verdict(*outcome))
        .collect())
}

/// Terminal status a fully resolved ticket settles to.
///
/// Voided legs are skipped; any miss loses the ticket; all-void is a push.
pub fn settle_status(
    outcomes: &[Outcome],
    statuses: &[LegStatus],
) -> Result<TicketStatus, LifecycleError> {
    let verdicts = verdicts(outcomes, statuses)?;

    if let Some(position) = verdicts.iter().position(|v| *v == LegVerdict::Pending) {
        return Err(LifecycleError::NotResolvable { position });
    }
    if verdicts.contains(&LegVerdict::Miss) {
        return Ok(TicketStatus::Lost);
    }
    if verdicts.iter().all(|v| *v == LegVerdict::Void) {
        return Ok(TicketStatus::Voided);
    }
    Ok(TicketStatus::Won)
}

impl Ticket {
    /// Apply a status change, rejecting anything the state machine forbids
    pub fn transition(&mut self, next: TicketStatus) -> Result<(), LifecycleError> {
        if !self.status.can_transition_to(next) {
            return Err(LifecycleError::IllegalTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }
}

/// Amount owed for a Won ticket.
///
/// With voided legs the ticket is repriced over the remaining legs (and the
/// edge for that leg count), never above the original potential payout.
/// `probabilities` are the effective probabilities of the bettor's outcomes.
pub fn won_payout(
    ticket: &Ticket,
    verdicts: &[LegVerdict],
    probabilities: &[Probability],
    fees: &FeeSchedule,
) -> Result<Amount, LifecycleError> {
    if !verdicts.contains(&LegVerdict::Void) {
        return Ok(ticket.potential_payout);
    }
    if probabilities.len() != verdicts.len() {
        return Err(LifecycleError::ResolutionMismatch {
            legs: probabilities.len(),
            resolutions: verdicts.len(),
        });
    }
    let remaining: Vec<Probability> = verdicts
        .iter()
        .zip(probabilities)
        .filter(|(v, _)| **v != LegVerdict::Void)
        .map(|(_, p)| *p)
        .collect();
    if remaining.is_empty() {
        return Ok(ticket.stake);
    }

    let fair = math::combined_multiplier(&remaining)?;
    let net = math::apply_edge(fair, math::edge_bps(remaining.len(), fees));
    let repriced = math::payout(ticket.stake, net)?;
    Ok(repriced.min(ticket.potential_payout))
}

/// Total owed once a ticket is settled (before subtracting prior claims)
pub fn settled_entitlement(
    ticket: &Ticket,
    verdicts: &[LegVerdict],
    probabilities: &[Probability],
    fees: &FeeSchedule,
) -> Result<Amount, LifecycleError> {
    match ticket.status {
        TicketStatus::Won => won_payout(ticket, verdicts, probabilities, fees),
        TicketStatus::Voided => Ok(ticket.stake),
        _ => Ok(Amount::ZERO),
    }
}

/// Value unlocked so far on a progressive ticket, net of previous claims.
///
/// `effective_stake * Π(PPM / p_won) / PPM`, capped at the potential payout.
pub fn progressive_claimable(
    ticket: &Ticket,
    won_probabilities: &[Probability],
) -> Result<Amount, LifecycleError> {
    if won_probabilities.is_empty() {
        return Ok(Amount::ZERO);
    }
    let won = math::combined_multiplier(won_probabilities)?;
    let unlocked = math::payout(ticket.effective_stake(), won)?.min(ticket.potential_payout);
    Ok(unlocked.saturating_sub(ticket.claimed_amount))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Multiplier;
    use crate::ticket::PayoutMode;
    use chrono::Utc;

    fn ticket(outcomes: Vec<Outcome>) -> Ticket {
        Ticket {
            id: 1,
            buyer: "alice".to_string(),
            stake: Amount::from_units(10),
            leg_ids: (1..=outcomes.len() as u64).collect(),
            probabilities: vec![Probability::new(500_000).unwrap(); outcomes.len()],
            outcomes,
            multiplier: Multiplier(3_629_628),
            potential_payout: Amount(36_296_280),
            fee_paid: Amount(200_000),
            payout_mode: PayoutMode::Classic,
            status: TicketStatus::Active,
            claimed_amount: Amount::ZERO,
            cashout_penalty_bps: 1_500,
            created_at: Utc::now(),
        }
    }

    fn probs(values: &[u32]) -> Vec<Probability> {
        values.iter().map(|&p| Probability::new(p).unwrap()).collect()
    }

    use LegStatus::{Lost as L, Unresolved as U, Voided as V, Won as W};

    #[test]
    fn test_all_hits_win() {
        let t = ticket(vec![Outcome::Yes, Outcome::No]);
        assert_eq!(settle_status(&t.outcomes, &[W, L]).unwrap(), TicketStatus::Won);
    }

    #[test]
    fn test_any_miss_loses() {
        let t = ticket(vec![Outcome::Yes, Outcome::Yes, Outcome::Yes]);
        assert_eq!(settle_status(&t.outcomes, &[W, V, L]).unwrap(), TicketStatus::Lost);
    }

    #[test]
    fn test_voided_legs_skipped() {
        let t = ticket(vec![Outcome::Yes, Outcome::No]);
        assert_eq!(settle_status(&t.outcomes, &[V, L]).unwrap(), TicketStatus::Won);
    }

    #[test]
    fn test_all_void_is_push() {
        let t = ticket(vec![Outcome::Yes, Outcome::No]);
        assert_eq!(settle_status(&t.outcomes, &[V, V]).unwrap(), TicketStatus::Voided);
    }

    #[test]
    fn test_unresolved_leg_blocks_settlement() {
        let t = ticket(vec![Outcome::Yes, Outcome::Yes]);
        assert_eq!(
            settle_status(&t.outcomes, &[W, U]),
            Err(LifecycleError::NotResolvable { position: 1 })
        );
        assert!(matches!(
            settle_status(&t.outcomes, &[W]),
            Err(LifecycleError::ResolutionMismatch { .. })
        ));
    }

    #[test]
    fn test_transition_rules() {
        let mut t = ticket(vec![Outcome::Yes, Outcome::Yes]);
        t.transition(TicketStatus::Won).unwrap();
        assert!(t.transition(TicketStatus::Lost).is_err());
        t.transition(TicketStatus::Claimed).unwrap();
        assert!(t.transition(TicketStatus::Claimed).is_err());
        assert_eq!(t.status, TicketStatus::Claimed);
    }

    #[test]
    fn test_won_payout_without_voids() {
        let t = ticket(vec![Outcome::Yes, Outcome::Yes]);
        let v = verdicts(&t.outcomes, &[W, W]).unwrap();
        let payout = won_payout(&t, &v, &probs(&[600_000, 450_000]), &FeeSchedule::default());
        assert_eq!(payout.unwrap(), Amount(36_296_280));
    }

    #[test]
    fn test_won_payout_reprices_voided_legs() {
        let mut t = ticket(vec![Outcome::Yes, Outcome::Yes, Outcome::Yes]);
        t.potential_payout = Amount(1_000_000_000);
        let v = verdicts(&t.outcomes, &[W, V, W]).unwrap();
        // remaining 50% x 50% = 4.00x fair, 200 bps edge -> 3.92x on 10 units
        let payout = won_payout(
            &t,
            &v,
            &probs(&[500_000, 300_000, 500_000]),
            &FeeSchedule::default(),
        );
        assert_eq!(payout.unwrap(), Amount(39_200_000));
    }

    #[test]
    fn test_repriced_payout_capped_at_potential() {
        let t = ticket(vec![Outcome::Yes, Outcome::Yes]);
        let v = verdicts(&t.outcomes, &[V, W]).unwrap();
        let payout = won_payout(&t, &v, &probs(&[900_000, 10_000]), &FeeSchedule::default());
        assert_eq!(payout.unwrap(), t.potential_payout);
    }

    #[test]
    fn test_repricing_needs_every_leg_probability() {
        let t = ticket(vec![Outcome::Yes, Outcome::Yes]);
        let v = verdicts(&t.outcomes, &[V, W]).unwrap();
        assert!(matches!(
            won_payout(&t, &v, &probs(&[500_000]), &FeeSchedule::default()),
            Err(LifecycleError::ResolutionMismatch { .. })
        ));
    }

    #[test]
    fn test_voided_ticket_refunds_stake() {
        let mut t = ticket(vec![Outcome::Yes, Outcome::Yes]);
        t.status = TicketStatus::Voided;
        let v = verdicts(&t.outcomes, &[V, V]).unwrap();
        let owed = settled_entitlement(&t, &v, &probs(&[500_000, 500_000]), &FeeSchedule::default());
        assert_eq!(owed.unwrap(), t.stake);
    }

    #[test]
    fn test_lost_ticket_owes_nothing() {
        let mut t = ticket(vec![Outcome::Yes, Outcome::Yes]);
        t.status = TicketStatus::Lost;
        let v = verdicts(&t.outcomes, &[W, L]).unwrap();
        let owed = settled_entitlement(&t, &v, &probs(&[500_000, 500_000]), &FeeSchedule::default());
        assert_eq!(owed.unwrap(), Amount::ZERO);
    }

    #[test]
    fn test_progressive_claimable() {
        let mut t = ticket(vec![Outcome::Yes, Outcome::Yes]);
        // effective stake 9.8 at 2.00x -> 19.6 unlocked
        let won = probs(&[500_000]);
        assert_eq!(progressive_claimable(&t, &won).unwrap(), Amount(19_600_000));
        t.claimed_amount = Amount(19_600_000);
        assert_eq!(progressive_claimable(&t, &won).unwrap(), Amount::ZERO);
        assert_eq!(progressive_claimable(&t, &[]).unwrap(), Amount::ZERO);
    }
}
