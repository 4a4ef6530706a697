//! Early-cashout estimator

use super::{CashoutError, CashoutEstimate, CashoutInputs};
use crate::catalog::Leg;
use crate::config::CashoutConfig;
use crate::math::{self, Amount, Probability, BPS};
use crate::telemetry;
use crate::ticket::{LegStatus, LegVerdict, PayoutMode, Ticket, TicketStatus};
use tracing::debug;

/// Integer cashout value.
///
/// Fully resolved tickets are worth exactly `potential_payout`. Otherwise the
/// won-leg value is discounted by `penalty_bps` scaled by the unresolved share
/// of the ticket, and kept strictly below `potential_payout` whenever
/// `penalty_bps` is non-zero, even if the scaled penalty floors to zero.
pub fn cashout_value(inputs: &CashoutInputs) -> Result<Amount, CashoutError> {
    let won = inputs.won_probabilities.len();
    if inputs.total_legs == 0 || won + inputs.unresolved > inputs.total_legs {
        return Err(CashoutError::InconsistentCounts {
            won,
            unresolved: inputs.unresolved,
            total: inputs.total_legs,
        });
    }
    if inputs.unresolved == 0 {
        return Ok(inputs.potential_payout);
    }
    if won == 0 {
        return Err(CashoutError::NoWonLegs);
    }

    let won_multiplier = math::combined_multiplier(&inputs.won_probabilities)?;
    let base = math::payout(inputs.effective_stake, won_multiplier)?;

    let bps = BPS as u128;
    let scaled_penalty =
        (inputs.penalty_bps as u128 * inputs.unresolved as u128 / inputs.total_legs as u128).min(bps);
    let value = Amount(base.raw() * (bps - scaled_penalty) / bps);

    let ceiling = if inputs.penalty_bps > 0 {
        inputs.potential_payout.saturating_sub(Amount(1))
    } else {
        inputs.potential_payout
    };
    Ok(value.min(ceiling))
}

/// Builds cashout estimates from ticket snapshots
#[derive(Debug, Clone, Default)]
pub struct CashoutValuator {
    config: CashoutConfig,
}

impl CashoutValuator {
    pub fn new(config: CashoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CashoutConfig {
        &self.config
    }

    /// Estimate plus the `min_out` floor to submit with it.
    ///
    /// `legs` and `statuses` are a point-in-time snapshot aligned with
    /// `ticket.leg_ids`. A missing leg is reported, never guessed.
    pub fn estimate_for_ticket(
        &self,
        ticket: &Ticket,
        legs: &[Option<Leg>],
        statuses: &[LegStatus],
    ) -> Result<CashoutEstimate, CashoutError> {
        let inputs = cashout_inputs(ticket, legs, statuses)?;
        let value = cashout_value(&inputs)?;
        let min_out = math::min_out(value, self.config.slippage_bps);

        metrics::counter!(telemetry::CASHOUT_ESTIMATES_TOTAL).increment(1);
        debug!(
            ticket = ticket.id,
            unresolved = inputs.unresolved,
            %value,
            %min_out,
            "Cashout estimated"
        );
        Ok(CashoutEstimate { value, min_out })
    }
}

/// Derive cashout inputs from a ticket and its leg snapshot.
///
/// Won legs are valued at the probabilities locked on the ticket; the catalog
/// leg is only consulted for tickets recorded without them. Voided legs count
/// as unresolved.
pub fn cashout_inputs(
    ticket: &Ticket,
    legs: &[Option<Leg>],
    statuses: &[LegStatus],
) -> Result<CashoutInputs, CashoutError> {
    if ticket.payout_mode != PayoutMode::EarlyCashout {
        return Err(CashoutError::WrongMode(ticket.payout_mode));
    }
    if ticket.status != TicketStatus::Active {
        return Err(CashoutError::NotActive(ticket.status));
    }
    let n = ticket.leg_count();
    if legs.len() != n || statuses.len() != n || ticket.outcomes.len() != n {
        return Err(CashoutError::SnapshotMismatch);
    }

    let mut won_probabilities: Vec<Probability> = Vec::new();
    let mut unresolved = 0;
    for i in 0..n {
        match statuses[i].verdict(ticket.outcomes[i]) {
            LegVerdict::Miss => return Err(CashoutError::LegLost(ticket.leg_ids[i])),
            LegVerdict::Pending | LegVerdict::Void => unresolved += 1,
            LegVerdict::Hit => {
                let locked = ticket.probabilities.get(i).copied();
                let p = locked
                    .or_else(|| {
                        legs[i]
                            .as_ref()
                            .map(|leg| leg.effective_probability(ticket.outcomes[i]))
                    })
                    .ok_or(CashoutError::ProbabilityUnknown(ticket.leg_ids[i]))?;
                won_probabilities.push(p);
            }
        }
    }

    Ok(CashoutInputs {
        effective_stake: ticket.effective_stake(),
        won_probabilities,
        unresolved,
        total_legs: n,
        potential_payout: ticket.potential_payout,
        penalty_bps: ticket.cashout_penalty_bps,
    })
}
