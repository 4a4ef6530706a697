//! Cashout command implementation

use crate::cashout::{cashout_value, CashoutInputs};
use crate::config::Config;
use crate::math::{self, Amount, Probability};
use anyhow::Context;
use clap::Args;

#[derive(Args, Debug)]
pub struct CashoutArgs {
    /// Stake net of the protocol fee
    #[arg(long)]
    pub effective_stake: Amount,

    /// PPM probabilities of the legs already won, comma separated
    #[arg(long, value_delimiter = ',')]
    pub won: Vec<u32>,

    /// Legs still open (voided legs included)
    #[arg(long)]
    pub unresolved: usize,

    /// Legs on the ticket
    #[arg(long)]
    pub total: usize,

    /// Payout if every remaining leg wins
    #[arg(long)]
    pub potential: Amount,

    /// Penalty in basis points; defaults to the configured value
    #[arg(long)]
    pub penalty_bps: Option<u32>,
}

impl CashoutArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let won_probabilities = self
            .won
            .iter()
            .map(|&p| Probability::new(p))
            .collect::<Result<Vec<_>, _>>()
            .context("invalid won-leg probability")?;

        let inputs = CashoutInputs {
            effective_stake: self.effective_stake,
            won_probabilities,
            unresolved: self.unresolved,
            total_legs: self.total,
            potential_payout: self.potential,
            penalty_bps: self.penalty_bps.unwrap_or(config.cashout.penalty_bps),
        };
        let value = cashout_value(&inputs)?;
        let min_out = math::min_out(value, config.cashout.slippage_bps);

        println!("Cashout estimate: {}", value);
        println!("  min_out:        {} ({} bps slippage)", min_out, config.cashout.slippage_bps);
        println!("  potential:      {}", self.potential);
        Ok(())
    }
}
