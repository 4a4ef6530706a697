//! Demo command implementation
//!
//! Buys one ticket in each payout mode on a paper ledger, resolves legs
//! through a paper oracle, and lets the settler finish the job.

use crate::cashout::CashoutValuator;
use crate::catalog::{LegCatalog, LegId, Outcome, SeedCatalog};
use crate::config::Config;
use crate::math::Amount;
use crate::quote::QuoteService;
use crate::ticket::{
    BuyOrder, LegStatus, Ledger, Oracle, OracleSet, PaperLedger, PaperOracle, PayoutMode,
    Settler, TicketId,
};
use clap::Args;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tracing::info;

#[derive(Args, Debug)]
pub struct DemoArgs {
    /// Stake per ticket
    #[arg(long, default_value = "10")]
    pub stake: Amount,

    /// Keep the settler polling at the configured interval until Ctrl-C
    #[arg(long)]
    pub follow: bool,
}

impl DemoArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let catalog = Arc::new(SeedCatalog::default());
        let oracle = Arc::new(PaperOracle::new());
        let oracles = OracleSet::for_catalog(catalog.as_ref(), oracle.clone())?;
        let quotes = QuoteService::new(catalog.clone(), config.pricing.clone());
        let ledger = Arc::new(PaperLedger::new(
            quotes,
            oracles.clone(),
            config.cashout.penalty_bps,
        ));
        let settler = Settler::new(ledger.clone(), catalog.clone(), oracles);
        let valuator = CashoutValuator::new(config.cashout.clone());

        let classic = self.buy(&ledger, &[4, 3], PayoutMode::Classic).await?;
        let progressive = self.buy(&ledger, &[1, 2], PayoutMode::Progressive).await?;
        let early = self.buy(&ledger, &[8, 5], PayoutMode::EarlyCashout).await?;

        // first wave: one leg of each ticket
        for leg in [4, 1, 8] {
            oracle.resolve(leg, LegStatus::Won).await?;
        }

        let paid = ledger.claim_progressive(progressive, Amount::DUST).await?;
        println!("Ticket {} progressive claim: {}", progressive, paid);

        let ticket = ledger
            .ticket(early)
            .await?
            .ok_or_else(|| anyhow::anyhow!("ticket {} vanished", early))?;
        let legs = ticket
            .leg_ids
            .iter()
            .map(|&id| catalog.leg(id))
            .collect::<Result<Vec<_>, _>>()?;
        let mut statuses = Vec::with_capacity(legs.len());
        for &id in &ticket.leg_ids {
            statuses.push(oracle.status(id).await?);
        }
        let estimate = valuator.estimate_for_ticket(&ticket, &legs, &statuses)?;
        let value = ledger.cashout(early, estimate.min_out).await?;
        println!(
            "Ticket {} cashed out: {} (estimate {}, floor {})",
            early, value, estimate.value, estimate.min_out
        );

        // second wave settles the rest
        oracle.resolve(3, LegStatus::Won).await?;
        oracle.resolve(2, LegStatus::Lost).await?;

        let stats = settler.run_once().await?;
        println!(
            "Settler pass: {} scanned, {} settled, {} pending, {} failed",
            stats.scanned, stats.settled, stats.pending, stats.failed
        );

        for id in [classic, progressive] {
            if let Some(ticket) = ledger.ticket(id).await? {
                println!("Ticket {} is {}", id, ticket.status);
            }
        }
        let payout = ledger.claim(classic, Amount::DUST).await?;
        println!("Ticket {} claimed: {}", classic, payout);
        println!("Total paid to demo buyer: {}", ledger.disbursed("demo").await);

        if self.follow {
            let interval = Duration::from_millis(config.settler.poll_interval_ms);
            let (tx, rx) = watch::channel(false);
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    let _ = tx.send(true);
                }
            });
            settler.run(interval, rx).await;
        }
        Ok(())
    }

    async fn buy(
        &self,
        ledger: &PaperLedger,
        legs: &[LegId],
        payout_mode: PayoutMode,
    ) -> anyhow::Result<TicketId> {
        let ticket = ledger
            .buy(BuyOrder {
                buyer: "demo".to_string(),
                leg_ids: legs.to_vec(),
                outcomes: vec![Outcome::Yes; legs.len()],
                stake: self.stake,
                payout_mode,
                min_payout: Amount::DUST,
            })
            .await?;
        info!(ticket = ticket.id, mode = ?payout_mode, "Demo ticket bought");
        println!(
            "Ticket {} ({:?}): stake {} at {} pays {}",
            ticket.id, payout_mode, ticket.stake, ticket.multiplier, ticket.potential_payout
        );
        Ok(ticket.id)
    }
}
