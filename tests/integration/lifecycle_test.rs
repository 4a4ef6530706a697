//! Integration tests for ticket settlement on the paper ledger

use parlay_engine::catalog::{Outcome, SeedCatalog};
use parlay_engine::config::PricingConfig;
use parlay_engine::math::Amount;
use parlay_engine::quote::QuoteService;
use parlay_engine::ticket::{
    BuyOrder, LedgerError, LegStatus, Ledger, OracleSet, PaperLedger, PaperOracle, PayoutMode,
    SettleOutcome, Settler, TicketStatus,
};
use std::sync::Arc;

struct Harness {
    ledger: Arc<PaperLedger>,
    oracle: Arc<PaperOracle>,
    settler: Settler,
}

fn harness() -> Harness {
    let catalog = Arc::new(SeedCatalog::default());
    let oracle = Arc::new(PaperOracle::new());
    let oracles = OracleSet::for_catalog(catalog.as_ref(), oracle.clone()).unwrap();
    let quotes = QuoteService::new(catalog.clone(), PricingConfig::default());
    let ledger = Arc::new(PaperLedger::new(quotes, oracles.clone(), 1_500));
    let settler = Settler::new(ledger.clone(), catalog, oracles);
    Harness {
        ledger,
        oracle,
        settler,
    }
}

fn order(buyer: &str, legs: &[u64], outcomes: &[Outcome]) -> BuyOrder {
    BuyOrder {
        buyer: buyer.to_string(),
        leg_ids: legs.to_vec(),
        outcomes: outcomes.to_vec(),
        stake: Amount::from_units(10),
        payout_mode: PayoutMode::Classic,
        min_payout: Amount::ZERO,
    }
}

#[tokio::test]
async fn test_concurrent_double_settle() {
    let h = harness();
    let t = h
        .ledger
        .buy(order("dave", &[4, 3], &[Outcome::Yes, Outcome::Yes]))
        .await
        .unwrap();
    h.oracle.resolve(4, LegStatus::Won).await.unwrap();
    h.oracle.resolve(3, LegStatus::Won).await.unwrap();

    let ledger_a = h.ledger.clone();
    let ledger_b = h.ledger.clone();
    let (a, b) = tokio::join!(
        tokio::spawn(async move { ledger_a.settle(t.id).await }),
        tokio::spawn(async move { ledger_b.settle(t.id).await })
    );
    let outcomes = [a.unwrap().unwrap(), b.unwrap().unwrap()];
    assert!(outcomes.iter().all(|o| o.status() == TicketStatus::Won));
    assert_eq!(
        outcomes
            .iter()
            .filter(|o| matches!(o, SettleOutcome::AlreadySettled(_)))
            .count(),
        1
    );

    h.ledger.claim(t.id, Amount::ZERO).await.unwrap();
    assert!(h.ledger.claim(t.id, Amount::ZERO).await.is_err());
    assert_eq!(h.ledger.disbursed("dave").await, t.potential_payout);
}

#[tokio::test]
async fn test_no_outcome_wins_when_proposition_fails() {
    let h = harness();
    let t = h
        .ledger
        .buy(order("erin", &[6, 7], &[Outcome::No, Outcome::Yes]))
        .await
        .unwrap();
    h.oracle.resolve(6, LegStatus::Lost).await.unwrap();
    h.oracle.resolve(7, LegStatus::Won).await.unwrap();

    let stats = h.settler.run_once().await.unwrap();
    assert_eq!(stats.settled, 1);
    let ticket = h.ledger.ticket(t.id).await.unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::Won);
}

#[tokio::test]
async fn test_partial_void_reprices_payout() {
    let h = harness();
    let t = h
        .ledger
        .buy(order(
            "frank",
            &[2, 3, 6],
            &[Outcome::Yes, Outcome::Yes, Outcome::Yes],
        ))
        .await
        .unwrap();
    h.oracle.resolve(2, LegStatus::Won).await.unwrap();
    h.oracle.resolve(3, LegStatus::Voided).await.unwrap();
    h.oracle.resolve(6, LegStatus::Won).await.unwrap();
    h.settler.run_once().await.unwrap();

    let paid = h.ledger.claim(t.id, Amount::ZERO).await.unwrap();
    // 50% x 40% = 5.00x fair, 200 bps edge -> 4.90x on 10 units
    assert_eq!(paid, Amount(49_000_000));
    assert!(paid < t.potential_payout);
}

#[tokio::test]
async fn test_oracle_redundant_resolution_is_harmless() {
    let h = harness();
    let t = h
        .ledger
        .buy(order("gina", &[8, 9], &[Outcome::Yes, Outcome::Yes]))
        .await
        .unwrap();
    for _ in 0..3 {
        h.oracle.resolve(8, LegStatus::Lost).await.unwrap();
    }
    h.oracle.resolve(9, LegStatus::Won).await.unwrap();

    assert_eq!(
        h.ledger.settle(t.id).await.unwrap(),
        SettleOutcome::Settled(TicketStatus::Lost)
    );
    assert!(matches!(
        h.ledger.claim(t.id, Amount::ZERO).await,
        Err(LedgerError::NothingToClaim(_))
    ));
}
