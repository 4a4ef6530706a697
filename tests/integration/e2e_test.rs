//! End-to-end integration tests

use parlay_engine::api::Api;
use parlay_engine::cashout::CashoutValuator;
use parlay_engine::catalog::{LegCatalog, Outcome, SeedCatalog};
use parlay_engine::config::Config;
use parlay_engine::math::Amount;
use parlay_engine::quote::QuoteService;
use parlay_engine::risk::RiskAssessor;
use parlay_engine::ticket::{
    BuyOrder, LegStatus, Ledger, LedgerError, Oracle, OracleSet, PaperLedger, PaperOracle,
    PayoutMode, TicketStatus,
};
use std::sync::Arc;

#[test]
fn test_config_example_loads() {
    let config: Config = toml::from_str(include_str!("../../config.toml.example")).unwrap();
    assert_eq!(config.pricing.base_fee_bps, 100);
    assert_eq!(config.cashout.penalty_bps, 1_500);
    assert_eq!(config.settler.poll_interval_ms, 10_000);
}

#[test]
fn test_quote_then_assess_over_json() {
    let config = Config::default();
    let api = Api::new(
        QuoteService::new(Arc::new(SeedCatalog::default()), config.pricing.clone()),
        RiskAssessor::new(config.risk.clone()),
    );

    let quote = api.quote_json(r#"{"legIds":[1,4],"outcomes":["yes","no"],"stake":"25"}"#);
    assert_eq!(quote.status, 200);

    let risk = api.assess_json(
        r#"{"legIds":[1,4],"outcomes":["yes","no"],"stake":"25","bankroll":"500","riskTolerance":"moderate"}"#,
    );
    assert_eq!(risk.status, 200);
    // the risk echo matches the quote it assessed
    assert_eq!(risk.body["netMultiplier"], quote.body["multiplier"]);
    assert_eq!(risk.body["fairMultiplier"], quote.body["fairMultiplier"]);
}

#[tokio::test]
async fn test_cashout_estimate_reconciles_with_ledger() {
    let config = Config::default();
    let catalog = Arc::new(SeedCatalog::default());
    let oracle = Arc::new(PaperOracle::new());
    let oracles = OracleSet::for_catalog(catalog.as_ref(), oracle.clone()).unwrap();
    let ledger = PaperLedger::new(
        QuoteService::new(catalog.clone(), config.pricing.clone()),
        oracles,
        config.cashout.penalty_bps,
    );
    let valuator = CashoutValuator::new(config.cashout.clone());

    let ticket = ledger
        .buy(BuyOrder {
            buyer: "hana".to_string(),
            leg_ids: vec![8, 2, 5],
            outcomes: vec![Outcome::Yes; 3],
            stake: Amount::from_units(10),
            payout_mode: PayoutMode::EarlyCashout,
            min_payout: Amount::ZERO,
        })
        .await
        .unwrap();
    oracle.resolve(8, LegStatus::Won).await.unwrap();

    let legs: Vec<_> = ticket
        .leg_ids
        .iter()
        .map(|&id| catalog.leg(id).unwrap())
        .collect();
    let mut statuses = Vec::new();
    for &id in &ticket.leg_ids {
        statuses.push(oracle.status(id).await.unwrap());
    }
    let estimate = valuator
        .estimate_for_ticket(&ticket, &legs, &statuses)
        .unwrap();
    assert!(estimate.min_out < estimate.value);

    // a floor above the authoritative value reverts
    let err = ledger
        .cashout(ticket.id, Amount(estimate.value.raw() + 1))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Slippage { .. }));

    let paid = ledger.cashout(ticket.id, estimate.min_out).await.unwrap();
    assert_eq!(paid, estimate.value);
    assert!(paid < ticket.potential_payout);
    let ticket = ledger.ticket(ticket.id).await.unwrap().unwrap();
    assert_eq!(ticket.status, TicketStatus::Claimed);
}
