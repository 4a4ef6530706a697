//! Integration tests for quoting against the seed catalog

use parlay_engine::catalog::{LegCatalog, Outcome, SeedCatalog};
use parlay_engine::config::PricingConfig;
use parlay_engine::math::{Amount, Multiplier};
use parlay_engine::quote::{QuoteRequest, QuoteService, RejectReason};
use std::sync::Arc;

fn service(catalog: Arc<SeedCatalog>) -> QuoteService {
    QuoteService::new(catalog, PricingConfig::default())
}

fn request(legs: &[u64], stake: u64) -> QuoteRequest {
    QuoteRequest {
        leg_ids: legs.to_vec(),
        outcomes: vec![Outcome::Yes; legs.len()],
        stake: Amount::from_units(stake),
    }
}

#[test]
fn test_reference_quote() {
    let quotes = service(Arc::new(SeedCatalog::default()));
    let quote = quotes.quote(&request(&[4, 3], 10)).unwrap();
    assert_eq!(quote.fair_multiplier, Multiplier(3_703_703));
    assert_eq!(quote.net_multiplier, Multiplier(3_629_628));
    assert_eq!(quote.edge_bps, 200);
    assert_eq!(quote.potential_payout, Amount(36_296_280));
    assert_eq!(quote.fee_paid, Amount(740_750));
}

#[test]
fn test_edge_grows_with_legs() {
    let quotes = service(Arc::new(SeedCatalog::default()));
    let two = quotes.quote(&request(&[1, 2], 10)).unwrap();
    let five = quotes.quote(&request(&[1, 2, 3, 4, 5], 10)).unwrap();
    assert_eq!(two.edge_bps, 200);
    assert_eq!(five.edge_bps, 350);
    assert!(five.fair_multiplier > two.fair_multiplier);
}

#[test]
fn test_deactivated_leg_rejected() {
    let catalog = Arc::new(SeedCatalog::default());
    let quotes = service(catalog.clone());
    assert!(quotes.quote(&request(&[6, 7], 10)).is_ok());

    catalog.set_active(7, false).unwrap();
    let err = quotes.quote(&request(&[6, 7], 10)).unwrap_err();
    assert_eq!(err, RejectReason::LegInactive(7));
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_not_found_distinct_from_inactive() {
    let quotes = service(Arc::new(SeedCatalog::default()));
    let err = quotes.quote(&request(&[6, 70], 10)).unwrap_err();
    assert_eq!(err, RejectReason::LegNotFound(70));
    assert_eq!(err.status_code(), 404);
}

#[test]
fn test_every_seed_pair_prices_above_one() {
    let catalog = Arc::new(SeedCatalog::default());
    let quotes = service(catalog.clone());
    let legs = catalog.legs().unwrap();
    for a in &legs {
        for b in &legs {
            if a.id == b.id {
                continue;
            }
            let quote = quotes.quote(&request(&[a.id, b.id], 1)).unwrap();
            assert!(quote.fair_multiplier >= Multiplier::ONE);
            assert!(quote.net_multiplier <= quote.fair_multiplier);
        }
    }
}
