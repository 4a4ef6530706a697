//! Integration tests for risk advisory

use parlay_engine::config::{PricingConfig, RiskConfig};
use parlay_engine::math::{Amount, Probability};
use parlay_engine::quote::Quote;
use parlay_engine::risk::{RiskAction, RiskAssessor, RiskParams, RiskTolerance};

fn quote(probs: &[u32], stake: u64) -> Quote {
    let n = probs.len();
    Quote::price(
        (1..=n as u64).collect(),
        vec![parlay_engine::catalog::Outcome::Yes; n],
        probs.iter().map(|&p| Probability::new(p).unwrap()).collect(),
        Amount::from_units(stake),
        &PricingConfig::default(),
    )
    .unwrap()
}

#[test]
fn test_outputs_finite_at_probability_bounds() {
    let assessor = RiskAssessor::new(RiskConfig::default());
    for tolerance in [
        RiskTolerance::Conservative,
        RiskTolerance::Moderate,
        RiskTolerance::Aggressive,
    ] {
        for probs in [[1u32, 999_999], [999_999, 999_999], [1, 1]] {
            let params = RiskParams {
                tolerance,
                bankroll: Some(Amount::from_units(1_000)),
                categories: None,
            };
            let a = assessor.assess(&quote(&probs, 10), &params).unwrap();
            for v in [
                a.kelly_fraction,
                a.win_probability,
                a.expected_value,
                a.confidence,
                a.suggested_stake,
            ] {
                assert!(v.value().is_finite());
            }
            let profile = assessor.config().profile(tolerance);
            assert!(a.kelly_fraction.value() >= 0.0);
            assert!(a.kelly_fraction.value() <= profile.max_kelly);
            assert!(a.suggested_stake.value() <= 1_000.0);
        }
    }
}

#[test]
fn test_tolerance_changes_verdict() {
    let assessor = RiskAssessor::new(RiskConfig::default());
    // four legs at 40%: 2.56% win probability
    let q = quote(&[400_000; 4], 1);
    let conservative = assessor
        .assess(
            &q,
            &RiskParams {
                tolerance: RiskTolerance::Conservative,
                bankroll: Some(Amount::from_units(100)),
                categories: None,
            },
        )
        .unwrap();
    assert_eq!(conservative.action, RiskAction::Avoid);

    let aggressive = assessor
        .assess(
            &q,
            &RiskParams {
                tolerance: RiskTolerance::Aggressive,
                bankroll: Some(Amount::from_units(100)),
                categories: None,
            },
        )
        .unwrap();
    assert_ne!(aggressive.action, RiskAction::Avoid);
}
