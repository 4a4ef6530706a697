//! JSON contract for the quote and risk-assess endpoints
//!
//! Transport-agnostic: each handler takes a parsed or raw JSON body and
//! returns the HTTP-equivalent status with a JSON body. Routing is left to
//! whatever server embeds the engine.

mod wire;

pub use wire::{
    QuoteRequestBody, QuoteResponseBody, RejectionBody, RiskAssessRequestBody, RiskResponseBody,
};

use crate::catalog::{LegId, Outcome};
use crate::math::{self, Amount, Multiplier, Probability};
use crate::quote::{Quote, QuoteRequest, QuoteService, RejectReason};
use crate::risk::{RiskAssessor, RiskError, RiskParams, RiskTolerance};
use serde::Serialize;
use serde_json::Value;
use std::str::FromStr;
use tracing::warn;

/// Status plus JSON body
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn json(status: u16, body: &impl Serialize) -> Self {
        let body = serde_json::to_value(body).unwrap_or_else(|e| {
            warn!(error = %e, "Response serialization failed");
            Value::Null
        });
        Self { status, body }
    }

    fn rejected(reason: &RejectReason) -> Self {
        Self::json(reason.status_code(), &RejectionBody::from(reason))
    }

    fn bad_request(reason: &str, message: impl Into<String>) -> Self {
        Self::json(400, &RejectionBody::new(reason, message))
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Request handlers over a quote service and a risk assessor
#[derive(Clone)]
pub struct Api {
    quotes: QuoteService,
    assessor: RiskAssessor,
}

impl Api {
    pub fn new(quotes: QuoteService, assessor: RiskAssessor) -> Self {
        Self { quotes, assessor }
    }

    /// Handle a raw quote body
    pub fn quote_json(&self, raw: &str) -> ApiResponse {
        match serde_json::from_str::<QuoteRequestBody>(raw) {
            Ok(body) => self.quote(&body),
            Err(e) => ApiResponse::bad_request("invalid_request", e.to_string()),
        }
    }

    pub fn quote(&self, body: &QuoteRequestBody) -> ApiResponse {
        let result = parse_request(&body.leg_ids, &body.outcomes, &body.stake)
            .and_then(|request| self.quotes.quote(&request));
        match result {
            Ok(quote) => ApiResponse::json(200, &QuoteResponseBody::from(&quote)),
            Err(reason) => ApiResponse::rejected(&reason),
        }
    }

    /// Handle a raw risk-assess body
    pub fn assess_json(&self, raw: &str) -> ApiResponse {
        match serde_json::from_str::<RiskAssessRequestBody>(raw) {
            Ok(body) => self.assess(&body),
            Err(e) => ApiResponse::bad_request("invalid_request", e.to_string()),
        }
    }

    pub fn assess(&self, body: &RiskAssessRequestBody) -> ApiResponse {
        let request = match parse_request(&body.leg_ids, &body.outcomes, &body.stake) {
            Ok(r) => r,
            Err(reason) => return ApiResponse::rejected(&reason),
        };
        let params = match self.risk_params(body) {
            Ok(p) => p,
            Err(e) => return ApiResponse::bad_request(risk_code(&e), e.to_string()),
        };

        let priced = match &body.probabilities {
            Some(ppm) => self.price_explicit(request.clone(), ppm),
            None => self.quotes.quote_unbounded(&request),
        };
        let quote = match priced {
            Ok(q) => q,
            Err(RejectReason::ProbabilityOverflow) => {
                let multipliers = self.overflow_multipliers(&request, body.probabilities.as_deref());
                let assessment = self.assessor.overflow(&params, body.leg_ids.len(), multipliers);
                return ApiResponse::json(200, &RiskResponseBody::from(&assessment));
            }
            Err(reason) => return ApiResponse::rejected(&reason),
        };

        let params = RiskParams {
            categories: params
                .categories
                .or_else(|| self.catalog_categories(&quote.leg_ids)),
            ..params
        };
        match self.assessor.assess(&quote, &params) {
            Ok(assessment) => ApiResponse::json(200, &RiskResponseBody::from(&assessment)),
            Err(e) => ApiResponse::bad_request(risk_code(&e), e.to_string()),
        }
    }

    fn risk_params(&self, body: &RiskAssessRequestBody) -> Result<RiskParams, RiskError> {
        let tolerance = match &body.risk_tolerance {
            Some(name) => RiskTolerance::from_str(name)?,
            None => self.assessor.config().default_tolerance,
        };
        let bankroll = match &body.bankroll {
            Some(raw) => {
                let amount = Amount::from_str(raw).map_err(|_| RiskError::NonPositiveBankroll)?;
                if amount == Amount::ZERO {
                    return Err(RiskError::NonPositiveBankroll);
                }
                Some(amount)
            }
            None => None,
        };
        if let Some(categories) = &body.categories {
            if categories.len() != body.leg_ids.len() {
                return Err(RiskError::CategoryMismatch {
                    legs: body.leg_ids.len(),
                    categories: categories.len(),
                });
            }
        }
        Ok(RiskParams {
            tolerance,
            bankroll,
            categories: body.categories.clone(),
        })
    }

    /// Price caller-supplied Yes probabilities without touching the catalog
    fn price_explicit(&self, request: QuoteRequest, ppm: &[u32]) -> Result<Quote, RejectReason> {
        let probabilities = explicit_probabilities(&request, ppm)?;
        Quote::price(
            request.leg_ids,
            request.outcomes,
            probabilities,
            request.stake,
            self.quotes.pricing(),
        )
    }

    /// Fair multiplier and edge for a combination whose payout overflowed
    fn overflow_multipliers(
        &self,
        request: &QuoteRequest,
        ppm: Option<&[u32]>,
    ) -> Option<(Multiplier, u32)> {
        let probabilities = match ppm {
            Some(ppm) => explicit_probabilities(request, ppm),
            None => self.quotes.leg_probabilities(request),
        }
        .ok()?;
        let fair = math::combined_multiplier(&probabilities).ok()?;
        Some((fair, math::edge_bps(probabilities.len(), &self.quotes.pricing().fees())))
    }

    /// Category labels from the catalog, when every leg is known
    fn catalog_categories(&self, leg_ids: &[LegId]) -> Option<Vec<String>> {
        leg_ids
            .iter()
            .map(|&id| self.quotes.catalog().leg(id).ok().flatten().map(|leg| leg.category))
            .collect()
    }
}

/// Outcome probabilities from caller-supplied Yes probabilities
fn explicit_probabilities(
    request: &QuoteRequest,
    ppm: &[u32],
) -> Result<Vec<Probability>, RejectReason> {
    if ppm.len() != request.leg_ids.len() {
        return Err(RejectReason::LengthMismatch);
    }
    ppm.iter()
        .zip(&request.outcomes)
        .map(|(&p, &outcome)| {
            let yes = Probability::new(p).map_err(|_| RejectReason::InvalidProbability)?;
            Ok(match outcome {
                Outcome::Yes => yes,
                Outcome::No => yes.complement(),
            })
        })
        .collect()
}

fn parse_request(
    leg_ids: &[LegId],
    outcomes: &[String],
    stake: &str,
) -> Result<QuoteRequest, RejectReason> {
    let outcomes = outcomes
        .iter()
        .map(|s| Outcome::from_str(s).map_err(|_| RejectReason::InvalidOutcome(s.clone())))
        .collect::<Result<Vec<_>, _>>()?;
    let stake = Amount::from_str(stake).map_err(|_| RejectReason::InvalidAmount(stake.to_string()))?;
    Ok(QuoteRequest {
        leg_ids: leg_ids.to_vec(),
        outcomes,
        stake,
    })
}

fn risk_code(err: &RiskError) -> &'static str {
    match err {
        RiskError::UnknownTolerance(_) => "unknown_tolerance",
        RiskError::CategoryMismatch { .. } => "category_mismatch",
        RiskError::NonPositiveBankroll => "invalid_bankroll",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Leg, SeedCatalog};
    use crate::config::{PricingConfig, RiskConfig};
    use chrono::Utc;
    use serde_json::json;
    use std::sync::Arc;

    fn api() -> Api {
        Api::new(
            QuoteService::new(Arc::new(SeedCatalog::default()), PricingConfig::default()),
            RiskAssessor::new(RiskConfig::default()),
        )
    }

    #[test]
    fn test_quote_success_shape() {
        let response = api().quote_json(r#"{"legIds":[4,3],"outcomes":["yes","yes"],"stake":"10"}"#);
        assert_eq!(response.status, 200);
        assert_eq!(
            response.body,
            json!({
                "valid": true,
                "multiplier": "3629628",
                "fairMultiplier": "3703703",
                "potentialPayout": "36296280",
                "feePaid": "740750",
                "edgeBps": 200
            })
        );
    }

    #[test]
    fn test_quote_unknown_leg_is_404() {
        let response = api().quote_json(r#"{"legIds":[4,42],"outcomes":["yes","no"],"stake":"10"}"#);
        assert_eq!(response.status, 404);
        assert_eq!(response.body["valid"], json!(false));
        assert_eq!(response.body["reason"], json!("leg_not_found"));
    }

    #[test]
    fn test_quote_validation_errors_are_400() {
        let api = api();
        for raw in [
            r#"{"legIds":[4],"outcomes":["yes"],"stake":"10"}"#,
            r#"{"legIds":[4,3],"outcomes":["yes"],"stake":"10"}"#,
            r#"{"legIds":[4,3],"outcomes":["yes","maybe"],"stake":"10"}"#,
            r#"{"legIds":[4,3],"outcomes":["yes","no"],"stake":"-1"}"#,
            r#"{"legIds":[4,3],"outcomes":["yes","no"],"stake":"0.5"}"#,
            r#"{"legIds":[4,4],"outcomes":["yes","no"],"stake":"10"}"#,
            r#"{"legIds":"4","outcomes":[],"stake":"10"}"#,
        ] {
            let response = api.quote_json(raw);
            assert_eq!(response.status, 400, "{}", raw);
            assert_eq!(response.body["valid"], json!(false));
        }
    }

    #[test]
    fn test_assess_with_catalog() {
        let response = api().assess_json(
            r#"{"legIds":[4,3],"outcomes":["yes","yes"],"stake":"10","bankroll":"1000","riskTolerance":"aggressive"}"#,
        );
        assert_eq!(response.status, 200);
        let body: RiskResponseBody = serde_json::from_value(response.body).unwrap();
        assert_eq!(body.fair_multiplier, "3703703");
        assert_eq!(body.net_multiplier, "3629628");
        assert_eq!(body.edge_bps, 200);
        assert_eq!(body.risk_tolerance, "aggressive");
        assert!((body.win_probability - 0.27).abs() < 0.001);
        assert!(body.kelly_fraction >= 0.0 && body.kelly_fraction <= 1.0);
        assert!(body.suggested_stake <= 1000.0);
    }

    #[test]
    fn test_assess_sim_path_overflow_is_avoid() {
        let response = api().assess_json(
            r#"{"legIds":[1,2,3,4,5],"outcomes":["yes","yes","yes","yes","yes"],"stake":"10","bankroll":"100","probabilities":[1,1,1,1,1]}"#,
        );
        assert_eq!(response.status, 200);
        assert_eq!(response.body["action"], json!("AVOID"));
        assert!(response.body["reasoning"]
            .as_str()
            .unwrap()
            .starts_with("overflow"));
        assert_eq!(response.body["fairMultiplier"], json!(10u128.pow(36).to_string()));
    }

    #[test]
    fn test_assess_catalog_overflow_echoes_multipliers() {
        let catalog = SeedCatalog::from_legs((1..=5).map(|id| Leg {
            id,
            question: format!("long shot {}", id),
            probability: Probability::new(1).unwrap(),
            cutoff_time: Utc::now(),
            earliest_resolve_time: Utc::now(),
            oracle_ref: "paper".to_string(),
            category: format!("cat-{}", id),
            active: true,
        }));
        let api = Api::new(
            QuoteService::new(Arc::new(catalog), PricingConfig::default()),
            RiskAssessor::default(),
        );
        let response = api.assess_json(
            r#"{"legIds":[1,2,3,4,5],"outcomes":["yes","yes","yes","yes","yes"],"stake":"10","bankroll":"100"}"#,
        );
        assert_eq!(response.status, 200);
        let body: RiskResponseBody = serde_json::from_value(response.body).unwrap();
        assert_eq!(body.action, "AVOID");
        assert!(body.reasoning.starts_with("overflow"));
        // 10^30x fair, echoed in PPM
        assert_eq!(body.fair_multiplier, format!("1{}", "0".repeat(36)));
        assert_ne!(body.net_multiplier, "0");
    }

    #[test]
    fn test_assess_sim_path_uses_complement_for_no() {
        let response = api().assess_json(
            r#"{"legIds":[1,2],"outcomes":["no","no"],"stake":"10","probabilities":[500000,500000]}"#,
        );
        assert_eq!(response.status, 200);
        assert_eq!(response.body["fairMultiplier"], json!("4000000"));
    }

    #[test]
    fn test_assess_rejections() {
        let api = api();
        let bad_tolerance = api.assess_json(
            r#"{"legIds":[4,3],"outcomes":["yes","yes"],"stake":"10","riskTolerance":"yolo"}"#,
        );
        assert_eq!(bad_tolerance.status, 400);
        assert_eq!(bad_tolerance.body["reason"], json!("unknown_tolerance"));

        let bad_categories = api.assess_json(
            r#"{"legIds":[4,3],"outcomes":["yes","yes"],"stake":"10","categories":["defi"]}"#,
        );
        assert_eq!(bad_categories.body["reason"], json!("category_mismatch"));

        let zero_bankroll = api.assess_json(
            r#"{"legIds":[4,3],"outcomes":["yes","yes"],"stake":"10","bankroll":"0"}"#,
        );
        assert_eq!(zero_bankroll.body["reason"], json!("invalid_bankroll"));

        let bad_probability = api.assess_json(
            r#"{"legIds":[4,3],"outcomes":["yes","yes"],"stake":"10","probabilities":[0,500000]}"#,
        );
        assert_eq!(bad_probability.body["reason"], json!("invalid_probability"));
    }

    #[test]
    fn test_assess_falls_back_to_catalog_categories() {
        // legs 1 and 2 are both crypto
        let response = api().assess_json(
            r#"{"legIds":[1,2],"outcomes":["yes","yes"],"stake":"1","bankroll":"100"}"#,
        );
        let body: RiskResponseBody = serde_json::from_value(response.body).unwrap();
        assert!(body.warnings.iter().any(|w| w.contains("crypto")));
    }
}
