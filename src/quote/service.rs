//! Catalog-backed quote service

use super::{validate_shape, Quote, QuoteRequest, RejectReason};
use crate::catalog::LegCatalog;
use crate::config::PricingConfig;
use crate::math::{self, Probability};
use crate::telemetry;
use std::sync::Arc;
use tracing::{debug, warn};

/// Prices parlay requests against the leg catalog
#[derive(Clone)]
pub struct QuoteService {
    catalog: Arc<dyn LegCatalog>,
    pricing: PricingConfig,
}

impl QuoteService {
    /// Create a new quote service
    pub fn new(catalog: Arc<dyn LegCatalog>, pricing: PricingConfig) -> Self {
        Self { catalog, pricing }
    }

    pub fn pricing(&self) -> &PricingConfig {
        &self.pricing
    }

    pub fn catalog(&self) -> &Arc<dyn LegCatalog> {
        &self.catalog
    }

    /// Validate and price a request.
    ///
    /// Nothing is computed until every structural and catalog check passes.
    pub fn quote(&self, request: &QuoteRequest) -> Result<Quote, RejectReason> {
        let result = self.try_quote(request);
        let label = match &result {
            Ok(_) => "valid",
            Err(reason) => reason.code(),
        };
        metrics::counter!(telemetry::QUOTES_TOTAL, "result" => label).increment(1);

        match &result {
            Ok(quote) => debug!(
                legs = quote.leg_count(),
                fair = %quote.fair_multiplier,
                net = %quote.net_multiplier,
                payout = %quote.potential_payout,
                "Quote priced"
            ),
            Err(reason) => debug!(reason = reason.code(), %reason, "Quote rejected"),
        }
        result
    }

    fn try_quote(&self, request: &QuoteRequest) -> Result<Quote, RejectReason> {
        let quote = self.quote_unbounded(request)?;
        if !math::within_safe_ceiling(quote.fair_multiplier) {
            return Err(RejectReason::ProbabilityOverflow);
        }
        Ok(quote)
    }

    /// Price a request from catalog odds without the safe-ceiling check.
    ///
    /// For risk classification only; the multipliers may be too large to
    /// display or book.
    pub fn quote_unbounded(&self, request: &QuoteRequest) -> Result<Quote, RejectReason> {
        validate_shape(
            &request.leg_ids,
            request.outcomes.len(),
            request.stake,
            &self.pricing,
        )?;

        let probabilities = self.leg_probabilities(request)?;
        Quote::price(
            request.leg_ids.clone(),
            request.outcomes.clone(),
            probabilities,
            request.stake,
            &self.pricing,
        )
    }

    /// Effective catalog probability of each requested outcome
    pub fn leg_probabilities(&self, request: &QuoteRequest) -> Result<Vec<Probability>, RejectReason> {
        let mut probabilities = Vec::with_capacity(request.leg_ids.len());
        for (&leg_id, &outcome) in request.leg_ids.iter().zip(&request.outcomes) {
            let leg = self
                .catalog
                .leg(leg_id)
                .map_err(|e| {
                    warn!(leg_id, error = %e, "Catalog lookup failed");
                    RejectReason::CatalogUnavailable(e.to_string())
                })?
                .ok_or(RejectReason::LegNotFound(leg_id))?;
            if !leg.active {
                return Err(RejectReason::LegInactive(leg_id));
            }
            probabilities.push(leg.effective_probability(outcome));
        }
        Ok(probabilities)
    }
}
