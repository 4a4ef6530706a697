//! parlay-engine: Quote, risk and settlement valuation for parlay tickets
//!
//! This library provides the core components for:
//! - Fixed-point parlay pricing (PPM probabilities, basis-point edges)
//! - Catalog-backed quote validation with enumerated rejection reasons
//! - Kelly-based risk advisory with tolerance profiles
//! - Early-cashout estimates with slippage floors
//! - Ticket lifecycle, oracle and ledger collaborators, settlement agent
//! - JSON request/response contract
//! - Structured logging and Prometheus metrics

pub mod api;
pub mod cashout;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod math;
pub mod quote;
pub mod risk;
pub mod telemetry;
pub mod ticket;
