//! CLI interface for parlay-engine
//!
//! Provides subcommands for:
//! - `quote`: Price a parlay against the seed catalog
//! - `assess`: Risk advisory for a parlay
//! - `cashout`: Early-cashout estimate from raw inputs
//! - `demo`: Full paper lifecycle with the settlement agent
//! - `config`: Show configuration

mod assess;
mod cashout;
mod demo;
mod quote;

pub use assess::AssessArgs;
pub use cashout::CashoutArgs;
pub use demo::DemoArgs;
pub use quote::QuoteArgs;

use crate::api::{Api, ApiResponse};
use crate::catalog::SeedCatalog;
use crate::config::Config;
use crate::quote::QuoteService;
use crate::risk::RiskAssessor;
use clap::{Parser, Subcommand};
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "parlay-engine")]
#[command(about = "Quote, risk and settlement valuation engine for parlay tickets")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a parlay
    Quote(QuoteArgs),
    /// Risk-assess a parlay
    Assess(AssessArgs),
    /// Estimate an early cashout
    Cashout(CashoutArgs),
    /// Run a paper ticket lifecycle end to end
    Demo(DemoArgs),
    /// Show configuration
    Config,
}

/// API handlers over the seed catalog
fn seed_api(config: &Config) -> Api {
    let quotes = QuoteService::new(Arc::new(SeedCatalog::default()), config.pricing.clone());
    Api::new(quotes, RiskAssessor::new(config.risk.clone()))
}

/// Print a response body and turn a rejection into an error
fn print_response(response: ApiResponse) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(&response.body)?);
    if !response.is_success() {
        anyhow::bail!(
            "request rejected ({}): {}",
            response.status,
            response.body["reason"].as_str().unwrap_or("unknown")
        );
    }
    Ok(())
}
