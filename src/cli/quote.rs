//! Quote command implementation

use crate::api::QuoteRequestBody;
use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct QuoteArgs {
    /// Leg ids, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub legs: Vec<u64>,

    /// Outcome per leg (yes/no), comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub outcomes: Vec<String>,

    /// Stake as a decimal string
    #[arg(long, default_value = "10")]
    pub stake: String,
}

impl QuoteArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let api = super::seed_api(config);
        let response = api.quote(&QuoteRequestBody {
            leg_ids: self.legs.clone(),
            outcomes: self.outcomes.clone(),
            stake: self.stake.clone(),
        });
        super::print_response(response)
    }
}
