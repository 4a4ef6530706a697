//! Assess command implementation

use crate::api::RiskAssessRequestBody;
use crate::config::Config;
use clap::Args;

#[derive(Args, Debug)]
pub struct AssessArgs {
    /// Leg ids, comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub legs: Vec<u64>,

    /// Outcome per leg (yes/no), comma separated
    #[arg(long, value_delimiter = ',', required = true)]
    pub outcomes: Vec<String>,

    /// Proposed stake
    #[arg(long, default_value = "10")]
    pub stake: String,

    /// Bankroll used for Kelly sizing
    #[arg(long)]
    pub bankroll: Option<String>,

    /// conservative, moderate or aggressive
    #[arg(long)]
    pub tolerance: Option<String>,

    /// Category label per leg, comma separated
    #[arg(long, value_delimiter = ',')]
    pub categories: Option<Vec<String>>,

    /// Yes-side probability per leg in PPM; bypasses the catalog
    #[arg(long, value_delimiter = ',')]
    pub probabilities: Option<Vec<u32>>,
}

impl AssessArgs {
    pub async fn execute(&self, config: &Config) -> anyhow::Result<()> {
        let api = super::seed_api(config);
        let response = api.assess(&RiskAssessRequestBody {
            leg_ids: self.legs.clone(),
            outcomes: self.outcomes.clone(),
            stake: self.stake.clone(),
            bankroll: self.bankroll.clone(),
            risk_tolerance: self.tolerance.clone(),
            categories: self.categories.clone(),
            probabilities: self.probabilities.clone(),
        });
        super::print_response(response)
    }
}
