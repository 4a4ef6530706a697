//! Risk advisory module
//!
//! Kelly sizing, tolerance profiles and buy/reduce/avoid classification.
//! All output is advisory; amounts never flow back from here into settlement.

mod assessor;
mod kelly;
mod types;

pub use assessor::{RiskAssessor, RiskParams};
pub use kelly::KellyCalculator;
pub use types::{RiskAction, RiskAssessment, RiskError, RiskProfile, RiskTolerance};
