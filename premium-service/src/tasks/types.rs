use serde::{Deserialize, Serialize};

use crate::factors::FactorImpact;

/// What the calculator shows after a successful estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PremiumEstimate {
    pub premium: f64,
    pub formatted_premium: String,
    pub factors: Vec<FactorImpact>,
    pub disclaimer: String,
}

pub const DISCLAIMER: &str = "This estimate is based on the information you provided. Actual premiums may vary based on additional factors and insurance provider policies.";

pub mod session_keys {
    pub const RECORD: &str = "record";
    pub const VALIDATION_ERRORS: &str = "validation_errors";
    pub const PREMIUM: &str = "premium";
    pub const FACTORS: &str = "factors";
    pub const ESTIMATE: &str = "estimate";
    pub const CORRELATION_ID: &str = "correlation_id";
}
