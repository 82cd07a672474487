// Premium estimation workflow tasks
pub mod assess_factors;
pub mod estimate_premium;
pub mod summarize_estimate;
pub mod validate_record;

// Shared modules
pub mod types;

// Re-export task implementations
pub use assess_factors::AssessFactorsTask;
pub use estimate_premium::EstimatePremiumTask;
pub use summarize_estimate::SummarizeEstimateTask;
pub use validate_record::ValidateRecordTask;

pub use types::{DISCLAIMER, PremiumEstimate, session_keys};

use premium_flow::{Context, GraphError, Result};

use crate::models::PremiumRecord;

/// Load the submitted record every task works on
pub(crate) async fn load_record(context: &Context) -> Result<PremiumRecord> {
    context
        .get(session_keys::RECORD)
        .await
        .ok_or_else(|| GraphError::ContextError("record not found".to_string()))
}

pub(crate) async fn correlation_id(context: &Context) -> String {
    context
        .get::<String>(session_keys::CORRELATION_ID)
        .await
        .unwrap_or_else(|| "unknown".to_string())
}
