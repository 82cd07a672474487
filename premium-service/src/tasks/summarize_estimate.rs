use async_trait::async_trait;
use premium_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::{DISCLAIMER, PremiumEstimate, correlation_id, session_keys};
use crate::factors::FactorImpact;
use crate::render::format::format_rupees;

/// Final step: packages the premium and factors for the page and API
pub struct SummarizeEstimateTask;

#[async_trait]
impl Task for SummarizeEstimateTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let correlation_id = correlation_id(&context).await;
        let premium: f64 = context
            .get(session_keys::PREMIUM)
            .await
            .ok_or_else(|| GraphError::ContextError("premium not found".to_string()))?;

        let factors: Vec<FactorImpact> = context
            .get(session_keys::FACTORS)
            .await
            .ok_or_else(|| GraphError::ContextError("factors not found".to_string()))?;

        let estimate = PremiumEstimate {
            premium,
            formatted_premium: format_rupees(premium),
            factors,
            disclaimer: DISCLAIMER.to_string(),
        };

        info!(
            correlation_id = %correlation_id,
            formatted_premium = %estimate.formatted_premium,
            "Estimate ready"
        );

        let response = format!("Your Estimated Annual Premium: {}", estimate.formatted_premium);
        context.set(session_keys::ESTIMATE, &estimate).await?;

        Ok(TaskResult::new(Some(response), NextAction::End))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn needs_a_premium() {
        let context = Context::new();
        context
            .set(session_keys::FACTORS, Vec::<FactorImpact>::new())
            .await
            .unwrap();

        let err = SummarizeEstimateTask.run(context).await.unwrap_err();
        assert!(matches!(err, GraphError::ContextError(_)));
    }

    #[tokio::test]
    async fn ends_the_flow_with_formatted_premium() {
        let context = Context::new();
        context.set(session_keys::PREMIUM, 8_421.6).await.unwrap();
        context
            .set(session_keys::FACTORS, Vec::<FactorImpact>::new())
            .await
            .unwrap();

        let result = SummarizeEstimateTask.run(context.clone()).await.unwrap();
        assert_eq!(result.next_action, NextAction::End);
        assert_eq!(
            result.response.as_deref(),
            Some("Your Estimated Annual Premium: ₹8,422")
        );

        let estimate: PremiumEstimate = context.get(session_keys::ESTIMATE).await.unwrap();
        assert_eq!(estimate.formatted_premium, "₹8,422");
    }
}
