use async_trait::async_trait;
use premium_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

use super::{correlation_id, load_record, session_keys};
use crate::predictor::Predictor;

/// Hands the record to the external model and stores the premium it returns
pub struct EstimatePremiumTask {
    predictor: Arc<dyn Predictor>,
}

impl EstimatePremiumTask {
    pub fn new(predictor: Arc<dyn Predictor>) -> Self {
        Self { predictor }
    }
}

#[async_trait]
impl Task for EstimatePremiumTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let correlation_id = correlation_id(&context).await;
        let record = load_record(&context).await?;

        info!(
            correlation_id = %correlation_id,
            task_id = %self.id(),
            plan = %record.insurance_plan,
            "Requesting premium estimate"
        );

        let started = Instant::now();
        let premium = self.predictor.predict(&record).await.map_err(|e| {
            error!(
                correlation_id = %correlation_id,
                error = %e,
                "Premium prediction failed"
            );
            GraphError::TaskExecutionFailed(e.to_string())
        })?;

        info!(
            correlation_id = %correlation_id,
            premium,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Premium estimated"
        );

        context.set(session_keys::PREMIUM, premium).await?;
        Ok(TaskResult::new(None, NextAction::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PremiumRecord;
    use crate::predictor::PredictorError;

    struct FixedPredictor(f64);

    #[async_trait]
    impl Predictor for FixedPredictor {
        async fn predict(
            &self,
            _record: &PremiumRecord,
        ) -> std::result::Result<f64, PredictorError> {
            crate::predictor::check_premium(self.0)
        }
    }

    #[tokio::test]
    async fn stores_the_predicted_premium() {
        let context = Context::new();
        context
            .set(session_keys::RECORD, PremiumRecord::default())
            .await
            .unwrap();

        let task = EstimatePremiumTask::new(Arc::new(FixedPredictor(15_250.0)));
        task.run(context.clone()).await.unwrap();

        assert_eq!(context.get::<f64>(session_keys::PREMIUM).await, Some(15_250.0));
    }

    #[tokio::test]
    async fn predictor_failure_fails_the_task() {
        let context = Context::new();
        context
            .set(session_keys::RECORD, PremiumRecord::default())
            .await
            .unwrap();

        let task = EstimatePremiumTask::new(Arc::new(FixedPredictor(-5.0)));
        let err = task.run(context.clone()).await.unwrap_err();

        assert!(matches!(err, GraphError::TaskExecutionFailed(_)));
        assert!(!context.contains(session_keys::PREMIUM));
    }
}
