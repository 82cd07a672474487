use premium_flow::{Context, ExecutionStatus, FlowRunner, Graph, GraphBuilder, GraphError, Task};
use std::sync::Arc;
use thiserror::Error;

use crate::models::PremiumRecord;
use crate::predictor::Predictor;
use crate::tasks::*;

/// Why an estimate could not be produced
#[derive(Debug, Error)]
pub enum EstimateError {
    #[error("invalid record: {}", .0.join("; "))]
    Invalid(Vec<String>),

    #[error("premium prediction failed: {0}")]
    Prediction(String),

    #[error("estimation workflow failed: {0}")]
    Internal(String),
}

pub fn build_estimation_workflow(predictor: Arc<dyn Predictor>) -> Graph {
    let validate_task = Arc::new(ValidateRecordTask);
    let validate_id = validate_task.id().to_string();

    let estimate_task = Arc::new(EstimatePremiumTask::new(predictor));
    let estimate_id = estimate_task.id().to_string();

    let factors_task = Arc::new(AssessFactorsTask);
    let factors_id = factors_task.id().to_string();

    let summary_task = Arc::new(SummarizeEstimateTask);
    let summary_id = summary_task.id().to_string();

    GraphBuilder::new("premium_estimation")
        .add_task(validate_task)
        .add_task(estimate_task)
        .add_task(factors_task)
        .add_task(summary_task)
        .add_edge(&validate_id, &estimate_id)
        .add_edge(&estimate_id, &factors_id)
        .add_edge(&factors_id, &summary_id)
        .build()
}

pub fn create_flow_runner(predictor: Arc<dyn Predictor>) -> FlowRunner {
    FlowRunner::new(Arc::new(build_estimation_workflow(predictor)))
}

/// Run one submission through the workflow on a fresh context.
pub async fn run_estimate(
    runner: &FlowRunner,
    record: &PremiumRecord,
    correlation_id: &str,
) -> Result<PremiumEstimate, EstimateError> {
    let context = Context::new();
    context
        .set(session_keys::RECORD, record)
        .await
        .map_err(|e| EstimateError::Internal(e.to_string()))?;
    context
        .set(session_keys::CORRELATION_ID, correlation_id)
        .await
        .map_err(|e| EstimateError::Internal(e.to_string()))?;

    let result = match runner.run(context.clone()).await {
        Ok(result) => result,
        Err(GraphError::InvalidInput(message)) => {
            let messages = context
                .get(session_keys::VALIDATION_ERRORS)
                .await
                .unwrap_or_else(|| vec![message]);
            return Err(EstimateError::Invalid(messages));
        }
        Err(GraphError::TaskExecutionFailed(message)) => {
            return Err(EstimateError::Prediction(message));
        }
        Err(e) => return Err(EstimateError::Internal(e.to_string())),
    };

    if result.status != ExecutionStatus::Completed {
        return Err(EstimateError::Internal(format!(
            "workflow stopped at {}",
            result.last_task_id
        )));
    }

    context
        .get(session_keys::ESTIMATE)
        .await
        .ok_or_else(|| EstimateError::Internal("estimate missing from context".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factors::ImpactLevel;
    use crate::models::{InsurancePlan, SmokingStatus};
    use crate::predictor::{PredictorError, check_premium};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingPredictor {
        premium: f64,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Predictor for CountingPredictor {
        async fn predict(&self, _record: &PremiumRecord) -> Result<f64, PredictorError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            check_premium(self.premium)
        }
    }

    fn counting(premium: f64) -> Arc<CountingPredictor> {
        Arc::new(CountingPredictor {
            premium,
            calls: AtomicUsize::new(0),
        })
    }

    #[test]
    fn workflow_starts_with_validation() {
        let runner = create_flow_runner(counting(1.0));
        let graph = runner.graph();
        assert_eq!(graph.task_count(), 4);
        assert_eq!(
            graph.start_task_id(),
            Some(std::any::type_name::<ValidateRecordTask>())
        );

        for id in [
            std::any::type_name::<EstimatePremiumTask>(),
            std::any::type_name::<AssessFactorsTask>(),
            std::any::type_name::<SummarizeEstimateTask>(),
        ] {
            let task = graph.get_task(id).unwrap();
            assert_eq!(task.id(), id);
        }
        assert!(graph.get_task("missing").is_none());
    }

    #[tokio::test]
    async fn full_run_produces_estimate() {
        let predictor = counting(23_456.4);
        let runner = create_flow_runner(predictor.clone());
        let record = PremiumRecord {
            age: 35,
            smoking_status: SmokingStatus::Regular,
            insurance_plan: InsurancePlan::Gold,
            ..PremiumRecord::default()
        };

        let estimate = run_estimate(&runner, &record, "test").await.unwrap();

        assert_eq!(predictor.calls.load(Ordering::SeqCst), 1);
        assert_eq!(estimate.premium, 23_456.4);
        assert_eq!(estimate.formatted_premium, "₹23,456");
        assert_eq!(estimate.factors.len(), 5);
        assert_eq!(estimate.factors[0].impact, ImpactLevel::Medium);
        assert_eq!(estimate.factors[2].impact, ImpactLevel::High);
        assert_eq!(estimate.disclaimer, DISCLAIMER);
    }

    #[tokio::test]
    async fn invalid_record_never_reaches_the_predictor() {
        let predictor = counting(1_000.0);
        let runner = create_flow_runner(predictor.clone());
        let record = PremiumRecord {
            genetical_risk: 9,
            ..PremiumRecord::default()
        };

        let err = run_estimate(&runner, &record, "test").await.unwrap_err();

        assert!(matches!(err, EstimateError::Invalid(ref messages) if messages.len() == 1));
        assert_eq!(predictor.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn bad_prediction_is_reported() {
        let runner = create_flow_runner(counting(f64::NAN));

        let err = run_estimate(&runner, &PremiumRecord::default(), "test")
            .await
            .unwrap_err();
        assert!(matches!(err, EstimateError::Prediction(_)));
    }
}
