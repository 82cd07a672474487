use async_trait::async_trait;
use premium_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use tracing::{info, warn};

use super::{correlation_id, load_record, session_keys};

/// Rejects records whose numeric fields fall outside their bounds
pub struct ValidateRecordTask;

#[async_trait]
impl Task for ValidateRecordTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let correlation_id = correlation_id(&context).await;
        let record = load_record(&context).await?;

        if let Err(errors) = record.validate() {
            warn!(
                correlation_id = %correlation_id,
                task_id = %self.id(),
                error_count = errors.errors().len(),
                "Record failed validation"
            );
            context
                .set(session_keys::VALIDATION_ERRORS, errors.messages())
                .await?;
            return Err(GraphError::InvalidInput(errors.to_string()));
        }

        info!(
            correlation_id = %correlation_id,
            task_id = %self.id(),
            "Record validated"
        );
        Ok(TaskResult::new(None, NextAction::Continue))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PremiumRecord;

    #[tokio::test]
    async fn valid_record_continues() {
        let context = Context::new();
        context
            .set(session_keys::RECORD, PremiumRecord::default())
            .await
            .unwrap();

        let result = ValidateRecordTask.run(context).await.unwrap();
        assert_eq!(result.next_action, NextAction::Continue);
    }

    #[tokio::test]
    async fn invalid_record_stores_messages() {
        let context = Context::new();
        let record = PremiumRecord {
            age: 12,
            ..PremiumRecord::default()
        };
        context.set(session_keys::RECORD, record).await.unwrap();

        let err = ValidateRecordTask.run(context.clone()).await.unwrap_err();
        assert!(matches!(err, GraphError::InvalidInput(_)));

        let messages: Vec<String> = context.get(session_keys::VALIDATION_ERRORS).await.unwrap();
        assert_eq!(messages, vec!["Age must be between 18 and 100, got 12"]);
    }

    #[tokio::test]
    async fn missing_record_is_a_context_error() {
        let err = ValidateRecordTask.run(Context::new()).await.unwrap_err();
        assert!(matches!(err, GraphError::ContextError(_)));
    }
}
