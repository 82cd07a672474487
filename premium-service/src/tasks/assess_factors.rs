use async_trait::async_trait;
use premium_flow::{Context, NextAction, Result, Task, TaskResult};
use tracing::debug;

use super::{load_record, session_keys};
use crate::factors::classify_factors;

pub struct AssessFactorsTask;

#[async_trait]
impl Task for AssessFactorsTask {
    fn id(&self) -> &str {
        std::any::type_name::<Self>()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        let record = load_record(&context).await?;
        let factors = classify_factors(&record);

        debug!(task_id = %self.id(), factors = ?factors, "Factors assessed");

        context.set(session_keys::FACTORS, &factors).await?;
        Ok(TaskResult::new(None, NextAction::Continue))
    }
}
