//! FlowRunner – convenience wrapper that runs a graph from its start task to the end on a
//! caller-supplied [`Context`].
//!
//! Request handlers typically build one runner at startup, share it through application state,
//! and hand each request its own fresh context:
//!
//! ```ignore
//! let context = Context::new();
//! context.set("record", &record).await?;
//! let result = state.flow_runner.run(context.clone()).await?;
//! let estimate: Option<PremiumEstimate> = context.get("estimate").await;
//! ```
//!
//! Nothing is persisted between runs; whatever the tasks write stays in the context the caller
//! passed in.

use std::sync::Arc;

use tracing::info;

use crate::{
    context::Context,
    error::{GraphError, Result},
    graph::{ExecutionResult, ExecutionStatus, Graph},
    task::NextAction,
};

/// Runs a shared graph once per call.
#[derive(Clone)]
pub struct FlowRunner {
    graph: Arc<Graph>,
}

impl FlowRunner {
    pub fn new(graph: Arc<Graph>) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Execute the graph from its start task until it ends.
    pub async fn run(&self, context: Context) -> Result<ExecutionResult> {
        let start = self
            .graph
            .start_task_id()
            .ok_or_else(|| GraphError::TaskNotFound("<start task>".to_string()))?
            .to_string();

        let result = self.graph.execute(&start, context).await?;

        let status = if result.next_action == NextAction::End {
            ExecutionStatus::Completed
        } else {
            ExecutionStatus::Stalled
        };

        info!(
            graph_id = %self.graph.id,
            last_task = %result.task_id,
            status = ?status,
            "Flow finished"
        );

        Ok(ExecutionResult {
            response: result.response,
            status,
            last_task_id: result.task_id,
        })
    }
}
