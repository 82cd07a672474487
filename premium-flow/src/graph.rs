use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::{
    context::Context,
    error::{GraphError, Result},
    task::{NextAction, Task, TaskResult},
};

/// Upper bound on task runs per execution, guards against cyclic edges
pub const DEFAULT_MAX_STEPS: usize = 64;

/// Type alias for edge condition functions
pub type EdgeCondition = Arc<dyn Fn(&Context) -> bool + Send + Sync>;

/// Edge between tasks in the graph
#[derive(Clone)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub condition: Option<EdgeCondition>,
}

/// A graph of tasks that can be executed
pub struct Graph {
    pub id: String,
    tasks: HashMap<String, Arc<dyn Task>>,
    edges: Vec<Edge>,
    start_task_id: Option<String>,
    max_steps: usize,
}

impl Graph {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tasks: HashMap::new(),
            edges: Vec::new(),
            start_task_id: None,
            max_steps: DEFAULT_MAX_STEPS,
        }
    }

    /// Add a task to the graph; the first one added becomes the start task
    pub fn add_task(&mut self, task: Arc<dyn Task>) -> &mut Self {
        let task_id = task.id().to_string();
        if self.tasks.is_empty() {
            self.start_task_id = Some(task_id.clone());
        }
        self.tasks.insert(task_id, task);
        self
    }

    /// Set the starting task. Unknown IDs are ignored.
    pub fn set_start_task(&mut self, task_id: impl Into<String>) -> &mut Self {
        let task_id = task_id.into();
        if self.tasks.contains_key(&task_id) {
            self.start_task_id = Some(task_id);
        }
        self
    }

    /// Add an edge between tasks
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.edges.push(Edge {
            from: from.into(),
            to: to.into(),
            condition: None,
        });
        self
    }

    /// Add a conditional edge: `yes` when the condition holds, `no` otherwise
    pub fn add_conditional_edge<F>(
        &mut self,
        from: impl Into<String>,
        condition: F,
        yes: impl Into<String>,
        no: impl Into<String>,
    ) -> &mut Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        let from = from.into();
        self.edges.push(Edge {
            from: from.clone(),
            to: yes.into(),
            condition: Some(Arc::new(condition)),
        });
        self.edges.push(Edge {
            from,
            to: no.into(),
            condition: None,
        });
        self
    }

    pub fn set_max_steps(&mut self, max_steps: usize) -> &mut Self {
        self.max_steps = max_steps;
        self
    }

    /// Execute the graph starting from a specific task.
    ///
    /// Follows `Continue` and `GoTo` until a task returns `End`, a task has no
    /// outgoing edge, or the step limit is hit. Returns the last task's result.
    pub async fn execute(&self, task_id: &str, context: Context) -> Result<TaskResult> {
        let mut current = task_id.to_string();

        for step in 0..self.max_steps {
            let task = self
                .tasks
                .get(&current)
                .ok_or_else(|| GraphError::TaskNotFound(current.clone()))?;

            debug!(graph_id = %self.id, task_id = %current, step, "Running task");
            let mut result = task.run(context.clone()).await?;
            result.task_id = current.clone();

            let next = match &result.next_action {
                NextAction::End => None,
                NextAction::Continue => self.find_next_task(&current, &context),
                NextAction::GoTo(target_id) => {
                    if !self.tasks.contains_key(target_id) {
                        return Err(GraphError::TaskNotFound(target_id.clone()));
                    }
                    Some(target_id.clone())
                }
            };

            match next {
                Some(next_task_id) => current = next_task_id,
                None => return Ok(result),
            }
        }

        warn!(graph_id = %self.id, max_steps = self.max_steps, "Step limit exceeded");
        Err(GraphError::StepLimitExceeded(self.max_steps))
    }

    /// Find the next task based on edges and conditions.
    ///
    /// Edges are checked in insertion order; the first unconditional edge or
    /// satisfied conditional edge wins.
    pub fn find_next_task(&self, current_task_id: &str, context: &Context) -> Option<String> {
        self.edges
            .iter()
            .filter(|edge| edge.from == current_task_id)
            .find(|edge| match &edge.condition {
                Some(condition) => condition(context),
                None => true,
            })
            .map(|edge| edge.to.clone())
    }

    /// Get the start task ID
    pub fn start_task_id(&self) -> Option<&str> {
        self.start_task_id.as_deref()
    }

    /// Get a task by ID
    pub fn get_task(&self, task_id: &str) -> Option<Arc<dyn Task>> {
        self.tasks.get(task_id).cloned()
    }

    pub fn task_count(&self) -> usize {
        self.tasks.len()
    }
}

/// Builder for creating graphs
pub struct GraphBuilder {
    graph: Graph,
}

impl GraphBuilder {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            graph: Graph::new(id),
        }
    }

    pub fn add_task(mut self, task: Arc<dyn Task>) -> Self {
        self.graph.add_task(task);
        self
    }

    pub fn add_edge(mut self, from: impl Into<String>, to: impl Into<String>) -> Self {
        self.graph.add_edge(from, to);
        self
    }

    pub fn add_conditional_edge<F>(
        mut self,
        from: impl Into<String>,
        condition: F,
        yes: impl Into<String>,
        no: impl Into<String>,
    ) -> Self
    where
        F: Fn(&Context) -> bool + Send + Sync + 'static,
    {
        self.graph.add_conditional_edge(from, condition, yes, no);
        self
    }

    pub fn set_start_task(mut self, task_id: impl Into<String>) -> Self {
        self.graph.set_start_task(task_id);
        self
    }

    pub fn max_steps(mut self, max_steps: usize) -> Self {
        self.graph.set_max_steps(max_steps);
        self
    }

    pub fn build(self) -> Graph {
        self.graph
    }
}

/// Outcome of running a whole graph
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    pub response: Option<String>,
    pub status: ExecutionStatus,
    /// ID of the last task that ran
    pub last_task_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Workflow completed successfully
    Completed,
    /// Workflow stopped on a task that did not end it
    Stalled,
}
