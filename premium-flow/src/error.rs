use thiserror::Error;

/// Errors raised while building or executing a graph
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Task execution failed: {0}")]
    TaskExecutionFailed(String),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Context error: {0}")]
    ContextError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Step limit of {0} exceeded")]
    StepLimitExceeded(usize),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
