pub mod context;
pub mod error;
pub mod graph;
pub mod runner;
pub mod task;

// Re-export commonly used types
pub use context::Context;
pub use error::{GraphError, Result};
pub use graph::{ExecutionResult, ExecutionStatus, Graph, GraphBuilder};
pub use runner::FlowRunner;
pub use task::{NextAction, Task, TaskResult};
