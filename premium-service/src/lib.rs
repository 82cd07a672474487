pub mod config;
pub mod factors;
pub mod models;
pub mod predictor;
pub mod render;
pub mod service;
pub mod tasks;
pub mod workflow;

pub use config::ServiceConfig;
pub use models::*;
pub use predictor::{HttpPredictor, Predictor, PredictorError};
pub use service::{AppState, create_app};
pub use workflow::{EstimateError, build_estimation_workflow, create_flow_runner, run_estimate};
