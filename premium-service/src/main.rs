use premium_service::{HttpPredictor, ServiceConfig, create_app};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize structured tracing based on environment variables
fn init_tracing() {
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "json".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        "premium_service=debug,premium_flow=debug,tower_http=debug".into()
    });

    match log_format.as_str() {
        "pretty" => {
            // Human-readable logging for development
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
        _ => {
            // Structured JSON logging for production
            tracing_subscriber::registry()
                .with(env_filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_target(true)
                        .with_level(true),
                )
                .init();
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = match ServiceConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let predictor = HttpPredictor::new(config.predictor_url.clone(), config.predictor_timeout)?;
    info!(
        endpoint = %predictor.endpoint(),
        timeout_secs = config.predictor_timeout.as_secs(),
        "Using HTTP premium predictor"
    );

    let app = create_app(Arc::new(predictor));
    let listener = TcpListener::bind(config.bind_addr()).await?;
    let addr = listener.local_addr()?;

    info!("Premium estimator running on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /                   - Premium calculator");
    info!("  POST /estimate           - Calculator form submission");
    info!("  GET  /about              - About the model");
    info!("  GET  /charts/trends.svg  - Premium trend chart");
    info!("  POST /api/estimate       - JSON premium estimate");
    info!("  GET  /health             - Health check");

    axum::serve(listener, app).await?;

    Ok(())
}
