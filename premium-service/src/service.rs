use axum::{
    Form, Router,
    extract::{Request, State, rejection::JsonRejection},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    middleware::{Next, from_fn},
    response::{Html, IntoResponse, Json, Response},
    routing::get,
};
use premium_flow::FlowRunner;
use serde::Serialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{Instrument, error, info, warn};
use uuid::Uuid;

use crate::{
    factors::{Factor, ImpactLevel},
    models::{EstimateForm, PremiumRecord},
    predictor::Predictor,
    render::{CalculatorView, render_about, render_calculator, trend_chart},
    tasks::PremiumEstimate,
    workflow::{EstimateError, create_flow_runner, run_estimate},
};

pub const CORRELATION_HEADER: &str = "x-correlation-id";

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<Value>)>;
type ApiError = (StatusCode, Json<Value>);

fn bad_request_error(message: &str, details: Vec<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn bad_gateway_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::BAD_GATEWAY,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

fn internal_error(message: &str, details: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({
            "error": message,
            "details": details
        })),
    )
}

#[derive(Clone)]
pub struct AppState {
    pub flow_runner: Arc<FlowRunner>,
}

#[derive(Debug, Serialize)]
pub struct FactorView {
    pub factor: Factor,
    pub impact: ImpactLevel,
    pub score: u8,
}

#[derive(Debug, Serialize)]
pub struct EstimateResponse {
    pub premium: f64,
    pub formatted_premium: String,
    pub factors: Vec<FactorView>,
    pub disclaimer: String,
}

impl From<PremiumEstimate> for EstimateResponse {
    fn from(estimate: PremiumEstimate) -> Self {
        Self {
            premium: estimate.premium,
            formatted_premium: estimate.formatted_premium,
            factors: estimate
                .factors
                .into_iter()
                .map(|f| FactorView {
                    factor: f.factor,
                    impact: f.impact,
                    score: f.impact.score(),
                })
                .collect(),
            disclaimer: estimate.disclaimer,
        }
    }
}

pub fn create_app(predictor: Arc<dyn Predictor>) -> Router {
    let app_state = AppState {
        flow_runner: Arc::new(create_flow_runner(predictor)),
    };
    build_router(app_state)
}

fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(calculator_page))
        .route("/estimate", get(calculator_page).post(submit_estimate))
        .route("/about", get(about_page))
        .route("/charts/trends.svg", get(trends_svg))
        .route("/api/estimate", axum::routing::post(api_estimate))
        .route("/health", get(health_check))
        .layer(from_fn(correlation_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

/// Middleware to add correlation ID to all requests
async fn correlation_id_middleware(mut request: Request, next: Next) -> Response {
    let correlation_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&correlation_id) {
        request.headers_mut().insert(CORRELATION_HEADER, value);
    }

    let span = tracing::info_span!("http_request", correlation_id = %correlation_id);
    next.run(request).instrument(span).await
}

fn correlation_id(headers: &HeaderMap) -> String {
    headers
        .get(CORRELATION_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string()
}

async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn calculator_page() -> Html<String> {
    let form = EstimateForm::initial();
    Html(render_calculator(&CalculatorView::blank(&form)))
}

async fn about_page() -> Html<String> {
    Html(render_about())
}

async fn trends_svg() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "image/svg+xml")],
        trend_chart().to_svg(),
    )
}

async fn submit_estimate(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(form): Form<EstimateForm>,
) -> (StatusCode, Html<String>) {
    let correlation_id = correlation_id(&headers);

    let record = match form.to_record() {
        Ok(record) => record,
        Err(errors) => {
            info!(
                correlation_id = %correlation_id,
                error_count = errors.errors().len(),
                "Calculator form rejected"
            );
            let view = CalculatorView {
                errors: Some(&errors),
                ..CalculatorView::blank(&form)
            };
            return (StatusCode::BAD_REQUEST, Html(render_calculator(&view)));
        }
    };

    match run_estimate(&state.flow_runner, &record, &correlation_id).await {
        Ok(estimate) => {
            let view = CalculatorView {
                estimate: Some(&estimate),
                ..CalculatorView::blank(&form)
            };
            (StatusCode::OK, Html(render_calculator(&view)))
        }
        Err(e) => {
            let (status, notice) = estimate_failure(&correlation_id, &e);
            let view = CalculatorView {
                failure: Some(notice),
                ..CalculatorView::blank(&form)
            };
            (status, Html(render_calculator(&view)))
        }
    }
}

fn estimate_failure(correlation_id: &str, e: &EstimateError) -> (StatusCode, &'static str) {
    match e {
        EstimateError::Invalid(_) => (
            StatusCode::BAD_REQUEST,
            "Please check the values you entered.",
        ),
        EstimateError::Prediction(_) => {
            warn!(correlation_id = %correlation_id, error = %e, "Prediction unavailable");
            (
                StatusCode::BAD_GATEWAY,
                "The prediction service is unavailable. Please try again later.",
            )
        }
        EstimateError::Internal(_) => {
            error!(correlation_id = %correlation_id, error = %e, "Estimate failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Something went wrong on our side. Please try again later.",
            )
        }
    }
}

async fn api_estimate(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<PremiumRecord>, JsonRejection>,
) -> ApiResult<EstimateResponse> {
    let correlation_id = correlation_id(&headers);

    let Json(record) = payload.map_err(|rejection| {
        info!(
            correlation_id = %correlation_id,
            error = %rejection.body_text(),
            "Rejected estimate payload"
        );
        bad_request_error("Invalid request body", vec![rejection.body_text()])
    })?;

    info!(
        correlation_id = %correlation_id,
        age = record.age,
        plan = %record.insurance_plan,
        "Processing estimate request"
    );

    match run_estimate(&state.flow_runner, &record, &correlation_id).await {
        Ok(estimate) => Ok(Json(estimate.into())),
        Err(EstimateError::Invalid(details)) => {
            Err(bad_request_error("Invalid premium record", details))
        }
        Err(e @ EstimateError::Prediction(_)) => {
            warn!(correlation_id = %correlation_id, error = %e, "Prediction unavailable");
            Err(bad_gateway_error(
                "Premium prediction failed",
                &format!("Prediction service unavailable (correlation id {correlation_id})"),
            ))
        }
        Err(e @ EstimateError::Internal(_)) => {
            error!(correlation_id = %correlation_id, error = %e, "Estimate failed");
            Err(internal_error(
                "Failed to estimate premium",
                &format!("Internal error (correlation id {correlation_id})"),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::predictor::PredictorError;
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use tower::ServiceExt;

    /// Premium grows with age so tests can tell records apart
    struct AgePredictor;

    #[async_trait]
    impl Predictor for AgePredictor {
        async fn predict(&self, record: &PremiumRecord) -> Result<f64, PredictorError> {
            Ok(f64::from(record.age) * 250.0 + 1_000.0)
        }
    }

    struct DownPredictor;

    #[async_trait]
    impl Predictor for DownPredictor {
        async fn predict(&self, _record: &PremiumRecord) -> Result<f64, PredictorError> {
            Err(PredictorError::Status {
                status: 503,
                body: "model offline".to_string(),
            })
        }
    }

    fn app() -> Router {
        create_app(Arc::new(AgePredictor))
    }

    async fn body_string(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/estimate")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn json_request(body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/estimate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn wire_record(age: u32) -> Value {
        json!({
            "Age": age,
            "Number of Dependants": 2,
            "Income in Lakhs": 18.5,
            "Genetical Risk": 1,
            "Insurance Plan": "Silver",
            "Employment Status": "Salaried",
            "Gender": "Female",
            "Marital Status": "Married",
            "BMI Category": "Obesity",
            "Smoking Status": "No Smoking",
            "Region": "Southwest",
            "Medical History": "No Disease"
        })
    }

    const FORM_BODY: &str = "age=52&number_of_dependants=1&income_lakhs=30.0&genetical_risk=2\
        &employment_status=Freelancer&gender=Male&marital_status=Married&bmi_category=Normal\
        &smoking_status=Regular&region=Northeast&medical_history=Thyroid&plan_gold=on";

    #[tokio::test]
    async fn health_reports_healthy() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["status"], "healthy");
    }

    #[tokio::test]
    async fn calculator_page_renders_form() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        assert!(html.contains("Health Insurance Premium Predictor"));
        assert!(html.contains(r#"action="/estimate""#));
    }

    #[tokio::test]
    async fn form_submission_shows_estimate() {
        let response = app().oneshot(form_request(FORM_BODY)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let html = body_string(response).await;
        // 52 * 250 + 1000
        assert!(html.contains("₹14,000"));
        assert!(html.contains("Key Factors Influencing Your Premium"));
        assert!(html.contains(r#"name="plan_gold" value="on" checked"#));
    }

    #[tokio::test]
    async fn form_with_bad_values_is_redisplayed() {
        let body = FORM_BODY.replace("age=52", "age=12");
        let response = app().oneshot(form_request(&body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let html = body_string(response).await;
        assert!(html.contains("Age must be between 18 and 100, got 12"));
        assert!(html.contains(r#"class="field field-error""#));
        assert!(!html.contains(r#"class="prediction-result""#));
    }

    #[tokio::test]
    async fn form_reports_predictor_outage() {
        let response = create_app(Arc::new(DownPredictor))
            .oneshot(form_request(FORM_BODY))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let html = body_string(response).await;
        assert!(html.contains("prediction service is unavailable"));
    }

    #[tokio::test]
    async fn api_returns_premium_and_factors() {
        let response = app().oneshot(json_request(wire_record(40))).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["premium"], json!(11_000.0));
        assert_eq!(body["formatted_premium"], "₹11,000");
        assert_eq!(body["factors"][0], json!({"factor": "Age", "impact": "Medium", "score": 2}));
        assert_eq!(body["factors"][1]["impact"], "High");
        assert_eq!(body["factors"][4]["factor"], "Insurance Plan");
    }

    #[tokio::test]
    async fn api_rejects_out_of_range_record() {
        let mut record = wire_record(40);
        record["Genetical Risk"] = json!(7);
        record["Number of Dependants"] = json!(30);

        let response = app().oneshot(json_request(record)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(body["details"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn api_rejects_unknown_option() {
        let mut record = wire_record(40);
        record["Region"] = json!("Central");

        let response = app().oneshot(json_request(record)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn api_maps_predictor_failure_to_bad_gateway() {
        let response = create_app(Arc::new(DownPredictor))
            .oneshot(json_request(wire_record(40)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
        let details = body["details"].as_str().unwrap();
        assert!(details.starts_with("Prediction service unavailable"));
        assert!(!details.contains("model offline"));
    }

    #[tokio::test]
    async fn trends_chart_is_svg() {
        let response = app()
            .oneshot(Request::get("/charts/trends.svg").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/svg+xml");
        assert!(body_string(response).await.starts_with("<svg"));
    }
}
