//! HTTP front door for RecordPilot.
//!
//! Exposes the operator command and error-analysis entry points, interview
//! practice, and the read-only dashboard views. Each request names its target instance (or
//! falls back to `platform.default_instance`) and carries its own history.
//!
//! Built on Axum.

use axum::extract::{DefaultBodyLimit, Query, Request, State};
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{Instrument, info, info_span, warn};

use recordpilot_agent::{AdminAgent, Interviewer, Verdict, format_error};
use recordpilot_config::AppConfig;
use recordpilot_core::error::Error;
use recordpilot_core::message::ConversationTurn;
use recordpilot_core::platform::{RecordStore, StoreConnector};
use recordpilot_platform::{PlatformClient, dashboard};

/// Error-level log entries returned by `/errors`.
const RECENT_ERRORS_LIMIT: u32 = 20;

/// Shared application state for the gateway.
pub struct GatewayState {
    pub agent: AdminAgent,
    pub interviewer: Interviewer,
    pub connector: Arc<dyn StoreConnector>,
    pub default_instance: Option<String>,
}

pub type SharedState = Arc<GatewayState>;

/// Build the Axum router with all gateway routes.
///
/// Layers applied:
/// - per-request id (`x-request-id`) attached to the tracing span
/// - permissive CORS for browser dashboards
/// - request body size limit (1 MB)
/// - HTTP trace logging
pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/admin_command", post(admin_command_handler))
        .route("/analyze_error", post(analyze_error_handler))
        .route("/start_interview", post(start_interview_handler))
        .route("/submit_answer", post(submit_answer_handler))
        .route("/instance_stats", get(instance_stats_handler))
        .route("/applications", get(applications_handler))
        .route("/errors", get(errors_handler))
        .route("/security_stats", get(security_stats_handler))
        .route("/integration_stats", get(integration_stats_handler))
        .with_state(state)
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(tower_http::trace::TraceLayer::new_for_http())
}

/// Start the gateway HTTP server.
pub async fn start(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.gateway.host, config.gateway.port);

    let provider = recordpilot_providers::build_from_config(&config)?;
    let connector: Arc<dyn StoreConnector> =
        Arc::new(PlatformClient::from_config(&config.platform)?);
    let interviewer = Interviewer::from_config(provider.clone(), &config);
    let agent = AdminAgent::from_config(&config, provider, connector.clone());

    let state = Arc::new(GatewayState {
        agent,
        interviewer,
        connector,
        default_instance: config.platform.default_instance.clone(),
    });

    let app = build_router(state);

    info!(addr = %addr, "Gateway listening");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

// --- Middleware ---

async fn request_id_middleware(req: Request, next: Next) -> Response {
    let request_id = uuid::Uuid::new_v4().to_string();
    let span = info_span!(
        "request",
        request_id = %request_id,
        method = %req.method(),
        path = %req.uri().path()
    );

    let mut response = next.run(req).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&request_id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

// --- Errors ---

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
}

/// A failed reasoning step, reported with its category.
fn agent_failure(e: Error) -> ApiError {
    warn!(category = e.category(), error = %e, "Request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: format_error(&e),
        }),
    )
}

/// A present, non-blank field.
fn required(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.trim().is_empty())
}

impl GatewayState {
    /// The request's instance, or the configured default.
    fn target_instance(&self, requested: Option<String>) -> Result<String, ApiError> {
        required(requested)
            .or_else(|| self.default_instance.clone())
            .ok_or_else(|| bad_request("No instance provided"))
    }

    fn store(&self, requested: Option<String>) -> Result<Arc<dyn RecordStore>, ApiError> {
        let instance = self.target_instance(requested)?;
        self.connector
            .connect(&instance)
            .map_err(|e| bad_request(e.to_string()))
    }
}

// --- Handlers ---

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

#[derive(Debug, Deserialize)]
struct AdminCommandRequest {
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    history: Vec<ConversationTurn>,
    #[serde(default)]
    instance: Option<String>,
}

#[derive(Debug, Serialize)]
struct AdminCommandResponse {
    result: String,
}

async fn admin_command_handler(
    State(state): State<SharedState>,
    Json(payload): Json<AdminCommandRequest>,
) -> Result<Json<AdminCommandResponse>, ApiError> {
    let command = required(payload.command).ok_or_else(|| bad_request("No command provided"))?;
    let instance = state.target_instance(payload.instance)?;

    info!(history_turns = payload.history.len(), "admin_command request");
    let result = state
        .agent
        .run_command(&command, &payload.history, &instance)
        .await;

    Ok(Json(AdminCommandResponse { result }))
}

#[derive(Debug, Deserialize)]
struct AnalyzeErrorRequest {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    instance: Option<String>,
}

#[derive(Debug, Serialize)]
struct AnalyzeErrorResponse {
    analysis: String,
}

async fn analyze_error_handler(
    State(state): State<SharedState>,
    Json(payload): Json<AnalyzeErrorRequest>,
) -> Result<Json<AnalyzeErrorResponse>, ApiError> {
    let message =
        required(payload.message).ok_or_else(|| bad_request("No error message provided"))?;
    let instance = state.target_instance(payload.instance)?;

    let analysis = state.agent.run_analysis(&message, &instance).await;
    Ok(Json(AnalyzeErrorResponse { analysis }))
}

#[derive(Debug, Deserialize)]
struct StartInterviewRequest {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    instance: Option<String>,
}

#[derive(Debug, Serialize)]
struct StartInterviewResponse {
    question: String,
}

async fn start_interview_handler(
    State(state): State<SharedState>,
    Json(payload): Json<StartInterviewRequest>,
) -> Result<Json<StartInterviewResponse>, ApiError> {
    let topic = required(payload.topic).ok_or_else(|| bad_request("Topic is required"))?;
    let store = state.store(payload.instance)?;

    let question = state
        .interviewer
        .ask_question(store.as_ref(), &topic)
        .await
        .map_err(agent_failure)?;
    Ok(Json(StartInterviewResponse { question }))
}

#[derive(Debug, Deserialize)]
struct SubmitAnswerRequest {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    question: Option<String>,
    #[serde(default)]
    answer: Option<String>,
}

#[derive(Debug, Serialize)]
struct SubmitAnswerResponse {
    grade: String,
    verdict: Verdict,
}

async fn submit_answer_handler(
    State(state): State<SharedState>,
    Json(payload): Json<SubmitAnswerRequest>,
) -> Result<Json<SubmitAnswerResponse>, ApiError> {
    let (Some(topic), Some(question), Some(answer)) = (
        required(payload.topic),
        required(payload.question),
        required(payload.answer),
    ) else {
        return Err(bad_request("Missing fields"));
    };

    let grade = state
        .interviewer
        .grade_answer(&topic, &question, &answer)
        .await
        .map_err(agent_failure)?;
    Ok(Json(SubmitAnswerResponse {
        grade: grade.render(),
        verdict: grade.verdict,
    }))
}

#[derive(Debug, Default, Deserialize)]
struct InstanceParam {
    instance: Option<String>,
}

async fn instance_stats_handler(
    State(state): State<SharedState>,
    Query(params): Query<InstanceParam>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store(params.instance)?;
    Ok(Json(dashboard::instance_stats(store.as_ref()).await))
}

async fn applications_handler(
    State(state): State<SharedState>,
    Query(params): Query<InstanceParam>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store(params.instance)?;
    Ok(Json(dashboard::applications(store.as_ref()).await))
}

async fn errors_handler(
    State(state): State<SharedState>,
    Query(params): Query<InstanceParam>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store(params.instance)?;
    Ok(Json(
        dashboard::recent_errors(store.as_ref(), RECENT_ERRORS_LIMIT).await,
    ))
}

async fn security_stats_handler(
    State(state): State<SharedState>,
    Query(params): Query<InstanceParam>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store(params.instance)?;
    Ok(Json(dashboard::security_stats(store.as_ref()).await))
}

async fn integration_stats_handler(
    State(state): State<SharedState>,
    Query(params): Query<InstanceParam>,
) -> Result<impl IntoResponse, ApiError> {
    let store = state.store(params.instance)?;
    let health = dashboard::integration_health(store.as_ref()).await;
    if health.ecc_errors > 0 {
        warn!(ecc_errors = health.ecc_errors, "Integration queue has errors today");
    }
    Ok(Json(health))
}
