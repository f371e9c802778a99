//! HTTP request handlers

use super::types::{
    CreateSessionRequest, CreateSessionResponse, DeleteResponse, ErrorResponse, HealthResponse,
    MessageRequest, MessageResponse, ResetResponse, ScenarioSetupRequest, ScenarioSetupResponse,
};
use super::AppState;
use crate::config::ConfigError;
use crate::engine::{DonationContext, MetricsReport, SessionSnapshot, Variant};
use crate::session::SessionError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        // Session lifecycle
        .route("/api/session/create", post(create_session))
        .route("/api/session/message", post(process_message))
        .route("/api/session/:id/metrics", get(get_metrics))
        .route("/api/session/:id/export", get(export_session))
        .route("/api/session/:id/reset", post(reset_session))
        .route("/api/session/:id", delete(delete_session))
        // Campaign form
        .route("/api/scenario/setup", post(setup_scenario))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        active_sessions: state.sessions.len().await,
    })
}

// ============================================================
// Sessions
// ============================================================

async fn create_session(
    State(state): State<AppState>,
    Json(req): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, AppError> {
    let variant: Variant = req.condition.parse()?;
    if req.donation_context.organization.trim().is_empty() {
        return Err(AppError::BadRequest(
            "donation_context.organization must not be empty".to_string(),
        ));
    }

    let (session_id, opening_message) = state
        .sessions
        .create(variant, req.donation_context)
        .await;

    Ok(Json(CreateSessionResponse {
        session_id,
        opening_message,
        condition: variant,
    }))
}

async fn process_message(
    State(state): State<AppState>,
    Json(req): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let handle = state.sessions.get(&req.session_id).await?;
    let mut session = handle.lock().await;

    let result = session
        .orchestrator
        .process(&req.message, state.generator.as_ref())
        .await;
    let history = session.orchestrator.transcript().to_vec();

    Ok(Json(MessageResponse { result, history }))
}

async fn get_metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MetricsReport>, AppError> {
    let handle = state.sessions.get(&id).await?;
    let session = handle.lock().await;
    Ok(Json(session.orchestrator.metrics_report()))
}

async fn export_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SessionSnapshot>, AppError> {
    let handle = state.sessions.get(&id).await?;
    let session = handle.lock().await;
    Ok(Json(session.snapshot()))
}

async fn reset_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResetResponse>, AppError> {
    let opening_message = state.sessions.reset(&id).await?;
    Ok(Json(ResetResponse {
        session_id: id,
        opening_message,
        message: "Session reset".to_string(),
    }))
}

async fn delete_session(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DeleteResponse>, AppError> {
    let snapshot = state.sessions.remove(&id).await?;
    Ok(Json(DeleteResponse {
        message: "Session deleted".to_string(),
        snapshot,
    }))
}

async fn setup_scenario(Json(req): Json<ScenarioSetupRequest>) -> Json<ScenarioSetupResponse> {
    Json(ScenarioSetupResponse {
        donation_context: DonationContext {
            organization: req.organization,
            cause: req.cause,
            amounts: req.amounts,
            impact: req.impact,
        },
    })
}

// ============================================================
// Error Handling
// ============================================================

#[derive(Debug)]
enum AppError {
    BadRequest(String),
    NotFound(String),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AppError::NotFound(err.to_string()),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}
