//! HTTP routes.

use crate::core::MeetingRequest;
use crate::server::error::ApiError;
use crate::server::state::AppState;
use crate::tools::ToolInfo;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::time::Instant;

/// Start time for uptime calculation.
static START_TIME: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Initialize the start time.
pub fn init_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Outcome of a meeting prep or tool run.
///
/// Failures inside the run are reported in the body with a 200 status;
/// only malformed requests and unknown tools map to HTTP errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RunResponse {
    Success { result: String },
    Error { message: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolRequest {
    pub input: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub search_configured: bool,
}

/// Creates the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/run-meeting-prep", post(run_meeting_prep))
        .route("/tools", get(list_tools))
        .route("/tools/:name", post(run_tool))
        .route("/health", get(health_check))
        .with_state(state)
}

async fn run_meeting_prep(
    State(state): State<AppState>,
    payload: Result<Json<MeetingRequest>, JsonRejection>,
) -> Result<Json<RunResponse>, ApiError> {
    let Json(request) = payload?;

    match state.engine.run(&request).await {
        Ok(result) => Ok(Json(RunResponse::Success { result })),
        Err(e) => {
            tracing::error!(
                "❌ Meeting prep failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            Ok(Json(RunResponse::Error {
                message: e.to_string(),
            }))
        }
    }
}

async fn list_tools(State(state): State<AppState>) -> Json<Vec<ToolInfo>> {
    Json(state.tools.list())
}

async fn run_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<ToolRequest>, JsonRejection>,
) -> Result<Json<RunResponse>, ApiError> {
    let tool = state
        .tools
        .get(&name)
        .ok_or_else(|| ApiError::NotFound(format!("tool '{}'", name)))?;
    let Json(request) = payload?;

    tracing::info!("🛠️ Running tool: {}", name);
    match tool.run(&request.input).await {
        Ok(result) => Ok(Json(RunResponse::Success { result })),
        Err(e) => {
            tracing::warn!("⚠️ Tool {} failed: {}", name, e);
            Ok(Json(RunResponse::Error {
                message: e.to_string(),
            }))
        }
    }
}

async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let uptime = START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0);

    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: uptime,
        search_configured: state.search_configured,
    })
}
