use axum::Json;
use axum::extract::State;

use crate::api::HealthResponse;
use crate::build_info;
use crate::server::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        message: "Domain Q&A Agent API is running".to_string(),
        status: "healthy".to_string(),
        version: build_info::VERSION.to_string(),
        active_sessions: state.sessions.len(),
    })
}
