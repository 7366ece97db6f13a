//! Chat and reset handlers: session resolution and delegation to the agent.

use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{error, info};

use crate::api::{ChatRequest, ChatResponse, ResetResponse};
use crate::handlers::problem_details;
use crate::server::AppState;
use crate::session::{SESSION_COOKIE, SESSION_MAX_AGE_SECS, ensure_token};

/// POST /chat
pub async fn chat(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(req): Json<ChatRequest>,
) -> Response {
    let (token, is_new) = ensure_token(presented_token(&jar));

    let agent = match state.sessions.resolve(&token) {
        Ok(agent) => agent,
        Err(e) => return problem_details::service_unavailable(e.to_string()).into_response(),
    };

    if req.reset_memory {
        agent.reset().await;
        info!(session_id = %token, "Memory reset requested");
    }

    let response_text = match agent.respond(&req.message).await {
        Ok(text) => text,
        Err(e) => {
            error!(session_id = %token, error = %e, "Agent request failed");
            return problem_details::internal_error(e.to_string()).into_response();
        }
    };

    info!(session_id = %token, "Processed chat request");

    let body = Json(ChatResponse {
        response: response_text,
        status: "success".to_string(),
        session_id: token.clone(),
    });

    if is_new {
        (jar.add(session_cookie(token)), body).into_response()
    } else {
        body.into_response()
    }
}

/// POST /reset
pub async fn reset(State(state): State<AppState>, jar: CookieJar) -> Response {
    let Some(token) = presented_token(&jar).map(str::to_string) else {
        return problem_details::bad_request("no active session").into_response();
    };

    // Lazy creation matches /chat: resetting an unseen token yields a fresh
    // (already empty) session rather than an error.
    let agent = match state.sessions.resolve(&token) {
        Ok(agent) => agent,
        Err(e) => return problem_details::service_unavailable(e.to_string()).into_response(),
    };

    agent.reset().await;
    info!(session_id = %token, "Memory reset via endpoint");

    Json(ResetResponse {
        message: "Conversation memory has been reset".to_string(),
        status: "success".to_string(),
    })
    .into_response()
}

// ============================================================================
// Cookie Helpers
// ============================================================================

fn presented_token(jar: &CookieJar) -> Option<&str> {
    jar.get(SESSION_COOKIE)
        .map(|c| c.value())
        .filter(|v| !v.is_empty())
}

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(SESSION_MAX_AGE_SECS))
        .build()
}
