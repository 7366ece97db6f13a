//! Structured HTTP error payloads, loosely after RFC 7807.

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ProblemDetails {
    pub title: String,
    pub status: u16,
    pub detail: String,
}

fn problem(status: StatusCode, detail: impl Into<String>) -> (StatusCode, Json<ProblemDetails>) {
    (
        status,
        Json(ProblemDetails {
            title: status
                .canonical_reason()
                .unwrap_or("Unknown Error")
                .to_string(),
            status: status.as_u16(),
            detail: detail.into(),
        }),
    )
}

pub fn bad_request(detail: impl Into<String>) -> (StatusCode, Json<ProblemDetails>) {
    problem(StatusCode::BAD_REQUEST, detail)
}

pub fn internal_error(detail: impl Into<String>) -> (StatusCode, Json<ProblemDetails>) {
    problem(StatusCode::INTERNAL_SERVER_ERROR, detail)
}

pub fn service_unavailable(detail: impl Into<String>) -> (StatusCode, Json<ProblemDetails>) {
    problem(StatusCode::SERVICE_UNAVAILABLE, detail)
}
