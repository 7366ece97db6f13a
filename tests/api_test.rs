//! Integration tests for the HTTP API.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use http_body_util::BodyExt;
use tower::ServiceExt;

mod common;

use common::test_app;

// ============================================================================
// Helpers
// ============================================================================

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn chat_request(body: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/chat").header("content-type", "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Extract the session cookie pair ("session_id=<token>") from a response.
fn session_cookie(response: &Response<Body>) -> Option<String> {
    let set_cookie = response.headers().get(header::SET_COOKIE)?;
    let value = set_cookie.to_str().unwrap();
    assert!(value.starts_with("session_id="));
    Some(value.split(';').next().unwrap().to_string())
}

async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn test_health() {
    let (app, _) = test_app();

    let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["active_sessions"], 0);
    assert!(!json["version"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_health_counts_sessions() {
    let (app, sessions) = test_app();

    send(&app, chat_request(r#"{"message": "hello"}"#, None)).await;
    assert_eq!(sessions.len(), 1);

    let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    let json = body_json(response).await;
    assert_eq!(json["active_sessions"], 1);
}

// ============================================================================
// Chat
// ============================================================================

#[tokio::test]
async fn test_chat_without_cookie_mints_session() {
    let (app, sessions) = test_app();

    let response = send(&app, chat_request(r#"{"message": "hello"}"#, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = session_cookie(&response).expect("new session must set a cookie");
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Secure"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Max-Age=3600"));

    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["response"], "echo 1: hello");

    let session_id = json["session_id"].as_str().unwrap();
    assert!(!session_id.is_empty());
    assert_eq!(cookie, format!("session_id={session_id}"));
    assert_eq!(sessions.len(), 1);
}

#[tokio::test]
async fn test_chat_with_cookie_reuses_session() {
    let (app, sessions) = test_app();

    let first = send(&app, chat_request(r#"{"message": "hello"}"#, None)).await;
    let cookie = session_cookie(&first).unwrap();
    let first_id = body_json(first).await["session_id"]
        .as_str()
        .unwrap()
        .to_string();

    let second = send(
        &app,
        chat_request(r#"{"message": "hi again"}"#, Some(&cookie)),
    )
    .await;
    assert_eq!(second.status(), StatusCode::OK);

    // Established sessions get no fresh cookie.
    assert!(second.headers().get(header::SET_COOKIE).is_none());

    let json = body_json(second).await;
    assert_eq!(json["session_id"], first_id.as_str());
    assert_eq!(json["response"], "echo 2: hi again");
    assert_eq!(sessions.len(), 1);
}

#[tokio::test]
async fn test_distinct_clients_get_distinct_sessions() {
    let (app, sessions) = test_app();

    let a = send(&app, chat_request(r#"{"message": "a"}"#, None)).await;
    let b = send(&app, chat_request(r#"{"message": "b"}"#, None)).await;

    let id_a = body_json(a).await["session_id"].as_str().unwrap().to_string();
    let id_b = body_json(b).await["session_id"].as_str().unwrap().to_string();

    assert_ne!(id_a, id_b);
    assert_eq!(sessions.len(), 2);
}

#[tokio::test]
async fn test_reset_memory_clears_only_own_session() {
    let (app, _) = test_app();

    // Two independent sessions, one turn each.
    let first = send(&app, chat_request(r#"{"message": "hello"}"#, None)).await;
    let cookie_a = session_cookie(&first).unwrap();
    let other = send(&app, chat_request(r#"{"message": "hey"}"#, None)).await;
    let cookie_b = session_cookie(&other).unwrap();

    // reset_memory clears session A before processing its second message.
    let response = send(
        &app,
        chat_request(
            r#"{"message": "hi again", "reset_memory": true}"#,
            Some(&cookie_a),
        ),
    )
    .await;
    let json = body_json(response).await;
    assert_eq!(json["response"], "echo 1: hi again");

    // Session B's memory is untouched.
    let response = send(&app, chat_request(r#"{"message": "still here"}"#, Some(&cookie_b))).await;
    let json = body_json(response).await;
    assert_eq!(json["response"], "echo 2: still here");
}

#[tokio::test]
async fn test_chat_after_clear_all_is_unavailable() {
    let (app, sessions) = test_app();

    sessions.clear_all();

    let response = send(&app, chat_request(r#"{"message": "hello"}"#, None)).await;
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

    let json = body_json(response).await;
    assert_eq!(json["status"], 503);
    assert!(json["detail"].as_str().unwrap().contains("not initialized"));

    // Health still answers, reporting zero sessions.
    let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["active_sessions"], 0);
}

// ============================================================================
// Reset
// ============================================================================

#[tokio::test]
async fn test_reset_without_cookie_is_bad_request() {
    let (app, sessions) = test_app();

    let response = send(&app, Request::post("/reset").body(Body::empty()).unwrap()).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["status"], 400);
    assert!(json["detail"].as_str().unwrap().contains("no active session"));

    // No session was created as a side effect.
    assert_eq!(sessions.len(), 0);
}

#[tokio::test]
async fn test_reset_clears_session_memory() {
    let (app, _) = test_app();

    let first = send(&app, chat_request(r#"{"message": "hello"}"#, None)).await;
    let cookie = session_cookie(&first).unwrap();

    let response = send(
        &app,
        Request::post("/reset")
            .header(header::COOKIE, &cookie)
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "success");
    assert_eq!(json["message"], "Conversation memory has been reset");

    // Memory starts over on the next turn.
    let response = send(&app, chat_request(r#"{"message": "fresh"}"#, Some(&cookie))).await;
    assert_eq!(body_json(response).await["response"], "echo 1: fresh");
}

#[tokio::test]
async fn test_reset_with_unseen_token_creates_session() {
    let (app, sessions) = test_app();

    let response = send(
        &app,
        Request::post("/reset")
            .header(header::COOKIE, "session_id=brand-new")
            .body(Body::empty())
            .unwrap(),
    )
    .await;

    // Lazy creation matches /chat.
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(sessions.len(), 1);
}
