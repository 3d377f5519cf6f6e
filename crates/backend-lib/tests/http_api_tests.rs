// ==============================
// tests/http_api_tests.rs
// ==============================
//! Router tests driven through `tower::ServiceExt::oneshot`.
mod common;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use backend_lib::{api::create_router, storage::InMemoryStore, AppState};
use common::{memory_state, send, send_json, test_settings};
use serde_json::{json, Value};

async fn app() -> Router {
    create_router(memory_state().await)
}

async fn login_token(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/login",
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = send_json(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok", "activeSessions": 0 }));
}

#[tokio::test]
async fn test_register_returns_created() {
    let app = app().await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/register",
        Some(json!({ "email": "newuser@example.com", "password": "newpass123" })),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Registration successful");
    assert_eq!(body["user"]["id"], 3);
    assert_eq!(body["user"]["email"], "newuser@example.com");
    assert!(body["user"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_errors() {
    let app = app().await;

    let cases = [
        (
            json!({ "email": "bad@x", "password": "password123" }),
            StatusCode::BAD_REQUEST,
            "Invalid email format",
            "VAL_001",
        ),
        (
            json!({ "email": "ok@example.com", "password": "12345" }),
            StatusCode::BAD_REQUEST,
            "Password must be at least 6 characters",
            "VAL_001",
        ),
        (
            json!({ "password": "password123" }),
            StatusCode::BAD_REQUEST,
            "Invalid email format",
            "VAL_001",
        ),
        (
            json!({ "email": "user@example.com", "password": "password123" }),
            StatusCode::CONFLICT,
            "Email already registered",
            "CONFLICT_001",
        ),
    ];

    for (request, expected_status, expected_message, expected_code) in cases {
        let (status, body) = send_json(&app, "POST", "/api/register", Some(request.clone())).await;
        assert_eq!(status, expected_status, "request: {request}");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], expected_message);
        assert_eq!(body["code"], expected_code);
    }
}

#[tokio::test]
async fn test_login_success_shape() {
    let app = app().await;
    let (status, body) = send_json(
        &app,
        "POST",
        "/api/login",
        Some(json!({ "email": "user@example.com", "password": "password123" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Login successful");
    assert_eq!(body["token"].as_str().unwrap().len(), 43);
    assert_eq!(body["user"], json!({ "id": 1, "email": "user@example.com" }));
}

#[tokio::test]
async fn test_login_errors() {
    let app = app().await;

    let cases = [
        (
            json!({ "email": "user@example.com" }),
            StatusCode::BAD_REQUEST,
            "Email and password are required",
        ),
        (
            json!({ "email": "bad@x", "password": "password123" }),
            StatusCode::BAD_REQUEST,
            "Invalid email format",
        ),
        (
            json!({ "email": "nobody@example.com", "password": "password123" }),
            StatusCode::UNAUTHORIZED,
            "User not found",
        ),
        (
            json!({ "email": "user@example.com", "password": "wrongpassword" }),
            StatusCode::UNAUTHORIZED,
            "Invalid password",
        ),
    ];

    for (request, expected_status, expected_message) in cases {
        let (status, body) = send_json(&app, "POST", "/api/login", Some(request.clone())).await;
        assert_eq!(status, expected_status, "request: {request}");
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], expected_message);
        assert!(body.get("token").is_none());
    }
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app().await;

    let request = Request::builder()
        .method("POST")
        .uri("/api/login")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request body");

    // wrong content type
    let request = Request::builder()
        .method("POST")
        .uri("/api/register")
        .body(Body::from(r#"{"email":"a@b.c","password":"123456"}"#))
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VAL_001");
}

#[tokio::test]
async fn test_verify_and_user_info() {
    let app = app().await;
    let token = login_token(&app, "admin@example.com", "admin123").await;

    let (status, body) =
        send_json(&app, "POST", "/api/verify", Some(json!({ "token": token }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Token is valid");
    assert_eq!(body["user"], json!({ "userId": 2, "email": "admin@example.com" }));

    let (status, body) = send_json(&app, "GET", &format!("/api/user/{token}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["user"]["userId"], 2);
    assert_eq!(body["user"]["email"], "admin@example.com");
    let parse = |field: &str| {
        chrono::DateTime::parse_from_rfc3339(body["user"][field].as_str().unwrap()).unwrap()
    };
    assert_eq!(parse("expiresAt") - parse("loginTime"), chrono::TimeDelta::hours(24));
}

#[tokio::test]
async fn test_unknown_token() {
    let app = app().await;

    for request in [json!({ "token": "not-a-real-token" }), json!({})] {
        let (status, body) = send_json(&app, "POST", "/api/verify", Some(request)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid token");
        assert_eq!(body["code"], "AUTH_002");
    }

    let (status, body) = send_json(&app, "GET", "/api/user/not-a-real-token", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");

    let (status, body) =
        send_json(&app, "POST", "/api/logout", Some(json!({ "token": "nope" }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid session");
}

#[tokio::test]
async fn test_logout_revokes_token() {
    let app = app().await;
    let token = login_token(&app, "user@example.com", "password123").await;

    let (_, health) = send_json(&app, "GET", "/health", None).await;
    assert_eq!(health["activeSessions"], 1);

    let (status, body) =
        send_json(&app, "POST", "/api/logout", Some(json!({ "token": token }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "message": "Logout successful" }));

    let (status, _) = send_json(&app, "POST", "/api/verify", Some(json!({ "token": token }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send_json(&app, "POST", "/api/logout", Some(json!({ "token": token }))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (_, health) = send_json(&app, "GET", "/health", None).await;
    assert_eq!(health["activeSessions"], 0);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    let mut settings = test_settings();
    settings.session.ttl_secs = 1;
    let state = AppState::with_store(Arc::new(InMemoryStore::new()), settings).await.unwrap();
    let app = create_router(state);

    let token = login_token(&app, "user@example.com", "password123").await;
    let (status, _) = send_json(&app, "POST", "/api/verify", Some(json!({ "token": token }))).await;
    assert_eq!(status, StatusCode::OK);

    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;

    let (status, body): (StatusCode, Value) =
        send_json(&app, "GET", &format!("/api/user/{token}"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid token");
}

#[tokio::test]
async fn test_registered_user_can_log_in_over_http() {
    let app = app().await;
    let (status, _) = send_json(
        &app,
        "POST",
        "/api/register",
        Some(json!({ "email": "Fresh@Example.com", "password": "freshpass" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let token = login_token(&app, "fresh@example.com", "freshpass").await;
    let (_, body) = send_json(&app, "POST", "/api/verify", Some(json!({ "token": token }))).await;
    assert_eq!(body["user"]["email"], "Fresh@Example.com");
}

#[tokio::test]
async fn test_unknown_route() {
    let app = app().await;
    let (status, _) = send_json(&app, "GET", "/api/nothing-here", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
