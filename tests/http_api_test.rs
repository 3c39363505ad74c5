//! HTTP API tests driving the router with `oneshot`

use sso_auth::*;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

async fn test_router() -> Router {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .add_app(App {
            id: 7,
            name: "web".into(),
            secret: "s3cret".into(),
        })
        .await;

    let config = AuthConfig {
        argon2_memory_cost: 1024,
        argon2_time_cost: 1,
        argon2_parallelism: 1,
        ..AuthConfig::default()
    };

    let auth = AuthService::new(
        tracing::Span::none(),
        storage.clone(),
        storage.clone(),
        storage,
        &config,
    )
    .unwrap();

    create_routes(Arc::new(auth))
}

async fn send<T: DeserializeOwned>(
    app: &Router,
    method: Method,
    path: &str,
    body: Option<Value>,
) -> (StatusCode, T) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, serde_json::from_slice(&body_bytes).unwrap())
}

#[tokio::test]
async fn register_login_validate_roundtrip() {
    let app = test_router().await;

    let (status, registered): (_, RegisterResponse) = send(
        &app,
        Method::POST,
        "/auth/register",
        Some(json!({ "email": "a@x.com", "password": "Passw0rd" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered.user_id, 1);

    let (status, login): (_, LoginResponse) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({ "email": "a@x.com", "password": "Passw0rd", "app_id": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, claims): (_, TokenClaims) = send(
        &app,
        Method::POST,
        "/auth/validate",
        Some(json!({ "token": login.token })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(claims.uid, 1);
    assert_eq!(claims.email, "a@x.com");
    assert_eq!(claims.app_id, 7);
}

#[tokio::test]
async fn invalid_input_is_bad_request() {
    let app = test_router().await;

    let (status, body): (_, Value) = send(
        &app,
        Method::POST,
        "/auth/register",
        Some(json!({ "email": "not-an-email", "password": "Passw0rd" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_argument");

    let (status, _): (_, Value) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({ "email": "a@x.com", "password": "Passw0rd", "app_id": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn login_failures_map_to_distinct_codes() {
    let app = test_router().await;
    let (status, _): (_, Value) = send(
        &app,
        Method::POST,
        "/auth/register",
        Some(json!({ "email": "a@x.com", "password": "Passw0rd" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body): (_, Value) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({ "email": "a@x.com", "password": "nope", "app_id": 7 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_credentials");

    let (status, body): (_, Value) = send(
        &app,
        Method::POST,
        "/auth/login",
        Some(json!({ "email": "a@x.com", "password": "Passw0rd", "app_id": 99 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "app_not_found");

    let (status, body): (_, Value) = send(
        &app,
        Method::POST,
        "/auth/register",
        Some(json!({ "email": "a@x.com", "password": "Passw0rd" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "user_exists");
}

#[tokio::test]
async fn is_admin_endpoint() {
    let app = test_router().await;
    let (_, registered): (_, RegisterResponse) = send(
        &app,
        Method::POST,
        "/auth/register",
        Some(json!({ "email": "a@x.com", "password": "Passw0rd" })),
    )
    .await;

    let (status, body): (_, IsAdminResponse) = send(
        &app,
        Method::GET,
        &format!("/auth/users/{}/admin", registered.user_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.is_admin);

    let (status, body): (_, Value) = send(&app, Method::GET, "/auth/users/0/admin", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_argument");

    let (status, body): (_, Value) =
        send(&app, Method::GET, "/auth/users/404/admin", None).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An internal error occurred");
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let app = test_router().await;

    let (status, body): (_, Value) = send(
        &app,
        Method::POST,
        "/auth/validate",
        Some(json!({ "token": "not.a.jwt" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");
}
