//! Authentication HTTP Handlers
//!
//! JSON endpoints over the authentication service. Input validation and
//! error classification live in the service; handlers only translate.

use crate::error::AuthError;
use crate::models::*;
use crate::service::AuthService;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

/// Shared auth service state
pub type AuthState = Arc<AuthService>;

/// Create authentication routes
pub fn create_routes(auth_service: Arc<AuthService>) -> Router {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/validate", post(validate_token))
        .route("/auth/users/:user_id/admin", get(is_admin))
        .with_state(auth_service)
}

/// POST /auth/register
pub async fn register(
    State(auth): State<AuthState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let user_id = auth.register_new_user(&req).await?;

    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id })))
}

/// POST /auth/login
///
/// Returns a token signed for the requested app
pub async fn login(
    State(auth): State<AuthState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let token = auth.login(&req).await?;

    Ok(Json(LoginResponse { token }))
}

/// GET /auth/users/:user_id/admin
pub async fn is_admin(
    State(auth): State<AuthState>,
    Path(user_id): Path<i64>,
) -> Result<impl IntoResponse, AuthError> {
    let is_admin = auth.is_admin(user_id).await?;

    Ok(Json(IsAdminResponse { is_admin }))
}

/// POST /auth/validate
pub async fn validate_token(
    State(auth): State<AuthState>,
    Json(req): Json<ValidateTokenRequest>,
) -> Result<impl IntoResponse, AuthError> {
    let claims = auth.validate_token(&req).await?;

    Ok(Json(claims))
}
