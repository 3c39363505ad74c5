//! Authentication Models
//!
//! Data structures for stored entities, token claims, and request/response DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use validator::Validate;

// ============================================
// Stored Entities
// ============================================

/// User record from the credential store
#[derive(Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub email: String,
    /// Argon2 PHC string, never the plaintext
    #[serde(skip_serializing)]
    pub pass_hash: String,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Client application permitted to request tokens for its users
#[derive(Clone, Serialize, Deserialize, FromRow)]
pub struct App {
    pub id: i64,
    pub name: String,
    /// HMAC key for tokens issued to this app
    #[serde(skip_serializing)]
    pub secret: String,
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// ============================================
// JWT Claims
// ============================================

/// Claims embedded in every issued token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// User ID
    pub uid: i64,
    /// User email
    pub email: String,
    /// App the token was issued for
    pub app_id: i64,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

// ============================================
// Request DTOs
// ============================================

/// Login request
#[derive(Clone, Deserialize, Serialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,

    /// Must be non-zero
    pub app_id: i64,
}

impl LoginRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>, app_id: i64) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            app_id,
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("app_id", &self.app_id)
            .finish()
    }
}

/// Registration request
#[derive(Clone, Deserialize, Serialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

impl RegisterRequest {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Token validation request
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ValidateTokenRequest {
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
}

// ============================================
// Response DTOs
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterResponse {
    pub user_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IsAdminResponse {
    pub is_admin: bool,
}
