//! SSO Authentication Service
//!
//! Issues identity tokens for multiple client apps sharing one credential
//! store:
//! - User registration with Argon2id password hashing
//! - Login issuing a JWT signed with the requesting app's own secret
//! - Administrator flag lookup
//! - Token validation against the app named in the token
//!
//! # Configuration
//!
//! The binary loads configuration from environment variables:
//! - `DATABASE_URL` - PostgreSQL connection string (required)
//! - `TOKEN_TTL` - Token lifetime in seconds (default: 3600)
//! - `HTTP_PORT` - Listen port (default: 8080)
//! - `REQUEST_TIMEOUT` - Per-request timeout in seconds (default: 5)
//! - `APP_ENV` - `local` or `prod`; `prod` logs JSON (default: "local")
//!
//! # Usage
//!
//! ```rust,ignore
//! use sso_auth::{AuthConfig, AuthService, LoginRequest, PgStorage};
//!
//! let storage = Arc::new(PgStorage::new(pool));
//! storage.migrate().await?;
//!
//! let auth = AuthService::new(
//!     tracing::info_span!("sso"),
//!     storage.clone(),
//!     storage.clone(),
//!     storage,
//!     &config,
//! )?;
//! let token = auth.login(&LoginRequest::new("a@x.com", "Passw0rd", 7)).await?;
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod password;
pub mod service;
pub mod storage;
pub mod token;

// Re-export commonly used types
pub use config::AuthConfig;
pub use error::AuthError;
pub use handlers::{create_routes, AuthState};
pub use models::*;
pub use password::Argon2Hasher;
pub use service::AuthService;
pub use storage::{AppProvider, MemoryStorage, PgStorage, StorageError, UserProvider, UserSaver};
