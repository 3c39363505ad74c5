//! Credential store and app registry contracts
//!
//! Any persistence backend can sit behind the service as long as it returns
//! the not-found and conflict sentinels below instead of a generic failure.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStorage;
pub use postgres::PgStorage;

use crate::models::{App, User};
use async_trait::async_trait;

/// Storage failures, with sentinels for the cases the service classifies
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("user not found")]
    UserNotFound,

    #[error("user already exists")]
    UserExists,

    #[error("app not found")]
    AppNotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserSaver: Send + Sync {
    /// Insert a user and return its assigned id.
    ///
    /// Two concurrent saves of the same email must not both succeed; the loser
    /// gets `StorageError::UserExists`.
    async fn save_user(&self, email: &str, pass_hash: &str) -> Result<i64, StorageError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProvider: Send + Sync {
    async fn user_by_email(&self, email: &str) -> Result<User, StorageError>;
    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AppProvider: Send + Sync {
    async fn app(&self, app_id: i64) -> Result<App, StorageError>;
}
