//! PostgreSQL storage backend

use super::{AppProvider, StorageError, UserProvider, UserSaver};
use crate::models::{App, User};

use async_trait::async_trait;
use sqlx::PgPool;

/// Credential store and app registry backed by PostgreSQL
#[derive(Clone)]
pub struct PgStorage {
    pool: PgPool,
}

impl PgStorage {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the users and apps tables if they do not exist yet
    pub async fn migrate(&self) -> Result<(), StorageError> {
        tracing::info!("Running storage migrations");

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id BIGSERIAL PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                pass_hash TEXT NOT NULL,
                is_admin BOOLEAN NOT NULL DEFAULT FALSE
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS apps (
                id BIGINT PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                secret TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Storage migrations completed successfully");
        Ok(())
    }
}

#[async_trait]
impl UserSaver for PgStorage {
    async fn save_user(&self, email: &str, pass_hash: &str) -> Result<i64, StorageError> {
        let id: i64 =
            sqlx::query_scalar("INSERT INTO users (email, pass_hash) VALUES ($1, $2) RETURNING id")
                .bind(email)
                .bind(pass_hash)
                .fetch_one(&self.pool)
                .await
                .map_err(|err| match err {
                    sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                        StorageError::UserExists
                    }
                    other => StorageError::Database(other),
                })?;

        Ok(id)
    }
}

#[async_trait]
impl UserProvider for PgStorage {
    async fn user_by_email(&self, email: &str) -> Result<User, StorageError> {
        sqlx::query_as::<_, User>("SELECT id, email, pass_hash FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::UserNotFound)
    }

    async fn is_admin(&self, user_id: i64) -> Result<bool, StorageError> {
        sqlx::query_scalar::<_, bool>("SELECT is_admin FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::UserNotFound)
    }
}

#[async_trait]
impl AppProvider for PgStorage {
    async fn app(&self, app_id: i64) -> Result<App, StorageError> {
        sqlx::query_as::<_, App>("SELECT id, name, secret FROM apps WHERE id = $1")
            .bind(app_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(StorageError::AppNotFound)
    }
}
