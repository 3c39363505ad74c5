//! Service Configuration
//!
//! All configuration values are loaded from environment variables.
//! No hardcoded secrets or connection strings.

use crate::error::AuthError;
use std::env;

/// Service configuration loaded from environment
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Deployment environment, `local` or `prod` (from APP_ENV env var)
    pub env: String,

    /// PostgreSQL connection string (from DATABASE_URL env var)
    pub database_url: String,

    /// Connection pool size (from DATABASE_MAX_CONNECTIONS env var)
    pub database_max_connections: u32,

    /// HTTP listen port (from HTTP_PORT env var)
    pub http_port: u16,

    /// Per-request timeout in seconds (from REQUEST_TIMEOUT env var)
    pub request_timeout: u64,

    /// Issued token lifetime in seconds (from TOKEN_TTL env var)
    pub token_ttl: i64,

    /// Argon2 memory cost in KiB (from ARGON2_MEMORY_COST env var)
    pub argon2_memory_cost: u32,

    /// Argon2 time cost (iterations) (from ARGON2_TIME_COST env var)
    pub argon2_time_cost: u32,

    /// Argon2 parallelism (from ARGON2_PARALLELISM env var)
    pub argon2_parallelism: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            env: "local".to_string(),
            database_url: String::new(),
            database_max_connections: 5,
            http_port: 8080,
            request_timeout: 5,
            token_ttl: 3600, // 1 hour
            argon2_memory_cost: 65536, // 64 MiB
            argon2_time_cost: 3,
            argon2_parallelism: 4,
        }
    }
}

impl AuthConfig {
    /// Load configuration from environment variables
    ///
    /// Unparseable numeric values fall back to their defaults.
    pub fn from_env() -> Result<Self, AuthError> {
        let defaults = Self::default();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AuthError::Config("DATABASE_URL must be set".to_string()))?;

        Ok(Self {
            env: env::var("APP_ENV").unwrap_or(defaults.env),

            database_url,

            database_max_connections: env::var("DATABASE_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.database_max_connections),

            http_port: env::var("HTTP_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.http_port),

            request_timeout: env::var("REQUEST_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.request_timeout),

            token_ttl: env::var("TOKEN_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.token_ttl),

            argon2_memory_cost: env::var("ARGON2_MEMORY_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.argon2_memory_cost),

            argon2_time_cost: env::var("ARGON2_TIME_COST")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.argon2_time_cost),

            argon2_parallelism: env::var("ARGON2_PARALLELISM")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.argon2_parallelism),
        })
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), AuthError> {
        if self.token_ttl <= 0 {
            return Err(AuthError::Config("TOKEN_TTL must be positive".to_string()));
        }

        self.token_ttl()?;

        if self.request_timeout == 0 {
            return Err(AuthError::Config(
                "REQUEST_TIMEOUT must be positive".to_string(),
            ));
        }

        if self.database_max_connections == 0 {
            return Err(AuthError::Config(
                "DATABASE_MAX_CONNECTIONS must be positive".to_string(),
            ));
        }

        if self.argon2_parallelism == 0 {
            return Err(AuthError::Config(
                "ARGON2_PARALLELISM must be positive".to_string(),
            ));
        }

        if self.argon2_memory_cost < 8 * self.argon2_parallelism {
            return Err(AuthError::Config(
                "ARGON2_MEMORY_COST must be at least 8 KiB per lane".to_string(),
            ));
        }

        Ok(())
    }

    /// Structured JSON logs are emitted in production
    pub fn is_production(&self) -> bool {
        self.env == "prod"
    }

    pub fn token_ttl(&self) -> Result<chrono::Duration, AuthError> {
        chrono::Duration::try_seconds(self.token_ttl)
            .ok_or_else(|| AuthError::Config("TOKEN_TTL is out of range".to_string()))
    }

    pub fn request_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.request_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let config = AuthConfig {
            database_url: "postgres://localhost/sso".to_string(),
            ..AuthConfig::default()
        };

        assert!(config.validate().is_ok());
        assert!(!config.is_production());
        assert_eq!(config.token_ttl().unwrap().num_seconds(), 3600);
    }

    #[test]
    fn test_config_validation_non_positive_ttl() {
        let config = AuthConfig {
            token_ttl: 0,
            ..AuthConfig::default()
        };

        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
    }

    #[test]
    fn test_config_validation_ttl_out_of_range() {
        let config = AuthConfig {
            token_ttl: i64::MAX,
            ..AuthConfig::default()
        };

        assert!(matches!(config.validate(), Err(AuthError::Config(_))));
        assert!(matches!(config.token_ttl(), Err(AuthError::Config(_))));
    }

    #[test]
    fn test_config_validation_argon2_memory_too_small() {
        let config = AuthConfig {
            argon2_memory_cost: 16,
            argon2_parallelism: 4,
            ..AuthConfig::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_zero_timeout() {
        let config = AuthConfig {
            request_timeout: 0,
            ..AuthConfig::default()
        };

        assert!(config.validate().is_err());
    }
}
