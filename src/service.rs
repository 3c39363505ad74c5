//! Authentication Service
//!
//! Credential verification, registration, admin lookup, and per-app token
//! issuance. Holds no per-call state; every operation is a single request to
//! the stores followed by a response or one classified error.

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::models::*;
use crate::password::Argon2Hasher;
use crate::storage::{AppProvider, StorageError, UserProvider, UserSaver};
use crate::token;

use chrono::Duration;
use std::sync::Arc;
use tracing::{info_span, Instrument, Span};
use validator::Validate;

/// Ids are assigned from 1; zero means the caller left the field unset.
const EMPTY_ID: i64 = 0;

/// Authentication service
pub struct AuthService {
    log: Span,
    user_saver: Arc<dyn UserSaver>,
    user_provider: Arc<dyn UserProvider>,
    app_provider: Arc<dyn AppProvider>,
    hasher: Argon2Hasher,
    /// Verified against when the email is unknown, so both login failures cost one hash
    dummy_hash: String,
    token_ttl: Duration,
}

impl AuthService {
    /// Create a new authentication service
    ///
    /// Every operation logs inside a child span of `log`.
    pub fn new(
        log: Span,
        user_saver: Arc<dyn UserSaver>,
        user_provider: Arc<dyn UserProvider>,
        app_provider: Arc<dyn AppProvider>,
        config: &AuthConfig,
    ) -> Result<Self, AuthError> {
        let token_ttl = config.token_ttl()?;
        let hasher = Argon2Hasher::new(config)?;
        let dummy_hash = hasher.hash("unknown-user")?;

        Ok(Self {
            log,
            user_saver,
            user_provider,
            app_provider,
            hasher,
            dummy_hash,
            token_ttl,
        })
    }

    /// Get the configured token lifetime
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    // ============================================
    // Login
    // ============================================

    /// Verify credentials and issue a token scoped to `req.app_id`
    pub async fn login(&self, req: &LoginRequest) -> Result<String, AuthError> {
        let span = info_span!(parent: &self.log, "auth.login", app_id = req.app_id);

        async move {
            validate_login(req).inspect_err(|err| {
                tracing::warn!(error = %err, "Rejected login input");
            })?;

            let user = match self.user_provider.user_by_email(&req.email).await {
                Ok(user) => user,
                Err(StorageError::UserNotFound) => {
                    self.hasher.verify(&req.password, &self.dummy_hash)?;
                    tracing::warn!("User not found");
                    return Err(AuthError::InvalidCredentials);
                }
                Err(err) => {
                    tracing::error!(error = %err, "Failed to get user");
                    return Err(AuthError::Internal);
                }
            };

            if !self.hasher.verify(&req.password, &user.pass_hash)? {
                tracing::warn!(user_id = user.id, "Invalid password");
                return Err(AuthError::InvalidCredentials);
            }

            let app = match self.app_provider.app(req.app_id).await {
                Ok(app) => app,
                Err(StorageError::AppNotFound) => {
                    tracing::warn!("App not found");
                    return Err(AuthError::AppNotFound);
                }
                Err(err) => {
                    tracing::error!(error = %err, "Failed to get app");
                    return Err(AuthError::Internal);
                }
            };

            let token = token::issue_token(&user, &app, self.token_ttl)?;

            tracing::info!(user_id = user.id, "User logged in successfully");
            Ok(token)
        }
        .instrument(span)
        .await
    }

    // ============================================
    // Registration
    // ============================================

    /// Register a new user and return the id assigned by the store
    pub async fn register_new_user(&self, req: &RegisterRequest) -> Result<i64, AuthError> {
        let span = info_span!(parent: &self.log, "auth.register_new_user");

        async move {
            req.validate().map_err(AuthError::from).inspect_err(|err| {
                tracing::warn!(error = %err, "Rejected registration input");
            })?;

            tracing::info!("Registering new user");

            let pass_hash = self.hasher.hash(&req.password)?;

            match self.user_saver.save_user(&req.email, &pass_hash).await {
                Ok(user_id) => {
                    tracing::info!(user_id, "User registered");
                    Ok(user_id)
                }
                Err(StorageError::UserExists) => {
                    tracing::warn!("User already exists");
                    Err(AuthError::UserExists)
                }
                Err(err) => {
                    tracing::error!(error = %err, "Failed to save user");
                    Err(AuthError::Internal)
                }
            }
        }
        .instrument(span)
        .await
    }

    // ============================================
    // Admin Lookup
    // ============================================

    /// Look up the administrator flag; always queries the store
    ///
    /// An unknown user id is reported as `Internal`, not as a distinct kind.
    pub async fn is_admin(&self, user_id: i64) -> Result<bool, AuthError> {
        let span = info_span!(parent: &self.log, "auth.is_admin", user_id);

        async move {
            if user_id == EMPTY_ID {
                tracing::warn!("Rejected empty user id");
                return Err(AuthError::InvalidInput(
                    "user_id: User ID is required".to_string(),
                ));
            }

            match self.user_provider.is_admin(user_id).await {
                Ok(is_admin) => {
                    tracing::debug!(is_admin, "Checked admin flag");
                    Ok(is_admin)
                }
                Err(err) => {
                    tracing::error!(error = %err, "Failed to check admin flag");
                    Err(AuthError::Internal)
                }
            }
        }
        .instrument(span)
        .await
    }

    // ============================================
    // Token Validation
    // ============================================

    /// Verify a token against the secret of the app named in its claims
    pub async fn validate_token(&self, req: &ValidateTokenRequest) -> Result<TokenClaims, AuthError> {
        let span = info_span!(parent: &self.log, "auth.validate_token");

        async move {
            req.validate().map_err(AuthError::from).inspect_err(|err| {
                tracing::warn!(error = %err, "Rejected token input");
            })?;

            let app_id = token::peek_app_id(&req.token)?;

            let app = match self.app_provider.app(app_id).await {
                Ok(app) => app,
                Err(StorageError::AppNotFound) => {
                    tracing::warn!(app_id, "Token names an unknown app");
                    return Err(AuthError::InvalidToken);
                }
                Err(err) => {
                    tracing::error!(error = %err, "Failed to get app");
                    return Err(AuthError::Internal);
                }
            };

            let claims = token::verify_token(&req.token, &app)?;
            tracing::debug!(user_id = claims.uid, app_id, "Token validated");
            Ok(claims)
        }
        .instrument(span)
        .await
    }
}

fn validate_login(req: &LoginRequest) -> Result<(), AuthError> {
    req.validate()?;

    if req.app_id == EMPTY_ID {
        return Err(AuthError::InvalidInput(
            "app_id: App ID is required".to_string(),
        ));
    }

    Ok(())
}
