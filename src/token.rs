//! Token issuance and verification
//!
//! Tokens are HS256 JWTs signed with the secret of the app whose id is
//! embedded in the claims. Issuance does no storage lookups; the caller
//! supplies the user and app records.

use crate::error::AuthError;
use crate::models::{App, TokenClaims, User};

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

/// Issue a signed token for `user`, scoped to `app`, valid for `ttl`
pub fn issue_token(user: &User, app: &App, ttl: Duration) -> Result<String, AuthError> {
    if app.secret.is_empty() {
        tracing::error!(app_id = app.id, "App has an empty signing secret");
        return Err(AuthError::Internal);
    }

    let iat = Utc::now().timestamp();
    let claims = TokenClaims {
        uid: user.id,
        email: user.email.clone(),
        app_id: app.id,
        iat,
        exp: iat + ttl.num_seconds(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(app.secret.as_bytes()),
    )
    .map_err(|err| {
        tracing::error!(app_id = app.id, "Failed to sign token: {:?}", err);
        AuthError::Internal
    })
}

/// Read the app id from a token without checking its signature
///
/// Only useful for picking which app's secret to verify against.
pub fn peek_app_id(token: &str) -> Result<i64, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;

    let token_data = decode::<TokenClaims>(token, &DecodingKey::from_secret(&[]), &validation)?;
    Ok(token_data.claims.app_id)
}

/// Verify a token's signature and expiry against `app`
pub fn verify_token(token: &str, app: &App) -> Result<TokenClaims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(app.secret.as_bytes()),
        &validation,
    )?;

    // A token minted for another app must not verify here even if secrets collide.
    if token_data.claims.app_id != app.id {
        return Err(AuthError::InvalidToken);
    }

    Ok(token_data.claims)
}
