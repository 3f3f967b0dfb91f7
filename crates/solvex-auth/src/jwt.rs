//! JWT (JSON Web Token) utilities for authentication.
//!
//! Tokens are HS256-signed, carry [`Claims`] and live for a fixed
//! [`TOKEN_LIFETIME_SECS`]. There is no refresh or revocation: logging out
//! means the client discards its token.
//!
//! # Example
//!
//! ```ignore
//! use solvex_auth::{Role, create_token, verify_token};
//! use solvex_config::JwtConfig;
//!
//! let config = JwtConfig::from_env()?;
//! let token = create_token(student.id, &student.email, Role::Student, &config)?;
//! let claims = verify_token(&token, &config)?;
//! assert_eq!(claims.user_id, student.id);
//! ```

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};

use solvex_config::JwtConfig;

use crate::claims::Claims;
use crate::role::Role;

/// 72 hours.
pub const TOKEN_LIFETIME_SECS: i64 = 72 * 60 * 60;

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    #[error("Invalid token")]
    InvalidSignature,
    #[error("Token expired")]
    Expired,
    #[error("Invalid token")]
    Malformed,
    #[error("Failed to create token: {0}")]
    Encoding(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    }
}

/// Creates an access token for the given account.
///
/// # Errors
///
/// Returns [`TokenError::Encoding`] if signing fails.
pub fn create_token(
    user_id: i64,
    email: &str,
    role: Role,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        user_id,
        email: email.to_string(),
        role: role.to_string(),
        iat: now,
        exp: now + TOKEN_LIFETIME_SECS,
    };

    encode_claims(&claims, jwt_config)
}

/// Signs arbitrary claims. [`create_token`] is the normal entry point; this
/// exists for callers that need control over the timestamps.
pub fn encode_claims(claims: &Claims, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    encode(
        &Header::new(Algorithm::HS256),
        claims,
        &EncodingKey::from_secret(jwt_config.secret.as_bytes()),
    )
    .map_err(|e| TokenError::Encoding(e.to_string()))
}

/// Verifies signature and expiry and returns the embedded claims.
///
/// Expiry is checked with zero leeway. Only HS256 is accepted.
///
/// # Errors
///
/// - [`TokenError::InvalidSignature`] when the token was signed with another key
/// - [`TokenError::Expired`] when `exp` is in the past
/// - [`TokenError::Malformed`] for anything that does not decode
pub fn verify_token(token: &str, jwt_config: &JwtConfig) -> Result<Claims, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_config.secret.as_bytes()),
        &validation,
    )?;

    Ok(data.claims)
}
