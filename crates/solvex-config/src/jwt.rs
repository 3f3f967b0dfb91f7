use std::env;

use crate::error::ConfigError;

/// Signing configuration for bearer tokens.
///
/// There is no fallback secret: a deployment without `JWT_SECRET` must not
/// start, since any default would let anyone mint tokens.
#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .finish()
    }
}

impl JwtConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    pub fn from_vars<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("JWT_SECRET") {
            Some(secret) if !secret.trim().is_empty() => Ok(Self { secret }),
            _ => Err(ConfigError::MissingVar("JWT_SECRET")),
        }
    }
}
