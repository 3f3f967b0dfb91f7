//! Rate limiting configuration for the public auth endpoints.
//!
//! Sign-in, sign-up and send-code are reachable without a token, so they are
//! throttled per peer IP using a token bucket:
//!
//! - `RATE_LIMIT_ENABLED`: turn the limiter off entirely (default: on)
//! - `RATE_LIMIT_AUTH_PER_SECOND`: seconds between token replenishments (default: 10)
//! - `RATE_LIMIT_AUTH_BURST_SIZE`: bucket size (default: 5)
//!
//! # Example
//!
//! ```ignore
//! let config = RateLimitConfig::from_env();
//! let router = Router::new()
//!     .route("/sign-in/{role}", post(sign_in))
//!     .layer(GovernorLayer::new(Arc::new(config.auth_governor_config())));
//! ```

use tower_governor::governor::{GovernorConfig, GovernorConfigBuilder};
use tower_governor::key_extractor::PeerIpKeyExtractor;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RateLimitConfig {
    /// When false no limiter layer is installed.
    pub enabled: bool,

    /// Replenishment interval, in seconds, for the auth bucket.
    pub auth_per_second: u64,

    /// Maximum number of requests that can be made back to back.
    pub auth_burst_size: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            auth_per_second: 10,
            auth_burst_size: 5,
        }
    }
}

impl RateLimitConfig {
    /// A configuration with the limiter switched off, for in-process tests
    /// where requests carry no peer address.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        Self {
            enabled: std::env::var("RATE_LIMIT_ENABLED")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),
            auth_per_second: std::env::var("RATE_LIMIT_AUTH_PER_SECOND")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(10),
            auth_burst_size: std::env::var("RATE_LIMIT_AUTH_BURST_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|v| *v > 0)
                .unwrap_or(5),
        }
    }

    /// Builds the governor configuration keyed by peer IP.
    ///
    /// # Panics
    ///
    /// Panics if either limit is zero; `from_env` never produces one.
    #[must_use]
    pub fn auth_governor_config(
        &self,
    ) -> GovernorConfig<PeerIpKeyExtractor, ::governor::middleware::NoOpMiddleware> {
        GovernorConfigBuilder::default()
            .per_second(self.auth_per_second)
            .burst_size(self.auth_burst_size)
            .key_extractor(PeerIpKeyExtractor)
            .finish()
            .expect("Failed to build auth rate limiter config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RateLimitConfig::default();
        assert!(config.enabled);
        assert_eq!(config.auth_per_second, 10);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_disabled_keeps_limits() {
        let config = RateLimitConfig::disabled();
        assert!(!config.enabled);
        assert_eq!(config.auth_burst_size, 5);
    }

    #[test]
    fn test_governor_config_builds() {
        let _ = RateLimitConfig::default().auth_governor_config();
    }
}
