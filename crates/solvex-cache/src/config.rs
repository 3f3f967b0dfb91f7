//! Cache configuration.
//!
//! This module provides the Redis connection settings loaded from
//! environment variables.

use std::env;

/// Cache configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `REDIS_URL`: Redis connection URL. When unset, codes are kept in
///   process memory, which only works for a single instance.
/// - `CACHE_PREFIX`: Prefix for all keys (default: `solvex`)
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheConfig {
    /// Redis connection URL, if a shared store is configured.
    pub redis_url: Option<String>,

    /// Prefix for all keys to avoid collisions with other tenants.
    pub key_prefix: String,
}

impl CacheConfig {
    pub fn from_env() -> Self {
        Self {
            redis_url: env::var("REDIS_URL").ok().filter(|v| !v.trim().is_empty()),
            key_prefix: env::var("CACHE_PREFIX").unwrap_or_else(|_| "solvex".into()),
        }
    }

    /// Build a prefixed key.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let key = config.prefixed_key("verification:ada@uni.edu");
    /// // Returns "solvex:verification:ada@uni.edu"
    /// ```
    pub fn prefixed_key(&self, key: &str) -> String {
        format!("{}:{}", self.key_prefix, key)
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            redis_url: None,
            key_prefix: "solvex".into(),
        }
    }
}
