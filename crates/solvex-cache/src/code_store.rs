//! Expiring, single-use verification codes.
//!
//! A code is issued for an email address and can be consumed once. Issuing
//! again replaces the previous code. Codes expire after the TTL given at
//! issue time.
//!
//! Two backends are available: Redis, shared by every API instance, and an
//! in-process map for single-node deployments and tests.
//!
//! # Example
//!
//! ```ignore
//! let store = CodeStore::from_config(&CacheConfig::from_env()).await?;
//! store.issue("ada@uni.edu", 123456, Duration::from_secs(600)).await?;
//! assert!(store.consume("ada@uni.edu", 123456).await?);
//! assert!(!store.consume("ada@uni.edu", 123456).await?);
//! ```

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::config::CacheConfig;
use crate::redis::{CacheError, RedisCache};

/// A stored code and its deadline.
#[derive(Clone, Debug)]
pub struct Entry {
    code: u32,
    expires_at: Instant,
}

#[derive(Clone, Debug)]
pub enum CodeStore {
    Redis { cache: RedisCache, prefix: String },
    Memory(Arc<Mutex<HashMap<String, Entry>>>),
}

impl CodeStore {
    /// An empty in-process store.
    pub fn memory() -> Self {
        CodeStore::Memory(Arc::new(Mutex::new(HashMap::new())))
    }

    /// Connects to Redis when `redis_url` is set, otherwise falls back to
    /// process memory.
    pub async fn from_config(config: &CacheConfig) -> Result<Self, CacheError> {
        match &config.redis_url {
            Some(url) => {
                let cache = RedisCache::new(url).await?;
                info!("Verification codes stored in Redis");
                Ok(CodeStore::Redis {
                    cache,
                    prefix: config.prefixed_key("verification"),
                })
            }
            None => {
                info!("REDIS_URL not set, verification codes stored in process memory");
                Ok(Self::memory())
            }
        }
    }

    /// Stores `code` for `email`, replacing any earlier code.
    pub async fn issue(&self, email: &str, code: u32, ttl: Duration) -> Result<(), CacheError> {
        match self {
            CodeStore::Redis { cache, prefix } => {
                cache
                    .set_with_ttl(&format!("{}:{}", prefix, email), &code.to_string(), ttl)
                    .await
            }
            CodeStore::Memory(map) => {
                let now = Instant::now();
                let mut map = map.lock().await;
                map.retain(|_, entry| entry.expires_at > now);
                map.insert(
                    email.to_string(),
                    Entry {
                        code,
                        expires_at: now + ttl,
                    },
                );
                Ok(())
            }
        }
    }

    /// Returns true when `code` is the live code for `email`, and removes it.
    ///
    /// A wrong code leaves the stored one in place. An expired code never
    /// matches.
    pub async fn consume(&self, email: &str, code: u32) -> Result<bool, CacheError> {
        match self {
            CodeStore::Redis { cache, prefix } => {
                cache
                    .delete_if_eq(&format!("{}:{}", prefix, email), &code.to_string())
                    .await
            }
            CodeStore::Memory(map) => {
                let now = Instant::now();
                let mut map = map.lock().await;
                let (matched, expired) = match map.get(email) {
                    Some(entry) => (
                        entry.expires_at > now && entry.code == code,
                        entry.expires_at <= now,
                    ),
                    None => (false, false),
                };
                if matched || expired {
                    map.remove(email);
                }
                debug!(matched = matched, "Verification code checked");
                Ok(matched)
            }
        }
    }

    /// The live code for `email`, if any. Only the in-process backend can
    /// answer; used by tests that drive sign-up end to end.
    pub async fn peek(&self, email: &str) -> Option<u32> {
        match self {
            CodeStore::Redis { .. } => None,
            CodeStore::Memory(map) => map
                .lock()
                .await
                .get(email)
                .filter(|entry| entry.expires_at > Instant::now())
                .map(|entry| entry.code),
        }
    }
}
