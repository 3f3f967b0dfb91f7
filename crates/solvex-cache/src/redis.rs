//! Redis client for values shared across API instances.

use redis::{AsyncCommands, Client, Script, aio::ConnectionManager};
use std::time::Duration;
use tracing::{debug, instrument};

/// Deletes `KEYS[1]` only when it currently holds `ARGV[1]`; returns the
/// number of keys removed.
const COMPARE_AND_DELETE: &str = r#"
if redis.call('GET', KEYS[1]) == ARGV[1] then
    return redis.call('DEL', KEYS[1])
end
return 0
"#;

/// Redis client with a shared, auto-reconnecting connection.
#[derive(Clone)]
pub struct RedisCache {
    conn: ConnectionManager,
}

impl std::fmt::Debug for RedisCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisCache").finish_non_exhaustive()
    }
}

/// Error type for cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Redis connection error: {0}")]
    Connection(#[from] redis::RedisError),
}

impl RedisCache {
    /// Connects to Redis.
    ///
    /// # Errors
    ///
    /// Returns `CacheError::Connection` if connection fails.
    pub async fn new(redis_url: &str) -> Result<Self, CacheError> {
        let client = Client::open(redis_url)?;
        let conn = ConnectionManager::new(client).await?;

        Ok(Self { conn })
    }

    /// Stores `value` under `key`, replacing any previous value and its TTL.
    #[instrument(skip(self, value), fields(cache.operation = "SETEX"))]
    pub async fn set_with_ttl(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();

        conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await?;

        debug!(cache.key = %key, cache.ttl_secs = %ttl.as_secs(), "Cache set");

        Ok(())
    }

    /// Atomically removes `key` if and only if it holds `expected`.
    ///
    /// Returns whether the key was removed. Two concurrent callers with the
    /// right value cannot both get `true`.
    #[instrument(skip(self, expected), fields(cache.operation = "CAD"))]
    pub async fn delete_if_eq(&self, key: &str, expected: &str) -> Result<bool, CacheError> {
        let mut conn = self.conn.clone();

        let script = Script::new(COMPARE_AND_DELETE);
        let removed: i64 = script
            .key(key)
            .arg(expected)
            .invoke_async(&mut conn)
            .await?;

        debug!(cache.key = %key, removed = removed, "Compare and delete");

        Ok(removed == 1)
    }
}
