//! # SolveX Cache
//!
//! Short-lived shared state for the SolveX API.
//!
//! This crate provides:
//! - [`CacheConfig`]: Redis settings from environment variables
//! - [`RedisCache`]: a Redis client with atomic compare-and-delete
//! - [`CodeStore`]: expiring, single-use email verification codes
//!
//! # Example
//!
//! ```ignore
//! use solvex_cache::{CacheConfig, CodeStore};
//!
//! let store = CodeStore::from_config(&CacheConfig::from_env()).await?;
//! store.issue(&email, code, ttl).await?;
//! ```

pub mod code_store;
pub mod config;
pub mod redis;

pub use code_store::CodeStore;
pub use config::CacheConfig;
pub use redis::{CacheError, RedisCache};
