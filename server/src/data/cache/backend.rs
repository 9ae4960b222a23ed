//! Cache backend trait definition

use std::time::Duration;

use async_trait::async_trait;

use super::error::CacheError;

/// Storage behind [`CacheService`](super::CacheService).
///
/// Single-key operations are atomic. `delete` and `exists` may observe a
/// stale view under concurrent writers, which is fine for cache-aside reads.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, CacheError>;

    /// Store a value, expiring after `ttl` when given
    async fn set(&self, key: &str, value: Vec<u8>, ttl: Option<Duration>)
    -> Result<(), CacheError>;

    /// Remove a key. Returns whether it was present.
    async fn delete(&self, key: &str) -> Result<bool, CacheError>;

    async fn exists(&self, key: &str) -> Result<bool, CacheError>;

    /// Delete keys matching a trailing-glob pattern such as `v1:user:*`
    async fn delete_pattern(&self, pattern: &str) -> Result<u64, CacheError>;

    /// Drop every key owned by this service
    async fn flush(&self) -> Result<u64, CacheError>;

    async fn health_check(&self) -> Result<(), CacheError>;

    fn backend_name(&self) -> &'static str;
}
