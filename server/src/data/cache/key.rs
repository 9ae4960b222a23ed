//! Versioned cache keys

use crate::core::constants::CACHE_KEY_VERSION;

/// Cache key builder.
///
/// Every key starts with [`CACHE_KEY_VERSION`] so a format change can be
/// rolled out by bumping the version instead of flushing the store.
pub struct CacheKey;

impl CacheKey {
    /// Cache key for a user record by ID
    pub fn user(id: i64) -> String {
        format!("{}:user:{}", CACHE_KEY_VERSION, id)
    }

    /// Pattern matching every key of the current version
    pub fn all_pattern() -> String {
        format!("{}:*", CACHE_KEY_VERSION)
    }
}
