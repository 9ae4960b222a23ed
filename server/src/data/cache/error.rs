//! Cache error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Cache configuration error: {0}")]
    Config(String),

    #[error("Cache connection error: {0}")]
    Connection(String),

    #[error("Could not encode cache value: {0}")]
    Encode(#[from] rmp_serde::encode::Error),

    /// Stored bytes do not decode as the requested type
    #[error("Could not decode cache value: {0}")]
    Decode(#[from] rmp_serde::decode::Error),

    #[error("Redis error: {0}")]
    Redis(#[from] deadpool_redis::redis::RedisError),

    #[error("Redis pool error: {0}")]
    Pool(#[from] deadpool_redis::PoolError),
}

impl CacheError {
    /// Whether the backend could not be reached, as opposed to a bad value
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::Connection(_) | Self::Redis(_) | Self::Pool(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_display() {
        let err = CacheError::Config("redis_url required for Redis backend".to_string());
        assert_eq!(
            err.to_string(),
            "Cache configuration error: redis_url required for Redis backend"
        );
        assert!(!err.is_unavailable());
    }

    #[test]
    fn test_connection_error_is_unavailable() {
        let err = CacheError::Connection("Redis PING failed".to_string());
        assert!(err.is_unavailable());
    }

    #[test]
    fn test_decode_error_from_bad_bytes() {
        let err: CacheError = rmp_serde::from_slice::<i64>(&[0xc1]).unwrap_err().into();
        assert!(matches!(err, CacheError::Decode(_)));
        assert!(err.to_string().starts_with("Could not decode cache value"));
    }
}
