//! Query builder error types

use thiserror::Error;

/// Errors raised while composing or rendering a query.
///
/// `Internal` marks programmer misuse (a non-record filter, a malformed
/// builder). `Unprocessable` marks caller input that can be corrected and
/// retried, such as an unknown sort column.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Query build error: {0}")]
    Internal(String),

    #[error("{0}")]
    Unprocessable(String),
}

impl QueryError {
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self::Unprocessable(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_error_display() {
        let err = QueryError::internal("no result columns");
        assert_eq!(err.to_string(), "Query build error: no result columns");
    }

    #[test]
    fn test_unprocessable_error_display() {
        let err = QueryError::unprocessable("can't sort by column nope");
        assert_eq!(err.to_string(), "can't sort by column nope");
    }
}
