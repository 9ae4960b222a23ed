//! User domain errors

use thiserror::Error;

use crate::data::postgres::PostgresError;
use crate::data::sql::QueryError;

/// Failure of a user operation, classified by how a caller should react
#[derive(Error, Debug)]
pub enum UserError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    Internal(String),
}

impl From<QueryError> for UserError {
    fn from(e: QueryError) -> Self {
        match e {
            QueryError::Unprocessable(message) => Self::Unprocessable(message),
            QueryError::Internal(_) => Self::Internal(e.to_string()),
        }
    }
}

impl From<PostgresError> for UserError {
    fn from(e: PostgresError) -> Self {
        Self::Internal(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_error_mapping() {
        let err: UserError = QueryError::unprocessable("can't sort by column x").into();
        assert!(matches!(err, UserError::Unprocessable(ref m) if m == "can't sort by column x"));

        let err: UserError = QueryError::internal("bad shape").into();
        assert!(matches!(err, UserError::Internal(ref m) if m == "Query build error: bad shape"));
    }

    #[test]
    fn test_postgres_error_is_internal() {
        let err: UserError = PostgresError::Config("missing url".to_string()).into();
        assert!(matches!(err, UserError::Internal(_)));
        assert_eq!(err.to_string(), "Configuration error: missing url");
    }
}
