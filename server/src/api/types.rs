//! Shared API types
//!
//! Error responses are JSON objects of the form
//! `{"error": "...", "code": "...", "message": "..."}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::domain::UserError;

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    BadRequest { code: String, message: String },
    Unauthorized { code: String, message: String },
    NotFound { code: String, message: String },
    Conflict { code: String, message: String },
    Unprocessable { code: String, message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn bad_request(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn unprocessable(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unprocessable {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Map a domain failure, prefixing the message with what was attempted
    /// (`"Could not create User: ..."`). Internal causes are logged and not
    /// echoed to the client.
    pub fn from_user(context: &str, e: UserError) -> Self {
        match e {
            UserError::Unauthorized(m) => Self::Unauthorized {
                code: "UNAUTHORIZED".to_string(),
                message: format!("{}: {}", context, m),
            },
            UserError::NotFound(m) => Self::NotFound {
                code: "NOT_FOUND".to_string(),
                message: format!("{}: {}", context, m),
            },
            UserError::Conflict(m) => Self::Conflict {
                code: "CONFLICT".to_string(),
                message: format!("{}: {}", context, m),
            },
            UserError::Unprocessable(m) => Self::Unprocessable {
                code: "UNPROCESSABLE".to_string(),
                message: format!("{}: {}", context, m),
            },
            UserError::Internal(m) => {
                tracing::error!(error = %m, "{}", context);
                Self::Internal {
                    message: format!("{}: Internal Server Error", context),
                }
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, code, message) = match self {
            Self::BadRequest { code, message } => {
                (StatusCode::BAD_REQUEST, "bad_request", code, message)
            }
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, "unauthorized", code, message)
            }
            Self::NotFound { code, message } => (StatusCode::NOT_FOUND, "not_found", code, message),
            Self::Conflict { code, message } => (StatusCode::CONFLICT, "conflict", code, message),
            Self::Unprocessable { code, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "unprocessable",
                code,
                message,
            ),
            Self::Internal { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "INTERNAL".to_string(),
                message,
            ),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}
