//! Authentication API endpoints
//!
//! Session tokens are not issued yet: a successful login answers with an
//! empty `Token`.

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::domain::{UserError, UserService};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email cannot be empty"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct LoginResponse {
    pub token: String,
}

#[derive(Clone)]
pub struct AuthRoutesState {
    pub users: UserService,
}

/// Create auth routes
pub fn routes(users: UserService) -> Router {
    let state = AuthRoutesState { users };

    Router::new()
        .route("/v1/Login", post(login))
        .route("/v1/Logout", post(logout))
        .with_state(state)
}

/// Check credentials
#[utoipa::path(
    post,
    path = "/auth/v1/Login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Credentials accepted", body = LoginResponse),
        (status = 400, description = "Invalid request JSON"),
        (status = 401, description = "Password is incorrect")
    )
)]
pub async fn login(
    State(state): State<AuthRoutesState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    const CONTEXT: &str = "Could not login";

    let user = state
        .users
        .get_by_email(&request.email)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => ApiError::from_user(
                CONTEXT,
                UserError::Unauthorized("Password is incorrect".to_string()),
            ),
            other => ApiError::from_user(CONTEXT, other),
        })?;

    state
        .users
        .verify_password(&user, &request.password)
        .await
        .map_err(|e| ApiError::from_user(CONTEXT, e))?;

    tracing::info!(user_id = user.id, "User logged in");
    Ok(Json(LoginResponse {
        token: String::new(),
    }))
}

/// End the current session
#[utoipa::path(
    post,
    path = "/auth/v1/Logout",
    tag = "auth",
    responses(
        (status = 200, description = "Logged out")
    )
)]
pub async fn logout() -> Json<serde_json::Value> {
    Json(serde_json::json!({}))
}
