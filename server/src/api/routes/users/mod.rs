//! User API endpoints
//!
//! Every operation is a `POST` with a JSON body, mounted under `/users`.

pub mod types;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::extractors::ValidatedJson;
use crate::api::types::ApiError;
use crate::domain::UserService;

use types::{
    UserCreateRequest, UserDto, UserIdRequest, UserListRequest, UserListResponse, UserResponse,
    UserUpdateRequest,
};

/// Shared state for Users API endpoints
#[derive(Clone)]
pub struct UsersApiState {
    pub users: UserService,
}

/// Build Users API routes
pub fn routes(users: UserService) -> Router<()> {
    let state = UsersApiState { users };

    Router::new()
        .route("/v1/UserCreate", post(create_user))
        .route("/v1/UserGet", post(get_user))
        .route("/v1/UserUpdate", post(update_user))
        .route("/v1/UserDelete", post(delete_user))
        .route("/v1/UserList", post(list_users))
        .with_state(state)
}

/// Create a user
#[utoipa::path(
    post,
    path = "/users/v1/UserCreate",
    tag = "users",
    request_body = UserCreateRequest,
    responses(
        (status = 200, description = "User created", body = UserResponse),
        (status = 400, description = "Invalid request JSON"),
        (status = 409, description = "Email already in use"),
        (status = 422, description = "Params validation error")
    )
)]
pub async fn create_user(
    State(state): State<UsersApiState>,
    ValidatedJson(body): ValidatedJson<UserCreateRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .create(body.into())
        .await
        .map_err(|e| ApiError::from_user("Could not create User", e))?;

    tracing::info!(user_id = user.id, "Created User");
    Ok(Json(UserResponse {
        user: UserDto::from(user),
    }))
}

/// Get a user by ID
#[utoipa::path(
    post,
    path = "/users/v1/UserGet",
    tag = "users",
    request_body = UserIdRequest,
    responses(
        (status = 200, description = "User", body = UserResponse),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<UsersApiState>,
    ValidatedJson(body): ValidatedJson<UserIdRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state
        .users
        .get(body.id)
        .await
        .map_err(|e| ApiError::from_user("Could not get User", e))?;

    Ok(Json(UserResponse {
        user: UserDto::from(user),
    }))
}

/// Update names and password of a user
#[utoipa::path(
    post,
    path = "/users/v1/UserUpdate",
    tag = "users",
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "User updated", body = UserResponse),
        (status = 404, description = "User not found"),
        (status = 422, description = "OldPassword is incorrect")
    )
)]
pub async fn update_user(
    State(state): State<UsersApiState>,
    ValidatedJson(body): ValidatedJson<UserUpdateRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let id = body.id;
    let user = state
        .users
        .update(id, body.into())
        .await
        .map_err(|e| ApiError::from_user("Could not update User", e))?;

    tracing::info!(user_id = id, "Updated User");
    Ok(Json(UserResponse {
        user: UserDto::from(user),
    }))
}

/// Delete a user
#[utoipa::path(
    post,
    path = "/users/v1/UserDelete",
    tag = "users",
    request_body = UserIdRequest,
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "User not found"),
        (status = 422, description = "User is still referenced")
    )
)]
pub async fn delete_user(
    State(state): State<UsersApiState>,
    ValidatedJson(body): ValidatedJson<UserIdRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .users
        .delete(body.id)
        .await
        .map_err(|e| ApiError::from_user("Could not delete User", e))?;

    tracing::info!(user_id = body.id, "Deleted User");
    Ok(Json(serde_json::json!({})))
}

/// List users with filters, sorting and pagination
#[utoipa::path(
    post,
    path = "/users/v1/UserList",
    tag = "users",
    request_body = UserListRequest,
    responses(
        (status = 200, description = "Matching users", body = UserListResponse),
        (status = 422, description = "Unknown sort column")
    )
)]
pub async fn list_users(
    State(state): State<UsersApiState>,
    ValidatedJson(body): ValidatedJson<UserListRequest>,
) -> Result<Json<UserListResponse>, ApiError> {
    let users = state
        .users
        .list(&body.params)
        .await
        .map_err(|e| ApiError::from_user("Could not list Users", e))?;

    Ok(Json(UserListResponse {
        users: users.into_iter().map(UserDto::from).collect(),
    }))
}
