//! User API types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::data::types::{UserListParams, UserRow};
use crate::domain::{NewUser, UserUpdate};

/// User as returned to clients. Password hash and email are never included.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UserDto {
    #[serde(rename = "ID")]
    pub id: i64,
    pub description: String,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserDto {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            description: row.description,
            first_name: row.first_name,
            last_name: row.last_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UserListResponse {
    pub users: Vec<UserDto>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UserCreateRequest {
    #[validate(email(message = "Email must be a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be empty"))]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl From<UserCreateRequest> for NewUser {
    fn from(req: UserCreateRequest) -> Self {
        Self {
            email: req.email,
            password: req.password,
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

/// Body of the requests that address one user by ID
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserIdRequest {
    #[serde(rename = "ID")]
    #[validate(range(min = 1, message = "ID must be positive"))]
    pub id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UserUpdateRequest {
    #[serde(rename = "ID")]
    #[validate(range(min = 1, message = "ID must be positive"))]
    pub id: i64,
    pub password: Option<String>,
    pub old_password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl From<UserUpdateRequest> for UserUpdate {
    fn from(req: UserUpdateRequest) -> Self {
        Self {
            password: req.password,
            old_password: req.old_password,
            first_name: req.first_name,
            last_name: req.last_name,
        }
    }
}

/// Filter, sort and pagination of a user listing. Every key is optional.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UserListRequest {
    #[serde(flatten)]
    pub params: UserListParams,
}
