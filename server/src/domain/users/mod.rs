//! User accounts
//!
//! [`UserService`] owns the business rules around the `users` table: input
//! trimming, email uniqueness, password hashing and verification, and the
//! cache-aside read path. Persistence itself is in
//! [`crate::data::postgres::repositories::user`].

mod error;
mod password;

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;

use crate::core::constants::CACHE_TTL_USER;
use crate::data::cache::{CacheKey, CacheService};
use crate::data::postgres::repositories::user as repo;
use crate::data::sql::{
    BuiltQuery, apply_pagination, apply_sort, apply_struct_filter, column_mapping, select,
};
use crate::data::types::{USER_COLUMNS, UserListParams, UserRow};

pub use error::UserError;

/// Input for [`UserService::create`]
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    fn trimmed(self) -> Self {
        Self {
            email: self.email.trim().to_string(),
            password: self.password.trim().to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
        }
    }
}

/// Input for [`UserService::update`]. Unset fields keep their stored value.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub password: Option<String>,
    pub old_password: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UserUpdate {
    fn trimmed(self) -> Self {
        let trim = |s: Option<String>| s.map(|v| v.trim().to_string());
        Self {
            password: trim(self.password).filter(|p| !p.is_empty()),
            old_password: trim(self.old_password),
            first_name: trim(self.first_name),
            last_name: trim(self.last_name),
        }
    }
}

/// Build the list statement: struct filter, pagination, then a sort checked
/// against the column mapping of [`UserRow`].
pub fn build_list_query(params: &UserListParams) -> Result<BuiltQuery, UserError> {
    let q = select(USER_COLUMNS).from("users");
    let q = apply_struct_filter(q, "", &params.filter)?;
    let q = apply_pagination(q, &params.pagination);

    let mapping = column_mapping::<UserRow>()?;
    let q = apply_sort(q, &params.sort, &mapping)?;

    Ok(q.to_sql()?)
}

fn not_found(id: i64) -> UserError {
    UserError::NotFound(format!("User not found for ID: {}", id))
}

async fn hash_blocking(password: String) -> Result<String, UserError> {
    tokio::task::spawn_blocking(move || password::hash_password(&password))
        .await
        .map_err(|e| UserError::Internal(format!("Password hashing task failed: {}", e)))?
}

async fn verify_blocking(password: String, hash: String) -> Result<bool, UserError> {
    tokio::task::spawn_blocking(move || password::verify_password(&password, &hash))
        .await
        .map_err(|e| UserError::Internal(format!("Password verification task failed: {}", e)))?
}

#[derive(Clone)]
pub struct UserService {
    pool: PgPool,
    cache: Arc<CacheService>,
}

impl UserService {
    pub fn new(pool: PgPool, cache: Arc<CacheService>) -> Self {
        Self { pool, cache }
    }

    /// Create a user. The email must not be taken.
    pub async fn create(&self, new_user: NewUser) -> Result<UserRow, UserError> {
        let new_user = new_user.trimmed();

        if repo::get_user_by_email(&self.pool, &new_user.email)
            .await?
            .is_some()
        {
            return Err(UserError::Conflict(format!(
                "user with email {} does already exist",
                new_user.email
            )));
        }

        let hash = hash_blocking(new_user.password).await?;

        let user = repo::insert_user(
            &self.pool,
            &new_user.email,
            &hash,
            &new_user.first_name,
            &new_user.last_name,
        )
        .await
        .map_err(|e| {
            // Lost a race with a concurrent insert of the same email
            if e.is_unique_violation() {
                UserError::Conflict(format!(
                    "user with email {} does already exist",
                    new_user.email
                ))
            } else {
                e.into()
            }
        })?;

        tracing::debug!(user_id = user.id, "User created");
        Ok(user)
    }

    pub async fn get(&self, id: i64) -> Result<UserRow, UserError> {
        let key = CacheKey::user(id);

        match self.cache.get::<UserRow>(&key).await {
            Ok(Some(user)) => return Ok(user),
            Ok(None) => {}
            Err(e) => tracing::warn!(
                user_id = id,
                unavailable = e.is_unavailable(),
                error = %e,
                "User cache read failed"
            ),
        }

        let user = repo::get_user(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let ttl = Some(Duration::from_secs(CACHE_TTL_USER));
        if let Err(e) = self.cache.set(&key, &user, ttl).await {
            tracing::warn!(user_id = id, error = %e, "User cache write failed");
        }

        Ok(user)
    }

    pub async fn get_by_email(&self, email: &str) -> Result<UserRow, UserError> {
        let email = email.trim();
        repo::get_user_by_email(&self.pool, email)
            .await?
            .ok_or_else(|| UserError::NotFound(format!("User not found for email: {}", email)))
    }

    /// Update names and optionally the password.
    ///
    /// A password that does not match the stored hash is a change and needs
    /// `old_password` to verify against the stored hash first.
    pub async fn update(&self, id: i64, update: UserUpdate) -> Result<UserRow, UserError> {
        let update = update.trimmed();
        let current = repo::get_user(&self.pool, id)
            .await?
            .ok_or_else(|| not_found(id))?;

        let password_hash = match update.password {
            Some(new_password) => {
                let unchanged =
                    verify_blocking(new_password.clone(), current.password.clone()).await?;
                if unchanged {
                    current.password.clone()
                } else {
                    let old_ok = match update.old_password {
                        Some(old) => verify_blocking(old, current.password.clone()).await?,
                        None => false,
                    };
                    if !old_ok {
                        return Err(UserError::Unprocessable(
                            "OldPassword is incorrect".to_string(),
                        ));
                    }
                    hash_blocking(new_password).await?
                }
            }
            None => current.password.clone(),
        };

        let first_name = update.first_name.unwrap_or(current.first_name);
        let last_name = update.last_name.unwrap_or(current.last_name);

        let user = repo::update_user(&self.pool, id, &password_hash, &first_name, &last_name)
            .await?
            .ok_or_else(|| not_found(id))?;

        self.cache.invalidate_key(&CacheKey::user(id)).await;
        tracing::debug!(user_id = id, "User updated");
        Ok(user)
    }

    /// Delete a user. Zero affected rows means the user is gone.
    pub async fn delete(&self, id: i64) -> Result<(), UserError> {
        let deleted = repo::delete_user(&self.pool, id).await.map_err(|e| {
            if e.is_foreign_key_violation() {
                UserError::Unprocessable(format!("User is still referenced for ID: {}", id))
            } else {
                e.into()
            }
        })?;
        if !deleted {
            return Err(not_found(id));
        }

        self.cache.invalidate_key(&CacheKey::user(id)).await;
        tracing::debug!(user_id = id, "User deleted");
        Ok(())
    }

    pub async fn list(&self, params: &UserListParams) -> Result<Vec<UserRow>, UserError> {
        let query = build_list_query(params)?;
        Ok(repo::list_users(&self.pool, &query).await?)
    }

    /// Fails with Unauthorized unless `password` matches the user's hash
    pub async fn verify_password(&self, user: &UserRow, password: &str) -> Result<(), UserError> {
        if verify_blocking(password.to_string(), user.password.clone()).await? {
            Ok(())
        } else {
            Err(UserError::Unauthorized("Password is incorrect".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sql::{IntFilter, OneColumnSort, SqlArg, StringFilter};
    use crate::data::types::UserFilter;

    #[test]
    fn test_new_user_trimmed() {
        let user = NewUser {
            email: "  ada@example.com ".to_string(),
            password: " pw ".to_string(),
            first_name: "\tAda".to_string(),
            last_name: "Lovelace\n".to_string(),
        }
        .trimmed();
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.password, "pw");
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.last_name, "Lovelace");
    }

    #[test]
    fn test_update_blank_password_is_unset() {
        let update = UserUpdate {
            password: Some("   ".to_string()),
            first_name: Some(" Grace ".to_string()),
            ..Default::default()
        }
        .trimmed();
        assert_eq!(update.password, None);
        assert_eq!(update.first_name.as_deref(), Some("Grace"));
        assert_eq!(update.last_name, None);
    }

    #[test]
    fn test_default_list_query() {
        let built = build_list_query(&UserListParams::default()).unwrap();
        assert_eq!(
            built.sql,
            "SELECT id, email, password, description, firstname, lastname, created_at, updated_at \
             FROM users ORDER BY id ASC LIMIT 25"
        );
        assert!(built.args.is_empty());
    }

    #[test]
    fn test_filtered_sorted_list_query() {
        let params = UserListParams {
            filter: UserFilter {
                id: Some(IntFilter {
                    gt: Some(10),
                    ..Default::default()
                }),
                first_name: Some(StringFilter {
                    contains: Some("ad".to_string()),
                    ..Default::default()
                }),
                ..Default::default()
            },
            sort: OneColumnSort {
                column: "FirstName".to_string(),
                order: "desc".to_string(),
            },
            pagination: crate::data::sql::LimitOffsetPagination {
                limit: 5,
                offset: 10,
            },
        };

        let built = build_list_query(&params).unwrap();
        assert!(
            built
                .sql
                .ends_with("FROM users WHERE id > $1 AND firstname ILIKE $2 ORDER BY firstname DESC LIMIT 5 OFFSET 10"),
            "{}",
            built.sql
        );
        assert_eq!(
            built.args,
            vec![SqlArg::Int(10), SqlArg::Text("%ad%".to_string())]
        );
    }

    #[test]
    fn test_sort_by_password_is_rejected() {
        let params = UserListParams {
            sort: OneColumnSort {
                column: "Password".to_string(),
                order: String::new(),
            },
            ..Default::default()
        };
        let err = build_list_query(&params).unwrap_err();
        assert!(matches!(err, UserError::Unprocessable(ref m) if m == "can't sort by column Password"));
    }

    #[tokio::test]
    async fn test_blocking_hash_roundtrip() {
        let hash = hash_blocking("s3cret".to_string()).await.unwrap();
        assert!(verify_blocking("s3cret".to_string(), hash.clone()).await.unwrap());
        assert!(!verify_blocking("other".to_string(), hash).await.unwrap());
    }
}
