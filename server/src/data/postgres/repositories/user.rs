//! User repository for PostgreSQL operations
//!
//! Plain database access. Caching and business rules live in
//! [`crate::domain::users::UserService`].

use sqlx::PgPool;

use crate::data::postgres::PostgresError;
use crate::data::postgres::bind::bind_args;
use crate::data::sql::BuiltQuery;
use crate::data::types::{USER_COLUMNS, UserRow, UserTuple};

fn returning() -> String {
    USER_COLUMNS.join(", ")
}

/// Insert a user. `password` must already be hashed.
pub async fn insert_user(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
) -> Result<UserRow, PostgresError> {
    let sql = format!(
        "INSERT INTO users (email, password, firstname, lastname) VALUES ($1, $2, $3, $4) RETURNING {}",
        returning()
    );
    let row = sqlx::query_as::<_, UserTuple>(&sql)
        .bind(email)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .fetch_one(pool)
        .await?;

    Ok(row.into())
}

pub async fn get_user(pool: &PgPool, id: i64) -> Result<Option<UserRow>, PostgresError> {
    let sql = format!("SELECT {} FROM users WHERE id = $1 LIMIT 1", returning());
    let row = sqlx::query_as::<_, UserTuple>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(UserRow::from))
}

pub async fn get_user_by_email(
    pool: &PgPool,
    email: &str,
) -> Result<Option<UserRow>, PostgresError> {
    let sql = format!("SELECT {} FROM users WHERE email = $1 LIMIT 1", returning());
    let row = sqlx::query_as::<_, UserTuple>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(UserRow::from))
}

/// Overwrite the mutable columns of a user, returning the stored row
pub async fn update_user(
    pool: &PgPool,
    id: i64,
    password_hash: &str,
    first_name: &str,
    last_name: &str,
) -> Result<Option<UserRow>, PostgresError> {
    let sql = format!(
        "UPDATE users SET password = $1, firstname = $2, lastname = $3, updated_at = NOW() \
         WHERE id = $4 RETURNING {}",
        returning()
    );
    let row = sqlx::query_as::<_, UserTuple>(&sql)
        .bind(password_hash)
        .bind(first_name)
        .bind(last_name)
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(UserRow::from))
}

/// Delete a user, returning whether a row was removed
pub async fn delete_user(pool: &PgPool, id: i64) -> Result<bool, PostgresError> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Run a rendered user listing
pub async fn list_users(pool: &PgPool, query: &BuiltQuery) -> Result<Vec<UserRow>, PostgresError> {
    let rows = bind_args(sqlx::query_as::<_, UserTuple>(&query.sql), &query.args)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(UserRow::from).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_returning_lists_every_user_column() {
        assert_eq!(
            returning(),
            "id, email, password, description, firstname, lastname, created_at, updated_at"
        );
    }
}
