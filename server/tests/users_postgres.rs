//! User service against a live PostgreSQL
//!
//! Runs only when `USERBASE_TEST_POSTGRES_URL` points at a disposable
//! database. Connecting applies the embedded migrations.

use std::sync::Arc;

use userbase_server::core::config::{CacheConfig, PostgresConfig};
use userbase_server::data::{CacheService, PostgresService};
use userbase_server::domain::{NewUser, UserError, UserService};

const ENV_TEST_POSTGRES_URL: &str = "USERBASE_TEST_POSTGRES_URL";

async fn connect() -> Option<(PostgresService, UserService)> {
    let Ok(url) = std::env::var(ENV_TEST_POSTGRES_URL) else {
        eprintln!("{} not set, skipping", ENV_TEST_POSTGRES_URL);
        return None;
    };

    let config = PostgresConfig {
        url,
        ..Default::default()
    };
    let database = PostgresService::init(&config).await.unwrap();
    let cache = Arc::new(CacheService::new(&CacheConfig::default()).await.unwrap());
    let users = UserService::new(database.pool().clone(), cache);
    Some((database, users))
}

fn new_user() -> NewUser {
    NewUser {
        email: format!("user-{}@example.com", rand::random::<u64>()),
        password: "correct horse".to_string(),
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
    }
}

#[tokio::test]
async fn test_users_table_exists_after_migrations() {
    let Some((database, _)) = connect().await else {
        return;
    };
    assert!(database.table_exists("users").await.unwrap());
    assert!(!database.table_exists("no_such_table").await.unwrap());
}

#[tokio::test]
async fn test_delete_missing_user_is_not_found() {
    let Some((_, users)) = connect().await else {
        return;
    };
    let err = users.delete(i64::MAX).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(_)), "{:?}", err);
}

#[tokio::test]
async fn test_second_delete_is_not_found() {
    let Some((_, users)) = connect().await else {
        return;
    };
    let user = users.create(new_user()).await.unwrap();

    users.delete(user.id).await.unwrap();
    let err = users.delete(user.id).await.unwrap_err();
    assert!(matches!(err, UserError::NotFound(_)), "{:?}", err);
    assert!(matches!(
        users.get(user.id).await.unwrap_err(),
        UserError::NotFound(_)
    ));
}
