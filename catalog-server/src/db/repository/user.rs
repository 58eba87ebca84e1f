//! Admin User Repository

use super::{RepoError, RepoResult};
use shared::models::User;
use sqlx::SqlitePool;

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let user = sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash, created_at FROM users WHERE username = ?",
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn create(pool: &SqlitePool, username: &str, password_hash: &str) -> RepoResult<User> {
    let now = shared::util::now_millis();
    sqlx::query("INSERT INTO users (username, password_hash, created_at) VALUES (?, ?, ?)")
        .bind(username)
        .bind(password_hash)
        .bind(now)
        .execute(pool)
        .await?;
    find_by_username(pool, username)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}
