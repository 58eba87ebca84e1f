//! Admin authentication
//!
//! - [`JwtService`]: bearer token issuance and validation
//! - [`require_auth`]: middleware gating write endpoints
//! - [`password`]: Argon2 hashing

pub mod jwt;
pub mod middleware;
pub mod password;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::require_auth;

use crate::db::repository::user;
use shared::error::{AppError, AppResult};
use sqlx::SqlitePool;

/// Create the admin account if it does not exist yet
///
/// An existing account is left untouched, including its password.
pub async fn bootstrap_admin(pool: &SqlitePool, username: &str, password: &str) -> AppResult<()> {
    if user::find_by_username(pool, username).await?.is_some() {
        tracing::debug!(username, "Admin account already present");
        return Ok(());
    }
    let hash = password::hash_password(password)
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;
    user::create(pool, username, &hash).await?;
    tracing::info!(username, "Admin account created");
    Ok(())
}

/// Check credentials and issue a token
pub async fn login(
    pool: &SqlitePool,
    jwt: &JwtService,
    username: &str,
    password: &str,
) -> AppResult<String> {
    let Some(account) = user::find_by_username(pool, username).await? else {
        tracing::warn!(target: "security", username, "login_unknown_user");
        return Err(AppError::invalid_credentials());
    };
    if !password::verify_password(password, &account.password_hash) {
        tracing::warn!(target: "security", username, "login_bad_password");
        return Err(AppError::invalid_credentials());
    }
    jwt.generate_token(account.id, &account.username)
        .map_err(|e| AppError::internal(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use shared::error::ErrorCode;

    #[tokio::test]
    async fn test_bootstrap_and_login() {
        let db = DbService::in_memory().await.unwrap();
        bootstrap_admin(&db.pool, "admin", "pw").await.unwrap();
        // second run keeps the original password
        bootstrap_admin(&db.pool, "admin", "other").await.unwrap();

        let jwt = JwtService::with_config(JwtConfig::new("secret-for-tests-0123456789abcdef", 1));
        let token = login(&db.pool, &jwt, "admin", "pw").await.unwrap();
        assert_eq!(jwt.validate_token(&token).unwrap().username, "admin");

        let err = login(&db.pool, &jwt, "admin", "other").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
        let err = login(&db.pool, &jwt, "ghost", "pw").await.unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidCredentials);
    }
}
