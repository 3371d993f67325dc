use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SocialAccount {
    pub id: i64,
    pub user_id: i64,
    pub provider: String,
    pub provider_user_id: String,
    pub email: Option<String>,
    pub created_at: i64,
}

pub async fn find_by_provider_pair(
    pool: &PgPool,
    provider: &str,
    provider_user_id: &str,
) -> Result<Option<SocialAccount>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM social_accounts WHERE provider = $1 AND provider_user_id = $2")
        .bind(provider)
        .bind(provider_user_id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_user(pool: &PgPool, user_id: i64) -> Result<Vec<SocialAccount>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM social_accounts WHERE user_id = $1 ORDER BY id")
        .bind(user_id)
        .fetch_all(pool)
        .await
}

pub async fn create(
    pool: &PgPool,
    user_id: i64,
    provider: &str,
    provider_user_id: &str,
    email: Option<&str>,
    now: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO social_accounts (user_id, provider, provider_user_id, email, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(provider)
    .bind(provider_user_id)
    .bind(email)
    .bind(now)
    .execute(pool)
    .await?;
    Ok(())
}

/// Replace any existing link for this user+provider with a new one.
pub async fn replace_link(
    pool: &PgPool,
    user_id: i64,
    provider: &str,
    provider_user_id: &str,
    email: Option<&str>,
    now: i64,
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;
    sqlx::query("DELETE FROM social_accounts WHERE user_id = $1 AND provider = $2")
        .bind(user_id)
        .bind(provider)
        .execute(&mut *tx)
        .await?;
    sqlx::query(
        "INSERT INTO social_accounts (user_id, provider, provider_user_id, email, created_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(user_id)
    .bind(provider)
    .bind(provider_user_id)
    .bind(email)
    .bind(now)
    .execute(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok(())
}

/// Returns `true` if a link existed and was removed.
pub async fn delete_for_user_provider(
    pool: &PgPool,
    user_id: i64,
    provider: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM social_accounts WHERE user_id = $1 AND provider = $2")
        .bind(user_id)
        .bind(provider)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
