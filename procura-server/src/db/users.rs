use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip)]
    pub hashed_password: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub status: String,
    pub created_at: i64,
}

/// Caller identity resolved once per request: role plus the supplier
/// profile id when the user is a supplier.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserContext {
    pub id: i64,
    pub role: String,
    pub status: String,
    pub supplier_profile_id: Option<i64>,
}

pub async fn create(
    pool: &PgPool,
    email: &str,
    hashed_password: Option<&str>,
    first_name: &str,
    last_name: &str,
    role: &str,
    now: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO users (email, hashed_password, first_name, last_name, role, status, created_at)
         VALUES ($1, $2, $3, $4, $5, 'ACTIVE', $6)
         RETURNING id",
    )
    .bind(email)
    .bind(hashed_password)
    .bind(first_name)
    .bind(last_name)
    .bind(role)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_context(pool: &PgPool, id: i64) -> Result<Option<UserContext>, sqlx::Error> {
    sqlx::query_as(
        "SELECT u.id, u.role, u.status, sp.id AS supplier_profile_id
         FROM users u
         LEFT JOIN supplier_profiles sp ON sp.user_id = u.id
         WHERE u.id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}
