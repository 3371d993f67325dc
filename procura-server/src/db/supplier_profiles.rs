use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct SupplierProfile {
    pub id: i64,
    pub user_id: i64,
    pub company_name: String,
    pub created_at: i64,
}

pub async fn create(
    pool: &PgPool,
    user_id: i64,
    company_name: &str,
    now: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO supplier_profiles (user_id, company_name, created_at)
         VALUES ($1, $2, $3)
         RETURNING id",
    )
    .bind(user_id)
    .bind(company_name)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<SupplierProfile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM supplier_profiles WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_user(
    pool: &PgPool,
    user_id: i64,
) -> Result<Option<SupplierProfile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM supplier_profiles WHERE user_id = $1")
        .bind(user_id)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<SupplierProfile>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM supplier_profiles ORDER BY company_name")
        .fetch_all(pool)
        .await
}
