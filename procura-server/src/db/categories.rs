use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct MaterialCategory {
    pub id: i64,
    pub name: String,
    pub created_at: i64,
}

pub async fn create(pool: &PgPool, name: &str, now: i64) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO material_categories (name, created_at) VALUES ($1, $2) RETURNING id",
    )
    .bind(name)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<MaterialCategory>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM material_categories WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<MaterialCategory>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM material_categories ORDER BY name")
        .fetch_all(pool)
        .await
}
