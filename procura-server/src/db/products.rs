use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Product {
    pub id: i64,
    pub supplier_id: i64,
    pub category_id: Option<i64>,
    pub name: String,
    pub description: Option<String>,
    pub unit: String,
    pub unit_price: Option<String>,
    pub currency: String,
    pub created_at: i64,
}

#[allow(clippy::too_many_arguments)]
pub async fn create(
    pool: &PgPool,
    supplier_id: i64,
    category_id: Option<i64>,
    name: &str,
    description: Option<&str>,
    unit: &str,
    unit_price: Option<&str>,
    currency: &str,
    now: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO products
             (supplier_id, category_id, name, description, unit, unit_price, currency, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING id",
    )
    .bind(supplier_id)
    .bind(category_id)
    .bind(name)
    .bind(description)
    .bind(unit)
    .bind(unit_price)
    .bind(currency)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// List products, optionally narrowed to one supplier and/or one category.
pub async fn list(
    pool: &PgPool,
    supplier_id: Option<i64>,
    category_id: Option<i64>,
) -> Result<Vec<Product>, sqlx::Error> {
    sqlx::query_as(
        "SELECT * FROM products
         WHERE ($1::BIGINT IS NULL OR supplier_id = $1)
           AND ($2::BIGINT IS NULL OR category_id = $2)
         ORDER BY id DESC",
    )
    .bind(supplier_id)
    .bind(category_id)
    .fetch_all(pool)
    .await
}
