use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Order {
    pub id: i64,
    pub quote_id: i64,
    pub buyer_id: i64,
    pub supplier_id: i64,
    pub total_amount: String,
    pub currency: String,
    pub status: String,
    pub created_at: i64,
}

pub async fn create(
    pool: &PgPool,
    quote_id: i64,
    buyer_id: i64,
    supplier_id: i64,
    total_amount: &str,
    currency: &str,
    now: i64,
) -> Result<Order, sqlx::Error> {
    sqlx::query_as(
        "INSERT INTO orders
             (quote_id, buyer_id, supplier_id, total_amount, currency, status, created_at)
         VALUES ($1, $2, $3, $4, $5, 'PENDING', $6)
         RETURNING *",
    )
    .bind(quote_id)
    .bind(buyer_id)
    .bind(supplier_id)
    .bind(total_amount)
    .bind(currency)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_buyer(pool: &PgPool, buyer_id: i64) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE buyer_id = $1 ORDER BY id DESC")
        .bind(buyer_id)
        .fetch_all(pool)
        .await
}

pub async fn list_for_supplier(
    pool: &PgPool,
    supplier_id: i64,
) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders WHERE supplier_id = $1 ORDER BY id DESC")
        .bind(supplier_id)
        .fetch_all(pool)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Order>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM orders ORDER BY id DESC")
        .fetch_all(pool)
        .await
}

/// Atomic conditional transition. Returns the updated row only when the
/// order was still in `from` at update time; a lost race returns `None`.
pub async fn update_status_if(
    pool: &PgPool,
    id: i64,
    from: &str,
    to: &str,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as("UPDATE orders SET status = $3 WHERE id = $1 AND status = $2 RETURNING *")
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(pool)
        .await
}

/// Admin patch: any subset of status / total_amount / currency.
pub async fn admin_update(
    pool: &PgPool,
    id: i64,
    status: Option<&str>,
    total_amount: Option<&str>,
    currency: Option<&str>,
) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as(
        "UPDATE orders SET
             status = COALESCE($2, status),
             total_amount = COALESCE($3, total_amount),
             currency = COALESCE($4, currency)
         WHERE id = $1
         RETURNING *",
    )
    .bind(id)
    .bind(status)
    .bind(total_amount)
    .bind(currency)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM orders WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
