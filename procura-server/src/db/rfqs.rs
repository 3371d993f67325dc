use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Rfq {
    pub id: i64,
    pub buyer_id: i64,
    pub status: String,
    pub currency: String,
    pub notes: Option<String>,
    pub required_by: Option<i64>,
    pub created_at: i64,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct RfqItem {
    pub id: i64,
    pub rfq_id: i64,
    pub product_id: Option<i64>,
    pub description: String,
    pub quantity: String,
    pub unit: String,
}

pub async fn create(
    pool: &PgPool,
    buyer_id: i64,
    currency: &str,
    notes: Option<&str>,
    required_by: Option<i64>,
    now: i64,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO rfqs (buyer_id, status, currency, notes, required_by, created_at)
         VALUES ($1, 'DRAFT', $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(buyer_id)
    .bind(currency)
    .bind(notes)
    .bind(required_by)
    .bind(now)
    .fetch_one(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Rfq>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM rfqs WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_buyer(pool: &PgPool, buyer_id: i64) -> Result<Vec<Rfq>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM rfqs WHERE buyer_id = $1 ORDER BY id DESC")
        .bind(buyer_id)
        .fetch_all(pool)
        .await
}

/// Suppliers browse the open RFQ pool.
pub async fn list_open(pool: &PgPool) -> Result<Vec<Rfq>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM rfqs WHERE status = 'OPEN' ORDER BY id DESC")
        .fetch_all(pool)
        .await
}

pub async fn list_all(pool: &PgPool) -> Result<Vec<Rfq>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM rfqs ORDER BY id DESC")
        .fetch_all(pool)
        .await
}

pub async fn update_fields(
    pool: &PgPool,
    id: i64,
    currency: Option<&str>,
    notes: Option<&str>,
    required_by: Option<i64>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE rfqs SET
             currency = COALESCE($2, currency),
             notes = COALESCE($3, notes),
             required_by = COALESCE($4, required_by)
         WHERE id = $1",
    )
    .bind(id)
    .bind(currency)
    .bind(notes)
    .bind(required_by)
    .execute(pool)
    .await?;
    Ok(())
}

/// Conditional status move; returns `true` only when the row was still in
/// `from` at update time.
pub async fn update_status_if(
    pool: &PgPool,
    id: i64,
    from: &str,
    to: &str,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE rfqs SET status = $3 WHERE id = $1 AND status = $2")
        .bind(id)
        .bind(from)
        .bind(to)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn add_item(
    pool: &PgPool,
    rfq_id: i64,
    product_id: Option<i64>,
    description: &str,
    quantity: &str,
    unit: &str,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(
        "INSERT INTO rfq_items (rfq_id, product_id, description, quantity, unit)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(rfq_id)
    .bind(product_id)
    .bind(description)
    .bind(quantity)
    .bind(unit)
    .fetch_one(pool)
    .await
}

pub async fn list_items(pool: &PgPool, rfq_id: i64) -> Result<Vec<RfqItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM rfq_items WHERE rfq_id = $1 ORDER BY id")
        .bind(rfq_id)
        .fetch_all(pool)
        .await
}

pub async fn find_item(
    pool: &PgPool,
    rfq_id: i64,
    item_id: i64,
) -> Result<Option<RfqItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM rfq_items WHERE id = $1 AND rfq_id = $2")
        .bind(item_id)
        .bind(rfq_id)
        .fetch_optional(pool)
        .await
}

/// Returns `true` if the item existed on this RFQ and was removed.
pub async fn delete_item(pool: &PgPool, rfq_id: i64, item_id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM rfq_items WHERE id = $1 AND rfq_id = $2")
        .bind(item_id)
        .bind(rfq_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
