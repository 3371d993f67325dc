use serde::Serialize;
use sqlx::PgPool;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Quote {
    pub id: i64,
    pub rfq_id: i64,
    pub supplier_id: i64,
    pub currency: String,
    pub total_price: String,
    pub validity_until: Option<i64>,
    pub status: String,
    pub created_at: i64,
}

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct QuoteItem {
    pub id: i64,
    pub quote_id: i64,
    pub rfq_item_id: i64,
    pub unit_price: String,
    pub quantity: String,
    pub subtotal: String,
}

/// Line values computed by the quote handler before insertion.
#[derive(Debug, Clone)]
pub struct NewQuoteItem {
    pub rfq_item_id: i64,
    pub unit_price: String,
    pub quantity: String,
    pub subtotal: String,
}

/// Insert a quote and its line items in one transaction.
pub async fn create_with_items(
    pool: &PgPool,
    rfq_id: i64,
    supplier_id: i64,
    currency: &str,
    total_price: &str,
    validity_until: Option<i64>,
    items: &[NewQuoteItem],
    now: i64,
) -> Result<i64, sqlx::Error> {
    let mut tx = pool.begin().await?;

    let quote_id: i64 = sqlx::query_scalar(
        "INSERT INTO quotes
             (rfq_id, supplier_id, currency, total_price, validity_until, status, created_at)
         VALUES ($1, $2, $3, $4, $5, 'PENDING', $6)
         RETURNING id",
    )
    .bind(rfq_id)
    .bind(supplier_id)
    .bind(currency)
    .bind(total_price)
    .bind(validity_until)
    .bind(now)
    .fetch_one(&mut *tx)
    .await?;

    for item in items {
        sqlx::query(
            "INSERT INTO quote_items (quote_id, rfq_item_id, unit_price, quantity, subtotal)
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(quote_id)
        .bind(item.rfq_item_id)
        .bind(&item.unit_price)
        .bind(&item.quantity)
        .bind(&item.subtotal)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(quote_id)
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Quote>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM quotes WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_rfq(pool: &PgPool, rfq_id: i64) -> Result<Vec<Quote>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM quotes WHERE rfq_id = $1 ORDER BY id DESC")
        .bind(rfq_id)
        .fetch_all(pool)
        .await
}

pub async fn list_for_supplier(pool: &PgPool, supplier_id: i64) -> Result<Vec<Quote>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM quotes WHERE supplier_id = $1 ORDER BY id DESC")
        .bind(supplier_id)
        .fetch_all(pool)
        .await
}

pub async fn update_status(pool: &PgPool, id: i64, status: &str) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE quotes SET status = $2 WHERE id = $1")
        .bind(id)
        .bind(status)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn list_items(pool: &PgPool, quote_id: i64) -> Result<Vec<QuoteItem>, sqlx::Error> {
    sqlx::query_as("SELECT * FROM quote_items WHERE quote_id = $1 ORDER BY id")
        .bind(quote_id)
        .fetch_all(pool)
        .await
}
