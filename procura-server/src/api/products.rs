//! Supplier product catalog

use axum::{
    Extension,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::util::{format_amount, now_millis};

use crate::auth::AuthUser;
use crate::db::{categories, products};
use crate::state::AppState;

use super::{ApiResult, CreatedResult, created, internal, load_actor, ok};

#[derive(Deserialize)]
pub struct ListQuery {
    pub supplier_id: Option<i64>,
    pub category_id: Option<i64>,
}

#[derive(Serialize)]
pub struct ProductsPayload {
    pub products: Vec<products::Product>,
}

/// GET /api/products
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> ApiResult<ProductsPayload> {
    let products = products::list(&state.pool, query.supplier_id, query.category_id)
        .await
        .map_err(internal)?;
    ok(ProductsPayload { products })
}

#[derive(Serialize)]
pub struct ProductPayload {
    pub product: products::Product,
}

/// GET /api/products/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<ProductPayload> {
    let product = products::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    ok(ProductPayload { product })
}

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub unit: String,
    pub category_id: Option<i64>,
    pub description: Option<String>,
    /// Indicative price as a decimal string, e.g. "12.50"
    pub unit_price: Option<String>,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_currency() -> String {
    "AUD".to_string()
}

/// POST /api/products (supplier only, always for own profile)
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    axum::Json(req): axum::Json<CreateProductRequest>,
) -> CreatedResult<ProductPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let supplier_id = actor.require_supplier_profile()?;

    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }
    let unit = req.unit.trim();
    if unit.is_empty() {
        return Err(AppError::validation("unit must not be empty"));
    }
    let unit_price = match req.unit_price.as_deref() {
        Some(raw) => {
            let price: Decimal = raw
                .trim()
                .parse()
                .map_err(|_| AppError::validation("unit_price must be a decimal string"))?;
            if price < Decimal::ZERO {
                return Err(AppError::validation("unit_price must not be negative"));
            }
            Some(format_amount(price))
        }
        None => None,
    };
    if let Some(category_id) = req.category_id
        && categories::find_by_id(&state.pool, category_id)
            .await
            .map_err(internal)?
            .is_none()
    {
        return Err(AppError::new(ErrorCode::CategoryNotFound));
    }

    let id = products::create(
        &state.pool,
        supplier_id,
        req.category_id,
        name,
        req.description.as_deref(),
        unit,
        unit_price.as_deref(),
        req.currency.trim(),
        now_millis(),
    )
    .await
    .map_err(internal)?;

    let product = products::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::InternalError))?;
    created(ProductPayload { product })
}
