//! RFQ lifecycle: draft, line items, submission

use axum::{
    Extension,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{RfqStatus, Role};
use shared::util::now_millis;

use crate::auth::AuthUser;
use crate::db::{products, quotes as quotes_db, rfqs};
use crate::state::AppState;

use super::quotes::QuoteDetail;
use super::{Actor, ApiResult, CreatedResult, created, internal, load_actor, ok};

#[derive(Serialize)]
pub struct RfqsPayload {
    pub rfqs: Vec<rfqs::Rfq>,
}

#[derive(Serialize)]
pub struct RfqPayload {
    pub rfq: rfqs::Rfq,
    pub items: Vec<rfqs::RfqItem>,
    pub quotes: Vec<QuoteDetail>,
}

#[derive(Serialize)]
pub struct RfqItemPayload {
    pub item: rfqs::RfqItem,
}

#[derive(Deserialize)]
pub struct CreateRfqRequest {
    #[serde(default = "default_currency")]
    pub currency: String,
    pub notes: Option<String>,
    pub required_by: Option<i64>,
    /// Initial line items, appended in order
    #[serde(default)]
    pub items: Vec<AddItemRequest>,
}

fn default_currency() -> String {
    "AUD".to_string()
}

/// POST /api/rfqs (buyer only, created as DRAFT)
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    axum::Json(req): axum::Json<CreateRfqRequest>,
) -> CreatedResult<RfqPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    if !actor.role.is_buyer() {
        return Err(AppError::forbidden("buyer role required"));
    }
    let currency = req.currency.trim();
    if currency.is_empty() {
        return Err(AppError::validation("currency must not be empty"));
    }

    // Validate every item up front so a bad one leaves nothing behind.
    let mut items = Vec::with_capacity(req.items.len());
    for item in &req.items {
        items.push(validate_item(&state, item).await?);
    }

    let id = rfqs::create(
        &state.pool,
        actor.user_id,
        currency,
        req.notes.as_deref(),
        req.required_by,
        now_millis(),
    )
    .await
    .map_err(internal)?;

    for item in &items {
        rfqs::add_item(
            &state.pool,
            id,
            item.product_id,
            &item.description,
            &item.quantity,
            &item.unit,
        )
        .await
        .map_err(internal)?;
    }

    load_detail(&state, id).await.and_then(created)
}

#[derive(Deserialize)]
pub struct ListRfqsQuery {
    pub status: Option<String>,
    pub buyer_id: Option<i64>,
}

/// GET /api/rfqs
///
/// Buyers see their own RFQs, suppliers the open pool, admins everything.
/// `status` and `buyer_id` narrow the role-scoped set further.
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListRfqsQuery>,
) -> ApiResult<RfqsPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let mut rfqs = match actor.role {
        Role::Buyer => rfqs::list_for_buyer(&state.pool, actor.user_id).await,
        Role::Supplier => rfqs::list_open(&state.pool).await,
        Role::Admin => rfqs::list_all(&state.pool).await,
    }
    .map_err(internal)?;

    if let Some(status) = query.status.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        let status = status.to_uppercase();
        rfqs.retain(|r| r.status == status);
    }
    if let Some(buyer_id) = query.buyer_id {
        rfqs.retain(|r| r.buyer_id == buyer_id);
    }
    ok(RfqsPayload { rfqs })
}

/// GET /api/rfqs/{id}
///
/// Detail view: header, line items and the quotes received so far. A
/// supplier sees only their own quote; buyers and admins see them all.
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<RfqPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let rfq = find_visible(&state, &actor, id).await?;
    let items = rfqs::list_items(&state.pool, rfq.id)
        .await
        .map_err(internal)?;
    let quotes = match actor.role {
        Role::Supplier => match actor.supplier_profile_id {
            Some(supplier_id) => load_quotes(&state, rfq.id, Some(supplier_id)).await?,
            None => Vec::new(),
        },
        Role::Buyer | Role::Admin => load_quotes(&state, rfq.id, None).await?,
    };
    ok(RfqPayload { rfq, items, quotes })
}

#[derive(Deserialize)]
pub struct UpdateRfqRequest {
    pub currency: Option<String>,
    pub notes: Option<String>,
    pub required_by: Option<i64>,
}

/// PATCH /api/rfqs/{id} (owner, DRAFT only)
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    axum::Json(req): axum::Json<UpdateRfqRequest>,
) -> ApiResult<RfqPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let rfq = find_owned(&state, &actor, id).await?;
    require_draft(&rfq)?;

    if req.currency.is_none() && req.notes.is_none() && req.required_by.is_none() {
        return Err(AppError::new(ErrorCode::NoFieldsToUpdate));
    }
    let currency = match req.currency.as_deref().map(str::trim) {
        Some("") => return Err(AppError::validation("currency must not be empty")),
        other => other,
    };

    rfqs::update_fields(&state.pool, rfq.id, currency, req.notes.as_deref(), req.required_by)
        .await
        .map_err(internal)?;

    load_detail(&state, rfq.id).await.and_then(ok)
}

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub description: String,
    /// Decimal string, must be positive
    pub quantity: String,
    pub unit: String,
    pub product_id: Option<i64>,
}

/// POST /api/rfqs/{id}/items (owner, DRAFT only)
pub async fn add_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    axum::Json(req): axum::Json<AddItemRequest>,
) -> CreatedResult<RfqItemPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let rfq = find_owned(&state, &actor, id).await?;
    require_draft(&rfq)?;

    let item = validate_item(&state, &req).await?;
    let item_id = rfqs::add_item(
        &state.pool,
        rfq.id,
        item.product_id,
        &item.description,
        &item.quantity,
        &item.unit,
    )
    .await
    .map_err(internal)?;

    let item = rfqs::find_item(&state.pool, rfq.id, item_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::InternalError))?;
    created(RfqItemPayload { item })
}

/// DELETE /api/rfqs/{id}/items/{item_id} (owner, DRAFT only)
pub async fn delete_item(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path((id, item_id)): Path<(i64, i64)>,
) -> ApiResult<RfqPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let rfq = find_owned(&state, &actor, id).await?;
    require_draft(&rfq)?;

    let removed = rfqs::delete_item(&state.pool, rfq.id, item_id)
        .await
        .map_err(internal)?;
    if !removed {
        return Err(AppError::new(ErrorCode::RfqItemNotFound));
    }

    load_detail(&state, rfq.id).await.and_then(ok)
}

/// POST /api/rfqs/{id}/submit (owner, DRAFT -> OPEN)
pub async fn submit(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<RfqPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let rfq = find_owned(&state, &actor, id).await?;

    let items = rfqs::list_items(&state.pool, rfq.id)
        .await
        .map_err(internal)?;
    if items.is_empty() {
        return Err(AppError::validation("cannot submit an RFQ without items"));
    }

    let moved = rfqs::update_status_if(
        &state.pool,
        rfq.id,
        RfqStatus::Draft.as_str(),
        RfqStatus::Open.as_str(),
    )
    .await
    .map_err(internal)?;
    if !moved {
        return Err(AppError::new(ErrorCode::RfqNotDraft));
    }

    load_detail(&state, rfq.id).await.and_then(ok)
}

// ── Helpers ──

/// Validated line-item fields, normalized for storage.
struct ValidItem {
    description: String,
    quantity: String,
    unit: String,
    product_id: Option<i64>,
}

async fn validate_item(state: &AppState, req: &AddItemRequest) -> Result<ValidItem, AppError> {
    let description = req.description.trim();
    if description.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RfqInvalidItem,
            "description must not be empty",
        ));
    }
    let unit = req.unit.trim();
    if unit.is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RfqInvalidItem,
            "unit must not be empty",
        ));
    }
    let quantity: Decimal = req
        .quantity
        .trim()
        .parse()
        .map_err(|_| AppError::with_message(ErrorCode::RfqInvalidItem, "quantity must be a decimal string"))?;
    if quantity <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::RfqInvalidItem,
            "quantity must be positive",
        ));
    }
    if let Some(product_id) = req.product_id
        && products::find_by_id(&state.pool, product_id)
            .await
            .map_err(internal)?
            .is_none()
    {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }

    Ok(ValidItem {
        description: description.to_string(),
        quantity: quantity.to_string(),
        unit: unit.to_string(),
        product_id: req.product_id,
    })
}

async fn load_quotes(
    state: &AppState,
    rfq_id: i64,
    supplier_scope: Option<i64>,
) -> Result<Vec<QuoteDetail>, AppError> {
    let rows = quotes_db::list_for_rfq(&state.pool, rfq_id)
        .await
        .map_err(internal)?;
    let mut out = Vec::with_capacity(rows.len());
    for quote in rows {
        if let Some(supplier_id) = supplier_scope
            && quote.supplier_id != supplier_id
        {
            continue;
        }
        let items = quotes_db::list_items(&state.pool, quote.id)
            .await
            .map_err(internal)?;
        out.push(QuoteDetail { quote, items });
    }
    Ok(out)
}

async fn load_detail(state: &AppState, id: i64) -> Result<RfqPayload, AppError> {
    let rfq = rfqs::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::RfqNotFound))?;
    let items = rfqs::list_items(&state.pool, id)
        .await
        .map_err(internal)?;
    let quotes = load_quotes(state, id, None).await?;
    Ok(RfqPayload { rfq, items, quotes })
}

/// RFQ visible to the caller: owner or admin always, suppliers once it left DRAFT.
async fn find_visible(state: &AppState, actor: &Actor, id: i64) -> Result<rfqs::Rfq, AppError> {
    let rfq = rfqs::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::RfqNotFound))?;
    check_read_access(actor, &rfq)?;
    Ok(rfq)
}

fn check_read_access(actor: &Actor, rfq: &rfqs::Rfq) -> Result<(), AppError> {
    let visible = match actor.role {
        Role::Admin => true,
        Role::Buyer => rfq.buyer_id == actor.user_id,
        Role::Supplier => rfq.status != RfqStatus::Draft.as_str(),
    };
    if !visible {
        return Err(AppError::forbidden("not your RFQ"));
    }
    Ok(())
}

/// RFQ writable by the caller: owning buyer or admin.
async fn find_owned(state: &AppState, actor: &Actor, id: i64) -> Result<rfqs::Rfq, AppError> {
    let rfq = rfqs::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::RfqNotFound))?;

    match actor.role {
        Role::Admin => Ok(rfq),
        Role::Buyer if rfq.buyer_id == actor.user_id => Ok(rfq),
        Role::Buyer => Err(AppError::forbidden("not your RFQ")),
        Role::Supplier => Err(AppError::new(ErrorCode::PermissionDenied)),
    }
}

fn require_draft(rfq: &rfqs::Rfq) -> Result<(), AppError> {
    let mutable = RfqStatus::from_db(&rfq.status).is_some_and(|s| s.allows_item_mutation());
    if !mutable {
        return Err(AppError::new(ErrorCode::RfqNotDraft));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn actor(role: Role, user_id: i64) -> Actor {
        Actor {
            user_id,
            role,
            supplier_profile_id: None,
        }
    }

    fn rfq(buyer_id: i64, status: &str) -> rfqs::Rfq {
        rfqs::Rfq {
            id: 1,
            buyer_id,
            status: status.to_string(),
            currency: "AUD".to_string(),
            notes: None,
            required_by: None,
            created_at: 0,
        }
    }

    #[test]
    fn test_owner_admin_and_open_pool_readable() {
        assert!(check_read_access(&actor(Role::Buyer, 5), &rfq(5, "DRAFT")).is_ok());
        assert!(check_read_access(&actor(Role::Admin, 1), &rfq(5, "DRAFT")).is_ok());
        assert!(check_read_access(&actor(Role::Supplier, 9), &rfq(5, "OPEN")).is_ok());
    }

    #[test]
    fn test_foreign_rfq_read_is_forbidden() {
        let err = check_read_access(&actor(Role::Buyer, 6), &rfq(5, "OPEN")).unwrap_err();
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);

        // Drafts have not been published to suppliers yet.
        let err = check_read_access(&actor(Role::Supplier, 9), &rfq(5, "DRAFT")).unwrap_err();
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);
    }
}
