//! Order lifecycle: conversion from quotes, status transitions, deletion

use axum::{
    Extension,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::{NotificationKind, OrderStatus, QuoteStatus, Role};
use shared::util::{format_amount, now_millis};

use crate::auth::AuthUser;
use crate::db::{notifications, orders, quotes, rfqs, supplier_profiles};
use crate::error::ServiceError;
use crate::state::AppState;

use super::{Actor, ApiResult, CreatedResult, created, internal, load_actor, ok};
use super::categories::is_unique_violation;

#[derive(Deserialize)]
pub struct CreateOrderRequest {
    pub quote_id: i64,
}

#[derive(Serialize)]
pub struct OrderPayload {
    pub order: orders::Order,
}

#[derive(Serialize)]
pub struct OrdersPayload {
    pub orders: Vec<orders::Order>,
}

/// POST /api/orders
///
/// Convert a quote into an order. Amount and currency are copied from the
/// quote; the buyer comes from the quoted RFQ. One order per quote.
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    axum::Json(req): axum::Json<CreateOrderRequest>,
) -> CreatedResult<OrderPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    if actor.role.is_supplier() {
        return Err(AppError::forbidden("suppliers cannot create orders"));
    }

    let quote = quotes::find_by_id(&state.pool, req.quote_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::with_message(ErrorCode::QuoteNotFound, "quote_not_found"))?;
    let rfq = rfqs::find_by_id(&state.pool, quote.rfq_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::RfqNotFound))?;

    if actor.role == Role::Buyer && rfq.buyer_id != actor.user_id {
        return Err(AppError::forbidden("cannot convert another buyer's quote"));
    }

    let order = match orders::create(
        &state.pool,
        quote.id,
        rfq.buyer_id,
        quote.supplier_id,
        &quote.total_price,
        &quote.currency,
        now_millis(),
    )
    .await
    {
        Ok(order) => order,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::new(ErrorCode::OrderExistsForQuote));
        }
        Err(e) => return Err(internal(e)),
    };

    quotes::update_status(&state.pool, quote.id, QuoteStatus::Accepted.as_str())
        .await
        .map_err(internal)?;

    notify_order_created(&state, &order).await?;

    created(OrderPayload { order })
}

/// GET /api/orders (scoped by role)
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<OrdersPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let orders = match actor.role {
        Role::Buyer => orders::list_for_buyer(&state.pool, actor.user_id).await,
        Role::Supplier => {
            let supplier_id = actor.require_supplier_profile()?;
            orders::list_for_supplier(&state.pool, supplier_id).await
        }
        Role::Admin => orders::list_all(&state.pool).await,
    }
    .map_err(internal)?;
    ok(OrdersPayload { orders })
}

/// GET /api/orders/{id}
pub async fn get_one(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<OrderPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    let order = find_visible(&state, &actor, id).await?;
    ok(OrderPayload { order })
}

#[derive(Deserialize)]
pub struct UpdateOrderRequest {
    pub status: Option<OrderStatus>,
    /// Admin only, decimal string
    pub total_amount: Option<String>,
    /// Admin only
    pub currency: Option<String>,
}

/// PUT|PATCH /api/orders/{id}
///
/// Suppliers move their own orders along the transition table; admins may
/// patch any field. Buyers cannot update orders.
pub async fn update(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
    axum::Json(req): axum::Json<UpdateOrderRequest>,
) -> ApiResult<OrderPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    match actor.role {
        Role::Buyer => Err(AppError::forbidden("buyers cannot update orders")),
        Role::Supplier => supplier_transition(&state, &actor, id, req).await,
        Role::Admin => admin_patch(&state, id, req).await,
    }
}

async fn supplier_transition(
    state: &AppState,
    actor: &Actor,
    id: i64,
    req: UpdateOrderRequest,
) -> ApiResult<OrderPayload> {
    let supplier_id = actor.require_supplier_profile()?;
    let order = orders::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    if order.supplier_id != supplier_id {
        return Err(AppError::forbidden("not your order"));
    }

    let Some(to) = req.status else {
        return Err(AppError::new(ErrorCode::NoFieldsToUpdate));
    };
    let from = OrderStatus::from_db(&order.status).ok_or_else(|| {
        tracing::error!(order_id = order.id, status = %order.status, "Unknown order status");
        AppError::new(ErrorCode::InternalError)
    })?;
    if !from.supplier_can_transition(to) {
        return Err(transition_error(from, to));
    }

    // Atomic move: a concurrent transition loses the race and is rejected
    // against the status it actually observed.
    let updated = orders::update_status_if(&state.pool, order.id, from.as_str(), to.as_str())
        .await
        .map_err(internal)?;
    let Some(updated) = updated else {
        let current = orders::find_by_id(&state.pool, order.id)
            .await
            .map_err(internal)?
            .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
        let current_status = OrderStatus::from_db(&current.status).unwrap_or(from);
        return Err(transition_error(current_status, to));
    };

    notify_status_updated(state, &updated).await?;

    ok(OrderPayload { order: updated })
}

async fn admin_patch(
    state: &AppState,
    id: i64,
    req: UpdateOrderRequest,
) -> ApiResult<OrderPayload> {
    let order = orders::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    if req.status.is_none() && req.total_amount.is_none() && req.currency.is_none() {
        return Err(AppError::with_message(
            ErrorCode::NoFieldsToUpdate,
            "no_fields_to_update",
        ));
    }

    let total_amount = match req.total_amount.as_deref() {
        Some(raw) => {
            let amount: Decimal = raw
                .trim()
                .parse()
                .map_err(|_| AppError::new(ErrorCode::OrderInvalidAmount))?;
            if amount < Decimal::ZERO {
                return Err(AppError::new(ErrorCode::OrderInvalidAmount));
            }
            Some(format_amount(amount))
        }
        None => None,
    };
    let currency = match req.currency.as_deref().map(str::trim) {
        Some("") => return Err(AppError::validation("currency must not be empty")),
        other => other.map(str::to_string),
    };

    let updated = orders::admin_update(
        &state.pool,
        order.id,
        req.status.map(|s| s.as_str()),
        total_amount.as_deref(),
        currency.as_deref(),
    )
    .await
    .map_err(internal)?
    .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    // Fan out only on an actual status change
    if updated.status != order.status {
        notify_status_updated(state, &updated).await?;
    }

    ok(OrderPayload { order: updated })
}

/// DELETE /api/orders/{id}
///
/// Admins may delete any order; buyers only their own while still PENDING.
pub async fn delete(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> Result<StatusCode, AppError> {
    let actor = load_actor(&state, auth.user_id).await?;
    let order = orders::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let allowed = match actor.role {
        Role::Admin => true,
        Role::Buyer => {
            order.buyer_id == actor.user_id
                && OrderStatus::from_db(&order.status).is_some_and(|s| s.buyer_can_delete())
        }
        Role::Supplier => false,
    };
    if !allowed {
        return Err(AppError::forbidden("cannot delete this order"));
    }

    orders::delete(&state.pool, order.id)
        .await
        .map_err(internal)?;

    Ok(StatusCode::NO_CONTENT)
}

// ── Helpers ──

fn transition_error(from: OrderStatus, to: OrderStatus) -> AppError {
    AppError::with_message(
        ErrorCode::InvalidStatusTransition,
        format!("invalid_status_transition: {} -> {}", from.as_str(), to.as_str()),
    )
}

async fn find_visible(state: &AppState, actor: &Actor, id: i64) -> Result<orders::Order, AppError> {
    let order = orders::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    check_access(actor, &order)?;
    Ok(order)
}

/// Admins, the owning buyer and the supplying profile may read an order;
/// anyone else gets 403.
fn check_access(actor: &Actor, order: &orders::Order) -> Result<(), AppError> {
    let allowed = match actor.role {
        Role::Admin => true,
        Role::Buyer => order.buyer_id == actor.user_id,
        Role::Supplier => actor.supplier_profile_id == Some(order.supplier_id),
    };
    if !allowed {
        return Err(AppError::forbidden("not your order"));
    }
    Ok(())
}

/// Notify buyer and supplier user about a freshly created order.
async fn notify_order_created(state: &AppState, order: &orders::Order) -> Result<(), ServiceError> {
    let now = now_millis();
    notifications::create(
        &state.pool,
        order.buyer_id,
        Some(order.id),
        NotificationKind::OrderCreated.as_str(),
        &format!("Order #{} created successfully.", order.id),
        now,
    )
    .await?;

    if let Some(profile) = supplier_profiles::find_by_id(&state.pool, order.supplier_id).await? {
        let company = profile.company_name.trim();
        let message = if company.is_empty() {
            format!("New order #{} received.", order.id)
        } else {
            format!("New order #{} received for {}.", order.id, company)
        };
        notifications::create(
            &state.pool,
            profile.user_id,
            Some(order.id),
            NotificationKind::OrderCreated.as_str(),
            &message,
            now,
        )
        .await?;
    }

    Ok(())
}

/// Notify both parties about a status change.
async fn notify_status_updated(state: &AppState, order: &orders::Order) -> Result<(), ServiceError> {
    let now = now_millis();
    let message = format!("Order #{} status updated to {}.", order.id, order.status);

    notifications::create(
        &state.pool,
        order.buyer_id,
        Some(order.id),
        NotificationKind::OrderStatusUpdated.as_str(),
        &message,
        now,
    )
    .await?;

    if let Some(profile) = supplier_profiles::find_by_id(&state.pool, order.supplier_id).await? {
        notifications::create(
            &state.pool,
            profile.user_id,
            Some(order.id),
            NotificationKind::OrderStatusUpdated.as_str(),
            &message,
            now,
        )
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    fn actor(role: Role, user_id: i64, supplier_profile_id: Option<i64>) -> Actor {
        Actor {
            user_id,
            role,
            supplier_profile_id,
        }
    }

    fn order(buyer_id: i64, supplier_id: i64) -> orders::Order {
        orders::Order {
            id: 1,
            quote_id: 1,
            buyer_id,
            supplier_id,
            total_amount: "100.00".to_string(),
            currency: "AUD".to_string(),
            status: "PENDING".to_string(),
            created_at: 0,
        }
    }

    #[test]
    fn test_owner_and_admin_may_read() {
        let order = order(7, 3);
        assert!(check_access(&actor(Role::Buyer, 7, None), &order).is_ok());
        assert!(check_access(&actor(Role::Supplier, 9, Some(3)), &order).is_ok());
        assert!(check_access(&actor(Role::Admin, 1, None), &order).is_ok());
    }

    #[test]
    fn test_ownership_mismatch_is_forbidden_not_missing() {
        let order = order(7, 3);

        let err = check_access(&actor(Role::Buyer, 8, None), &order).unwrap_err();
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);

        let err = check_access(&actor(Role::Supplier, 9, Some(4)), &order).unwrap_err();
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);

        // A supplier with no profile cannot match any order.
        let err = check_access(&actor(Role::Supplier, 9, None), &order).unwrap_err();
        assert_eq!(err.http_status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_transition_error_message_shape() {
        let err = transition_error(OrderStatus::Pending, OrderStatus::Completed);
        assert_eq!(err.message, "invalid_status_transition: PENDING -> COMPLETED");
    }
}
