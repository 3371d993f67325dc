//! API routes for procura-server

pub mod auth;
pub mod categories;
pub mod health;
pub mod notifications;
pub mod oauth;
pub mod orders;
pub mod products;
pub mod quotes;
pub mod rfqs;
pub mod suppliers;

use axum::http::StatusCode;
use axum::routing::{delete, get, patch, post};
use axum::{Json, Router, middleware};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use shared::error::{ApiResponse, AppError, ErrorCode};
use shared::models::Role;

use crate::auth::auth_middleware;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, AppError>;
pub type CreatedResult<T> = Result<(StatusCode, Json<ApiResponse<T>>), AppError>;

/// Wrap a success payload in the response envelope.
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::ok(data)))
}

/// Same envelope, but 201 for freshly created resources.
pub fn created<T>(data: T) -> CreatedResult<T> {
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(data))))
}

pub(crate) fn internal(e: impl std::fmt::Display) -> AppError {
    tracing::error!("Query error: {e}");
    AppError::new(ErrorCode::InternalError)
}

/// Caller identity resolved per request from the authenticated user id.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
    pub user_id: i64,
    pub role: Role,
    /// Present only when the user has a supplier profile
    pub supplier_profile_id: Option<i64>,
}

impl Actor {
    /// Supplier profile id, or 403 for suppliers that never registered one.
    pub fn require_supplier_profile(&self) -> Result<i64, AppError> {
        self.supplier_profile_id
            .ok_or_else(|| AppError::new(ErrorCode::SupplierProfileRequired))
    }
}

pub async fn load_actor(state: &AppState, user_id: i64) -> Result<Actor, AppError> {
    let ctx = crate::db::users::find_context(&state.pool, user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated))?;

    if ctx.status != "ACTIVE" {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let role = Role::from_db(&ctx.role).ok_or_else(|| {
        tracing::error!(user_id = ctx.id, role = %ctx.role, "Unknown role in users table");
        AppError::new(ErrorCode::InternalError)
    })?;

    Ok(Actor {
        user_id: ctx.id,
        role,
        supplier_profile_id: ctx.supplier_profile_id,
    })
}

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Registration, login and the OAuth broker (no session required)
    let public = Router::new()
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/wechat/demo/callback", get(oauth::wechat_demo_callback))
        .route("/api/auth/{provider}", get(oauth::start_login))
        .route("/api/auth/{provider}/callback", get(oauth::callback));

    // Everything else requires a Bearer session token
    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/auth/linked-accounts", get(auth::linked_accounts))
        .route("/api/auth/wechat/link", post(oauth::wechat_demo_link))
        .route("/api/auth/{provider}/link", get(oauth::start_link))
        .route("/api/auth/{provider}/unlink", post(auth::unlink))
        .route("/api/suppliers", get(suppliers::list).post(suppliers::create_profile))
        .route("/api/suppliers/{id}", get(suppliers::get_one))
        .route("/api/categories", get(categories::list).post(categories::create))
        .route("/api/products", get(products::list).post(products::create))
        .route("/api/products/{id}", get(products::get_one))
        .route("/api/rfqs", get(rfqs::list).post(rfqs::create))
        .route("/api/rfqs/{id}", get(rfqs::get_one).patch(rfqs::update))
        .route("/api/rfqs/{id}/items", post(rfqs::add_item))
        .route("/api/rfqs/{id}/items/{item_id}", delete(rfqs::delete_item))
        .route("/api/rfqs/{id}/submit", post(rfqs::submit))
        .route("/api/rfqs/{id}/quotes", get(quotes::list_for_rfq).post(quotes::create))
        .route("/api/quotes", get(quotes::list_mine))
        .route("/api/quotes/{id}", get(quotes::get_one))
        .route("/api/orders", get(orders::list).post(orders::create))
        .route(
            "/api/orders/{id}",
            get(orders::get_one)
                .put(orders::update)
                .patch(orders::update)
                .delete(orders::delete),
        )
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/{id}/read", patch(notifications::mark_read))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/health", get(health::health_check))
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_created_answers_201() {
        let (status, _) = created(serde_json::json!({"id": 1})).unwrap();
        assert_eq!(status, StatusCode::CREATED);
    }
}
