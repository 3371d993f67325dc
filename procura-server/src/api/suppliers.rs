//! Supplier directory and profile registration

use axum::{
    Extension,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::models::Role;
use shared::util::now_millis;

use crate::auth::AuthUser;
use crate::db::{products, supplier_profiles};
use crate::state::AppState;

use super::{ApiResult, CreatedResult, created, internal, load_actor, ok};

#[derive(Serialize)]
pub struct SuppliersPayload {
    pub suppliers: Vec<supplier_profiles::SupplierProfile>,
}

/// GET /api/suppliers
pub async fn list(State(state): State<AppState>) -> ApiResult<SuppliersPayload> {
    let suppliers = supplier_profiles::list(&state.pool)
        .await
        .map_err(internal)?;
    ok(SuppliersPayload { suppliers })
}

#[derive(Serialize)]
pub struct SupplierDetailPayload {
    pub supplier: supplier_profiles::SupplierProfile,
    pub products: Vec<products::Product>,
}

/// GET /api/suppliers/{id} (profile plus its product catalog)
pub async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<SupplierDetailPayload> {
    let supplier = supplier_profiles::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::SupplierNotFound))?;
    let products = products::list(&state.pool, Some(supplier.id), None)
        .await
        .map_err(internal)?;
    ok(SupplierDetailPayload { supplier, products })
}

#[derive(Deserialize)]
pub struct CreateProfileRequest {
    pub company_name: String,
}

#[derive(Serialize)]
pub struct SupplierPayload {
    pub supplier: supplier_profiles::SupplierProfile,
}

/// POST /api/suppliers
///
/// A supplier-role user registers their company profile. One per user.
pub async fn create_profile(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    axum::Json(req): axum::Json<CreateProfileRequest>,
) -> CreatedResult<SupplierPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    if actor.role != Role::Supplier {
        return Err(AppError::forbidden("supplier role required"));
    }
    if actor.supplier_profile_id.is_some() {
        return Err(AppError::new(ErrorCode::AlreadyExists));
    }
    let company_name = req.company_name.trim();
    if company_name.is_empty() {
        return Err(AppError::validation("company_name must not be empty"));
    }

    let id = supplier_profiles::create(&state.pool, actor.user_id, company_name, now_millis())
        .await
        .map_err(internal)?;
    let supplier = supplier_profiles::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::InternalError))?;

    created(SupplierPayload { supplier })
}
