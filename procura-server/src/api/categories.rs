//! Material category directory

use axum::{Extension, extract::State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::util::now_millis;

use crate::auth::AuthUser;
use crate::db::categories;
use crate::state::AppState;

use super::{ApiResult, CreatedResult, created, internal, load_actor, ok};

#[derive(Serialize)]
pub struct CategoriesPayload {
    pub categories: Vec<categories::MaterialCategory>,
}

/// GET /api/categories
pub async fn list(State(state): State<AppState>) -> ApiResult<CategoriesPayload> {
    let categories = categories::list(&state.pool).await.map_err(internal)?;
    ok(CategoriesPayload { categories })
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

#[derive(Serialize)]
pub struct CategoryPayload {
    pub category: categories::MaterialCategory,
}

/// POST /api/categories (admin only)
pub async fn create(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    axum::Json(req): axum::Json<CreateCategoryRequest>,
) -> CreatedResult<CategoryPayload> {
    let actor = load_actor(&state, auth.user_id).await?;
    if !actor.role.is_admin() {
        return Err(AppError::new(ErrorCode::AdminRequired));
    }
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::validation("name must not be empty"));
    }

    let id = match categories::create(&state.pool, name, now_millis()).await {
        Ok(id) => id,
        Err(e) if is_unique_violation(&e) => {
            return Err(AppError::new(ErrorCode::CategoryNameExists));
        }
        Err(e) => return Err(internal(e)),
    };
    let category = categories::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| AppError::new(ErrorCode::InternalError))?;

    created(CategoryPayload { category })
}

pub(crate) fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}
