//! Per-user notification feed

use axum::{
    Extension,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::auth::AuthUser;
use crate::db::notifications;
use crate::state::AppState;

use super::{ApiResult, internal, ok};

const DEFAULT_LIMIT: i64 = 50;
const MAX_LIMIT: i64 = 100;

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

#[derive(Serialize)]
pub struct NotificationsPayload {
    pub notifications: Vec<notifications::Notification>,
    pub unread_count: i64,
}

/// GET /api/notifications (newest first, limit clamped to 1..=100)
pub async fn list(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Query(query): Query<ListQuery>,
) -> ApiResult<NotificationsPayload> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);

    let notifications = notifications::list_for_user(&state.pool, auth.user_id, limit)
        .await
        .map_err(internal)?;
    let unread_count = notifications::unread_count(&state.pool, auth.user_id)
        .await
        .map_err(internal)?;

    ok(NotificationsPayload {
        notifications,
        unread_count,
    })
}

#[derive(Serialize)]
pub struct NotificationPayload {
    pub notification: notifications::Notification,
    pub unread_count: i64,
}

/// PATCH /api/notifications/{id}/read
///
/// Owner-scoped; a foreign or unknown id is indistinguishable (404).
pub async fn mark_read(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(id): Path<i64>,
) -> ApiResult<NotificationPayload> {
    let notification = notifications::mark_read(&state.pool, id, auth.user_id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            AppError::with_message(ErrorCode::NotificationNotFound, "notification_not_found")
        })?;
    let unread_count = notifications::unread_count(&state.pool, auth.user_id)
        .await
        .map_err(internal)?;

    ok(NotificationPayload {
        notification,
        unread_count,
    })
}
