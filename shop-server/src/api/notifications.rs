//! Admin notification bell

use axum::extract::{Path, State};
use axum::{Extension, Json};
use shared::error::{AppError, ErrorCode};
use shared::models::NotificationListResponse;

use super::ApiResult;
use crate::auth::AdminIdentity;
use crate::error::ServiceError;
use crate::state::AppState;

const LATEST_LIMIT: i64 = 50;

/// GET /api/admin/notifications
pub async fn list_notifications(
    State(state): State<AppState>,
    Extension(_admin): Extension<AdminIdentity>,
) -> ApiResult<NotificationListResponse> {
    let (notifications, unread_count) = state
        .orders
        .list_notifications(LATEST_LIMIT)
        .await
        .map_err(ServiceError::from)?;
    Ok(Json(NotificationListResponse {
        notifications,
        unread_count,
    }))
}

/// PATCH /api/admin/notifications/{id}/read
pub async fn mark_notification_read(
    State(state): State<AppState>,
    Extension(_admin): Extension<AdminIdentity>,
    Path(id): Path<String>,
) -> ApiResult<serde_json::Value> {
    let found = state
        .orders
        .mark_notification_read(&id)
        .await
        .map_err(ServiceError::from)?;
    if !found {
        return Err(AppError::new(ErrorCode::NotificationNotFound).with_detail("id", id));
    }
    Ok(Json(serde_json::json!({ "success": true })))
}
