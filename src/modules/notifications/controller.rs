use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::instrument;

use solvex_core::{AppError, ErrorResponse, MessageResponse};

use super::model::{Notification, NotificationQuery, UnreadCountResponse};
use super::service::NotificationService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// List the current account's notifications, newest first
#[utoipa::path(
    get,
    path = "/api/notifications/me",
    params(NotificationQuery),
    responses(
        (status = 200, description = "Notifications", body = Vec<Notification>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn list_my_notifications(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<NotificationQuery>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = NotificationService::list_for_recipient(
        &state.db,
        user.id(),
        user.role(),
        query.unread_only,
    )
    .await?;
    Ok(Json(notifications))
}

/// Count the current account's unread notifications
#[utoipa::path(
    get,
    path = "/api/notifications/me/count",
    responses(
        (status = 200, description = "Unread count", body = UnreadCountResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn unread_count(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<UnreadCountResponse>, AppError> {
    let count = NotificationService::unread_count(&state.db, user.id(), user.role()).await?;
    Ok(Json(UnreadCountResponse { count }))
}

/// Mark a notification as read
#[utoipa::path(
    put,
    path = "/api/notifications/{id}/read",
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification marked as read", body = Notification),
        (status = 403, description = "Addressed to another account", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn mark_read(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<Notification>, AppError> {
    let notification =
        NotificationService::mark_read(&state.db, id, user.id(), user.role()).await?;
    Ok(Json(notification))
}

/// Mark all of the current account's notifications as read
#[utoipa::path(
    put,
    path = "/api/notifications/read-all",
    responses(
        (status = 200, description = "All notifications marked as read", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn mark_all_read(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<MessageResponse>, AppError> {
    NotificationService::mark_all_read(&state.db, user.id(), user.role()).await?;
    Ok(Json(MessageResponse::new("all notifications marked as read")))
}

/// Delete a notification
#[utoipa::path(
    delete,
    path = "/api/notifications/{id}",
    params(
        ("id" = i64, Path, description = "Notification ID")
    ),
    responses(
        (status = 200, description = "Notification deleted", body = MessageResponse),
        (status = 403, description = "Addressed to another account", body = ErrorResponse),
        (status = 404, description = "Notification not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Notifications"
)]
#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn delete_notification(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    NotificationService::delete_notification(&state.db, id, user.id(), user.role()).await?;
    Ok(Json(MessageResponse::new("notification deleted")))
}
