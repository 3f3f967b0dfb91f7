use axum::{
    Router,
    routing::{delete, get, put},
};

use super::controller::{
    delete_notification, list_my_notifications, mark_all_read, mark_read, unread_count,
};
use crate::state::AppState;

pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(list_my_notifications))
        .route("/me/count", get(unread_count))
        .route("/read-all", put(mark_all_read))
        .route("/{id}/read", put(mark_read))
        .route("/{id}", delete(delete_notification))
}
