use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    create_event, delete_event, get_event, list_events, list_my_events, update_event,
};
use crate::state::AppState;

pub fn init_events_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_event))
        .route("/me", get(list_my_events))
        .route("/{id}", put(update_event).delete(delete_event))
}

pub fn init_public_events_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events))
        .route("/{id}", get(get_event))
}
