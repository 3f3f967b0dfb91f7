use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{create_tag, get_tag, list_tags};
use crate::state::AppState;

pub fn init_tags_router() -> Router<AppState> {
    Router::new().route("/", post(create_tag))
}

pub fn init_public_tags_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_tags))
        .route("/{id}", get(get_tag))
}
