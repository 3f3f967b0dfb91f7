use axum::{Router, routing::get};

use super::controller::{delete_me, get_me, get_organization, update_me};
use crate::modules::events::controller::list_organization_events;
use crate::state::AppState;

pub fn init_organizations_router() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me).delete(delete_me))
}

pub fn init_public_organizations_router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_organization))
        .route("/{id}/events", get(list_organization_events))
}
