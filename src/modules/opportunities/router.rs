use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_opportunity, delete_opportunity, get_opportunity, get_public_opportunity,
    list_my_opportunities, list_opportunities, list_public_opportunities, update_opportunity,
};
use crate::state::AppState;

pub fn init_opportunities_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_opportunity).get(list_opportunities))
        .route("/me", get(list_my_opportunities))
        .route(
            "/{id}",
            get(get_opportunity)
                .put(update_opportunity)
                .delete(delete_opportunity),
        )
}

pub fn init_public_opportunities_router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_public_opportunities))
        .route("/{id}", get(get_public_opportunity))
}
