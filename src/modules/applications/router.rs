use axum::{
    Router,
    routing::{get, post, put},
};

use super::controller::{
    apply, delete_application, get_application, list_my_applications,
    list_opportunity_applications, update_status, withdraw,
};
use crate::state::AppState;

pub fn init_applications_router() -> Router<AppState> {
    Router::new()
        .route("/", post(apply).delete(withdraw))
        .route("/me", get(list_my_applications))
        .route("/opportunity/{id}", get(list_opportunity_applications))
        .route("/{id}", get(get_application).delete(delete_application))
        .route("/{id}/status", put(update_status))
}
