use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{delete_me, get_me, update_me, update_my_tags};
use crate::state::AppState;

pub fn init_students_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me).put(update_me).delete(delete_me))
        .route("/me/tags", put(update_my_tags))
}
