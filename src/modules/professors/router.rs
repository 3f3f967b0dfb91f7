use axum::{Router, routing::get};

use super::controller::{delete_me, get_me, update_me};
use crate::state::AppState;

pub fn init_professors_router() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(update_me).delete(delete_me))
}
