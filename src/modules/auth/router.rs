use axum::{Router, routing::post};

use super::controller::{send_code, sign_in, sign_up};
use crate::state::AppState;

pub fn init_auth_router() -> Router<AppState> {
    Router::new()
        .route("/send-code", post(send_code))
        .route("/sign-up/{role}", post(sign_up))
        .route("/sign-in/{role}", post(sign_in))
}
