use axum::{
    Router,
    routing::{get, put},
};

use super::controller::{decrement_coins, get_my_coins, increment_coins};
use crate::state::AppState;

pub fn init_coins_router() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_my_coins))
        .route("/increment", put(increment_coins).post(increment_coins))
        .route("/decrement", put(decrement_coins).post(decrement_coins))
}
