use std::sync::Arc;

use axum::http::{HeaderValue, Method};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};
use utoipa_swagger_ui::SwaggerUi;

use solvex_core::AppError;

use crate::docs::ApiDoc;
use crate::logging::logging_middleware;
use crate::metrics::metrics_middleware;
use crate::middleware::auth::authenticate;
use crate::modules::applications::init_applications_router;
use crate::modules::auth::controller::get_profile;
use crate::modules::auth::init_auth_router;
use crate::modules::coins::init_coins_router;
use crate::modules::events::{init_events_router, init_public_events_router};
use crate::modules::notifications::init_notifications_router;
use crate::modules::opportunities::{
    init_opportunities_router, init_public_opportunities_router,
};
use crate::modules::organizations::{
    init_organizations_router, init_public_organizations_router,
};
use crate::modules::professors::init_professors_router;
use crate::modules::reports::init_reports_router;
use crate::modules::students::init_students_router;
use crate::modules::tags::{init_public_tags_router, init_tags_router};
use crate::state::AppState;

/// Liveness check
#[utoipa::path(
    get,
    path = "/ping",
    responses(
        (status = 200, description = "Service is up")
    ),
    tag = "Health"
)]
pub async fn ping() -> Json<Value> {
    Json(json!({ "message": "pong" }))
}

async fn route_not_found() -> AppError {
    AppError::not_found(anyhow::anyhow!("route not found"))
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    let router = init_auth_router();

    if state.rate_limit_config.enabled {
        let config = Arc::new(state.rate_limit_config.auth_governor_config());
        router.layer(GovernorLayer::new(config))
    } else {
        router
    }
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .nest("/opportunities", init_public_opportunities_router())
        .nest("/tags", init_public_tags_router())
        .nest("/events", init_public_events_router())
        .nest("/organizations", init_public_organizations_router())
}

/// Every route here requires a bearer token.
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile))
        .nest("/students", init_students_router())
        .nest("/professors", init_professors_router())
        .nest("/organizations", init_organizations_router())
        .nest("/opportunities", init_opportunities_router())
        .nest("/applications", init_applications_router())
        .nest("/coins", init_coins_router())
        .nest("/reports", init_reports_router())
        .nest("/notifications", init_notifications_router())
        .nest("/tags", init_tags_router())
        .nest("/events", init_events_router())
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
}

pub fn init_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .route("/ping", get(ping))
        .nest("/auth", auth_routes(&state))
        .nest("/public", public_routes())
        .nest("/api", api_routes(&state))
        .fallback(route_not_found)
        .with_state(state.clone())
        .layer(middleware::from_fn(metrics_middleware))
        .layer({
            let allowed_origins: Vec<HeaderValue> = state
                .cors_config
                .allowed_origins
                .iter()
                .filter_map(|origin| origin.parse().ok())
                .collect();

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::AUTHORIZATION,
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::ACCEPT,
                ])
                .allow_credentials(true)
        })
        .layer(middleware::from_fn(logging_middleware))
}
