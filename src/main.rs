use std::net::SocketAddr;

use dotenvy::dotenv;
use tracing::{error, info, warn};

use solvex::logging::{init_tracing, shutdown_tracer};
use solvex::metrics::{init_metrics, metrics_app};
use solvex::router::init_router;
use solvex::state::AppState;
use solvex::utils::email::Mailer;
use solvex_cache::{CacheConfig, CodeStore};
use solvex_config::{
    CorsConfig, EmailConfig, JwtConfig, RateLimitConfig, ServerConfig, VerificationConfig,
};
use solvex_db::{database_url_from_env, init_db_pool, run_migrations};

fn exit_with(message: impl std::fmt::Display) -> ! {
    eprintln!("❌ {}", message);
    std::process::exit(1);
}

async fn init_app_state() -> AppState {
    let jwt_config = JwtConfig::from_env().unwrap_or_else(|e| exit_with(e));
    let email_config = EmailConfig::from_env().unwrap_or_else(|e| exit_with(e));

    let database_url =
        database_url_from_env().unwrap_or_else(|_| exit_with("DATABASE_URL must be set"));
    let db = init_db_pool(&database_url)
        .await
        .unwrap_or_else(|e| exit_with(format!("Failed to connect to database: {}", e)));

    if let Err(e) = run_migrations(&db).await {
        exit_with(format!("Failed to run migrations: {}", e));
    }

    let code_store = CodeStore::from_config(&CacheConfig::from_env())
        .await
        .unwrap_or_else(|e| exit_with(format!("Failed to connect to Redis: {}", e)));

    AppState {
        db,
        mailer: Mailer::new(&email_config),
        jwt_config,
        email_config,
        cors_config: CorsConfig::from_env(),
        rate_limit_config: RateLimitConfig::from_env(),
        verification_config: VerificationConfig::from_env(),
        code_store,
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() {
    dotenv().ok();

    if let Err(e) = init_tracing() {
        exit_with(format!("Failed to initialize logging: {}", e));
    }

    let server_config = ServerConfig::from_env();
    let state = init_app_state().await;

    match init_metrics() {
        Ok(Some(handle)) => {
            let metrics_addr = format!("{}:{}", server_config.host, server_config.metrics_port);
            tokio::spawn(async move {
                match tokio::net::TcpListener::bind(&metrics_addr).await {
                    Ok(listener) => {
                        info!(address = %metrics_addr, "Metrics server listening");
                        if let Err(e) = axum::serve(listener, metrics_app(handle)).await {
                            error!(error = %e, "Metrics server stopped");
                        }
                    }
                    Err(e) => error!(error = %e, address = %metrics_addr, "Failed to bind metrics server"),
                }
            });
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Failed to install Prometheus recorder"),
    }

    let app = init_router(state);

    let address = server_config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|e| exit_with(format!("Failed to bind {}: {}", address, e)));

    info!(address = %address, "🚀 Server running");
    info!("📚 Swagger UI available at /swagger-ui");
    info!("📖 Scalar UI available at /scalar");

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        error!(error = %e, "Server error");
    }

    shutdown_tracer().await;
}
