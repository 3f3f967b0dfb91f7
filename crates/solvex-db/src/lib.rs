//! # SolveX DB
//!
//! Connection pool setup and embedded schema migrations.
//!
//! The database URL is read from `DATABASE_URL`, falling back to `DB_DSN`.
//! Migrations under `migrations/` at the workspace root are compiled into
//! the binary and applied on startup.
//!
//! # Example
//!
//! ```ignore
//! use solvex_db::{database_url_from_env, init_db_pool, run_migrations};
//!
//! let pool = init_db_pool(&database_url_from_env()?).await?;
//! run_migrations(&pool).await?;
//! ```

use std::env;
use std::time::Duration;

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

// Re-export PgPool for convenience
pub use sqlx::PgPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Reads the connection string from `DATABASE_URL` or `DB_DSN`.
pub fn database_url_from_env() -> Result<String, env::VarError> {
    env::var("DATABASE_URL").or_else(|_| env::var("DB_DSN"))
}

/// Opens a PostgreSQL connection pool.
///
/// `DB_MAX_CONNECTIONS` caps the pool size (default 10).
pub async fn init_db_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let max_connections = env::var("DB_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(database_url)
        .await
}

/// Applies any pending migrations.
pub async fn run_migrations(pool: &PgPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await?;
    info!("Database migrations applied");
    Ok(())
}
