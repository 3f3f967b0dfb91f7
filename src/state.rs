use sqlx::PgPool;

use solvex_cache::CodeStore;
use solvex_config::{
    CorsConfig, EmailConfig, JwtConfig, RateLimitConfig, VerificationConfig,
};

use crate::utils::email::Mailer;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub rate_limit_config: RateLimitConfig,
    pub verification_config: VerificationConfig,
    pub code_store: CodeStore,
    pub mailer: Mailer,
}

impl AppState {
    /// State for in-process tests: fixed secret, log-only mail, in-memory
    /// codes and no rate limiting.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn for_tests(db: PgPool) -> Self {
        let email_config = EmailConfig::log_only();
        Self {
            db,
            jwt_config: JwtConfig::new("test-secret-key-at-least-32-characters-long"),
            mailer: Mailer::new(&email_config),
            email_config,
            cors_config: CorsConfig::default(),
            rate_limit_config: RateLimitConfig::disabled(),
            verification_config: VerificationConfig::default(),
            code_store: CodeStore::memory(),
        }
    }
}
