use std::env;
use std::time::Duration;

/// Lifetime of an emailed verification code.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerificationConfig {
    pub code_ttl_seconds: u64,
}

impl Default for VerificationConfig {
    fn default() -> Self {
        Self {
            code_ttl_seconds: 600,
        }
    }
}

impl VerificationConfig {
    pub fn from_env() -> Self {
        Self {
            code_ttl_seconds: env::var("VERIFICATION_CODE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|ttl| *ttl > 0)
                .unwrap_or(600),
        }
    }

    pub fn code_ttl(&self) -> Duration {
        Duration::from_secs(self.code_ttl_seconds)
    }
}
