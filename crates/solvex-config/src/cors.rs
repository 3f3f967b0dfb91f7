//! Browser origins allowed to call the API.
//!
//! `ALLOWED_ORIGINS` is a comma-separated list. Credentials are allowed, so
//! wildcards are not accepted by the CORS layer and must not be configured.

use std::env;

const DEFAULT_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000,http://localhost:5173";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self::parse(DEFAULT_ORIGINS)
    }
}

impl CorsConfig {
    pub fn from_env() -> Self {
        env::var("ALLOWED_ORIGINS")
            .map(|raw| Self::parse(&raw))
            .unwrap_or_default()
    }

    fn parse(raw: &str) -> Self {
        let allowed_origins = raw
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self { allowed_origins }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_includes_local_frontend() {
        let config = CorsConfig::default();
        assert!(config.allowed_origins.contains(&"http://localhost:3000".to_string()));
    }

    #[test]
    fn test_parse_trims_entries() {
        let config = CorsConfig::parse(" https://solvex.example/ , ,http://localhost:3000");
        assert_eq!(
            config.allowed_origins,
            vec!["https://solvex.example", "http://localhost:3000"]
        );
    }
}
