//! # SolveX Config
//!
//! Configuration types for the SolveX API, loaded from environment variables
//! (a `.env` file is read by the binaries through `dotenvy`).
//!
//! - [`jwt`]: token signing secret (required)
//! - [`cors`]: allowed browser origins
//! - [`email`]: mail provider selection and credentials
//! - [`rate_limit`]: per-IP limits for the public auth endpoints
//! - [`server`]: bind address and ports
//! - [`verification`]: email verification code lifetime
//!
//! # Example
//!
//! ```ignore
//! use solvex_config::{CorsConfig, EmailConfig, JwtConfig};
//!
//! let jwt_config = JwtConfig::from_env()?;
//! let email_config = EmailConfig::from_env()?;
//! let cors_config = CorsConfig::from_env();
//! ```

pub mod cors;
pub mod email;
pub mod error;
pub mod jwt;
pub mod rate_limit;
pub mod server;
pub mod verification;

// Re-export commonly used types at crate root
pub use cors::CorsConfig;
pub use email::{EmailConfig, MailProvider};
pub use error::ConfigError;
pub use jwt::JwtConfig;
pub use rate_limit::RateLimitConfig;
pub use server::ServerConfig;
pub use verification::VerificationConfig;
