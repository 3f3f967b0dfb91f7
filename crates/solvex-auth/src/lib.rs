//! # SolveX Auth
//!
//! Roles and bearer tokens for the SolveX API.
//!
//! - [`role`]: the [`Role`] enum shared by tokens, routes and notifications
//! - [`claims`]: the JWT claim structure
//! - [`jwt`]: token creation and verification
//!
//! # Example
//!
//! ```ignore
//! use solvex_auth::{Role, create_token, verify_token};
//!
//! let token = create_token(user_id, "user@example.com", Role::Student, &config)?;
//! let claims = verify_token(&token, &config)?;
//! let role: Role = claims.role.parse()?;
//! ```

pub mod claims;
pub mod jwt;
pub mod role;

// Re-export commonly used types at crate root
pub use claims::Claims;
pub use jwt::{TOKEN_LIFETIME_SECS, TokenError, create_token, encode_claims, verify_token};
pub use role::{Role, UnknownRole};
