//! # SolveX Core
//!
//! Core types, errors, and utilities for the SolveX API.
//!
//! - [`errors`]: Application error type with HTTP response conversion
//! - [`password`]: Credential hashing and verification
//!
//! # Example
//!
//! ```ignore
//! use solvex_core::errors::AppError;
//! use solvex_core::password::{hash_password, verify_password};
//!
//! let error = AppError::not_found(anyhow::anyhow!("opportunity not found"));
//!
//! let digest = hash_password("secure_password")?;
//! assert!(verify_password("secure_password", &digest)?);
//! ```

pub mod errors;
pub mod password;

// Re-export commonly used types at crate root
pub use errors::{AppError, ErrorResponse, MessageResponse};
pub use password::{hash_password, verify_password};
