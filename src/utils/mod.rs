//! Shared utilities for the SolveX API.
//!
//! - [`db`]: mapping of store errors shared by the account services
//! - [`email`]: outgoing mail through SendGrid, SMTP or the log
//! - [`verification`]: verification code generation

pub mod db;
pub mod email;
pub mod verification;
