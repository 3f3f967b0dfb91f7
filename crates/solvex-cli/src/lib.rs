//! # SolveX CLI
//!
//! Database seeding utilities for SolveX development and load testing.
//!
//! ## Usage
//!
//! ```ignore
//! use solvex_cli::seeder::{seed_all, SeedConfig};
//!
//! let config = SeedConfig::new(20); // 20 professors with defaults
//! seed_all(&pool, config).await?;
//! ```

pub mod seeder;
