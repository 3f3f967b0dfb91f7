//! Student data models and DTOs, shared with the seeder through
//! `solvex-models`.

pub use solvex_models::students::*;
