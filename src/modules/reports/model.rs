pub use solvex_models::reports::*;
