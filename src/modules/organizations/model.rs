pub use solvex_models::organizations::*;
