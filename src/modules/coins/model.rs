pub use solvex_models::coins::*;
