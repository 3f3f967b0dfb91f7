pub use solvex_models::opportunities::*;
