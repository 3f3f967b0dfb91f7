pub use solvex_models::events::*;
