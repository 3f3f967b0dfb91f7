pub use solvex_models::tags::*;
