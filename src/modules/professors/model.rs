pub use solvex_models::professors::*;
