pub use solvex_models::applications::*;

/// Mail to send once a status change has been committed.
#[derive(Debug, Clone)]
pub struct DecisionEmail {
    pub to: String,
    pub subject: String,
    pub body: String,
}
