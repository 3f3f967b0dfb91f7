//! Virtual coin balances. Every student owns exactly one row.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Coins {
    pub id: i64,
    pub student_id: i64,
    pub amount: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for both increment and decrement.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CoinsAmountDto {
    #[validate(range(min = 1, message = "amount must be at least 1"))]
    #[schema(example = 10)]
    pub amount: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_amount_must_be_positive() {
        assert!(CoinsAmountDto { amount: 0 }.validate().is_err());
        assert!(CoinsAmountDto { amount: -5 }.validate().is_err());
        assert!(CoinsAmountDto { amount: 1 }.validate().is_ok());
    }
}
