use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use solvex_core::AppError;

use super::model::Coins;
use crate::metrics::track_coins;

pub struct CoinsService;

impl CoinsService {
    #[instrument(skip(db))]
    pub async fn find_for_student(db: &PgPool, student_id: i64) -> Result<Option<Coins>, AppError> {
        let coins = sqlx::query_as::<_, Coins>(
            r#"
            SELECT id, student_id, amount, created_at, updated_at
            FROM coins
            WHERE student_id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(student_id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch coins")
        .map_err(AppError::database)?;

        Ok(coins)
    }

    #[instrument(skip(db))]
    pub async fn get_coins(db: &PgPool, student_id: i64) -> Result<Coins, AppError> {
        Self::find_for_student(db, student_id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("coins record not found")))
    }

    #[instrument(skip(db))]
    pub async fn increment(db: &PgPool, student_id: i64, amount: i64) -> Result<Coins, AppError> {
        let coins = sqlx::query_as::<_, Coins>(
            r#"
            UPDATE coins
            SET amount = amount + $1, updated_at = NOW()
            WHERE student_id = $2 AND deleted_at IS NULL
            RETURNING id, student_id, amount, created_at, updated_at
            "#,
        )
        .bind(amount)
        .bind(student_id)
        .fetch_optional(db)
        .await
        .context("Failed to increment coins")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("coins record not found")))?;

        track_coins("increment", amount);
        Ok(coins)
    }

    /// Subtracts `amount` in a single guarded UPDATE, so concurrent
    /// decrements can never drive the balance below zero.
    #[instrument(skip(db))]
    pub async fn decrement(db: &PgPool, student_id: i64, amount: i64) -> Result<Coins, AppError> {
        let updated = sqlx::query_as::<_, Coins>(
            r#"
            UPDATE coins
            SET amount = amount - $1, updated_at = NOW()
            WHERE student_id = $2 AND amount >= $1 AND deleted_at IS NULL
            RETURNING id, student_id, amount, created_at, updated_at
            "#,
        )
        .bind(amount)
        .bind(student_id)
        .fetch_optional(db)
        .await
        .context("Failed to decrement coins")
        .map_err(AppError::database)?;

        match updated {
            Some(coins) => {
                track_coins("decrement", amount);
                Ok(coins)
            }
            None => {
                // Either the row is gone or the balance is too low.
                Self::get_coins(db, student_id).await?;
                Err(AppError::bad_request(anyhow::anyhow!("insufficient coins")))
            }
        }
    }
}
