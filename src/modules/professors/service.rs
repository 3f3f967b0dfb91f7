use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use solvex_core::{AppError, hash_password};
use solvex_models::normalize_email;

use super::model::{Professor, UpdateProfessorDto};
use crate::utils::db::map_email_conflict;

const PROFESSOR_COLUMNS: &str =
    "id, first_name, last_name, email, last_changed_password, created_at, updated_at";

pub struct ProfessorService;

impl ProfessorService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Professor>, AppError> {
        let professor = sqlx::query_as::<_, Professor>(&format!(
            "SELECT {PROFESSOR_COLUMNS} FROM professors WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch professor by ID")
        .map_err(AppError::database)?;

        Ok(professor)
    }

    #[instrument(skip(db))]
    pub async fn get_professor(db: &PgPool, id: i64) -> Result<Professor, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("professor not found")))
    }

    #[instrument(skip(db, password_hash))]
    pub async fn create_professor(
        db: &PgPool,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Professor, AppError> {
        let professor = sqlx::query_as::<_, Professor>(&format!(
            r#"
            INSERT INTO professors (first_name, last_name, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROFESSOR_COLUMNS}
            "#
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(normalize_email(email))
        .bind(password_hash)
        .fetch_one(db)
        .await
        .map_err(map_email_conflict)?;

        Ok(professor)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_professor(
        db: &PgPool,
        existing: Professor,
        dto: UpdateProfessorDto,
    ) -> Result<Professor, AppError> {
        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let email = dto
            .email
            .map(|e| normalize_email(&e))
            .unwrap_or(existing.email);
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let updated = sqlx::query_as::<_, Professor>(&format!(
            r#"
            UPDATE professors
            SET first_name = $1,
                last_name = $2,
                email = $3,
                password = COALESCE($4, password),
                last_changed_password = CASE WHEN $4 IS NULL THEN last_changed_password ELSE NOW() END,
                updated_at = NOW()
            WHERE id = $5 AND deleted_at IS NULL
            RETURNING {PROFESSOR_COLUMNS}
            "#
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(email)
        .bind(password_hash)
        .bind(existing.id)
        .fetch_optional(db)
        .await
        .map_err(map_email_conflict)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("professor not found")))?;

        Ok(updated)
    }

    /// Soft-deletes the professor, their opportunities with the
    /// applications to them, the reports they received and their
    /// notifications.
    #[instrument(skip(db))]
    pub async fn delete_professor(db: &PgPool, id: i64) -> Result<(), AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query(
            "UPDATE professors SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete professor")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("professor not found")));
        }

        for statement in [
            r#"UPDATE applications SET deleted_at = NOW()
               WHERE deleted_at IS NULL
                 AND opportunity_id IN (SELECT id FROM opportunities WHERE professor_id = $1)"#,
            "UPDATE opportunities SET deleted_at = NOW() WHERE professor_id = $1 AND deleted_at IS NULL",
            "UPDATE weekly_reports SET deleted_at = NOW() WHERE recipient_id = $1 AND deleted_at IS NULL",
            "UPDATE notifications SET deleted_at = NOW() WHERE recipient_id = $1 AND recipient_role = 'professor' AND deleted_at IS NULL",
        ] {
            sqlx::query(statement)
                .bind(id)
                .execute(&mut *tx)
                .await
                .context("Failed to delete professor data")
                .map_err(AppError::database)?;
        }

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(())
    }
}
