use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use solvex_core::{AppError, hash_password};
use solvex_models::normalize_email;

use super::model::{Student, StudentProfile, UpdateStudentDto};
use crate::modules::coins::service::CoinsService;
use crate::modules::tags::model::Tag;
use crate::modules::tags::service::TagService;
use crate::utils::db::map_email_conflict;

const STUDENT_COLUMNS: &str =
    "id, first_name, last_name, email, last_changed_password, created_at, updated_at";

pub struct StudentService;

impl StudentService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Student>, AppError> {
        let student = sqlx::query_as::<_, Student>(&format!(
            "SELECT {STUDENT_COLUMNS} FROM students WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch student by ID")
        .map_err(AppError::database)?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_student(db: &PgPool, id: i64) -> Result<Student, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("student not found")))
    }

    /// Inserts the student and an empty coins row in one transaction.
    #[instrument(skip(db, password_hash))]
    pub async fn create_student(
        db: &PgPool,
        first_name: &str,
        last_name: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<Student, AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let student = sqlx::query_as::<_, Student>(&format!(
            r#"
            INSERT INTO students (first_name, last_name, email, password)
            VALUES ($1, $2, $3, $4)
            RETURNING {STUDENT_COLUMNS}
            "#
        ))
        .bind(first_name)
        .bind(last_name)
        .bind(normalize_email(email))
        .bind(password_hash)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_email_conflict)?;

        sqlx::query("INSERT INTO coins (student_id, amount) VALUES ($1, 0)")
            .bind(student.id)
            .execute(&mut *tx)
            .await
            .context("Failed to create coins record")
            .map_err(AppError::database)?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(student)
    }

    #[instrument(skip(db))]
    pub async fn get_profile(db: &PgPool, student: Student) -> Result<StudentProfile, AppError> {
        let tags = TagService::tags_for_student(db, student.id).await?;
        let coins = CoinsService::find_for_student(db, student.id).await?;

        Ok(StudentProfile {
            student,
            tags,
            coins,
        })
    }

    #[instrument(skip(db, dto))]
    pub async fn update_student(
        db: &PgPool,
        existing: Student,
        dto: UpdateStudentDto,
    ) -> Result<Student, AppError> {
        let first_name = dto.first_name.unwrap_or(existing.first_name);
        let last_name = dto.last_name.unwrap_or(existing.last_name);
        let email = dto
            .email
            .map(|e| normalize_email(&e))
            .unwrap_or(existing.email);
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let updated = sqlx::query_as::<_, Student>(&format!(
            r#"
            UPDATE students
            SET first_name = $1,
                last_name = $2,
                email = $3,
                password = COALESCE($4, password),
                last_changed_password = CASE WHEN $4 IS NULL THEN last_changed_password ELSE NOW() END,
                updated_at = NOW()
            WHERE id = $5 AND deleted_at IS NULL
            RETURNING {STUDENT_COLUMNS}
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
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("student not found")))?;

        Ok(updated)
    }

    /// Replaces the student's interest tags and returns the new set.
    #[instrument(skip(db))]
    pub async fn update_tags(
        db: &PgPool,
        student_id: i64,
        tag_ids: &[i64],
    ) -> Result<Vec<Tag>, AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;
        TagService::replace_student_tags(&mut tx, student_id, tag_ids).await?;
        tx.commit().await.context("Failed to commit transaction")?;

        TagService::tags_for_student(db, student_id).await
    }

    /// Soft-deletes the student and everything they own: coins,
    /// applications, reports, notifications and tag links.
    #[instrument(skip(db))]
    pub async fn delete_student(db: &PgPool, id: i64) -> Result<(), AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query(
            "UPDATE students SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete student")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("student not found")));
        }

        for statement in [
            "UPDATE coins SET deleted_at = NOW() WHERE student_id = $1 AND deleted_at IS NULL",
            "UPDATE applications SET deleted_at = NOW() WHERE student_id = $1 AND deleted_at IS NULL",
            "UPDATE weekly_reports SET deleted_at = NOW() WHERE student_id = $1 AND deleted_at IS NULL",
            "UPDATE notifications SET deleted_at = NOW() WHERE recipient_id = $1 AND recipient_role = 'student' AND deleted_at IS NULL",
            "DELETE FROM student_tags WHERE student_id = $1",
        ] {
            sqlx::query(statement)
                .bind(id)
                .execute(&mut *tx)
                .await
                .context("Failed to delete student data")
                .map_err(AppError::database)?;
        }

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(())
    }
}
