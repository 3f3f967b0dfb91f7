use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use solvex_core::{AppError, hash_password};
use solvex_models::{OrganizationSignUpRequest, normalize_email};

use super::model::{Organization, UpdateOrganizationDto};
use crate::utils::db::map_email_conflict;

const ORGANIZATION_COLUMNS: &str =
    "id, name, email, contact, link, last_changed_password, created_at, updated_at";

pub struct OrganizationService;

impl OrganizationService {
    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: i64) -> Result<Option<Organization>, AppError> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            "SELECT {ORGANIZATION_COLUMNS} FROM organizations WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch organization by ID")
        .map_err(AppError::database)?;

        Ok(organization)
    }

    #[instrument(skip(db))]
    pub async fn get_organization(db: &PgPool, id: i64) -> Result<Organization, AppError> {
        Self::find_by_id(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("organization not found")))
    }

    #[instrument(skip(db, dto, password_hash), fields(email = %dto.email))]
    pub async fn create_organization(
        db: &PgPool,
        dto: &OrganizationSignUpRequest,
        password_hash: &str,
    ) -> Result<Organization, AppError> {
        let organization = sqlx::query_as::<_, Organization>(&format!(
            r#"
            INSERT INTO organizations (name, email, password, contact, link)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ORGANIZATION_COLUMNS}
            "#
        ))
        .bind(&dto.name)
        .bind(normalize_email(&dto.email))
        .bind(password_hash)
        .bind(&dto.contact)
        .bind(&dto.link)
        .fetch_one(db)
        .await
        .map_err(map_email_conflict)?;

        Ok(organization)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_organization(
        db: &PgPool,
        existing: Organization,
        dto: UpdateOrganizationDto,
    ) -> Result<Organization, AppError> {
        let name = dto.name.unwrap_or(existing.name);
        let email = dto
            .email
            .map(|e| normalize_email(&e))
            .unwrap_or(existing.email);
        let contact = dto.contact.unwrap_or(existing.contact);
        let link = dto.link.unwrap_or(existing.link);
        let password_hash = dto.password.as_deref().map(hash_password).transpose()?;

        let updated = sqlx::query_as::<_, Organization>(&format!(
            r#"
            UPDATE organizations
            SET name = $1,
                email = $2,
                contact = $3,
                link = $4,
                password = COALESCE($5, password),
                last_changed_password = CASE WHEN $5 IS NULL THEN last_changed_password ELSE NOW() END,
                updated_at = NOW()
            WHERE id = $6 AND deleted_at IS NULL
            RETURNING {ORGANIZATION_COLUMNS}
            "#
        ))
        .bind(name)
        .bind(email)
        .bind(contact)
        .bind(link)
        .bind(password_hash)
        .bind(existing.id)
        .fetch_optional(db)
        .await
        .map_err(map_email_conflict)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("organization not found")))?;

        Ok(updated)
    }

    /// Soft-deletes the organization with its events and notifications.
    #[instrument(skip(db))]
    pub async fn delete_organization(db: &PgPool, id: i64) -> Result<(), AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let result = sqlx::query(
            "UPDATE organizations SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete organization")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("organization not found")));
        }

        for statement in [
            "UPDATE events SET deleted_at = NOW() WHERE organization_id = $1 AND deleted_at IS NULL",
            "UPDATE notifications SET deleted_at = NOW() WHERE recipient_id = $1 AND recipient_role = 'organization' AND deleted_at IS NULL",
        ] {
            sqlx::query(statement)
                .bind(id)
                .execute(&mut *tx)
                .await
                .context("Failed to delete organization data")
                .map_err(AppError::database)?;
        }

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(())
    }
}
