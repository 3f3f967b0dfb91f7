use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use solvex_core::AppError;
use solvex_models::ProfessorSummary;

use super::model::{
    CreateOpportunityDto, Opportunity, OpportunityWithDetails, UpdateOpportunityDto,
};
use crate::middleware::role::ensure_owner;
use crate::modules::tags::service::TagService;

const NOT_OWNER: &str = "cannot modify opportunities you don't own";

/// An opportunity joined with its (possibly deleted) professor.
#[derive(sqlx::FromRow)]
struct OpportunityRow {
    id: i64,
    professor_id: i64,
    name: String,
    details: String,
    requirements: String,
    reward: String,
    #[sqlx(rename = "type")]
    opportunity_type: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    professor_first_name: Option<String>,
    professor_last_name: Option<String>,
    professor_email: Option<String>,
}

impl OpportunityRow {
    fn split(self) -> (Opportunity, Option<ProfessorSummary>) {
        let professor = match (
            self.professor_first_name,
            self.professor_last_name,
            self.professor_email,
        ) {
            (Some(first_name), Some(last_name), Some(email)) => Some(ProfessorSummary {
                id: self.professor_id,
                first_name,
                last_name,
                email,
            }),
            _ => None,
        };

        let opportunity = Opportunity {
            id: self.id,
            professor_id: self.professor_id,
            name: self.name,
            details: self.details,
            requirements: self.requirements,
            reward: self.reward,
            opportunity_type: self.opportunity_type,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };

        (opportunity, professor)
    }
}

const SELECT_WITH_PROFESSOR: &str = r#"
    SELECT o.id, o.professor_id, o.name, o.details, o.requirements, o.reward, o.type,
           o.created_at, o.updated_at,
           p.first_name AS professor_first_name,
           p.last_name AS professor_last_name,
           p.email AS professor_email
    FROM opportunities o
    LEFT JOIN professors p ON p.id = o.professor_id AND p.deleted_at IS NULL
"#;

const OPPORTUNITY_COLUMNS: &str =
    "id, professor_id, name, details, requirements, reward, type, created_at, updated_at";

pub struct OpportunityService;

impl OpportunityService {
    async fn with_details(
        db: &PgPool,
        rows: Vec<OpportunityRow>,
    ) -> Result<Vec<OpportunityWithDetails>, AppError> {
        let ids: Vec<i64> = rows.iter().map(|row| row.id).collect();
        let mut tags = TagService::tags_for_opportunities(db, &ids).await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let (opportunity, professor) = row.split();
                OpportunityWithDetails {
                    tags: tags.remove(&opportunity.id).unwrap_or_default(),
                    opportunity,
                    professor,
                }
            })
            .collect())
    }

    /// Plain row lookup used by ownership checks.
    #[instrument(skip(db))]
    pub async fn find_row(db: &PgPool, id: i64) -> Result<Option<Opportunity>, AppError> {
        let opportunity = sqlx::query_as::<_, Opportunity>(&format!(
            "SELECT {OPPORTUNITY_COLUMNS} FROM opportunities WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch opportunity")
        .map_err(AppError::database)?;

        Ok(opportunity)
    }

    #[instrument(skip(db))]
    pub async fn get_row(db: &PgPool, id: i64) -> Result<Opportunity, AppError> {
        Self::find_row(db, id)
            .await?
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("opportunity not found")))
    }

    /// Locks the row for the rest of `tx` and checks the caller owns it.
    async fn lock_owned(
        tx: &mut Transaction<'_, Postgres>,
        id: i64,
        professor_id: i64,
    ) -> Result<Opportunity, AppError> {
        let opportunity = sqlx::query_as::<_, Opportunity>(&format!(
            "SELECT {OPPORTUNITY_COLUMNS} FROM opportunities WHERE id = $1 AND deleted_at IS NULL FOR UPDATE"
        ))
        .bind(id)
        .fetch_optional(&mut **tx)
        .await
        .context("Failed to lock opportunity")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("opportunity not found")))?;

        ensure_owner(opportunity.professor_id, professor_id, NOT_OWNER)?;
        Ok(opportunity)
    }

    #[instrument(skip(db))]
    pub async fn list_opportunities(db: &PgPool) -> Result<Vec<OpportunityWithDetails>, AppError> {
        let rows = sqlx::query_as::<_, OpportunityRow>(&format!(
            "{SELECT_WITH_PROFESSOR} WHERE o.deleted_at IS NULL ORDER BY o.created_at DESC, o.id DESC"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch opportunities")
        .map_err(AppError::database)?;

        Self::with_details(db, rows).await
    }

    #[instrument(skip(db))]
    pub async fn list_for_professor(
        db: &PgPool,
        professor_id: i64,
    ) -> Result<Vec<OpportunityWithDetails>, AppError> {
        let rows = sqlx::query_as::<_, OpportunityRow>(&format!(
            r#"{SELECT_WITH_PROFESSOR}
            WHERE o.professor_id = $1 AND o.deleted_at IS NULL
            ORDER BY o.created_at DESC, o.id DESC"#
        ))
        .bind(professor_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch professor opportunities")
        .map_err(AppError::database)?;

        Self::with_details(db, rows).await
    }

    #[instrument(skip(db))]
    pub async fn get_opportunity(
        db: &PgPool,
        id: i64,
    ) -> Result<OpportunityWithDetails, AppError> {
        let row = sqlx::query_as::<_, OpportunityRow>(&format!(
            "{SELECT_WITH_PROFESSOR} WHERE o.id = $1 AND o.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch opportunity")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("opportunity not found")))?;

        Self::with_details(db, vec![row])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found(anyhow::anyhow!("opportunity not found")))
    }

    #[instrument(skip(db, dto), fields(name = %dto.name))]
    pub async fn create_opportunity(
        db: &PgPool,
        professor_id: i64,
        dto: CreateOpportunityDto,
    ) -> Result<OpportunityWithDetails, AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let opportunity = sqlx::query_as::<_, Opportunity>(&format!(
            r#"
            INSERT INTO opportunities (professor_id, name, details, requirements, reward, type)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {OPPORTUNITY_COLUMNS}
            "#
        ))
        .bind(professor_id)
        .bind(&dto.name)
        .bind(&dto.details)
        .bind(&dto.requirements)
        .bind(&dto.reward)
        .bind(dto.opportunity_type.as_str())
        .fetch_one(&mut *tx)
        .await
        .context("Failed to create opportunity")
        .map_err(AppError::database)?;

        TagService::replace_opportunity_tags(&mut tx, opportunity.id, &dto.tag_ids).await?;

        tx.commit().await.context("Failed to commit transaction")?;

        Self::get_opportunity(db, opportunity.id).await
    }

    /// Applies the provided fields. Only the owning professor may update.
    #[instrument(skip(db, dto))]
    pub async fn update_opportunity(
        db: &PgPool,
        professor_id: i64,
        id: i64,
        dto: UpdateOpportunityDto,
    ) -> Result<OpportunityWithDetails, AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;
        let existing = Self::lock_owned(&mut tx, id, professor_id).await?;

        let name = dto.name.unwrap_or(existing.name);
        let details = dto.details.unwrap_or(existing.details);
        let requirements = dto.requirements.unwrap_or(existing.requirements);
        let reward = dto.reward.unwrap_or(existing.reward);
        let opportunity_type = dto
            .opportunity_type
            .map(|t| t.as_str().to_string())
            .unwrap_or(existing.opportunity_type);

        sqlx::query(
            r#"
            UPDATE opportunities
            SET name = $1, details = $2, requirements = $3, reward = $4, type = $5,
                updated_at = NOW()
            WHERE id = $6 AND deleted_at IS NULL
            "#,
        )
        .bind(name)
        .bind(details)
        .bind(requirements)
        .bind(reward)
        .bind(opportunity_type)
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to update opportunity")
        .map_err(AppError::database)?;

        if let Some(tag_ids) = dto.tag_ids {
            TagService::replace_opportunity_tags(&mut tx, id, &tag_ids).await?;
        }

        tx.commit().await.context("Failed to commit transaction")?;

        Self::get_opportunity(db, id).await
    }

    /// Soft-deletes the opportunity and the applications made to it.
    #[instrument(skip(db))]
    pub async fn delete_opportunity(
        db: &PgPool,
        professor_id: i64,
        id: i64,
    ) -> Result<(), AppError> {
        let mut tx = db.begin().await.context("Failed to begin transaction")?;
        Self::lock_owned(&mut tx, id, professor_id).await?;

        sqlx::query(
            "UPDATE applications SET deleted_at = NOW() WHERE opportunity_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(&mut *tx)
        .await
        .context("Failed to delete opportunity applications")
        .map_err(AppError::database)?;

        sqlx::query("UPDATE opportunities SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&mut *tx)
            .await
            .context("Failed to delete opportunity")
            .map_err(AppError::database)?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(())
    }
}
