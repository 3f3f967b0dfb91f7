use std::collections::HashMap;

use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use solvex_core::AppError;

use super::model::{CreateTagDto, Tag};

pub struct TagService;

impl TagService {
    #[instrument(skip(db))]
    pub async fn list_tags(db: &PgPool) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM tags
            WHERE deleted_at IS NULL
            ORDER BY name
            "#,
        )
        .fetch_all(db)
        .await
        .context("Failed to fetch tags")
        .map_err(AppError::database)?;

        Ok(tags)
    }

    #[instrument(skip(db))]
    pub async fn get_tag(db: &PgPool, id: i64) -> Result<Tag, AppError> {
        sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM tags
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch tag")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("tag not found")))
    }

    async fn find_by_name(db: &PgPool, name: &str) -> Result<Option<Tag>, AppError> {
        let tag = sqlx::query_as::<_, Tag>(
            r#"
            SELECT id, name, description, created_at, updated_at
            FROM tags
            WHERE name = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(name)
        .fetch_optional(db)
        .await
        .context("Failed to fetch tag by name")
        .map_err(AppError::database)?;

        Ok(tag)
    }

    /// Creates a tag, or returns the live tag that already has this name.
    #[instrument(skip(db))]
    pub async fn create_tag(db: &PgPool, dto: CreateTagDto) -> Result<Tag, AppError> {
        let name = dto.name.trim().to_string();

        if let Some(existing) = Self::find_by_name(db, &name).await? {
            return Ok(existing);
        }

        let inserted = sqlx::query_as::<_, Tag>(
            r#"
            INSERT INTO tags (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at, updated_at
            "#,
        )
        .bind(&name)
        .bind(&dto.description)
        .fetch_one(db)
        .await;

        match inserted {
            Ok(tag) => Ok(tag),
            // Lost a race with a concurrent create of the same name.
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                Self::find_by_name(db, &name)
                    .await?
                    .ok_or_else(|| AppError::internal_error("Tag vanished after conflict".to_string()))
            }
            Err(e) => Err(AppError::database(anyhow::Error::from(e))),
        }
    }

    #[instrument(skip(db))]
    pub async fn tags_for_student(db: &PgPool, student_id: i64) -> Result<Vec<Tag>, AppError> {
        let tags = sqlx::query_as::<_, Tag>(
            r#"
            SELECT t.id, t.name, t.description, t.created_at, t.updated_at
            FROM tags t
            JOIN student_tags st ON st.tag_id = t.id
            WHERE st.student_id = $1 AND t.deleted_at IS NULL
            ORDER BY t.name
            "#,
        )
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student tags")
        .map_err(AppError::database)?;

        Ok(tags)
    }

    /// Tags of many opportunities in one round trip, keyed by opportunity id.
    pub async fn tags_for_opportunities(
        db: &PgPool,
        opportunity_ids: &[i64],
    ) -> Result<HashMap<i64, Vec<Tag>>, AppError> {
        #[derive(sqlx::FromRow)]
        struct OpportunityTagRow {
            opportunity_id: i64,
            id: i64,
            name: String,
            description: String,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
        }

        if opportunity_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, OpportunityTagRow>(
            r#"
            SELECT ot.opportunity_id, t.id, t.name, t.description, t.created_at, t.updated_at
            FROM opportunity_tags ot
            JOIN tags t ON t.id = ot.tag_id
            WHERE ot.opportunity_id = ANY($1) AND t.deleted_at IS NULL
            ORDER BY t.name
            "#,
        )
        .bind(opportunity_ids)
        .fetch_all(db)
        .await
        .context("Failed to fetch opportunity tags")
        .map_err(AppError::database)?;

        let mut by_opportunity: HashMap<i64, Vec<Tag>> = HashMap::new();
        for row in rows {
            by_opportunity.entry(row.opportunity_id).or_default().push(Tag {
                id: row.id,
                name: row.name,
                description: row.description,
                created_at: row.created_at,
                updated_at: row.updated_at,
            });
        }

        Ok(by_opportunity)
    }

    /// Replaces a student's tag set inside `tx`. Ids naming no live tag are
    /// skipped.
    pub async fn replace_student_tags(
        tx: &mut Transaction<'_, Postgres>,
        student_id: i64,
        tag_ids: &[i64],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM student_tags WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut **tx)
            .await
            .context("Failed to clear student tags")
            .map_err(AppError::database)?;

        sqlx::query(
            r#"
            INSERT INTO student_tags (student_id, tag_id)
            SELECT $1, id FROM tags WHERE id = ANY($2) AND deleted_at IS NULL
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(student_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await
        .context("Failed to link student tags")
        .map_err(AppError::database)?;

        Ok(())
    }

    /// Replaces an opportunity's tag set inside `tx`. Ids naming no live tag
    /// are skipped.
    pub async fn replace_opportunity_tags(
        tx: &mut Transaction<'_, Postgres>,
        opportunity_id: i64,
        tag_ids: &[i64],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM opportunity_tags WHERE opportunity_id = $1")
            .bind(opportunity_id)
            .execute(&mut **tx)
            .await
            .context("Failed to clear opportunity tags")
            .map_err(AppError::database)?;

        sqlx::query(
            r#"
            INSERT INTO opportunity_tags (opportunity_id, tag_id)
            SELECT $1, id FROM tags WHERE id = ANY($2) AND deleted_at IS NULL
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(opportunity_id)
        .bind(tag_ids)
        .execute(&mut **tx)
        .await
        .context("Failed to link opportunity tags")
        .map_err(AppError::database)?;

        Ok(())
    }
}
