use std::collections::HashMap;

use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use solvex_core::AppError;
use solvex_models::Organization;

use super::model::{CreateEventDto, Event, EventWithOrganization, UpdateEventDto};
use crate::middleware::role::ensure_owner;
use crate::modules::organizations::service::OrganizationService;

const EVENT_COLUMNS: &str =
    "id, organization_id, title, description, date, link, sign_up_link, created_at, updated_at";

const NOT_OWNER: &str = "cannot modify events you don't own";

pub struct EventService;

impl EventService {
    async fn with_organizations(
        db: &PgPool,
        events: Vec<Event>,
    ) -> Result<Vec<EventWithOrganization>, AppError> {
        let mut ids: Vec<i64> = events.iter().map(|e| e.organization_id).collect();
        ids.sort_unstable();
        ids.dedup();

        let organizations: HashMap<i64, Organization> = sqlx::query_as::<_, Organization>(
            r#"
            SELECT id, name, email, contact, link, last_changed_password, created_at, updated_at
            FROM organizations
            WHERE id = ANY($1) AND deleted_at IS NULL
            "#,
        )
        .bind(&ids)
        .fetch_all(db)
        .await
        .context("Failed to fetch event organizations")
        .map_err(AppError::database)?
        .into_iter()
        .map(|o| (o.id, o))
        .collect();

        Ok(events
            .into_iter()
            .map(|event| EventWithOrganization {
                organization: organizations.get(&event.organization_id).cloned(),
                event,
            })
            .collect())
    }

    #[instrument(skip(db))]
    pub async fn list_events(db: &PgPool) -> Result<Vec<EventWithOrganization>, AppError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE deleted_at IS NULL ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(db)
        .await
        .context("Failed to fetch events")
        .map_err(AppError::database)?;

        Self::with_organizations(db, events).await
    }

    #[instrument(skip(db))]
    pub async fn get_event(db: &PgPool, id: i64) -> Result<EventWithOrganization, AppError> {
        let event = Self::get_row(db, id).await?;
        let organization = OrganizationService::find_by_id(db, event.organization_id).await?;
        Ok(EventWithOrganization {
            event,
            organization,
        })
    }

    async fn get_row(db: &PgPool, id: i64) -> Result<Event, AppError> {
        sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch event")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("event not found")))
    }

    #[instrument(skip(db))]
    pub async fn list_for_organization(
        db: &PgPool,
        organization_id: i64,
    ) -> Result<Vec<Event>, AppError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            r#"
            SELECT {EVENT_COLUMNS} FROM events
            WHERE organization_id = $1 AND deleted_at IS NULL
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(organization_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch organization events")
        .map_err(AppError::database)?;

        Ok(events)
    }

    #[instrument(skip(db, dto), fields(title = %dto.title))]
    pub async fn create_event(
        db: &PgPool,
        organization_id: i64,
        dto: CreateEventDto,
    ) -> Result<Event, AppError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (organization_id, title, description, date, link, sign_up_link)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(organization_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(&dto.date)
        .bind(&dto.link)
        .bind(&dto.sign_up_link)
        .fetch_one(db)
        .await
        .context("Failed to create event")
        .map_err(AppError::database)?;

        Ok(event)
    }

    #[instrument(skip(db, dto))]
    pub async fn update_event(
        db: &PgPool,
        organization_id: i64,
        id: i64,
        dto: UpdateEventDto,
    ) -> Result<Event, AppError> {
        let existing = Self::get_row(db, id).await?;
        ensure_owner(existing.organization_id, organization_id, NOT_OWNER)?;

        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET title = $1, description = $2, date = $3, link = $4, sign_up_link = $5,
                updated_at = NOW()
            WHERE id = $6 AND deleted_at IS NULL
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(dto.title.unwrap_or(existing.title))
        .bind(dto.description.unwrap_or(existing.description))
        .bind(dto.date.unwrap_or(existing.date))
        .bind(dto.link.unwrap_or(existing.link))
        .bind(dto.sign_up_link.unwrap_or(existing.sign_up_link))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to update event")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("event not found")))?;

        Ok(event)
    }

    #[instrument(skip(db))]
    pub async fn delete_event(db: &PgPool, organization_id: i64, id: i64) -> Result<(), AppError> {
        let existing = Self::get_row(db, id).await?;
        ensure_owner(existing.organization_id, organization_id, NOT_OWNER)?;

        sqlx::query("UPDATE events SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete event")
            .map_err(AppError::database)?;

        Ok(())
    }
}
