use anyhow::Context;
use sqlx::{PgPool, Postgres, Transaction};
use tracing::instrument;

use solvex_auth::Role;
use solvex_core::AppError;

use super::model::{NewNotification, Notification};
use crate::metrics::track_notification_created;
use crate::middleware::role::ensure_owner;

const NOT_OWNER: &str = "cannot modify notifications you don't own";
const NOTIFICATION_COLUMNS: &str = "id, recipient_id, recipient_role, title, message, type, read, read_at, created_at, updated_at";

pub struct NotificationService;

impl NotificationService {
    /// Stores a notification as part of a larger write.
    pub async fn create_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        recipient_id: i64,
        recipient_role: Role,
        notice: NewNotification,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            r#"
            INSERT INTO notifications (recipient_id, recipient_role, title, message, type)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(recipient_id)
        .bind(recipient_role.as_str())
        .bind(&notice.title)
        .bind(&notice.message)
        .bind(notice.kind.as_str())
        .fetch_one(&mut **tx)
        .await
        .context("Failed to create notification")
        .map_err(AppError::database)?;

        track_notification_created(notice.kind.as_str());
        Ok(notification)
    }

    #[instrument(skip(db))]
    pub async fn list_for_recipient(
        db: &PgPool,
        recipient_id: i64,
        recipient_role: Role,
        unread_only: bool,
    ) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            r#"
            SELECT {NOTIFICATION_COLUMNS}
            FROM notifications
            WHERE recipient_id = $1 AND recipient_role = $2 AND deleted_at IS NULL
              AND ($3 = FALSE OR read = FALSE)
            ORDER BY created_at DESC, id DESC
            "#
        ))
        .bind(recipient_id)
        .bind(recipient_role.as_str())
        .bind(unread_only)
        .fetch_all(db)
        .await
        .context("Failed to fetch notifications")
        .map_err(AppError::database)?;

        Ok(notifications)
    }

    #[instrument(skip(db))]
    pub async fn unread_count(
        db: &PgPool,
        recipient_id: i64,
        recipient_role: Role,
    ) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM notifications
            WHERE recipient_id = $1 AND recipient_role = $2 AND read = FALSE AND deleted_at IS NULL
            "#,
        )
        .bind(recipient_id)
        .bind(recipient_role.as_str())
        .fetch_one(db)
        .await
        .context("Failed to count unread notifications")
        .map_err(AppError::database)?;

        Ok(count)
    }

    /// Loads a live notification and checks it is addressed to the caller.
    async fn get_owned(
        db: &PgPool,
        id: i64,
        recipient_id: i64,
        recipient_role: Role,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch notification")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("notification not found")))?;

        ensure_owner(notification.recipient_id, recipient_id, NOT_OWNER)?;
        if notification.recipient_role != recipient_role.as_str() {
            return Err(AppError::forbidden(NOT_OWNER.to_string()));
        }

        Ok(notification)
    }

    #[instrument(skip(db))]
    pub async fn mark_read(
        db: &PgPool,
        id: i64,
        recipient_id: i64,
        recipient_role: Role,
    ) -> Result<Notification, AppError> {
        Self::get_owned(db, id, recipient_id, recipient_role).await?;

        sqlx::query_as::<_, Notification>(&format!(
            r#"
            UPDATE notifications
            SET read = TRUE, read_at = COALESCE(read_at, NOW()), updated_at = NOW()
            WHERE id = $1 AND deleted_at IS NULL
            RETURNING {NOTIFICATION_COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to mark notification as read")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("notification not found")))
    }

    #[instrument(skip(db))]
    pub async fn mark_all_read(
        db: &PgPool,
        recipient_id: i64,
        recipient_role: Role,
    ) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE notifications
            SET read = TRUE, read_at = NOW(), updated_at = NOW()
            WHERE recipient_id = $1 AND recipient_role = $2 AND read = FALSE AND deleted_at IS NULL
            "#,
        )
        .bind(recipient_id)
        .bind(recipient_role.as_str())
        .execute(db)
        .await
        .context("Failed to mark notifications as read")
        .map_err(AppError::database)?;

        Ok(result.rows_affected())
    }

    #[instrument(skip(db))]
    pub async fn delete_notification(
        db: &PgPool,
        id: i64,
        recipient_id: i64,
        recipient_role: Role,
    ) -> Result<(), AppError> {
        Self::get_owned(db, id, recipient_id, recipient_role).await?;

        sqlx::query("UPDATE notifications SET deleted_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete notification")
            .map_err(AppError::database)?;

        Ok(())
    }
}
