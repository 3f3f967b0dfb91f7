use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::{info, instrument};

use solvex_auth::Role;
use solvex_core::AppError;
use solvex_models::StudentSummary;

use super::model::{
    Application, ApplicationStatus, ApplicationWithDetails, CreateApplicationDto, DecisionEmail,
    OpportunityRef,
};
use crate::metrics::track_application_status;
use crate::middleware::auth::Principal;
use crate::middleware::role::ensure_owner;
use crate::modules::notifications::model::NewNotification;
use crate::modules::notifications::service::NotificationService;
use crate::modules::opportunities::service::OpportunityService;

const CANNOT_VIEW: &str = "cannot view applications";

const APPLICATION_COLUMNS: &str =
    "id, student_id, opportunity_id, message, resume_link, status, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ApplicationRow {
    id: i64,
    student_id: i64,
    opportunity_id: i64,
    message: String,
    resume_link: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    student_first_name: String,
    student_last_name: String,
    student_email: String,
    opportunity_name: String,
    opportunity_professor_id: i64,
}

impl From<ApplicationRow> for ApplicationWithDetails {
    fn from(row: ApplicationRow) -> Self {
        Self {
            student: StudentSummary {
                id: row.student_id,
                first_name: row.student_first_name,
                last_name: row.student_last_name,
                email: row.student_email,
            },
            opportunity: OpportunityRef {
                id: row.opportunity_id,
                name: row.opportunity_name,
                professor_id: row.opportunity_professor_id,
            },
            application: Application {
                id: row.id,
                student_id: row.student_id,
                opportunity_id: row.opportunity_id,
                message: row.message,
                resume_link: row.resume_link,
                status: row.status,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const SELECT_WITH_DETAILS: &str = r#"
    SELECT a.id, a.student_id, a.opportunity_id, a.message, a.resume_link, a.status,
           a.created_at, a.updated_at,
           s.first_name AS student_first_name,
           s.last_name AS student_last_name,
           s.email AS student_email,
           o.name AS opportunity_name,
           o.professor_id AS opportunity_professor_id
    FROM applications a
    JOIN students s ON s.id = a.student_id
    JOIN opportunities o ON o.id = a.opportunity_id
"#;

pub struct ApplicationService;

impl ApplicationService {
    #[instrument(skip(db, dto), fields(opportunity_id = dto.opportunity_id))]
    pub async fn apply(
        db: &PgPool,
        student_id: i64,
        dto: CreateApplicationDto,
    ) -> Result<Application, AppError> {
        OpportunityService::get_row(db, dto.opportunity_id).await?;

        let application = sqlx::query_as::<_, Application>(&format!(
            r#"
            INSERT INTO applications (student_id, opportunity_id, message, resume_link)
            VALUES ($1, $2, $3, $4)
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(student_id)
        .bind(dto.opportunity_id)
        .bind(&dto.message)
        .bind(&dto.resume_link)
        .fetch_one(db)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!(
                    "already applied to this opportunity"
                ));
            }
            AppError::database(anyhow::Error::from(e))
        })?;

        track_application_status(ApplicationStatus::Pending.as_str());
        Ok(application)
    }

    /// Withdraws the student's live application to an opportunity.
    #[instrument(skip(db))]
    pub async fn withdraw(
        db: &PgPool,
        student_id: i64,
        opportunity_id: i64,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE applications SET deleted_at = NOW()
            WHERE student_id = $1 AND opportunity_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(student_id)
        .bind(opportunity_id)
        .execute(db)
        .await
        .context("Failed to withdraw application")
        .map_err(AppError::database)?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow::anyhow!("application not found")));
        }

        Ok(())
    }

    #[instrument(skip(db))]
    pub async fn delete_application(
        db: &PgPool,
        student_id: i64,
        id: i64,
    ) -> Result<(), AppError> {
        let application = Self::get_row(db, id).await?;
        ensure_owner(
            application.student_id,
            student_id,
            "cannot delete applications you don't own",
        )?;

        sqlx::query("UPDATE applications SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete application")
            .map_err(AppError::database)?;

        Ok(())
    }

    async fn get_row(db: &PgPool, id: i64) -> Result<Application, AppError> {
        sqlx::query_as::<_, Application>(&format!(
            "SELECT {APPLICATION_COLUMNS} FROM applications WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch application")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("application not found")))
    }

    #[instrument(skip(db))]
    pub async fn list_for_student(
        db: &PgPool,
        student_id: i64,
    ) -> Result<Vec<ApplicationWithDetails>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"{SELECT_WITH_DETAILS}
            WHERE a.student_id = $1 AND a.deleted_at IS NULL
            ORDER BY a.created_at DESC, a.id DESC"#
        ))
        .bind(student_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch student applications")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Applications to any opportunity the professor owns.
    #[instrument(skip(db))]
    pub async fn list_for_professor(
        db: &PgPool,
        professor_id: i64,
    ) -> Result<Vec<ApplicationWithDetails>, AppError> {
        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"{SELECT_WITH_DETAILS}
            WHERE o.professor_id = $1 AND a.deleted_at IS NULL AND o.deleted_at IS NULL
            ORDER BY a.created_at DESC, a.id DESC"#
        ))
        .bind(professor_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch professor applications")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Applications to one opportunity, visible only to its owner. A
    /// missing opportunity answers the same 403 as a foreign one.
    #[instrument(skip(db))]
    pub async fn list_for_opportunity(
        db: &PgPool,
        professor_id: i64,
        opportunity_id: i64,
    ) -> Result<Vec<ApplicationWithDetails>, AppError> {
        let opportunity = OpportunityService::find_row(db, opportunity_id)
            .await?
            .ok_or_else(|| AppError::forbidden(CANNOT_VIEW.to_string()))?;
        ensure_owner(opportunity.professor_id, professor_id, CANNOT_VIEW)?;

        let rows = sqlx::query_as::<_, ApplicationRow>(&format!(
            r#"{SELECT_WITH_DETAILS}
            WHERE a.opportunity_id = $1 AND a.deleted_at IS NULL
            ORDER BY a.created_at DESC, a.id DESC"#
        ))
        .bind(opportunity_id)
        .fetch_all(db)
        .await
        .context("Failed to fetch opportunity applications")
        .map_err(AppError::database)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// One application, for its applicant or the professor who owns the
    /// opportunity.
    #[instrument(skip(db, principal))]
    pub async fn get_application(
        db: &PgPool,
        principal: &Principal,
        id: i64,
    ) -> Result<ApplicationWithDetails, AppError> {
        let row = sqlx::query_as::<_, ApplicationRow>(&format!(
            "{SELECT_WITH_DETAILS} WHERE a.id = $1 AND a.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch application")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("application not found")))?;

        match principal.role() {
            Role::Student => ensure_owner(row.student_id, principal.id(), CANNOT_VIEW)?,
            Role::Professor => {
                ensure_owner(row.opportunity_professor_id, principal.id(), CANNOT_VIEW)?
            }
            Role::Organization => return Err(AppError::forbidden(CANNOT_VIEW.to_string())),
        }

        Ok(row.into())
    }

    /// Moves an application to `status` under a row lock.
    ///
    /// A change to accepted or rejected stores exactly one notification for
    /// the student in the same transaction and returns the email to send
    /// after commit. Writing the current status again is a no-op for
    /// notifications.
    #[instrument(skip(db))]
    pub async fn update_status(
        db: &PgPool,
        professor_id: i64,
        id: i64,
        status: ApplicationStatus,
    ) -> Result<(Application, Option<DecisionEmail>), AppError> {
        #[derive(sqlx::FromRow)]
        struct LockedApplication {
            student_id: i64,
            status: String,
            opportunity_name: String,
            opportunity_professor_id: i64,
            student_email: String,
        }

        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let locked = sqlx::query_as::<_, LockedApplication>(
            r#"
            SELECT a.student_id, a.status,
                   o.name AS opportunity_name,
                   o.professor_id AS opportunity_professor_id,
                   s.email AS student_email
            FROM applications a
            JOIN opportunities o ON o.id = a.opportunity_id
            JOIN students s ON s.id = a.student_id
            WHERE a.id = $1 AND a.deleted_at IS NULL
            FOR UPDATE OF a
            "#,
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .context("Failed to lock application")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("application not found")))?;

        ensure_owner(
            locked.opportunity_professor_id,
            professor_id,
            "cannot modify applications for opportunities you don't own",
        )?;

        let application = sqlx::query_as::<_, Application>(&format!(
            r#"
            UPDATE applications SET status = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING {APPLICATION_COLUMNS}
            "#
        ))
        .bind(status.as_str())
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to update application status")
        .map_err(AppError::database)?;

        let changed = locked.status != status.as_str();
        let notice = if changed {
            NewNotification::application_decision(&locked.opportunity_name, status)
        } else {
            None
        };

        let email = match notice {
            Some(notice) => {
                let email = DecisionEmail {
                    to: locked.student_email,
                    subject: notice.title.clone(),
                    body: notice.message.clone(),
                };
                NotificationService::create_in_tx(&mut tx, locked.student_id, Role::Student, notice)
                    .await?;
                Some(email)
            }
            None => None,
        };

        tx.commit().await.context("Failed to commit transaction")?;

        if changed {
            info!(
                application_id = id,
                from = %locked.status,
                to = %status,
                "Application status changed"
            );
            track_application_status(status.as_str());
        }

        Ok((application, email))
    }
}
