use anyhow::Context;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use solvex_auth::Role;
use solvex_core::AppError;
use solvex_models::{Student, StudentSummary};

use super::model::{CreateReportDto, ReportWithStudent, WeeklyReport};
use crate::middleware::auth::Principal;
use crate::middleware::role::ensure_owner;
use crate::modules::notifications::model::NewNotification;
use crate::modules::notifications::service::NotificationService;
use crate::modules::professors::service::ProfessorService;

const REPORT_COLUMNS: &str = "id, student_id, recipient_id, drive_link, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ReportRow {
    id: i64,
    student_id: i64,
    recipient_id: i64,
    drive_link: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    student_first_name: String,
    student_last_name: String,
    student_email: String,
}

impl From<ReportRow> for ReportWithStudent {
    fn from(row: ReportRow) -> Self {
        Self {
            student: StudentSummary {
                id: row.student_id,
                first_name: row.student_first_name,
                last_name: row.student_last_name,
                email: row.student_email,
            },
            report: WeeklyReport {
                id: row.id,
                student_id: row.student_id,
                recipient_id: row.recipient_id,
                drive_link: row.drive_link,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
        }
    }
}

const SELECT_WITH_STUDENT: &str = r#"
    SELECT r.id, r.student_id, r.recipient_id, r.drive_link, r.created_at, r.updated_at,
           s.first_name AS student_first_name,
           s.last_name AS student_last_name,
           s.email AS student_email
    FROM weekly_reports r
    JOIN students s ON s.id = r.student_id
"#;

pub struct ReportService;

impl ReportService {
    /// Files a report to a professor and notifies them in the same
    /// transaction.
    #[instrument(skip(db, student, dto), fields(student_id = student.id, recipient_id = dto.recipient_id))]
    pub async fn create_report(
        db: &PgPool,
        student: &Student,
        dto: CreateReportDto,
    ) -> Result<WeeklyReport, AppError> {
        ProfessorService::get_professor(db, dto.recipient_id).await?;

        let mut tx = db.begin().await.context("Failed to begin transaction")?;

        let report = sqlx::query_as::<_, WeeklyReport>(&format!(
            r#"
            INSERT INTO weekly_reports (student_id, recipient_id, drive_link)
            VALUES ($1, $2, $3)
            RETURNING {REPORT_COLUMNS}
            "#
        ))
        .bind(student.id)
        .bind(dto.recipient_id)
        .bind(&dto.drive_link)
        .fetch_one(&mut *tx)
        .await
        .context("Failed to create report")
        .map_err(AppError::database)?;

        NotificationService::create_in_tx(
            &mut tx,
            dto.recipient_id,
            Role::Professor,
            NewNotification::report_submitted(&student.full_name()),
        )
        .await?;

        tx.commit().await.context("Failed to commit transaction")?;

        Ok(report)
    }

    async fn list_where(
        db: &PgPool,
        filter: &str,
        binds: &[i64],
    ) -> Result<Vec<ReportWithStudent>, AppError> {
        let sql = format!(
            "{SELECT_WITH_STUDENT} WHERE {filter} AND r.deleted_at IS NULL ORDER BY r.created_at DESC, r.id DESC"
        );
        let mut query = sqlx::query_as::<_, ReportRow>(&sql);
        for value in binds {
            query = query.bind(*value);
        }

        let rows = query
            .fetch_all(db)
            .await
            .context("Failed to fetch reports")
            .map_err(AppError::database)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(db))]
    pub async fn list_authored(
        db: &PgPool,
        student_id: i64,
    ) -> Result<Vec<ReportWithStudent>, AppError> {
        Self::list_where(db, "r.student_id = $1", &[student_id]).await
    }

    #[instrument(skip(db))]
    pub async fn list_received(
        db: &PgPool,
        professor_id: i64,
    ) -> Result<Vec<ReportWithStudent>, AppError> {
        Self::list_where(db, "r.recipient_id = $1", &[professor_id]).await
    }

    /// Reports one student sent to this professor.
    #[instrument(skip(db))]
    pub async fn list_from_student(
        db: &PgPool,
        professor_id: i64,
        student_id: i64,
    ) -> Result<Vec<ReportWithStudent>, AppError> {
        Self::list_where(
            db,
            "r.recipient_id = $1 AND r.student_id = $2",
            &[professor_id, student_id],
        )
        .await
    }

    /// One report, for its author or its recipient.
    #[instrument(skip(db, principal))]
    pub async fn get_report(
        db: &PgPool,
        principal: &Principal,
        id: i64,
    ) -> Result<ReportWithStudent, AppError> {
        let row = sqlx::query_as::<_, ReportRow>(&format!(
            "{SELECT_WITH_STUDENT} WHERE r.id = $1 AND r.deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch report")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("report not found")))?;

        let owner = match principal.role() {
            Role::Student => row.student_id,
            Role::Professor => row.recipient_id,
            Role::Organization => {
                return Err(AppError::forbidden("cannot view this report".to_string()));
            }
        };
        ensure_owner(owner, principal.id(), "cannot view this report")?;

        Ok(row.into())
    }

    #[instrument(skip(db))]
    pub async fn delete_report(db: &PgPool, student_id: i64, id: i64) -> Result<(), AppError> {
        let report = sqlx::query_as::<_, WeeklyReport>(&format!(
            "SELECT {REPORT_COLUMNS} FROM weekly_reports WHERE id = $1 AND deleted_at IS NULL"
        ))
        .bind(id)
        .fetch_optional(db)
        .await
        .context("Failed to fetch report")
        .map_err(AppError::database)?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("report not found")))?;

        ensure_owner(
            report.student_id,
            student_id,
            "cannot delete reports you don't own",
        )?;

        sqlx::query("UPDATE weekly_reports SET deleted_at = NOW() WHERE id = $1")
            .bind(id)
            .execute(db)
            .await
            .context("Failed to delete report")
            .map_err(AppError::database)?;

        Ok(())
    }
}
