//! Weekly progress reports sent from a student to a professor.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::students::StudentSummary;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct WeeklyReport {
    pub id: i64,
    pub student_id: i64,
    /// The professor the report is addressed to
    pub recipient_id: i64,
    pub drive_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ReportWithStudent {
    #[serde(flatten)]
    pub report: WeeklyReport,
    pub student: StudentSummary,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReportDto {
    pub recipient_id: i64,
    #[validate(url)]
    #[schema(example = "https://drive.google.com/file/d/abc/view")]
    pub drive_link: String,
}
