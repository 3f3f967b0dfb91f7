//! Application domain models and DTOs.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::students::StudentSummary;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Accepted,
    Rejected,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Accepted => "accepted",
            ApplicationStatus::Rejected => "rejected",
        }
    }

    /// Accepted and rejected are the states the student is told about.
    pub fn is_decision(&self) -> bool {
        matches!(self, ApplicationStatus::Accepted | ApplicationStatus::Rejected)
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Application {
    pub id: i64,
    pub student_id: i64,
    pub opportunity_id: i64,
    pub message: String,
    pub resume_link: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// An application together with the applicant and the opportunity it
/// targets, as listed to students and professors.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApplicationWithDetails {
    #[serde(flatten)]
    pub application: Application,
    pub student: StudentSummary,
    pub opportunity: OpportunityRef,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct OpportunityRef {
    pub id: i64,
    pub name: String,
    pub professor_id: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateApplicationDto {
    pub opportunity_id: i64,
    #[serde(default)]
    #[validate(length(max = 5000))]
    pub message: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub resume_link: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateApplicationStatusDto {
    pub status: ApplicationStatus,
}

/// Body of `DELETE /api/applications`: withdraw by opportunity.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct WithdrawApplicationDto {
    pub opportunity_id: i64,
}
