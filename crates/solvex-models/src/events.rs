//! Events published by organizations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::organizations::Organization;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Event {
    pub id: i64,
    pub organization_id: i64,
    pub title: String,
    pub description: String,
    /// Free text: a date, a range or a duration
    pub date: String,
    pub link: String,
    pub sign_up_link: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EventWithOrganization {
    #[serde(flatten)]
    pub event: Event,
    pub organization: Option<Organization>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateEventDto {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    #[validate(length(max = 200))]
    pub date: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub link: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub sign_up_link: String,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateEventDto {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub date: Option<String>,
    #[validate(length(max = 2048))]
    pub link: Option<String>,
    #[validate(length(max = 2048))]
    pub sign_up_link: Option<String>,
}
