//! Organization domain models and DTOs.
//!
//! Organizations publish events. Their public profile is served without
//! authentication, so the struct carries nothing private.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    pub email: String,
    /// Phone, email or other contact information
    pub contact: String,
    /// Website or social profile
    pub link: String,
    pub last_changed_password: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOrganizationDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 255))]
    pub contact: Option<String>,
    #[validate(length(max = 2048))]
    pub link: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_dto_invalid_email() {
        let dto = UpdateOrganizationDto {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_partial() {
        let dto: UpdateOrganizationDto = serde_json::from_str(r#"{"contact":"+1 555 0100"}"#).unwrap();
        assert!(dto.validate().is_ok());
        assert!(dto.name.is_none());
        assert_eq!(dto.contact.as_deref(), Some("+1 555 0100"));
    }
}
