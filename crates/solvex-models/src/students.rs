//! Student domain models and DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::coins::Coins;
use crate::tags::Tag;

/// A student account. The password digest is never selected into this
/// struct; sign-in reads it separately.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub last_changed_password: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Student {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Minimal student view embedded in applications and reports.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct StudentSummary {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

/// `GET /api/students/me` body: the account with its tags and balance.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StudentProfile {
    #[serde(flatten)]
    pub student: Student,
    pub tags: Vec<Tag>,
    pub coins: Option<Coins>,
}

/// All fields are optional; only provided fields are updated.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentDto {
    #[validate(length(min = 1, max = 100))]
    pub first_name: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub last_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 8))]
    pub password: Option<String>,
}

/// Replaces the interest tags of the calling student. Unknown ids are ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStudentTagsDto {
    #[validate(length(max = 50))]
    pub tag_ids: Vec<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student() -> Student {
        Student {
            id: 1,
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@uni.edu".to_string(),
            last_changed_password: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_full_name() {
        assert_eq!(student().full_name(), "Ada Lovelace");
    }

    #[test]
    fn test_profile_flattens_student() {
        let profile = StudentProfile {
            student: student(),
            tags: vec![],
            coins: None,
        };
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["first_name"], "Ada");
        assert!(value["tags"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_update_dto_rejects_short_password() {
        let dto = UpdateStudentDto {
            password: Some("short".to_string()),
            ..Default::default()
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_dto_empty_is_valid() {
        assert!(UpdateStudentDto::default().validate().is_ok());
    }
}
