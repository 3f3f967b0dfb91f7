//! Interest tags shared by students and opportunities.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Creating a tag whose name already exists returns the existing tag.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateTagDto {
    #[validate(length(min = 1, max = 100))]
    #[schema(example = "machine-learning")]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 1000))]
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_tag_empty_name() {
        let dto = CreateTagDto {
            name: String::new(),
            description: String::new(),
        };
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_create_tag_description_optional() {
        let dto: CreateTagDto = serde_json::from_str(r#"{"name":"robotics"}"#).unwrap();
        assert!(dto.validate().is_ok());
        assert_eq!(dto.description, "");
    }
}
