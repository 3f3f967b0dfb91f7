//! Opportunity domain models and DTOs.
//!
//! An opportunity is posted by a professor and tagged with the interests it
//! requires. Responses embed the owning professor and the tags.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::professors::ProfessorSummary;
use crate::tags::Tag;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OpportunityType {
    Research,
    Project,
    Internship,
}

impl OpportunityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OpportunityType::Research => "research",
            OpportunityType::Project => "project",
            OpportunityType::Internship => "internship",
        }
    }
}

impl fmt::Display for OpportunityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
pub struct Opportunity {
    pub id: i64,
    pub professor_id: i64,
    pub name: String,
    pub details: String,
    pub requirements: String,
    pub reward: String,
    #[serde(rename = "type")]
    #[sqlx(rename = "type")]
    pub opportunity_type: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OpportunityWithDetails {
    #[serde(flatten)]
    pub opportunity: Opportunity,
    pub professor: Option<ProfessorSummary>,
    pub tags: Vec<Tag>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateOpportunityDto {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[serde(default)]
    pub details: String,
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    #[validate(length(max = 500))]
    pub reward: String,
    #[serde(rename = "type")]
    pub opportunity_type: OpportunityType,
    /// Ids of existing tags; unknown ids are ignored.
    #[serde(default)]
    #[validate(length(max = 50))]
    pub tag_ids: Vec<i64>,
}

/// Only provided fields are updated. When `tag_ids` is present it replaces
/// the current tag set.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateOpportunityDto {
    #[validate(length(min = 1, max = 200))]
    pub name: Option<String>,
    pub details: Option<String>,
    pub requirements: Option<String>,
    #[validate(length(max = 500))]
    pub reward: Option<String>,
    #[serde(rename = "type")]
    pub opportunity_type: Option<OpportunityType>,
    #[validate(length(max = 50))]
    pub tag_ids: Option<Vec<i64>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_dto_parses_type_field() {
        let json = r#"{"name":"Compiler internship","type":"internship","tag_ids":[1,2]}"#;
        let dto: CreateOpportunityDto = serde_json::from_str(json).unwrap();
        assert_eq!(dto.opportunity_type, OpportunityType::Internship);
        assert_eq!(dto.tag_ids, vec![1, 2]);
        assert_eq!(dto.details, "");
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_create_dto_rejects_unknown_type() {
        let json = r#"{"name":"Something","type":"hackathon"}"#;
        assert!(serde_json::from_str::<CreateOpportunityDto>(json).is_err());
    }

    #[test]
    fn test_create_dto_requires_name() {
        let json = r#"{"name":"","type":"research"}"#;
        let dto: CreateOpportunityDto = serde_json::from_str(json).unwrap();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_type_serializes_as_type_key() {
        let opportunity = Opportunity {
            id: 1,
            professor_id: 2,
            name: "Graph mining".to_string(),
            details: String::new(),
            requirements: String::new(),
            reward: String::new(),
            opportunity_type: "research".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let value = serde_json::to_value(&opportunity).unwrap();
        assert_eq!(value["type"], "research");
        assert!(value.get("opportunity_type").is_none());
    }
}
