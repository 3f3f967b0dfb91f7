//! The three account kinds a token can speak for.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Professor,
    Organization,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Professor, Role::Organization];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Professor => "professor",
            Role::Organization => "organization",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no known role. Carries the rejected input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "student" => Ok(Role::Student),
            "professor" => Ok(Role::Professor),
            "organization" => Ok(Role::Organization),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_roles() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert_eq!(
            "Student".parse::<Role>().unwrap_err(),
            UnknownRole("Student".to_string())
        );
    }

    #[test]
    fn test_unknown_role_message() {
        let err = "admin".parse::<Role>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid role: admin");
    }

    #[test]
    fn test_serde_lowercase() {
        assert_eq!(
            serde_json::to_string(&Role::Organization).unwrap(),
            r#""organization""#
        );
        let role: Role = serde_json::from_str(r#""professor""#).unwrap();
        assert_eq!(role, Role::Professor);
    }
}
