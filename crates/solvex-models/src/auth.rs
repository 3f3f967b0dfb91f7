//! Authentication request and response bodies.
//!
//! Sign-up is a two-step flow: the client first asks for a code at
//! `/auth/send-code`, then submits it together with the account fields.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use solvex_auth::Role;

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SendCodeRequest {
    #[validate(email)]
    #[schema(example = "ada@uni.edu")]
    pub email: String,
}

/// Sign-up body for students and professors.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignUpRequest {
    #[schema(example = 123456)]
    pub code: u32,
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
}

/// Sign-up body for organizations, which carry a name instead of a person's name.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct OrganizationSignUpRequest {
    pub code: u32,
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[serde(default)]
    #[validate(length(max = 255))]
    pub contact: String,
    #[serde(default)]
    #[validate(length(max = 2048))]
    pub link: String,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SignInResponse {
    pub token: String,
    pub role: Role,
}

/// Trims and lowercases an address so lookups and uniqueness are
/// case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
