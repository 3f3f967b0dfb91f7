use serde::Serialize;
use utoipa::ToSchema;

use solvex_auth::Role;

use crate::middleware::auth::Principal;

pub use solvex_models::auth::*;

/// Body of `GET /api/profile`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub role: Role,
    pub user: Principal,
}
