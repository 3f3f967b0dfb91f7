use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use solvex_core::{AppError, ErrorResponse, MessageResponse};

use super::model::{Organization, UpdateOrganizationDto};
use super::service::OrganizationService;
use crate::middleware::auth::RequireOrganization;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the current organization
#[utoipa::path(
    get,
    path = "/api/organizations/me",
    responses(
        (status = 200, description = "Organization", body = Organization),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only organizations", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Organizations"
)]
#[instrument(skip(organization), fields(organization_id = organization.id))]
pub async fn get_me(RequireOrganization(organization): RequireOrganization) -> Json<Organization> {
    Json(organization)
}

/// Update the current organization
#[utoipa::path(
    put,
    path = "/api/organizations/me",
    request_body = UpdateOrganizationDto,
    responses(
        (status = 200, description = "Organization updated", body = Organization),
        (status = 400, description = "Validation error or email already registered", body = ErrorResponse),
        (status = 403, description = "Only organizations", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Organizations"
)]
#[instrument(skip(state, organization, dto), fields(organization_id = organization.id))]
pub async fn update_me(
    State(state): State<AppState>,
    RequireOrganization(organization): RequireOrganization,
    ValidatedJson(dto): ValidatedJson<UpdateOrganizationDto>,
) -> Result<Json<Organization>, AppError> {
    let organization =
        OrganizationService::update_organization(&state.db, organization, dto).await?;
    Ok(Json(organization))
}

/// Delete the current organization's account
#[utoipa::path(
    delete,
    path = "/api/organizations/me",
    responses(
        (status = 200, description = "Organization deleted", body = MessageResponse),
        (status = 403, description = "Only organizations", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Organizations"
)]
#[instrument(skip(state, organization), fields(organization_id = organization.id))]
pub async fn delete_me(
    State(state): State<AppState>,
    RequireOrganization(organization): RequireOrganization,
) -> Result<Json<MessageResponse>, AppError> {
    OrganizationService::delete_organization(&state.db, organization.id).await?;
    Ok(Json(MessageResponse::new("organization deleted")))
}

/// Public organization profile
#[utoipa::path(
    get,
    path = "/public/organizations/{id}",
    params(
        ("id" = i64, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Organization found", body = Organization),
        (status = 404, description = "Organization not found", body = ErrorResponse)
    ),
    tag = "Organizations"
)]
#[instrument(skip(state))]
pub async fn get_organization(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Organization>, AppError> {
    let organization = OrganizationService::get_organization(&state.db, id).await?;
    Ok(Json(organization))
}
