use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use solvex_core::{AppError, ErrorResponse, MessageResponse};

use super::model::{CreateOpportunityDto, OpportunityWithDetails, UpdateOpportunityDto};
use super::service::OpportunityService;
use crate::middleware::auth::{AuthUser, RequireProfessor};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Create an opportunity (professors only)
#[utoipa::path(
    post,
    path = "/api/opportunities",
    request_body = CreateOpportunityDto,
    responses(
        (status = 200, description = "Opportunity created", body = OpportunityWithDetails),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only professors", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Opportunities"
)]
#[instrument(skip(state, professor, dto), fields(professor_id = professor.id))]
pub async fn create_opportunity(
    State(state): State<AppState>,
    RequireProfessor(professor): RequireProfessor,
    ValidatedJson(dto): ValidatedJson<CreateOpportunityDto>,
) -> Result<Json<OpportunityWithDetails>, AppError> {
    let opportunity = OpportunityService::create_opportunity(&state.db, professor.id, dto).await?;
    Ok(Json(opportunity))
}

/// List all opportunities
#[utoipa::path(
    get,
    path = "/api/opportunities",
    responses(
        (status = 200, description = "All opportunities", body = Vec<OpportunityWithDetails>),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Opportunities"
)]
#[instrument(skip(state, _user))]
pub async fn list_opportunities(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Json<Vec<OpportunityWithDetails>>, AppError> {
    let opportunities = OpportunityService::list_opportunities(&state.db).await?;
    Ok(Json(opportunities))
}

/// List the current professor's opportunities
#[utoipa::path(
    get,
    path = "/api/opportunities/me",
    responses(
        (status = 200, description = "Own opportunities, possibly empty", body = Vec<OpportunityWithDetails>),
        (status = 403, description = "Only professors", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Opportunities"
)]
#[instrument(skip(state, professor), fields(professor_id = professor.id))]
pub async fn list_my_opportunities(
    State(state): State<AppState>,
    RequireProfessor(professor): RequireProfessor,
) -> Result<Json<Vec<OpportunityWithDetails>>, AppError> {
    let opportunities = OpportunityService::list_for_professor(&state.db, professor.id).await?;
    Ok(Json(opportunities))
}

/// Get an opportunity by ID
#[utoipa::path(
    get,
    path = "/api/opportunities/{id}",
    params(
        ("id" = i64, Path, description = "Opportunity ID")
    ),
    responses(
        (status = 200, description = "Opportunity found", body = OpportunityWithDetails),
        (status = 404, description = "Opportunity not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Opportunities"
)]
#[instrument(skip(state, _user))]
pub async fn get_opportunity(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<OpportunityWithDetails>, AppError> {
    let opportunity = OpportunityService::get_opportunity(&state.db, id).await?;
    Ok(Json(opportunity))
}

/// Update an owned opportunity
///
/// When `tag_ids` is present it replaces the current tags.
#[utoipa::path(
    put,
    path = "/api/opportunities/{id}",
    params(
        ("id" = i64, Path, description = "Opportunity ID")
    ),
    request_body = UpdateOpportunityDto,
    responses(
        (status = 200, description = "Opportunity updated", body = OpportunityWithDetails),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Not a professor or not the owner", body = ErrorResponse),
        (status = 404, description = "Opportunity not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Opportunities"
)]
#[instrument(skip(state, professor, dto), fields(professor_id = professor.id))]
pub async fn update_opportunity(
    State(state): State<AppState>,
    RequireProfessor(professor): RequireProfessor,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateOpportunityDto>,
) -> Result<Json<OpportunityWithDetails>, AppError> {
    let opportunity =
        OpportunityService::update_opportunity(&state.db, professor.id, id, dto).await?;
    Ok(Json(opportunity))
}

/// Delete an owned opportunity
#[utoipa::path(
    delete,
    path = "/api/opportunities/{id}",
    params(
        ("id" = i64, Path, description = "Opportunity ID")
    ),
    responses(
        (status = 200, description = "Opportunity deleted", body = MessageResponse),
        (status = 403, description = "Not a professor or not the owner", body = ErrorResponse),
        (status = 404, description = "Opportunity not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Opportunities"
)]
#[instrument(skip(state, professor), fields(professor_id = professor.id))]
pub async fn delete_opportunity(
    State(state): State<AppState>,
    RequireProfessor(professor): RequireProfessor,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    OpportunityService::delete_opportunity(&state.db, professor.id, id).await?;
    Ok(Json(MessageResponse::new("opportunity deleted")))
}

/// Browse opportunities without signing in
#[utoipa::path(
    get,
    path = "/public/opportunities",
    responses(
        (status = 200, description = "All opportunities", body = Vec<OpportunityWithDetails>)
    ),
    tag = "Opportunities"
)]
#[instrument(skip(state))]
pub async fn list_public_opportunities(
    State(state): State<AppState>,
) -> Result<Json<Vec<OpportunityWithDetails>>, AppError> {
    let opportunities = OpportunityService::list_opportunities(&state.db).await?;
    Ok(Json(opportunities))
}

/// View an opportunity without signing in
#[utoipa::path(
    get,
    path = "/public/opportunities/{id}",
    params(
        ("id" = i64, Path, description = "Opportunity ID")
    ),
    responses(
        (status = 200, description = "Opportunity found", body = OpportunityWithDetails),
        (status = 404, description = "Opportunity not found", body = ErrorResponse)
    ),
    tag = "Opportunities"
)]
#[instrument(skip(state))]
pub async fn get_public_opportunity(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OpportunityWithDetails>, AppError> {
    let opportunity = OpportunityService::get_opportunity(&state.db, id).await?;
    Ok(Json(opportunity))
}
