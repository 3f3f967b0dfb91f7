use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use solvex_core::{AppError, ErrorResponse};

use super::model::{CreateTagDto, Tag};
use super::service::TagService;
use crate::middleware::auth::RequireProfessor;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// List all tags
#[utoipa::path(
    get,
    path = "/public/tags",
    responses(
        (status = 200, description = "All tags", body = Vec<Tag>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    tag = "Tags"
)]
#[instrument(skip(state))]
pub async fn list_tags(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = TagService::list_tags(&state.db).await?;
    Ok(Json(tags))
}

/// Get a tag by ID
#[utoipa::path(
    get,
    path = "/public/tags/{id}",
    params(
        ("id" = i64, Path, description = "Tag ID")
    ),
    responses(
        (status = 200, description = "Tag found", body = Tag),
        (status = 404, description = "Tag not found", body = ErrorResponse)
    ),
    tag = "Tags"
)]
#[instrument(skip(state))]
pub async fn get_tag(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Tag>, AppError> {
    let tag = TagService::get_tag(&state.db, id).await?;
    Ok(Json(tag))
}

/// Create a tag (professors only)
///
/// Returns the existing tag when one with the same name is already present.
#[utoipa::path(
    post,
    path = "/api/tags",
    request_body = CreateTagDto,
    responses(
        (status = 200, description = "Tag created or already present", body = Tag),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only professors can create tags", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Tags"
)]
#[instrument(skip(state, _professor))]
pub async fn create_tag(
    State(state): State<AppState>,
    _professor: RequireProfessor,
    ValidatedJson(dto): ValidatedJson<CreateTagDto>,
) -> Result<Json<Tag>, AppError> {
    let tag = TagService::create_tag(&state.db, dto).await?;
    Ok(Json(tag))
}
