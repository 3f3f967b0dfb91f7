use axum::{Json, extract::State};
use tracing::instrument;

use solvex_core::{AppError, ErrorResponse, MessageResponse};

use super::model::{Professor, UpdateProfessorDto};
use super::service::ProfessorService;
use crate::middleware::auth::RequireProfessor;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the current professor
#[utoipa::path(
    get,
    path = "/api/professors/me",
    responses(
        (status = 200, description = "Professor", body = Professor),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only professors", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Professors"
)]
#[instrument(skip(professor), fields(professor_id = professor.id))]
pub async fn get_me(RequireProfessor(professor): RequireProfessor) -> Json<Professor> {
    Json(professor)
}

/// Update the current professor
#[utoipa::path(
    put,
    path = "/api/professors/me",
    request_body = UpdateProfessorDto,
    responses(
        (status = 200, description = "Professor updated", body = Professor),
        (status = 400, description = "Validation error or email already registered", body = ErrorResponse),
        (status = 403, description = "Only professors", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Professors"
)]
#[instrument(skip(state, professor, dto), fields(professor_id = professor.id))]
pub async fn update_me(
    State(state): State<AppState>,
    RequireProfessor(professor): RequireProfessor,
    ValidatedJson(dto): ValidatedJson<UpdateProfessorDto>,
) -> Result<Json<Professor>, AppError> {
    let professor = ProfessorService::update_professor(&state.db, professor, dto).await?;
    Ok(Json(professor))
}

/// Delete the current professor's account
#[utoipa::path(
    delete,
    path = "/api/professors/me",
    responses(
        (status = 200, description = "Professor deleted", body = MessageResponse),
        (status = 403, description = "Only professors", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Professors"
)]
#[instrument(skip(state, professor), fields(professor_id = professor.id))]
pub async fn delete_me(
    State(state): State<AppState>,
    RequireProfessor(professor): RequireProfessor,
) -> Result<Json<MessageResponse>, AppError> {
    ProfessorService::delete_professor(&state.db, professor.id).await?;
    Ok(Json(MessageResponse::new("professor deleted")))
}
