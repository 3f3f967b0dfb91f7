use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{instrument, warn};

use solvex_auth::Role;
use solvex_core::{AppError, ErrorResponse, MessageResponse};

use super::model::{
    Application, ApplicationWithDetails, CreateApplicationDto, UpdateApplicationStatusDto,
    WithdrawApplicationDto,
};
use super::service::ApplicationService;
use crate::middleware::auth::{AuthUser, RequireProfessor, RequireStudent};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Apply to an opportunity (students only)
#[utoipa::path(
    post,
    path = "/api/applications",
    request_body = CreateApplicationDto,
    responses(
        (status = 200, description = "Application submitted", body = Application),
        (status = 400, description = "Validation error or already applied", body = ErrorResponse),
        (status = 403, description = "Only students", body = ErrorResponse),
        (status = 404, description = "Opportunity not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
#[instrument(skip(state, student, dto), fields(student_id = student.id))]
pub async fn apply(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<CreateApplicationDto>,
) -> Result<Json<Application>, AppError> {
    let application = ApplicationService::apply(&state.db, student.id, dto).await?;
    Ok(Json(application))
}

/// Withdraw the current student's application to an opportunity
#[utoipa::path(
    delete,
    path = "/api/applications",
    request_body = WithdrawApplicationDto,
    responses(
        (status = 200, description = "Application deleted", body = MessageResponse),
        (status = 403, description = "Only students", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
#[instrument(skip(state, student), fields(student_id = student.id))]
pub async fn withdraw(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<WithdrawApplicationDto>,
) -> Result<Json<MessageResponse>, AppError> {
    ApplicationService::withdraw(&state.db, student.id, dto.opportunity_id).await?;
    Ok(Json(MessageResponse::new("application deleted")))
}

/// List the current account's applications
///
/// Students see what they applied to; professors see applications to their
/// opportunities.
#[utoipa::path(
    get,
    path = "/api/applications/me",
    responses(
        (status = 200, description = "Applications", body = Vec<ApplicationWithDetails>),
        (status = 403, description = "Organizations have no applications", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn list_my_applications(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ApplicationWithDetails>>, AppError> {
    let applications = match user.role() {
        Role::Student => ApplicationService::list_for_student(&state.db, user.id()).await?,
        Role::Professor => ApplicationService::list_for_professor(&state.db, user.id()).await?,
        Role::Organization => {
            return Err(AppError::forbidden(
                "only student or professor can perform this action".to_string(),
            ));
        }
    };
    Ok(Json(applications))
}

/// List applications to an owned opportunity
#[utoipa::path(
    get,
    path = "/api/applications/opportunity/{id}",
    params(
        ("id" = i64, Path, description = "Opportunity ID")
    ),
    responses(
        (status = 200, description = "Applications", body = Vec<ApplicationWithDetails>),
        (status = 403, description = "Not the owning professor", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
#[instrument(skip(state, professor), fields(professor_id = professor.id))]
pub async fn list_opportunity_applications(
    State(state): State<AppState>,
    RequireProfessor(professor): RequireProfessor,
    Path(id): Path<i64>,
) -> Result<Json<Vec<ApplicationWithDetails>>, AppError> {
    let applications =
        ApplicationService::list_for_opportunity(&state.db, professor.id, id).await?;
    Ok(Json(applications))
}

/// Get one application
#[utoipa::path(
    get,
    path = "/api/applications/{id}",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application", body = ApplicationWithDetails),
        (status = 403, description = "Neither the applicant nor the owning professor", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn get_application(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApplicationWithDetails>, AppError> {
    let application = ApplicationService::get_application(&state.db, &user.0, id).await?;
    Ok(Json(application))
}

/// Accept, reject or reset an application
///
/// A change to accepted or rejected notifies the student in-app and by
/// email.
#[utoipa::path(
    put,
    path = "/api/applications/{id}/status",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    request_body = UpdateApplicationStatusDto,
    responses(
        (status = 200, description = "Status updated", body = Application),
        (status = 400, description = "Invalid status", body = ErrorResponse),
        (status = 403, description = "Not the owning professor", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
#[instrument(skip(state, professor), fields(professor_id = professor.id))]
pub async fn update_status(
    State(state): State<AppState>,
    RequireProfessor(professor): RequireProfessor,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateApplicationStatusDto>,
) -> Result<Json<Application>, AppError> {
    let (application, email) =
        ApplicationService::update_status(&state.db, professor.id, id, dto.status).await?;

    if let Some(email) = email {
        let mailer = state.mailer.clone();
        tokio::spawn(async move {
            if let Err(e) = mailer
                .send_notification(&email.to, &email.subject, &email.body)
                .await
            {
                warn!(to = %email.to, error = %e.message(), "Failed to send decision email");
            }
        });
    }

    Ok(Json(application))
}

/// Delete one of the current student's applications
#[utoipa::path(
    delete,
    path = "/api/applications/{id}",
    params(
        ("id" = i64, Path, description = "Application ID")
    ),
    responses(
        (status = 200, description = "Application deleted", body = MessageResponse),
        (status = 403, description = "Not the applicant", body = ErrorResponse),
        (status = 404, description = "Application not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Applications"
)]
#[instrument(skip(state, student), fields(student_id = student.id))]
pub async fn delete_application(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    ApplicationService::delete_application(&state.db, student.id, id).await?;
    Ok(Json(MessageResponse::new("application deleted")))
}
