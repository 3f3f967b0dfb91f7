use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use solvex_auth::Role;
use solvex_core::{AppError, ErrorResponse, MessageResponse};

use super::model::{CreateReportDto, ReportWithStudent, WeeklyReport};
use super::service::ReportService;
use crate::middleware::auth::{AuthUser, RequireProfessor, RequireStudent};
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Submit a weekly report to a professor (students only)
#[utoipa::path(
    post,
    path = "/api/reports",
    request_body = CreateReportDto,
    responses(
        (status = 200, description = "Report submitted", body = WeeklyReport),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Only students", body = ErrorResponse),
        (status = 404, description = "Professor not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, student, dto), fields(student_id = student.id))]
pub async fn create_report(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<CreateReportDto>,
) -> Result<Json<WeeklyReport>, AppError> {
    let report = ReportService::create_report(&state.db, &student, dto).await?;
    Ok(Json(report))
}

/// List the current account's reports
///
/// Students get the reports they wrote; professors get the ones sent to them.
#[utoipa::path(
    get,
    path = "/api/reports/me",
    responses(
        (status = 200, description = "Reports", body = Vec<ReportWithStudent>),
        (status = 403, description = "Organizations have no reports", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn list_my_reports(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<Vec<ReportWithStudent>>, AppError> {
    let reports = match user.role() {
        Role::Student => ReportService::list_authored(&state.db, user.id()).await?,
        Role::Professor => ReportService::list_received(&state.db, user.id()).await?,
        Role::Organization => {
            return Err(AppError::forbidden(
                "only student or professor can perform this action".to_string(),
            ));
        }
    };
    Ok(Json(reports))
}

/// List the reports a student sent to the current professor
#[utoipa::path(
    get,
    path = "/api/reports/student/{id}",
    params(
        ("id" = i64, Path, description = "Student ID")
    ),
    responses(
        (status = 200, description = "Reports", body = Vec<ReportWithStudent>),
        (status = 403, description = "Only professors", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, professor), fields(professor_id = professor.id))]
pub async fn list_student_reports(
    State(state): State<AppState>,
    RequireProfessor(professor): RequireProfessor,
    Path(student_id): Path<i64>,
) -> Result<Json<Vec<ReportWithStudent>>, AppError> {
    let reports = ReportService::list_from_student(&state.db, professor.id, student_id).await?;
    Ok(Json(reports))
}

/// Get one report
#[utoipa::path(
    get,
    path = "/api/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report", body = ReportWithStudent),
        (status = 403, description = "Neither author nor recipient", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, user), fields(user_id = user.id()))]
pub async fn get_report(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ReportWithStudent>, AppError> {
    let report = ReportService::get_report(&state.db, &user.0, id).await?;
    Ok(Json(report))
}

/// Delete one of the current student's reports
#[utoipa::path(
    delete,
    path = "/api/reports/{id}",
    params(
        ("id" = i64, Path, description = "Report ID")
    ),
    responses(
        (status = 200, description = "Report deleted", body = MessageResponse),
        (status = 403, description = "Not the author", body = ErrorResponse),
        (status = 404, description = "Report not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Reports"
)]
#[instrument(skip(state, student), fields(student_id = student.id))]
pub async fn delete_report(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    ReportService::delete_report(&state.db, student.id, id).await?;
    Ok(Json(MessageResponse::new("report deleted")))
}
