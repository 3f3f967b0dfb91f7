use axum::{Json, extract::State};
use tracing::instrument;

use solvex_core::{AppError, ErrorResponse, MessageResponse};

use super::model::{Student, StudentProfile, UpdateStudentDto, UpdateStudentTagsDto};
use super::service::StudentService;
use crate::middleware::auth::RequireStudent;
use crate::modules::tags::model::Tag;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the current student's profile with tags and coins
#[utoipa::path(
    get,
    path = "/api/students/me",
    responses(
        (status = 200, description = "Student profile", body = StudentProfile),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only students", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, student), fields(student_id = student.id))]
pub async fn get_me(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
) -> Result<Json<StudentProfile>, AppError> {
    let profile = StudentService::get_profile(&state.db, student).await?;
    Ok(Json(profile))
}

/// Update the current student
#[utoipa::path(
    put,
    path = "/api/students/me",
    request_body = UpdateStudentDto,
    responses(
        (status = 200, description = "Student updated", body = Student),
        (status = 400, description = "Validation error or email already registered", body = ErrorResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only students", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, student, dto), fields(student_id = student.id))]
pub async fn update_me(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<UpdateStudentDto>,
) -> Result<Json<Student>, AppError> {
    let student = StudentService::update_student(&state.db, student, dto).await?;
    Ok(Json(student))
}

/// Replace the current student's interest tags
#[utoipa::path(
    put,
    path = "/api/students/me/tags",
    request_body = UpdateStudentTagsDto,
    responses(
        (status = 200, description = "Tags replaced", body = Vec<Tag>),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Only students", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, student), fields(student_id = student.id))]
pub async fn update_my_tags(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<UpdateStudentTagsDto>,
) -> Result<Json<Vec<Tag>>, AppError> {
    let tags = StudentService::update_tags(&state.db, student.id, &dto.tag_ids).await?;
    Ok(Json(tags))
}

/// Delete the current student's account
#[utoipa::path(
    delete,
    path = "/api/students/me",
    responses(
        (status = 200, description = "Student deleted", body = MessageResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only students", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Students"
)]
#[instrument(skip(state, student), fields(student_id = student.id))]
pub async fn delete_me(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
) -> Result<Json<MessageResponse>, AppError> {
    StudentService::delete_student(&state.db, student.id).await?;
    Ok(Json(MessageResponse::new("student deleted")))
}
