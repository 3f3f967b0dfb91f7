use axum::{
    Json,
    extract::{FromRequest, Path, Request, State},
};
use tracing::instrument;

use solvex_auth::Role;
use solvex_core::{AppError, ErrorResponse, MessageResponse};

use super::model::{
    OrganizationSignUpRequest, ProfileResponse, SendCodeRequest, SignInRequest, SignInResponse,
    SignUpRequest,
};
use super::service::AuthService;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;
use crate::validator::ValidatedJson;

fn parse_role(raw: &str) -> Result<Role, AppError> {
    raw.parse()
        .map_err(|_| AppError::bad_request(anyhow::anyhow!("Invalid role")))
}

/// Send a verification code by email
///
/// A new request replaces any code sent earlier to the same address.
#[utoipa::path(
    post,
    path = "/auth/send-code",
    request_body = SendCodeRequest,
    responses(
        (status = 200, description = "Verification code sent", body = MessageResponse),
        (status = 400, description = "Invalid email", body = ErrorResponse),
        (status = 429, description = "Too many requests"),
        (status = 500, description = "Mail delivery failed", body = ErrorResponse)
    ),
    tag = "Authentication"
)]
#[instrument(skip(state))]
pub async fn send_code(
    State(state): State<AppState>,
    ValidatedJson(dto): ValidatedJson<SendCodeRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    AuthService::send_code(
        &state.code_store,
        &state.mailer,
        &dto.email,
        state.verification_config.code_ttl(),
    )
    .await?;

    Ok(Json(MessageResponse::new(
        "Verification code sent successfully",
    )))
}

/// Register a student, professor or organization
///
/// Students and professors send `SignUpRequest`; organizations send
/// `OrganizationSignUpRequest`. The code must be the latest one sent to the
/// email and can only be used once.
#[utoipa::path(
    post,
    path = "/auth/sign-up/{role}",
    params(
        ("role" = Role, Path, description = "student, professor or organization")
    ),
    request_body = SignUpRequest,
    responses(
        (status = 200, description = "Account registered", body = MessageResponse),
        (status = 400, description = "Invalid role, invalid code, validation error or email already registered", body = ErrorResponse),
        (status = 429, description = "Too many requests")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, req))]
pub async fn sign_up(
    State(state): State<AppState>,
    Path(role): Path<String>,
    req: Request,
) -> Result<Json<MessageResponse>, AppError> {
    let role = parse_role(&role)?;

    match role {
        Role::Organization => {
            let ValidatedJson(dto) =
                ValidatedJson::<OrganizationSignUpRequest>::from_request(req, &state).await?;
            AuthService::sign_up_organization(&state.db, &state.code_store, dto).await?;
        }
        Role::Student | Role::Professor => {
            let ValidatedJson(dto) =
                ValidatedJson::<SignUpRequest>::from_request(req, &state).await?;
            AuthService::sign_up(&state.db, &state.code_store, role, dto).await?;
        }
    }

    Ok(Json(MessageResponse::new(format!(
        "{} registered successfully",
        role
    ))))
}

/// Sign in and receive a bearer token
#[utoipa::path(
    post,
    path = "/auth/sign-in/{role}",
    params(
        ("role" = Role, Path, description = "student, professor or organization")
    ),
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInResponse),
        (status = 400, description = "Invalid role or validation error", body = ErrorResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse),
        (status = 429, description = "Too many requests")
    ),
    tag = "Authentication"
)]
#[instrument(skip(state, dto))]
pub async fn sign_in(
    State(state): State<AppState>,
    Path(role): Path<String>,
    ValidatedJson(dto): ValidatedJson<SignInRequest>,
) -> Result<Json<SignInResponse>, AppError> {
    let role = parse_role(&role)?;
    let response = AuthService::sign_in(&state.db, role, dto, &state.jwt_config).await?;
    Ok(Json(response))
}

/// Get the authenticated account and its role
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Current account", body = ProfileResponse),
        (status = 401, description = "Unauthorized", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
#[instrument(skip(user))]
pub async fn get_profile(AuthUser(user): AuthUser) -> Json<ProfileResponse> {
    Json(ProfileResponse {
        role: user.role(),
        user,
    })
}
