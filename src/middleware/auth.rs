use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use serde::Serialize;
use sqlx::PgPool;
use tracing::warn;
use utoipa::ToSchema;

use solvex_auth::{Claims, Role, verify_token};
use solvex_core::AppError;
use solvex_models::{Organization, Professor, Student};

use crate::modules::organizations::service::OrganizationService;
use crate::modules::professors::service::ProfessorService;
use crate::modules::students::service::StudentService;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";
const MISSING_HEADER: &str = "Invalid or missing Authorization header";

/// The authenticated account behind a request.
///
/// The variant is chosen by the token's role claim, never by the shape of
/// the stored data.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(untagged)]
pub enum Principal {
    Student(Student),
    Professor(Professor),
    Organization(Organization),
}

impl Principal {
    pub fn role(&self) -> Role {
        match self {
            Principal::Student(_) => Role::Student,
            Principal::Professor(_) => Role::Professor,
            Principal::Organization(_) => Role::Organization,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Principal::Student(s) => s.id,
            Principal::Professor(p) => p.id,
            Principal::Organization(o) => o.id,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            Principal::Student(s) => &s.email,
            Principal::Professor(p) => &p.email,
            Principal::Organization(o) => &o.email,
        }
    }
}

/// Returns the token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::unauthorized(MISSING_HEADER.to_string()))
}

/// Resolves verified claims to the account they name.
///
/// An unknown role, a missing row and a store failure are all 401.
pub async fn load_principal(db: &PgPool, claims: &Claims) -> Result<Principal, AppError> {
    let role: Role = claims
        .role
        .parse()
        .map_err(|e: solvex_auth::UnknownRole| AppError::unauthorized(e.to_string()))?;

    let lookup = match role {
        Role::Student => StudentService::find_by_id(db, claims.user_id)
            .await
            .map(|found| found.map(Principal::Student)),
        Role::Professor => ProfessorService::find_by_id(db, claims.user_id)
            .await
            .map(|found| found.map(Principal::Professor)),
        Role::Organization => OrganizationService::find_by_id(db, claims.user_id)
            .await
            .map(|found| found.map(Principal::Organization)),
    };

    match lookup {
        Ok(Some(principal)) => Ok(principal),
        Ok(None) => Err(AppError::unauthorized(format!("{} not found", role))),
        Err(e) => {
            warn!(role = %role, user_id = claims.user_id, error = %e.message(), "Account lookup failed");
            Err(AppError::unauthorized(format!("{} not found", role)))
        }
    }
}

/// Layer for every `/api` route: verifies the bearer token and binds the
/// [`Principal`] into the request extensions.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers())?;

    let claims = verify_token(token, &state.jwt_config)
        .map_err(|e| AppError::unauthorized(e.to_string()))?;

    let principal = load_principal(&state.db, &claims).await?;

    tracing::Span::current().record("user_id", principal.id());
    req.extensions_mut().insert(principal);

    Ok(next.run(req).await)
}

/// Extractor for any authenticated account.
#[derive(Debug, Clone)]
pub struct AuthUser(pub Principal);

impl AuthUser {
    pub fn role(&self) -> Role {
        self.0.role()
    }

    pub fn id(&self) -> i64 {
        self.0.id()
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::unauthorized(MISSING_HEADER.to_string()))
    }
}

/// Declares an extractor that only admits one [`Principal`] variant and
/// hands the handler the typed account.
macro_rules! require_role {
    ($name:ident, $variant:ident, $account:ty) => {
        #[derive(Debug, Clone)]
        pub struct $name(pub $account);

        impl<S> FromRequestParts<S> for $name
        where
            S: Send + Sync,
        {
            type Rejection = AppError;

            async fn from_request_parts(
                parts: &mut Parts,
                state: &S,
            ) -> Result<Self, Self::Rejection> {
                let AuthUser(principal) = AuthUser::from_request_parts(parts, state).await?;

                match principal {
                    Principal::$variant(account) => Ok($name(account)),
                    _ => Err($crate::middleware::role::role_forbidden(Role::$variant)),
                }
            }
        }
    };
}

require_role!(RequireStudent, Student, Student);
require_role!(RequireProfessor, Professor, Professor);
require_role!(RequireOrganization, Organization, Organization);
