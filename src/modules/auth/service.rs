use anyhow::Context;
use sqlx::PgPool;
use tracing::{info, instrument, warn};

use solvex_auth::{Role, create_token};
use solvex_cache::CodeStore;
use solvex_config::JwtConfig;
use solvex_core::{AppError, hash_password, verify_password};

use super::model::{
    OrganizationSignUpRequest, SignInRequest, SignInResponse, SignUpRequest, normalize_email,
};
use crate::metrics::{
    track_account_created, track_jwt_issued, track_sign_in_failure, track_sign_in_success,
    track_verification_code_sent,
};
use crate::modules::organizations::service::OrganizationService;
use crate::modules::professors::service::ProfessorService;
use crate::modules::students::service::StudentService;
use crate::utils::email::Mailer;
use crate::utils::verification::generate_code;

const INVALID_CODE: &str = "Invalid or missing verification code";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

pub struct AuthService;

impl AuthService {
    /// Issues a fresh code for `email`, replacing any earlier one, and mails it.
    #[instrument(skip(code_store, mailer))]
    pub async fn send_code(
        code_store: &CodeStore,
        mailer: &Mailer,
        email: &str,
        ttl: std::time::Duration,
    ) -> Result<(), AppError> {
        let email = normalize_email(email);
        let code = generate_code();

        code_store.issue(&email, code, ttl).await?;
        mailer.send_verification(&email, code).await?;

        track_verification_code_sent();
        Ok(())
    }

    async fn consume_code(code_store: &CodeStore, email: &str, code: u32) -> Result<(), AppError> {
        if code_store.consume(&normalize_email(email), code).await? {
            Ok(())
        } else {
            Err(AppError::bad_request(anyhow::anyhow!(INVALID_CODE)))
        }
    }

    /// Registers a student or professor once their code checks out.
    #[instrument(skip(db, code_store, dto), fields(email = %dto.email))]
    pub async fn sign_up(
        db: &PgPool,
        code_store: &CodeStore,
        role: Role,
        dto: SignUpRequest,
    ) -> Result<(), AppError> {
        Self::consume_code(code_store, &dto.email, dto.code).await?;

        let password_hash = hash_password(&dto.password)?;

        match role {
            Role::Student => {
                let student = StudentService::create_student(
                    db,
                    &dto.first_name,
                    &dto.last_name,
                    &dto.email,
                    &password_hash,
                )
                .await?;
                info!(student_id = student.id, "Student registered");
            }
            Role::Professor => {
                let professor = ProfessorService::create_professor(
                    db,
                    &dto.first_name,
                    &dto.last_name,
                    &dto.email,
                    &password_hash,
                )
                .await?;
                info!(professor_id = professor.id, "Professor registered");
            }
            Role::Organization => {
                return Err(AppError::bad_request(anyhow::anyhow!("Invalid role")));
            }
        }

        track_account_created(role.as_str());
        Ok(())
    }

    #[instrument(skip(db, code_store, dto), fields(email = %dto.email))]
    pub async fn sign_up_organization(
        db: &PgPool,
        code_store: &CodeStore,
        dto: OrganizationSignUpRequest,
    ) -> Result<(), AppError> {
        Self::consume_code(code_store, &dto.email, dto.code).await?;

        let password_hash = hash_password(&dto.password)?;
        let organization =
            OrganizationService::create_organization(db, &dto, &password_hash).await?;

        info!(organization_id = organization.id, "Organization registered");
        track_account_created(Role::Organization.as_str());
        Ok(())
    }

    /// Checks credentials against the table of `role` and issues a token.
    ///
    /// Unknown email, wrong password and an unreadable digest all answer
    /// "Invalid credentials".
    #[instrument(skip(db, dto, jwt_config), fields(email = %dto.email))]
    pub async fn sign_in(
        db: &PgPool,
        role: Role,
        dto: SignInRequest,
        jwt_config: &JwtConfig,
    ) -> Result<SignInResponse, AppError> {
        #[derive(sqlx::FromRow)]
        struct AccountWithPassword {
            id: i64,
            email: String,
            password: String,
        }

        let table = match role {
            Role::Student => "students",
            Role::Professor => "professors",
            Role::Organization => "organizations",
        };

        let account = sqlx::query_as::<_, AccountWithPassword>(&format!(
            "SELECT id, email, password FROM {table} WHERE email = $1 AND deleted_at IS NULL"
        ))
        .bind(normalize_email(&dto.email))
        .fetch_optional(db)
        .await
        .context("Failed to fetch account for sign-in")
        .map_err(AppError::database)?;

        let Some(account) = account else {
            track_sign_in_failure(role.as_str());
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        };

        let verified = match verify_password(&dto.password, &account.password) {
            Ok(matched) => matched,
            Err(e) => {
                warn!(account_id = account.id, error = %e.message(), "Stored password digest is unreadable");
                false
            }
        };

        if !verified {
            track_sign_in_failure(role.as_str());
            return Err(AppError::unauthorized(INVALID_CREDENTIALS.to_string()));
        }

        let token = create_token(account.id, &account.email, role, jwt_config)
            .map_err(|e| AppError::internal_error(format!("Failed to generate token: {}", e)))?;

        track_sign_in_success(role.as_str());
        track_jwt_issued();

        Ok(SignInResponse { token, role })
    }
}
