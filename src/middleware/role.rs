use solvex_auth::Role;
use solvex_core::AppError;

use crate::middleware::auth::Principal;

/// The 403 returned when an account of the wrong role reaches a gated route.
pub fn role_forbidden(required: Role) -> AppError {
    AppError::forbidden(format!("only {} can perform this action", required))
}

pub fn check_role(principal: &Principal, required: Role) -> Result<(), AppError> {
    if principal.role() == required {
        Ok(())
    } else {
        Err(role_forbidden(required))
    }
}

/// Rejects access to a row owned by a different account.
pub fn ensure_owner(owner_id: i64, principal_id: i64, message: &str) -> Result<(), AppError> {
    if owner_id == principal_id {
        Ok(())
    } else {
        Err(AppError::forbidden(message.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use chrono::Utc;
    use solvex_models::Organization;

    fn organization() -> Principal {
        Principal::Organization(Organization {
            id: 3,
            name: "Robotics Club".to_string(),
            email: "robots@uni.edu".to_string(),
            contact: String::new(),
            link: String::new(),
            last_changed_password: Utc::now(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        })
    }

    #[test]
    fn test_check_role_matches() {
        assert!(check_role(&organization(), Role::Organization).is_ok());
    }

    #[test]
    fn test_check_role_mismatch() {
        let err = check_role(&organization(), Role::Student).unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "only student can perform this action");
    }

    #[test]
    fn test_ensure_owner() {
        assert!(ensure_owner(7, 7, "nope").is_ok());

        let err = ensure_owner(7, 8, "cannot modify opportunities you don't own").unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
        assert_eq!(err.message(), "cannot modify opportunities you don't own");
    }
}
