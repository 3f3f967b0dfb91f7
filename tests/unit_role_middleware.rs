use axum::http::StatusCode;
use chrono::Utc;
use solvex::middleware::auth::Principal;
use solvex::middleware::role::{check_role, ensure_owner, role_forbidden};
use solvex::solvex_auth::Role;
use solvex::solvex_models::{Organization, Professor, Student};

fn student() -> Principal {
    let now = Utc::now();
    Principal::Student(Student {
        id: 1,
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@uni.edu".to_string(),
        last_changed_password: now,
        created_at: now,
        updated_at: now,
    })
}

fn professor() -> Principal {
    let now = Utc::now();
    Principal::Professor(Professor {
        id: 2,
        first_name: "Alan".to_string(),
        last_name: "Turing".to_string(),
        email: "alan@uni.edu".to_string(),
        last_changed_password: now,
        created_at: now,
        updated_at: now,
    })
}

fn organization() -> Principal {
    let now = Utc::now();
    Principal::Organization(Organization {
        id: 3,
        name: "ACM".to_string(),
        email: "acm@uni.edu".to_string(),
        contact: String::new(),
        link: String::new(),
        last_changed_password: now,
        created_at: now,
        updated_at: now,
    })
}

#[test]
fn test_principal_accessors() {
    assert_eq!(student().role(), Role::Student);
    assert_eq!(professor().id(), 2);
    assert_eq!(organization().email(), "acm@uni.edu");
}

#[test]
fn test_check_role_exact_match() {
    assert!(check_role(&student(), Role::Student).is_ok());
    assert!(check_role(&professor(), Role::Professor).is_ok());
    assert!(check_role(&organization(), Role::Organization).is_ok());
}

#[test]
fn test_check_role_no_match() {
    let err = check_role(&student(), Role::Professor).unwrap_err();

    assert_eq!(err.status, StatusCode::FORBIDDEN);
    assert_eq!(err.message(), "only professor can perform this action");

    assert!(check_role(&professor(), Role::Organization).is_err());
    assert!(check_role(&organization(), Role::Student).is_err());
}

#[test]
fn test_role_forbidden_message() {
    assert_eq!(
        role_forbidden(Role::Organization).message(),
        "only organization can perform this action"
    );
}

#[test]
fn test_ensure_owner() {
    assert!(ensure_owner(5, 5, "nope").is_ok());

    let err = ensure_owner(5, 6, "cannot modify events you don't own").unwrap_err();
    assert_eq!(err.status, StatusCode::FORBIDDEN);
    assert_eq!(err.message(), "cannot modify events you don't own");
}

#[test]
fn test_principal_serializes_without_wrapper() {
    let value = serde_json::to_value(student()).unwrap();

    assert_eq!(value["id"], 1);
    assert_eq!(value["email"], "ada@uni.edu");
    assert!(value.get("Student").is_none());
    assert!(value.get("password").is_none());
}
