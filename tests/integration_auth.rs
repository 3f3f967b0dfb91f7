mod common;

use axum::http::StatusCode;
use chrono::Utc;
use common::{
    TEST_JWT_SECRET, TEST_PASSWORD, create_organization, create_student, generate_unique_email,
    send, setup_test_app, setup_test_state,
};
use serde_json::json;
use solvex::router::init_router;
use solvex::solvex_auth::{Claims, TOKEN_LIFETIME_SECS, encode_claims};
use solvex::solvex_config::JwtConfig;
use sqlx::PgPool;

async fn request_code(app: &axum::Router, email: &str) {
    let (status, body) = send(
        app,
        "POST",
        "/auth/send-code",
        None,
        Some(json!({ "email": email })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Verification code sent successfully");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_sign_up_and_sign_in(pool: PgPool) {
    let state = setup_test_state(pool.clone());
    let app = init_router(state.clone());
    let email = generate_unique_email();

    request_code(&app, &email).await;
    let code = state.code_store.peek(&email).await.unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/sign-up/student",
        None,
        Some(json!({
            "code": code,
            "first_name": "Grace",
            "last_name": "Hopper",
            "email": email,
            "password": "cobol-forever"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "student registered successfully");

    let coins: i64 = sqlx::query_scalar(
        "SELECT c.amount FROM coins c JOIN students s ON s.id = c.student_id WHERE s.email = $1",
    )
    .bind(&email)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert_eq!(coins, 0);

    let (status, body) = send(
        &app,
        "POST",
        "/auth/sign-in/student",
        None,
        Some(json!({ "email": email, "password": "cobol-forever" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "student");
    let token = body["token"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", "/api/profile", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "student");
    assert_eq!(body["user"]["email"], email);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_code_is_single_use(pool: PgPool) {
    let state = setup_test_state(pool);
    let app = init_router(state.clone());
    let email = generate_unique_email();

    request_code(&app, &email).await;
    let code = state.code_store.peek(&email).await.unwrap();

    let body = json!({
        "code": code,
        "first_name": "Alan",
        "last_name": "Kay",
        "email": email,
        "password": "smalltalk80"
    });

    let (status, _) = send(&app, "POST", "/auth/sign-up/professor", None, Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/auth/sign-up/professor", None, Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or missing verification code");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_newer_code_replaces_older(pool: PgPool) {
    let state = setup_test_state(pool);
    let app = init_router(state.clone());
    let email = generate_unique_email();

    request_code(&app, &email).await;
    let first = state.code_store.peek(&email).await.unwrap();
    request_code(&app, &email).await;
    let second = state.code_store.peek(&email).await.unwrap();

    if first != second {
        let (status, _) = send(
            &app,
            "POST",
            "/auth/sign-up/student",
            None,
            Some(json!({
                "code": first,
                "first_name": "Old",
                "last_name": "Code",
                "email": email,
                "password": "password123"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = send(
        &app,
        "POST",
        "/auth/sign-up/student",
        None,
        Some(json!({
            "code": second,
            "first_name": "New",
            "last_name": "Code",
            "email": email,
            "password": "password123"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sign_up_without_code_request(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/auth/sign-up/student",
        None,
        Some(json!({
            "code": 123456,
            "first_name": "No",
            "last_name": "Code",
            "email": generate_unique_email(),
            "password": "password123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid or missing verification code");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sign_up_duplicate_email(pool: PgPool) {
    let existing = create_student(&pool).await;
    let state = setup_test_state(pool);
    let app = init_router(state.clone());

    request_code(&app, &existing.email).await;
    let code = state.code_store.peek(&existing.email).await.unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/sign-up/student",
        None,
        Some(json!({
            "code": code,
            "first_name": "Dup",
            "last_name": "Licate",
            "email": existing.email,
            "password": "password123"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "email already registered");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_organization_sign_up(pool: PgPool) {
    let state = setup_test_state(pool);
    let app = init_router(state.clone());
    let email = generate_unique_email();

    request_code(&app, &email).await;
    let code = state.code_store.peek(&email).await.unwrap();

    let (status, body) = send(
        &app,
        "POST",
        "/auth/sign-up/organization",
        None,
        Some(json!({
            "code": code,
            "name": "Robotics Club",
            "email": email,
            "password": "password123",
            "link": "https://robotics.example.org"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "organization registered successfully");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unknown_role_is_rejected(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/auth/sign-in/janitor",
        None,
        Some(json!({ "email": "a@b.com", "password": "password123" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid role");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sign_in_wrong_password(pool: PgPool) {
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/auth/sign-in/student",
        None,
        Some(json!({ "email": student.email, "password": "not-the-password" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sign_in_wrong_role_table(pool: PgPool) {
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/sign-in/professor",
        None,
        Some(json!({ "email": student.email, "password": TEST_PASSWORD })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sign_in_email_is_case_insensitive(pool: PgPool) {
    let organization = create_organization(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "POST",
        "/auth/sign-in/organization",
        None,
        Some(json!({
            "email": organization.email.to_uppercase(),
            "password": TEST_PASSWORD
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "organization");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_send_code_invalid_email(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "POST",
        "/auth/send-code",
        None,
        Some(json!({ "email": "not-an-email" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_authorization_header(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/profile", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or missing Authorization header");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_garbage_token(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, _) = send(&app, "GET", "/api/profile", Some("not.a.jwt"), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

fn signed_token(role: &str, iat: i64, exp: i64) -> String {
    let claims = Claims {
        user_id: 1,
        email: "someone@uni.edu".to_string(),
        role: role.to_string(),
        iat,
        exp,
    };
    encode_claims(&claims, &JwtConfig::new(TEST_JWT_SECRET)).unwrap()
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_with_unknown_role(pool: PgPool) {
    let app = setup_test_app(pool);
    let now = Utc::now().timestamp();
    let token = signed_token("admin", now, now + 60);

    let (status, body) = send(&app, "GET", "/api/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid role: admin");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_expired_token(pool: PgPool) {
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);
    let now = Utc::now().timestamp();
    let claims = Claims {
        user_id: student.id,
        email: student.email.clone(),
        role: "student".to_string(),
        iat: now - 2 * TOKEN_LIFETIME_SECS,
        exp: now - 1,
    };
    let token = encode_claims(&claims, &JwtConfig::new(TEST_JWT_SECRET)).unwrap();

    let (status, body) = send(&app, "GET", "/api/profile", Some(&token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Token expired");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_token_for_deleted_account(pool: PgPool) {
    let student = create_student(&pool).await;
    sqlx::query("UPDATE students SET deleted_at = NOW() WHERE id = $1")
        .bind(student.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/profile", Some(&student.token), None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "student not found");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ping_and_unknown_route(pool: PgPool) {
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "pong");

    let (status, body) = send(&app, "GET", "/nowhere", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "route not found");
}
