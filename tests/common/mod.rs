#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use solvex::router::init_router;
use solvex::solvex_auth::{Role, create_token};
use solvex::solvex_config::JwtConfig;
use solvex::solvex_core::hash_password;
use solvex::state::AppState;
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

pub const TEST_PASSWORD: &str = "testpass123";

pub struct TestAccount {
    pub id: i64,
    pub email: String,
    pub token: String,
}

pub fn setup_test_state(pool: PgPool) -> AppState {
    AppState::for_tests(pool)
}

pub fn setup_test_app(pool: PgPool) -> Router {
    init_router(setup_test_state(pool))
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

/// Matches the secret `AppState::for_tests` signs with.
pub const TEST_JWT_SECRET: &str = "test-secret-key-at-least-32-characters-long";

pub fn token_for(role: Role, id: i64, email: &str) -> String {
    create_token(id, email, role, &JwtConfig::new(TEST_JWT_SECRET)).unwrap()
}

pub async fn create_student(pool: &PgPool) -> TestAccount {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO students (first_name, last_name, email, password)
         VALUES ('Ada', 'Lovelace', $1, $2) RETURNING id",
    )
    .bind(&email)
    .bind(&hashed)
    .fetch_one(pool)
    .await
    .unwrap();

    sqlx::query("INSERT INTO coins (student_id, amount) VALUES ($1, 0)")
        .bind(id)
        .execute(pool)
        .await
        .unwrap();

    TestAccount {
        token: token_for(Role::Student, id, &email),
        id,
        email,
    }
}

pub async fn create_professor(pool: &PgPool) -> TestAccount {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO professors (first_name, last_name, email, password)
         VALUES ('Alan', 'Turing', $1, $2) RETURNING id",
    )
    .bind(&email)
    .bind(&hashed)
    .fetch_one(pool)
    .await
    .unwrap();

    TestAccount {
        token: token_for(Role::Professor, id, &email),
        id,
        email,
    }
}

pub async fn create_organization(pool: &PgPool) -> TestAccount {
    let email = generate_unique_email();
    let hashed = hash_password(TEST_PASSWORD).unwrap();

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO organizations (name, email, password, contact, link)
         VALUES ('ACM Chapter', $1, $2, 'acm@uni.edu', 'https://acm.example.org') RETURNING id",
    )
    .bind(&email)
    .bind(&hashed)
    .fetch_one(pool)
    .await
    .unwrap();

    TestAccount {
        token: token_for(Role::Organization, id, &email),
        id,
        email,
    }
}

/// Sends one request through the router and decodes the JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }

    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

    (status, body)
}
