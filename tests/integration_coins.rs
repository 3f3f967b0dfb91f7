mod common;

use axum::http::StatusCode;
use common::{create_professor, create_student, send, setup_test_app};
use serde_json::json;
use solvex::modules::students::service::StudentService;
use sqlx::PgPool;

#[sqlx::test(migrations = "./migrations")]
async fn test_increment_then_decrement(pool: PgPool) {
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(
        &app,
        "PUT",
        "/api/coins/increment",
        Some(&student.token),
        Some(json!({ "amount": 30 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "coins incremented");

    let (status, body) = send(
        &app,
        "POST",
        "/api/coins/decrement",
        Some(&student.token),
        Some(json!({ "amount": 12 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "coins decremented");

    let (status, body) = send(&app, "GET", "/api/coins/me", Some(&student.token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["amount"], 18);
    assert_eq!(body["student_id"], student.id);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_decrement_below_zero_is_rejected(pool: PgPool) {
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    send(
        &app,
        "PUT",
        "/api/coins/increment",
        Some(&student.token),
        Some(json!({ "amount": 5 })),
    )
    .await;

    let (status, body) = send(
        &app,
        "PUT",
        "/api/coins/decrement",
        Some(&student.token),
        Some(json!({ "amount": 6 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "insufficient coins");

    let (_, body) = send(&app, "GET", "/api/coins/me", Some(&student.token), None).await;
    assert_eq!(body["amount"], 5);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_non_positive_amount_is_rejected(pool: PgPool) {
    let student = create_student(&pool).await;
    let app = setup_test_app(pool);

    let (status, _) = send(
        &app,
        "PUT",
        "/api/coins/increment",
        Some(&student.token),
        Some(json!({ "amount": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_missing_coins_row(pool: PgPool) {
    let student = create_student(&pool).await;
    sqlx::query("DELETE FROM coins WHERE student_id = $1")
        .bind(student.id)
        .execute(&pool)
        .await
        .unwrap();
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/coins/me", Some(&student.token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "coins record not found");

    let (status, _) = send(
        &app,
        "PUT",
        "/api/coins/decrement",
        Some(&student.token),
        Some(json!({ "amount": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_professor_has_no_coins(pool: PgPool) {
    let professor = create_professor(&pool).await;
    let app = setup_test_app(pool);

    let (status, body) = send(&app, "GET", "/api/coins/me", Some(&professor.token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "only student can perform this action");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_student_not_kept_when_coins_insert_fails(pool: PgPool) {
    sqlx::query(
        r#"
        CREATE FUNCTION reject_coins() RETURNS trigger AS $$
        BEGIN
            RAISE EXCEPTION 'coins unavailable';
        END;
        $$ LANGUAGE plpgsql
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();
    sqlx::query(
        "CREATE TRIGGER reject_coins BEFORE INSERT ON coins FOR EACH ROW EXECUTE FUNCTION reject_coins()",
    )
    .execute(&pool)
    .await
    .unwrap();

    let result =
        StudentService::create_student(&pool, "Ada", "Lovelace", "ada@uni.edu", "hash").await;
    assert!(result.is_err());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM students")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
