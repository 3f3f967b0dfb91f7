use axum::{
    Router,
    routing::{get, post},
};

use super::controller::{
    create_report, delete_report, get_report, list_my_reports, list_student_reports,
};
use crate::state::AppState;

pub fn init_reports_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_report))
        .route("/me", get(list_my_reports))
        .route("/student/{id}", get(list_student_reports))
        .route("/{id}", get(get_report).delete(delete_report))
}
