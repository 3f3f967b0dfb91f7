use axum::{Json, extract::State};
use tracing::instrument;

use solvex_core::{AppError, ErrorResponse, MessageResponse};

use super::model::{Coins, CoinsAmountDto};
use super::service::CoinsService;
use crate::middleware::auth::RequireStudent;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Get the current student's coin balance
#[utoipa::path(
    get,
    path = "/api/coins/me",
    responses(
        (status = 200, description = "Coin balance", body = Coins),
        (status = 401, description = "Unauthorized", body = ErrorResponse),
        (status = 403, description = "Only students have coins", body = ErrorResponse),
        (status = 404, description = "Coins record not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Coins"
)]
#[instrument(skip(state, student), fields(student_id = student.id))]
pub async fn get_my_coins(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
) -> Result<Json<Coins>, AppError> {
    let coins = CoinsService::get_coins(&state.db, student.id).await?;
    Ok(Json(coins))
}

/// Add coins to the current student's balance
#[utoipa::path(
    put,
    path = "/api/coins/increment",
    request_body = CoinsAmountDto,
    responses(
        (status = 200, description = "Coins incremented", body = MessageResponse),
        (status = 400, description = "Amount must be at least 1", body = ErrorResponse),
        (status = 403, description = "Only students have coins", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Coins"
)]
#[instrument(skip(state, student), fields(student_id = student.id))]
pub async fn increment_coins(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<CoinsAmountDto>,
) -> Result<Json<MessageResponse>, AppError> {
    CoinsService::increment(&state.db, student.id, dto.amount).await?;
    Ok(Json(MessageResponse::new("coins incremented")))
}

/// Spend coins from the current student's balance
///
/// Fails without changing the balance when it is lower than the amount.
#[utoipa::path(
    put,
    path = "/api/coins/decrement",
    request_body = CoinsAmountDto,
    responses(
        (status = 200, description = "Coins decremented", body = MessageResponse),
        (status = 400, description = "Insufficient coins or invalid amount", body = ErrorResponse),
        (status = 403, description = "Only students have coins", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Coins"
)]
#[instrument(skip(state, student), fields(student_id = student.id))]
pub async fn decrement_coins(
    State(state): State<AppState>,
    RequireStudent(student): RequireStudent,
    ValidatedJson(dto): ValidatedJson<CoinsAmountDto>,
) -> Result<Json<MessageResponse>, AppError> {
    CoinsService::decrement(&state.db, student.id, dto.amount).await?;
    Ok(Json(MessageResponse::new("coins decremented")))
}
