use axum::{
    Json,
    extract::{Path, State},
};
use tracing::instrument;

use solvex_core::{AppError, ErrorResponse, MessageResponse};

use super::model::{CreateEventDto, Event, EventWithOrganization, UpdateEventDto};
use super::service::EventService;
use crate::middleware::auth::RequireOrganization;
use crate::modules::organizations::service::OrganizationService;
use crate::state::AppState;
use crate::validator::ValidatedJson;

/// Publish an event (organizations only)
#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventDto,
    responses(
        (status = 200, description = "Event created", body = Event),
        (status = 400, description = "Validation error", body = ErrorResponse),
        (status = 403, description = "Only organizations", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state, organization, dto), fields(organization_id = organization.id))]
pub async fn create_event(
    State(state): State<AppState>,
    RequireOrganization(organization): RequireOrganization,
    ValidatedJson(dto): ValidatedJson<CreateEventDto>,
) -> Result<Json<Event>, AppError> {
    let event = EventService::create_event(&state.db, organization.id, dto).await?;
    Ok(Json(event))
}

/// List the current organization's events
#[utoipa::path(
    get,
    path = "/api/events/me",
    responses(
        (status = 200, description = "Own events", body = Vec<Event>),
        (status = 403, description = "Only organizations", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state, organization), fields(organization_id = organization.id))]
pub async fn list_my_events(
    State(state): State<AppState>,
    RequireOrganization(organization): RequireOrganization,
) -> Result<Json<Vec<Event>>, AppError> {
    let events = EventService::list_for_organization(&state.db, organization.id).await?;
    Ok(Json(events))
}

/// Update an owned event
#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    request_body = UpdateEventDto,
    responses(
        (status = 200, description = "Event updated", body = Event),
        (status = 403, description = "Not the owning organization", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state, organization, dto), fields(organization_id = organization.id))]
pub async fn update_event(
    State(state): State<AppState>,
    RequireOrganization(organization): RequireOrganization,
    Path(id): Path<i64>,
    ValidatedJson(dto): ValidatedJson<UpdateEventDto>,
) -> Result<Json<Event>, AppError> {
    let event = EventService::update_event(&state.db, organization.id, id, dto).await?;
    Ok(Json(event))
}

/// Delete an owned event
#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 403, description = "Not the owning organization", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
#[instrument(skip(state, organization), fields(organization_id = organization.id))]
pub async fn delete_event(
    State(state): State<AppState>,
    RequireOrganization(organization): RequireOrganization,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    EventService::delete_event(&state.db, organization.id, id).await?;
    Ok(Json(MessageResponse::new("event deleted")))
}

/// Browse events
#[utoipa::path(
    get,
    path = "/public/events",
    responses(
        (status = 200, description = "All events", body = Vec<EventWithOrganization>)
    ),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn list_events(
    State(state): State<AppState>,
) -> Result<Json<Vec<EventWithOrganization>>, AppError> {
    let events = EventService::list_events(&state.db).await?;
    Ok(Json(events))
}

/// View an event
#[utoipa::path(
    get,
    path = "/public/events/{id}",
    params(
        ("id" = i64, Path, description = "Event ID")
    ),
    responses(
        (status = 200, description = "Event found", body = EventWithOrganization),
        (status = 404, description = "Event not found", body = ErrorResponse)
    ),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EventWithOrganization>, AppError> {
    let event = EventService::get_event(&state.db, id).await?;
    Ok(Json(event))
}

/// Events published by one organization
#[utoipa::path(
    get,
    path = "/public/organizations/{id}/events",
    params(
        ("id" = i64, Path, description = "Organization ID")
    ),
    responses(
        (status = 200, description = "Organization events", body = Vec<Event>),
        (status = 404, description = "Organization not found", body = ErrorResponse)
    ),
    tag = "Events"
)]
#[instrument(skip(state))]
pub async fn list_organization_events(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Event>>, AppError> {
    OrganizationService::get_organization(&state.db, id).await?;
    let events = EventService::list_for_organization(&state.db, id).await?;
    Ok(Json(events))
}
