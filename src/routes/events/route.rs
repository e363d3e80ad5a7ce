use axum::extract::{Multipart, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router, http::StatusCode};
use uuid::Uuid;

use super::dto::{
    CreateEventRequest, EventResponse, EventStatsResponse, EventSummaryResponse,
    RejectPosterQuery, UpdateEventRequest,
};
use crate::error::AppResult;
use crate::extractor::{AppJson, AppQuery, CollegePrincipal};
use crate::routes::common::MessageResponse;
use crate::services::catalog::{self, EventSummary};
use crate::services::file_storage::read_file_field;
use crate::state::AppState;
use crate::utils::time::today;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/events", post(create_event).get(list_events))
        .route(
            "/api/events/{id}",
            get(get_event).put(update_event).delete(delete_event),
        )
        .route("/api/events/{id}/stats", get(event_stats))
        .route(
            "/api/events/{id}/poster",
            post(upload_poster).delete(delete_poster),
        )
        .route("/api/events/{id}/poster/approve", post(approve_poster))
        .route("/api/events/{id}/poster/reject", post(reject_poster))
}

#[utoipa::path(
    post,
    path = "/api/events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event created, pending approval", body = EventResponse),
        (status = 400, description = "Invalid fest link, dates, fee or capacity"),
        (status = 409, description = "Event name already exists for this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn create_event(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    AppJson(payload): AppJson<CreateEventRequest>,
) -> AppResult<(StatusCode, Json<EventResponse>)> {
    let event = catalog::create_event(&state.db, &college, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(event.into())))
}

#[utoipa::path(
    get,
    path = "/api/events",
    responses((status = 200, description = "Events of the calling college", body = [EventSummaryResponse])),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn list_events(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
) -> AppResult<Json<Vec<EventSummaryResponse>>> {
    let events = catalog::list_events(&state.db, &college, today()).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event", body = EventSummaryResponse),
        (status = 404, description = "Event not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn get_event(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventSummaryResponse>> {
    let event = catalog::owned_event(&state.db, &college, id).await?;
    Ok(Json(EventSummary::new(event, today()).into()))
}

#[utoipa::path(
    put,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = UpdateEventRequest,
    responses(
        (status = 200, description = "Event updated", body = EventResponse),
        (status = 400, description = "Invalid fest link, dates, fee or capacity"),
        (status = 404, description = "Event not found or not owned by this college"),
        (status = 409, description = "Event name already exists for this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn update_event(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateEventRequest>,
) -> AppResult<Json<EventResponse>> {
    let event = catalog::update_event(&state.db, &college, id, payload.into()).await?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event deleted", body = MessageResponse),
        (status = 404, description = "Event not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn delete_event(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    catalog::delete_event(&state.db, &state.storage, &college, id).await?;
    Ok(Json(MessageResponse::new("Event deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/stats",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Registration figures for the event", body = EventStatsResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "Events"
)]
pub async fn event_stats(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventStatsResponse>> {
    let stats = catalog::event_stats(&state.db, id, today()).await?;
    Ok(Json(stats.into()))
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/poster",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body(content_type = "multipart/form-data", description = "Poster image in the `file` field"),
    responses(
        (status = 200, description = "Poster stored, awaiting approval", body = EventResponse),
        (status = 400, description = "Missing or non-image file"),
        (status = 404, description = "Event not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn upload_poster(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<EventResponse>> {
    let file = read_file_field(multipart, "file").await?;
    let event = catalog::upload_poster(&state.db, &state.storage, &college, id, file).await?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/poster/approve",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Poster approved", body = EventResponse),
        (status = 400, description = "Event has no poster"),
        (status = 404, description = "Event not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn approve_poster(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventResponse>> {
    let event = catalog::approve_poster(&state.db, &college, id).await?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/poster/reject",
    params(("id" = Uuid, Path, description = "Event id"), RejectPosterQuery),
    responses(
        (status = 200, description = "Poster rejected and removed", body = EventResponse),
        (status = 404, description = "Event not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn reject_poster(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
    AppQuery(query): AppQuery<RejectPosterQuery>,
) -> AppResult<Json<EventResponse>> {
    let event = catalog::remove_poster(
        &state.db,
        &state.storage,
        &college,
        id,
        Some(query.reason.as_deref().unwrap_or("rejected")),
    )
    .await?;
    Ok(Json(event.into()))
}

#[utoipa::path(
    delete,
    path = "/api/events/{id}/poster",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Poster removed", body = EventResponse),
        (status = 404, description = "Event not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Events"
)]
pub async fn delete_poster(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventResponse>> {
    let event = catalog::remove_poster(&state.db, &state.storage, &college, id, None).await?;
    Ok(Json(event.into()))
}
