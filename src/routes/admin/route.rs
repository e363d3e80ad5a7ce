use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::dto::{
    AdminStatsResponse, CollegeResponse, EventModerationResponse, FestModerationResponse,
    ModerationRequest,
};
use crate::error::AppResult;
use crate::extractor::{AdminPrincipal, AppQuery};
use crate::repositories::CollegeRepository;
use crate::routes::events::dto::EventResponse;
use crate::routes::fests::dto::FestResponse;
use crate::services::moderation::{self, Decision};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/admin/fests/pending", get(pending_fests))
        .route("/api/admin/events/pending", get(pending_events))
        .route("/api/admin/fests/{id}/approve", post(approve_fest))
        .route("/api/admin/fests/{id}/reject", post(reject_fest))
        .route("/api/admin/events/{id}/approve", post(approve_event))
        .route("/api/admin/events/{id}/reject", post(reject_event))
        .route("/api/admin/dashboard/stats", get(dashboard_stats))
        .route("/api/admin/colleges", get(list_colleges))
}

#[utoipa::path(
    get,
    path = "/api/admin/fests/pending",
    responses((status = 200, description = "Active fests awaiting approval", body = [FestResponse])),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn pending_fests(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
) -> AppResult<Json<Vec<FestResponse>>> {
    let fests = moderation::pending_fests(&state.db).await?;
    Ok(Json(fests.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/admin/events/pending",
    responses((status = 200, description = "Active events awaiting approval", body = [EventResponse])),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn pending_events(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
) -> AppResult<Json<Vec<EventResponse>>> {
    let events = moderation::pending_events(&state.db).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/admin/fests/{id}/approve",
    params(("id" = Uuid, Path, description = "Fest id")),
    responses(
        (status = 200, description = "Fest approved", body = FestModerationResponse),
        (status = 404, description = "Fest not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn approve_fest(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FestModerationResponse>> {
    let moderated = moderation::moderate_fest(&state.db, id, Decision::Approve, None).await?;
    Ok(Json(moderated.into()))
}

#[utoipa::path(
    post,
    path = "/api/admin/fests/{id}/reject",
    params(("id" = Uuid, Path, description = "Fest id"), ModerationRequest),
    request_body(content = Option<ModerationRequest>, description = "Optional rejection reason"),
    responses(
        (status = 200, description = "Fest deactivated", body = FestModerationResponse),
        (status = 404, description = "Fest not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reject_fest(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Path(id): Path<Uuid>,
    AppQuery(query): AppQuery<ModerationRequest>,
    body: Bytes,
) -> AppResult<Json<FestModerationResponse>> {
    let reason = ModerationRequest::reason_from(query, &body)?;
    let moderated = moderation::moderate_fest(&state.db, id, Decision::Reject, reason).await?;
    Ok(Json(moderated.into()))
}

#[utoipa::path(
    post,
    path = "/api/admin/events/{id}/approve",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Event approved", body = EventModerationResponse),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn approve_event(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<EventModerationResponse>> {
    let moderated = moderation::moderate_event(&state.db, id, Decision::Approve, None).await?;
    Ok(Json(moderated.into()))
}

#[utoipa::path(
    post,
    path = "/api/admin/events/{id}/reject",
    params(("id" = Uuid, Path, description = "Event id"), ModerationRequest),
    request_body(content = Option<ModerationRequest>, description = "Optional rejection reason"),
    responses(
        (status = 200, description = "Event deactivated", body = EventModerationResponse),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn reject_event(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
    Path(id): Path<Uuid>,
    AppQuery(query): AppQuery<ModerationRequest>,
    body: Bytes,
) -> AppResult<Json<EventModerationResponse>> {
    let reason = ModerationRequest::reason_from(query, &body)?;
    let moderated = moderation::moderate_event(&state.db, id, Decision::Reject, reason).await?;
    Ok(Json(moderated.into()))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/stats",
    responses((status = 200, description = "Platform totals", body = AdminStatsResponse)),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
) -> AppResult<Json<AdminStatsResponse>> {
    let stats = moderation::admin_stats(&state.db).await?;
    Ok(Json(stats.into()))
}

#[utoipa::path(
    get,
    path = "/api/admin/colleges",
    responses((status = 200, description = "Every registered college", body = [CollegeResponse])),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_colleges(
    State(state): State<AppState>,
    AdminPrincipal(_admin): AdminPrincipal,
) -> AppResult<Json<Vec<CollegeResponse>>> {
    let colleges = CollegeRepository::new(&state.db).find_all().await?;
    Ok(Json(colleges.into_iter().map(Into::into).collect()))
}
