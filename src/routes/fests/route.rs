use axum::extract::{Multipart, Path, State};
use axum::routing::{get, post};
use axum::{Json, Router, http::StatusCode};
use uuid::Uuid;

use super::dto::{CreateFestRequest, FestResponse, FestSummaryResponse, UpdateFestRequest};
use crate::error::AppResult;
use crate::extractor::{AppJson, CollegePrincipal};
use crate::routes::common::MessageResponse;
use crate::routes::events::dto::EventSummaryResponse;
use crate::services::catalog;
use crate::services::file_storage::read_file_field;
use crate::state::AppState;
use crate::utils::time::today;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/fests", post(create_fest).get(list_fests))
        .route(
            "/api/fests/{id}",
            get(get_fest).put(update_fest).delete(delete_fest),
        )
        .route("/api/fests/{id}/events", get(fest_events))
        .route("/api/fests/{id}/image", post(upload_image))
}

#[utoipa::path(
    post,
    path = "/api/fests",
    request_body = CreateFestRequest,
    responses(
        (status = 201, description = "Fest created, pending approval", body = FestResponse),
        (status = 400, description = "Invalid dates or payload"),
        (status = 409, description = "Fest name already exists for this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Fests"
)]
pub async fn create_fest(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    AppJson(payload): AppJson<CreateFestRequest>,
) -> AppResult<(StatusCode, Json<FestResponse>)> {
    let fest = catalog::create_fest(&state.db, &college, payload.into()).await?;
    Ok((StatusCode::CREATED, Json(fest.into())))
}

#[utoipa::path(
    get,
    path = "/api/fests",
    responses((status = 200, description = "Fests of the calling college", body = [FestSummaryResponse])),
    security(("bearer_auth" = [])),
    tag = "Fests"
)]
pub async fn list_fests(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
) -> AppResult<Json<Vec<FestSummaryResponse>>> {
    let fests = catalog::list_fests(&state.db, &college).await?;
    Ok(Json(fests.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/fests/{id}",
    params(("id" = Uuid, Path, description = "Fest id")),
    responses(
        (status = 200, description = "Fest", body = FestSummaryResponse),
        (status = 404, description = "Fest not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Fests"
)]
pub async fn get_fest(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FestSummaryResponse>> {
    let fest = catalog::owned_fest(&state.db, &college, id).await?;
    let summary = catalog::fest_summary(&state.db, fest).await?;
    Ok(Json(summary.into()))
}

#[utoipa::path(
    put,
    path = "/api/fests/{id}",
    params(("id" = Uuid, Path, description = "Fest id")),
    request_body = UpdateFestRequest,
    responses(
        (status = 200, description = "Fest updated", body = FestResponse),
        (status = 400, description = "Invalid dates"),
        (status = 404, description = "Fest not found or not owned by this college"),
        (status = 409, description = "Fest name already exists for this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Fests"
)]
pub async fn update_fest(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<UpdateFestRequest>,
) -> AppResult<Json<FestResponse>> {
    let fest = catalog::update_fest(&state.db, &college, id, payload.into()).await?;
    Ok(Json(fest.into()))
}

#[utoipa::path(
    delete,
    path = "/api/fests/{id}",
    params(("id" = Uuid, Path, description = "Fest id")),
    responses(
        (status = 200, description = "Fest deleted", body = MessageResponse),
        (status = 404, description = "Fest not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Fests"
)]
pub async fn delete_fest(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    catalog::delete_fest(&state.db, &state.storage, &college, id).await?;
    Ok(Json(MessageResponse::new("Fest deleted successfully")))
}

#[utoipa::path(
    get,
    path = "/api/fests/{id}/events",
    params(("id" = Uuid, Path, description = "Fest id")),
    responses(
        (status = 200, description = "Events linked to the fest", body = [EventSummaryResponse]),
        (status = 404, description = "Fest not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Fests"
)]
pub async fn fest_events(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<EventSummaryResponse>>> {
    let events = catalog::fest_events(&state.db, &college, id, today()).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/fests/{id}/image",
    params(("id" = Uuid, Path, description = "Fest id")),
    request_body(content_type = "multipart/form-data", description = "Banner image in the `image` field"),
    responses(
        (status = 200, description = "Image stored", body = FestResponse),
        (status = 400, description = "Missing or non-image file"),
        (status = 404, description = "Fest not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Fests"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<FestResponse>> {
    let file = read_file_field(multipart, "image").await?;
    let fest = catalog::upload_fest_image(&state.db, &state.storage, &college, id, file).await?;
    Ok(Json(fest.into()))
}
