use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use super::dto::{EventQuery, ExploreEventResponse, ExploreFestResponse, ExploreStatsResponse, FestQuery};
use crate::error::AppResult;
use crate::extractor::{AppQuery, Principal};
use crate::services::explore::{self, EventFilter, FestFilter};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/explore/fests", get(explore_fests))
        .route("/api/explore/events", get(explore_events))
        .route("/api/explore/stats", get(explore_stats))
}

#[utoipa::path(
    get,
    path = "/api/explore/fests",
    params(FestQuery),
    responses((status = 200, description = "Published fests", body = [ExploreFestResponse])),
    tag = "Explore"
)]
pub async fn explore_fests(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<FestQuery>,
) -> AppResult<Json<Vec<ExploreFestResponse>>> {
    let filter = FestFilter::from(query);
    let fests = explore::explore_fests(&state.db, &filter).await?;
    Ok(Json(fests.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/explore/events",
    params(EventQuery),
    responses(
        (status = 200, description = "Published events; `isRegistered` is set for students", body = [ExploreEventResponse]),
        (status = 401, description = "A token was sent but is invalid")
    ),
    security((), ("bearer_auth" = [])),
    tag = "Explore"
)]
pub async fn explore_events(
    State(state): State<AppState>,
    principal: Option<Principal>,
    AppQuery(query): AppQuery<EventQuery>,
) -> AppResult<Json<Vec<ExploreEventResponse>>> {
    let viewer = match &principal {
        Some(Principal::Student(student)) => Some(student),
        _ => None,
    };
    let filter = EventFilter::from(query);
    let events = explore::explore_events(&state.db, &filter, viewer).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/explore/stats",
    responses((status = 200, description = "Published totals", body = ExploreStatsResponse)),
    tag = "Explore"
)]
pub async fn explore_stats(State(state): State<AppState>) -> AppResult<Json<ExploreStatsResponse>> {
    let stats = explore::explore_stats(&state.db).await?;
    Ok(Json(stats.into()))
}
