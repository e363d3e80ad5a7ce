use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router, http::StatusCode};
use uuid::Uuid;

use super::dto::{RatingResponse, ReviewResponse, SubmitReviewRequest};
use crate::error::AppResult;
use crate::extractor::{AppJson, CollegePrincipal, StudentPrincipal};
use crate::services::review;
use crate::state::AppState;
use crate::utils::time::today;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/events/{id}/review", get(my_review).post(submit_review))
        .route("/api/events/{id}/reviews", get(event_reviews))
        .route("/api/events/{id}/rating", get(event_rating))
}

#[utoipa::path(
    post,
    path = "/api/events/{id}/review",
    params(("id" = Uuid, Path, description = "Event id")),
    request_body = SubmitReviewRequest,
    responses(
        (status = 201, description = "Review recorded", body = ReviewResponse),
        (status = 400, description = "Event not over yet or rating out of range"),
        (status = 403, description = "Not a registered and paid participant"),
        (status = 404, description = "Event not found"),
        (status = 409, description = "Already reviewed")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn submit_review(
    State(state): State<AppState>,
    StudentPrincipal(student): StudentPrincipal,
    Path(id): Path<Uuid>,
    AppJson(payload): AppJson<SubmitReviewRequest>,
) -> AppResult<(StatusCode, Json<ReviewResponse>)> {
    let review = review::submit_review(
        &state.db,
        &student,
        id,
        payload.rating,
        payload.review_text,
        today(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(review.into())))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/review",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "The caller's review", body = ReviewResponse),
        (status = 404, description = "Event or review not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn my_review(
    State(state): State<AppState>,
    StudentPrincipal(student): StudentPrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ReviewResponse>> {
    let review = review::my_review(&state.db, &student, id).await?;
    Ok(Json(review.into()))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/reviews",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "All reviews of the event", body = [ReviewResponse]),
        (status = 404, description = "Event not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "Reviews"
)]
pub async fn event_reviews(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ReviewResponse>>> {
    let reviews = review::reviews_for_college(&state.db, &college, id).await?;
    Ok(Json(reviews.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/events/{id}/rating",
    params(("id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Average rating", body = RatingResponse),
        (status = 404, description = "Event not found")
    ),
    tag = "Reviews"
)]
pub async fn event_rating(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RatingResponse>> {
    let summary = review::event_rating(&state.db, id).await?;
    Ok(Json(RatingResponse::new(id, summary)))
}
