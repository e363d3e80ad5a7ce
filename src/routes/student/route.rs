use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::dto::{
    MyRegistrationResponse, RegisterEventRequest, RegistrationResponse, StudentStatsResponse,
    TeamDetailResponse, TeamResponse,
};
use crate::error::AppResult;
use crate::extractor::{AppJson, StudentPrincipal};
use crate::routes::common::MessageResponse;
use crate::services::certificate::issue_certificate;
use crate::services::registration;
use crate::state::AppState;
use crate::utils::time::today;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/student/events/register", post(register_for_event))
        .route("/api/student/events/my", get(my_registrations))
        .route("/api/student/events/dashboard/stats", get(dashboard_stats))
        .route(
            "/api/student/events/{event_id}/certificate",
            get(download_certificate),
        )
        .route("/api/student/teams/event/{event_id}", get(event_teams))
        .route("/api/student/teams/my", get(my_teams))
        .route("/api/student/teams/{team_id}", get(team_detail))
        .route("/api/student/teams/{team_id}/leave", delete(leave_team))
}

#[utoipa::path(
    post,
    path = "/api/student/events/register",
    request_body = RegisterEventRequest,
    responses(
        (status = 201, description = "Registered", body = RegistrationResponse),
        (status = 400, description = "Registration type does not fit the event"),
        (status = 403, description = "Registration closed, deadline passed or event full"),
        (status = 404, description = "Event or team not found"),
        (status = 409, description = "Already registered or already a team member")
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn register_for_event(
    State(state): State<AppState>,
    StudentPrincipal(student): StudentPrincipal,
    AppJson(payload): AppJson<RegisterEventRequest>,
) -> AppResult<(StatusCode, Json<RegistrationResponse>)> {
    let outcome = registration::register_for_event(
        &state.db,
        state.notifier.as_ref(),
        &student,
        payload.into(),
        today(),
    )
    .await?;
    Ok((StatusCode::CREATED, Json(outcome.into())))
}

#[utoipa::path(
    get,
    path = "/api/student/events/my",
    responses((status = 200, description = "The caller's registrations", body = [MyRegistrationResponse])),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn my_registrations(
    State(state): State<AppState>,
    StudentPrincipal(student): StudentPrincipal,
) -> AppResult<Json<Vec<MyRegistrationResponse>>> {
    let items = registration::my_registrations(&state.db, &student, today()).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/student/events/dashboard/stats",
    responses((status = 200, description = "Participation totals", body = StudentStatsResponse)),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    StudentPrincipal(student): StudentPrincipal,
) -> AppResult<Json<StudentStatsResponse>> {
    let stats = registration::student_dashboard_stats(&state.db, &student, today()).await?;
    Ok(Json(stats.into()))
}

#[utoipa::path(
    get,
    path = "/api/student/events/{event_id}/certificate",
    params(("event_id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Participation certificate", content_type = "application/pdf", body = Vec<u8>),
        (status = 403, description = "Not paid, not approved or event not over"),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Student"
)]
pub async fn download_certificate(
    State(state): State<AppState>,
    StudentPrincipal(student): StudentPrincipal,
    Path(event_id): Path<Uuid>,
) -> AppResult<Response> {
    let certificate = issue_certificate(
        &state.db,
        state.renderer.as_ref(),
        &student,
        event_id,
        today(),
    )
    .await?;

    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        certificate.file_name
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        Body::from(certificate.bytes),
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/student/teams/event/{event_id}",
    params(("event_id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Teams formed for the event", body = [TeamResponse]),
        (status = 404, description = "Event not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
pub async fn event_teams(
    State(state): State<AppState>,
    StudentPrincipal(_student): StudentPrincipal,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<Vec<TeamResponse>>> {
    let teams = registration::teams_for_event(&state.db, event_id).await?;
    Ok(Json(teams.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/student/teams/my",
    responses((status = 200, description = "Teams the caller belongs to", body = [TeamResponse])),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
pub async fn my_teams(
    State(state): State<AppState>,
    StudentPrincipal(student): StudentPrincipal,
) -> AppResult<Json<Vec<TeamResponse>>> {
    let teams = registration::teams_of_student(&state.db, &student).await?;
    Ok(Json(teams.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/student/teams/{team_id}",
    params(("team_id" = Uuid, Path, description = "Team id")),
    responses(
        (status = 200, description = "Team with its members", body = TeamDetailResponse),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
pub async fn team_detail(
    State(state): State<AppState>,
    StudentPrincipal(_student): StudentPrincipal,
    Path(team_id): Path<Uuid>,
) -> AppResult<Json<TeamDetailResponse>> {
    let (team, members) = registration::team_members(&state.db, team_id).await?;
    Ok(Json(TeamDetailResponse::new(team, members)))
}

#[utoipa::path(
    delete,
    path = "/api/student/teams/{team_id}/leave",
    params(("team_id" = Uuid, Path, description = "Team id")),
    responses(
        (status = 200, description = "Left the team", body = MessageResponse),
        (status = 403, description = "Not a member of this team"),
        (status = 404, description = "Team not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Teams"
)]
pub async fn leave_team(
    State(state): State<AppState>,
    StudentPrincipal(student): StudentPrincipal,
    Path(team_id): Path<Uuid>,
) -> AppResult<Json<MessageResponse>> {
    registration::leave_team(&state.db, &student, team_id).await?;
    Ok(Json(MessageResponse::new("Left the team successfully")))
}
