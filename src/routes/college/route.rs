use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use super::dto::{
    ApproveCertificatesRequest, ApprovedCertificatesResponse, CollegeStatsResponse,
    DateTotalsResponse, EarningsResponse, EventDashboardResponse, EventRegistrationsResponse,
    FestTotalsResponse, PaymentConfigRequest, PaymentConfigResponse, RegistrationStatsResponse,
    TopEventsResponse,
};
use crate::config::TOP_EVENTS_LIMIT;
use crate::error::AppResult;
use crate::extractor::{AppJson, CollegePrincipal};
use crate::repositories::CollegeRepository;
use crate::routes::common::MessageResponse;
use crate::services::dashboard::{self, DashboardData};
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route(
            "/api/college/payment-config",
            post(update_payment_config).get(get_payment_config),
        )
        .route("/api/college/dashboard/stats", get(dashboard_stats))
        .route("/api/college/dashboard/earnings", get(earnings))
        .route("/api/college/dashboard/registrations", get(registration_stats))
        .route("/api/college/dashboard/analytics/by-fest", get(analytics_by_fest))
        .route("/api/college/dashboard/analytics/by-date", get(analytics_by_date))
        .route("/api/college/dashboard/analytics/top-events", get(top_events))
        .route("/api/college/dashboard/events", get(dashboard_events))
        .route(
            "/api/college/dashboard/events/{event_id}/registrations",
            get(event_registrations),
        )
        .route(
            "/api/college/dashboard/events/{event_id}/registrations/{registration_id}/approve-certificate",
            post(approve_certificate),
        )
        .route(
            "/api/college/dashboard/events/{event_id}/registrations/approve-all-certificates",
            post(approve_all_certificates),
        )
        .route(
            "/api/college/dashboard/events/{event_id}/registrations/approve-certificates",
            post(approve_selected_certificates),
        )
}

#[utoipa::path(
    post,
    path = "/api/college/payment-config",
    request_body = PaymentConfigRequest,
    responses((status = 200, description = "Payout details saved", body = PaymentConfigResponse)),
    security(("bearer_auth" = [])),
    tag = "College"
)]
pub async fn update_payment_config(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    AppJson(payload): AppJson<PaymentConfigRequest>,
) -> AppResult<Json<PaymentConfigResponse>> {
    let college = CollegeRepository::new(&state.db)
        .update_payment_config(college, payload.into())
        .await?;

    tracing::info!(
        college_id = %college.id,
        configured = college.payee_account().is_some(),
        "Payment config updated"
    );
    Ok(Json(college.into()))
}

#[utoipa::path(
    get,
    path = "/api/college/payment-config",
    responses((status = 200, description = "Current payout details", body = PaymentConfigResponse)),
    security(("bearer_auth" = [])),
    tag = "College"
)]
pub async fn get_payment_config(
    CollegePrincipal(college): CollegePrincipal,
) -> Json<PaymentConfigResponse> {
    Json(college.into())
}

#[utoipa::path(
    get,
    path = "/api/college/dashboard/stats",
    responses((status = 200, description = "College totals", body = CollegeStatsResponse)),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
) -> AppResult<Json<CollegeStatsResponse>> {
    let data = DashboardData::load(&state.db, &college).await?;
    Ok(Json(data.stats().into()))
}

#[utoipa::path(
    get,
    path = "/api/college/dashboard/earnings",
    responses((status = 200, description = "Paid amounts per event", body = EarningsResponse)),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn earnings(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
) -> AppResult<Json<EarningsResponse>> {
    let data = DashboardData::load(&state.db, &college).await?;
    Ok(Json(data.earnings().into()))
}

#[utoipa::path(
    get,
    path = "/api/college/dashboard/registrations",
    responses((status = 200, description = "Registration counts per event", body = RegistrationStatsResponse)),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn registration_stats(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
) -> AppResult<Json<RegistrationStatsResponse>> {
    let data = DashboardData::load(&state.db, &college).await?;
    Ok(Json(data.registration_stats().into()))
}

#[utoipa::path(
    get,
    path = "/api/college/dashboard/analytics/by-fest",
    responses((status = 200, description = "Totals grouped by fest", body = [FestTotalsResponse])),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn analytics_by_fest(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
) -> AppResult<Json<Vec<FestTotalsResponse>>> {
    let data = DashboardData::load(&state.db, &college).await?;
    Ok(Json(data.by_fest().into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/college/dashboard/analytics/by-date",
    responses((status = 200, description = "Totals grouped by registration date", body = [DateTotalsResponse])),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn analytics_by_date(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
) -> AppResult<Json<Vec<DateTotalsResponse>>> {
    let data = DashboardData::load(&state.db, &college).await?;
    Ok(Json(data.by_date().into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/college/dashboard/analytics/top-events",
    responses((status = 200, description = "Leading events by registrations and by earnings", body = TopEventsResponse)),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn top_events(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
) -> AppResult<Json<TopEventsResponse>> {
    let data = DashboardData::load(&state.db, &college).await?;
    Ok(Json(data.top_events(TOP_EVENTS_LIMIT).into()))
}

#[utoipa::path(
    get,
    path = "/api/college/dashboard/events",
    responses((status = 200, description = "Per-event dashboard rows", body = [EventDashboardResponse])),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn dashboard_events(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
) -> AppResult<Json<Vec<EventDashboardResponse>>> {
    let data = DashboardData::load(&state.db, &college).await?;
    Ok(Json(data.event_rows().into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    get,
    path = "/api/college/dashboard/events/{event_id}/registrations",
    params(("event_id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Registrants of the event", body = EventRegistrationsResponse),
        (status = 404, description = "Event not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn event_registrations(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<EventRegistrationsResponse>> {
    let list = dashboard::event_registrations(&state.db, &college, event_id).await?;
    Ok(Json(list.into()))
}

#[utoipa::path(
    post,
    path = "/api/college/dashboard/events/{event_id}/registrations/{registration_id}/approve-certificate",
    params(
        ("event_id" = Uuid, Path, description = "Event id"),
        ("registration_id" = Uuid, Path, description = "Registration id")
    ),
    responses(
        (status = 200, description = "Certificate approved", body = MessageResponse),
        (status = 404, description = "Event or registration not found")
    ),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn approve_certificate(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path((event_id, registration_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<MessageResponse>> {
    dashboard::approve_certificate(&state.db, &college, event_id, registration_id).await?;
    Ok(Json(MessageResponse::new("Certificate approved successfully")))
}

#[utoipa::path(
    post,
    path = "/api/college/dashboard/events/{event_id}/registrations/approve-all-certificates",
    params(("event_id" = Uuid, Path, description = "Event id")),
    responses(
        (status = 200, description = "Every registration approved", body = ApprovedCertificatesResponse),
        (status = 404, description = "Event not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn approve_all_certificates(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(event_id): Path<Uuid>,
) -> AppResult<Json<ApprovedCertificatesResponse>> {
    let approved = dashboard::approve_certificates(&state.db, &college, event_id, None).await?;
    Ok(Json(ApprovedCertificatesResponse::new(approved)))
}

#[utoipa::path(
    post,
    path = "/api/college/dashboard/events/{event_id}/registrations/approve-certificates",
    params(("event_id" = Uuid, Path, description = "Event id")),
    request_body = ApproveCertificatesRequest,
    responses(
        (status = 200, description = "Selected registrations approved", body = ApprovedCertificatesResponse),
        (status = 404, description = "Event not found or not owned by this college")
    ),
    security(("bearer_auth" = [])),
    tag = "College Dashboard"
)]
pub async fn approve_selected_certificates(
    State(state): State<AppState>,
    CollegePrincipal(college): CollegePrincipal,
    Path(event_id): Path<Uuid>,
    AppJson(payload): AppJson<ApproveCertificatesRequest>,
) -> AppResult<Json<ApprovedCertificatesResponse>> {
    let approved = dashboard::approve_certificates(
        &state.db,
        &college,
        event_id,
        Some(payload.registration_ids),
    )
    .await?;
    Ok(Json(ApprovedCertificatesResponse::new(approved)))
}
