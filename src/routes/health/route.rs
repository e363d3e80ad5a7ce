use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use sea_orm::ConnectionTrait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health))
        .route("/ping", get(ping))
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
    pub database: bool,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/api/health",
    responses((status = 200, description = "Service health", body = HealthResponse)),
    tag = "Health"
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = state
        .db
        .execute_unprepared("SELECT 1")
        .await
        .inspect_err(|e| tracing::warn!("Health check query failed: {e}"))
        .is_ok();

    Json(HealthResponse {
        status: if database { "ok" } else { "degraded" }.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/ping",
    responses((status = 200, description = "Liveness probe", body = String)),
    tag = "Health"
)]
pub async fn ping() -> &'static str {
    "pong"
}
