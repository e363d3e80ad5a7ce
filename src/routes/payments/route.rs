use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use super::dto::{CreateOrderRequest, CreateOrderResponse, VerifyPaymentRequest, VerifyPaymentResponse};
use crate::error::AppResult;
use crate::extractor::{AppJson, StudentPrincipal};
use crate::services::payment;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/payments/create-order", post(create_order))
        .route("/api/payments/verify", post(verify_payment))
}

#[utoipa::path(
    post,
    path = "/api/payments/create-order",
    request_body = CreateOrderRequest,
    responses(
        (status = 200, description = "Gateway order opened", body = CreateOrderResponse),
        (status = 400, description = "Non-positive amount"),
        (status = 402, description = "Gateway refused the order"),
        (status = 403, description = "Registration belongs to another student"),
        (status = 404, description = "Registration not found"),
        (status = 409, description = "Registration already paid")
    ),
    security(("bearer_auth" = [])),
    tag = "Payments"
)]
pub async fn create_order(
    State(state): State<AppState>,
    StudentPrincipal(student): StudentPrincipal,
    AppJson(payload): AppJson<CreateOrderRequest>,
) -> AppResult<Json<CreateOrderResponse>> {
    let created =
        payment::create_order(&state.db, state.gateway.as_ref(), &student, payload.into()).await?;
    Ok(Json(created.into()))
}

#[utoipa::path(
    post,
    path = "/api/payments/verify",
    request_body = VerifyPaymentRequest,
    responses(
        (status = 200, description = "Confirmation recorded", body = VerifyPaymentResponse),
        (status = 400, description = "Unknown status"),
        (status = 404, description = "Order not found")
    ),
    tag = "Payments"
)]
pub async fn verify_payment(
    State(state): State<AppState>,
    AppJson(payload): AppJson<VerifyPaymentRequest>,
) -> AppResult<Json<VerifyPaymentResponse>> {
    let settlement = payment::confirm_payment(
        &state.db,
        state.notifier.as_ref(),
        &payload.order_id,
        &payload.status,
        payload.payment_id,
    )
    .await?;

    Ok(Json(VerifyPaymentResponse::new(
        payload.order_id,
        payload.status.trim().to_ascii_lowercase(),
        settlement,
    )))
}
