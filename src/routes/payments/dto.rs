use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::PaymentStatus;
use crate::services::payment::{CreateOrderInput, CreatedOrder, Settlement};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub registration_id: Uuid,
    /// Whole currency units; defaults to the event fee.
    #[schema(example = 200)]
    pub amount: Option<i32>,
    #[schema(example = "INR")]
    pub currency: Option<String>,
    pub receipt_email: Option<String>,
}

impl From<CreateOrderRequest> for CreateOrderInput {
    fn from(request: CreateOrderRequest) -> Self {
        CreateOrderInput {
            registration_id: request.registration_id,
            amount: request.amount,
            currency: request.currency,
            receipt_email: request.receipt_email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub payment_id: Uuid,
    pub registration_id: Uuid,
    /// Whole currency units.
    pub amount: i32,
    /// Minor units as sent to the gateway.
    pub gateway_amount: i64,
    pub currency: String,
    pub status: PaymentStatus,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}

impl From<CreatedOrder> for CreateOrderResponse {
    fn from(created: CreatedOrder) -> Self {
        CreateOrderResponse {
            order_id: created.order.id,
            payment_id: created.payment.id,
            registration_id: created.payment.registration_id,
            amount: created.payment.amount,
            gateway_amount: created.order.amount,
            currency: created.payment.currency,
            status: created.payment.status,
            created_at: created.payment.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    #[schema(example = "order_NJd2hEJb8Jx1q2")]
    pub order_id: String,
    /// `paid`, `failed` or `pending`.
    #[schema(example = "paid")]
    pub status: String,
    pub payment_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentResponse {
    pub order_id: String,
    pub status: String,
    /// False when the same confirmation was already recorded.
    pub applied: bool,
}

impl VerifyPaymentResponse {
    pub fn new(order_id: String, status: String, settlement: Settlement) -> Self {
        VerifyPaymentResponse {
            order_id,
            status,
            applied: settlement == Settlement::Applied,
        }
    }
}
