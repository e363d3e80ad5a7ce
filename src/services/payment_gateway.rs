use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;

/// Split instruction routing funds to a linked account.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Transfer {
    pub account: String,
    pub amount: i64,
    pub currency: String,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct OrderRequest {
    /// Minor currency units (paise for INR).
    pub amount: i64,
    pub currency: String,
    pub receipt: String,
    pub payment_capture: u8,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub transfers: Vec<Transfer>,
}

impl OrderRequest {
    /// Builds the order for a registration; with a payee account the full amount is transferred to it.
    pub fn for_registration(
        registration_id: Uuid,
        amount: i32,
        currency: &str,
        payee_account: Option<&str>,
    ) -> Self {
        let minor_units = i64::from(amount) * 100;
        let transfers = payee_account
            .map(|account| {
                vec![Transfer {
                    account: account.to_string(),
                    amount: minor_units,
                    currency: currency.to_string(),
                }]
            })
            .unwrap_or_default();

        Self {
            amount: minor_units,
            currency: currency.to_string(),
            receipt: format!("reg-{registration_id}"),
            payment_capture: 1,
            transfers,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, ToSchema)]
pub struct GatewayOrder {
    #[schema(example = "order_NJd2hEJb8Jx1q2")]
    pub id: String,
    pub amount: i64,
    pub currency: String,
    pub receipt: Option<String>,
    #[schema(example = "created")]
    pub status: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("gateway request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("gateway rejected the order ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError>;
}

pub struct RazorpayGateway {
    client: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.gateway_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.razorpay_base_url.trim_end_matches('/').to_string(),
            key_id: config.razorpay_key_id.clone(),
            key_secret: config.razorpay_key_secret.clone(),
        })
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let response = self
            .client
            .post(format!("{}/orders", self.base_url))
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<GatewayOrder>().await?)
    }
}
