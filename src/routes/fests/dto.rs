use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::fest;
use crate::repositories::{FestCreate, FestUpdate};
use crate::services::catalog::FestSummary;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFestRequest {
    #[schema(example = "TechNova 2025")]
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String, example = "2025-01-10")]
    pub start_date: NaiveDate,
    #[schema(value_type = String, example = "2025-01-20")]
    pub end_date: NaiveDate,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    /// Online, Offline or Hybrid.
    pub mode: Option<String>,
    pub website: Option<String>,
    pub contact_phone: Option<String>,
}

impl From<CreateFestRequest> for FestCreate {
    fn from(request: CreateFestRequest) -> Self {
        FestCreate {
            // set from the caller's profile
            college_id: Uuid::nil(),
            name: request.name,
            description: request.description,
            start_date: request.start_date,
            end_date: request.end_date,
            city: request.city,
            state: request.state,
            country: request.country,
            mode: request.mode,
            website: request.website,
            contact_phone: request.contact_phone,
        }
    }
}

/// Omitted fields keep their current value.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFestRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "2025-01-10")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, example = "2025-01-20")]
    pub end_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub mode: Option<String>,
    pub website: Option<String>,
    pub contact_phone: Option<String>,
}

impl From<UpdateFestRequest> for FestUpdate {
    fn from(request: UpdateFestRequest) -> Self {
        FestUpdate {
            name: request.name,
            description: request.description,
            start_date: request.start_date,
            end_date: request.end_date,
            city: request.city,
            state: request.state,
            country: request.country,
            mode: request.mode,
            website: request.website,
            contact_phone: request.contact_phone,
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FestResponse {
    pub id: Uuid,
    pub college_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    #[schema(value_type = String)]
    pub start_date: NaiveDate,
    #[schema(value_type = String)]
    pub end_date: NaiveDate,
    pub approved: bool,
    pub active: bool,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub mode: Option<String>,
    pub website: Option<String>,
    pub contact_phone: Option<String>,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
    #[schema(value_type = String)]
    pub updated_at: NaiveDateTime,
}

impl From<fest::Model> for FestResponse {
    fn from(fest: fest::Model) -> Self {
        FestResponse {
            id: fest.id,
            college_id: fest.college_id,
            name: fest.name,
            description: fest.description,
            start_date: fest.start_date,
            end_date: fest.end_date,
            approved: fest.approved,
            active: fest.active,
            image_url: fest.image_url,
            thumbnail_url: fest.thumbnail_url,
            city: fest.city,
            state: fest.state,
            country: fest.country,
            mode: fest.mode,
            website: fest.website,
            contact_phone: fest.contact_phone,
            created_at: fest.created_at,
            updated_at: fest.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FestSummaryResponse {
    #[serde(flatten)]
    pub fest: FestResponse,
    pub event_count: usize,
    pub registration_count: i64,
}

impl From<FestSummary> for FestSummaryResponse {
    fn from(summary: FestSummary) -> Self {
        FestSummaryResponse {
            fest: summary.fest.into(),
            event_count: summary.event_count,
            registration_count: summary.registration_count,
        }
    }
}
