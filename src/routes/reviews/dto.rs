use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::event_review;
use crate::services::review::RatingSummary;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReviewRequest {
    #[schema(minimum = 1, maximum = 5, example = 5)]
    pub rating: i32,
    pub review_text: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub student_id: Uuid,
    pub rating: i32,
    pub review_text: Option<String>,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}

impl From<event_review::Model> for ReviewResponse {
    fn from(review: event_review::Model) -> Self {
        ReviewResponse {
            id: review.id,
            event_id: review.event_id,
            student_id: review.student_id,
            rating: review.rating,
            review_text: review.review_text,
            created_at: review.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RatingResponse {
    pub event_id: Uuid,
    pub average_rating: f64,
    pub review_count: usize,
}

impl RatingResponse {
    pub fn new(event_id: Uuid, summary: RatingSummary) -> Self {
        RatingResponse {
            event_id,
            average_rating: summary.average_rating,
            review_count: summary.review_count,
        }
    }
}
