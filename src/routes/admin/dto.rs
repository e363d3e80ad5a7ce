use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::{college, event, fest};
use crate::error::{AppError, AppResult};
use crate::routes::events::dto::EventResponse;
use crate::routes::fests::dto::FestResponse;
use crate::services::moderation::{AdminStats, Moderated};

/// Rejection reason, accepted either as `?reason=` or as a JSON body.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ModerationRequest {
    pub reason: Option<String>,
}

impl ModerationRequest {
    /// Body reason wins over the query one. An empty body is allowed.
    pub fn reason_from(query: ModerationRequest, body: &[u8]) -> AppResult<Option<String>> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(query.reason);
        }
        let parsed: ModerationRequest = serde_json::from_slice(body)
            .map_err(|e| AppError::validation(format!("Invalid moderation body: {e}")))?;
        Ok(parsed.reason.or(query.reason))
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FestModerationResponse {
    pub message: String,
    pub reason: Option<String>,
    pub fest: FestResponse,
}

impl From<Moderated<fest::Model>> for FestModerationResponse {
    fn from(moderated: Moderated<fest::Model>) -> Self {
        let message = match moderated.reason {
            Some(_) => "Fest rejected",
            None => "Fest approved",
        };
        FestModerationResponse {
            message: message.to_string(),
            reason: moderated.reason,
            fest: moderated.item.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventModerationResponse {
    pub message: String,
    pub reason: Option<String>,
    pub event: EventResponse,
}

impl From<Moderated<event::Model>> for EventModerationResponse {
    fn from(moderated: Moderated<event::Model>) -> Self {
        let message = match moderated.reason {
            Some(_) => "Event rejected",
            None => "Event approved",
        };
        EventModerationResponse {
            message: message.to_string(),
            reason: moderated.reason,
            event: moderated.item.into(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminStatsResponse {
    pub total_colleges: u64,
    pub total_students: u64,
    pub total_fests: u64,
    pub total_events: u64,
    pub total_registrations: u64,
    pub total_payments: u64,
    pub pending_fests: u64,
    pub pending_events: u64,
}

impl From<AdminStats> for AdminStatsResponse {
    fn from(stats: AdminStats) -> Self {
        AdminStatsResponse {
            total_colleges: stats.total_colleges,
            total_students: stats.total_students,
            total_fests: stats.total_fests,
            total_events: stats.total_events,
            total_registrations: stats.total_registrations,
            total_payments: stats.total_payments,
            pending_fests: stats.pending_fests,
            pending_events: stats.pending_events,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollegeResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
    pub payment_configured: bool,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}

impl From<college::Model> for CollegeResponse {
    fn from(college: college::Model) -> Self {
        CollegeResponse {
            payment_configured: college.payee_account().is_some(),
            id: college.id,
            user_id: college.user_id,
            name: college.name,
            description: college.description,
            address: college.address,
            contact_email: college.contact_email,
            created_at: college.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(reason: Option<&str>) -> ModerationRequest {
        ModerationRequest {
            reason: reason.map(str::to_string),
        }
    }

    #[test]
    fn empty_body_falls_back_to_query() {
        let reason = ModerationRequest::reason_from(query(Some("dup")), b"").unwrap();
        assert_eq!(reason.as_deref(), Some("dup"));
    }

    #[test]
    fn body_reason_takes_precedence() {
        let reason =
            ModerationRequest::reason_from(query(Some("dup")), br#"{"reason":"spam"}"#).unwrap();
        assert_eq!(reason.as_deref(), Some("spam"));
    }

    #[test]
    fn malformed_body_is_a_validation_error() {
        let err = ModerationRequest::reason_from(query(None), b"{not json").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
