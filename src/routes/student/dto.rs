use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::PaymentStatus;
use crate::entities::{event_registration, student, team};
use crate::routes::events::dto::EventResponse;
use crate::services::registration::{
    MyRegistration, RegisterInput, RegistrationOutcome, StudentDashboardStats,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterEventRequest {
    pub event_id: Uuid,
    /// `solo` or `team`.
    #[schema(example = "solo")]
    pub registration_type: String,
    /// Join this team.
    pub team_id: Option<Uuid>,
    /// Create a team with this name when no `teamId` is given.
    pub team_name: Option<String>,
}

impl From<RegisterEventRequest> for RegisterInput {
    fn from(request: RegisterEventRequest) -> Self {
        RegisterInput {
            event_id: request.event_id,
            registration_type: request.registration_type,
            team_id: request.team_id,
            team_name: request.team_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub registration_id: Uuid,
    pub event_id: Uuid,
    pub event_name: String,
    pub registration_type: String,
    pub payment_status: PaymentStatus,
    pub receipt_number: String,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
    #[schema(value_type = String)]
    pub registered_at: NaiveDateTime,
    pub available_slots: i32,
    pub payment_required: bool,
}

impl From<RegistrationOutcome> for RegistrationResponse {
    fn from(outcome: RegistrationOutcome) -> Self {
        RegistrationResponse {
            registration_id: outcome.registration.id,
            event_id: outcome.event.id,
            event_name: outcome.event.name.clone(),
            registration_type: outcome.registration_type.as_str().to_string(),
            payment_status: outcome.registration.payment_status,
            receipt_number: outcome.registration.receipt_number,
            team_id: outcome.team.as_ref().map(|t| t.id),
            team_name: outcome.team.map(|t| t.name),
            registered_at: outcome.registration.registered_at,
            available_slots: outcome.event.available_slots(),
            payment_required: outcome.registration.payment_status != PaymentStatus::Paid,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSummary {
    pub id: Uuid,
    pub status: String,
    pub payment_status: PaymentStatus,
    pub certificate_approved: bool,
    pub receipt_number: String,
    #[schema(value_type = String)]
    pub registered_at: NaiveDateTime,
}

impl From<event_registration::Model> for RegistrationSummary {
    fn from(registration: event_registration::Model) -> Self {
        RegistrationSummary {
            id: registration.id,
            status: registration.status,
            payment_status: registration.payment_status,
            certificate_approved: registration.certificate_approved,
            receipt_number: registration.receipt_number,
            registered_at: registration.registered_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MyRegistrationResponse {
    pub registration: RegistrationSummary,
    pub event: EventResponse,
    pub fest_name: Option<String>,
    pub team: Option<TeamResponse>,
    pub reviewed: bool,
    pub rating: Option<i32>,
    pub can_review: bool,
}

impl From<MyRegistration> for MyRegistrationResponse {
    fn from(item: MyRegistration) -> Self {
        MyRegistrationResponse {
            registration: item.registration.into(),
            event: item.event.into(),
            fest_name: item.fest.map(|f| f.name),
            team: item.team.map(Into::into),
            reviewed: item.review.is_some(),
            rating: item.review.map(|r| r.rating),
            can_review: item.can_review,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentStatsResponse {
    pub total_events: u64,
    pub total_paid: u64,
    pub reviews_given: u64,
    pub upcoming_events: u64,
    pub past_events: u64,
}

impl From<StudentDashboardStats> for StudentStatsResponse {
    fn from(stats: StudentDashboardStats) -> Self {
        StudentStatsResponse {
            total_events: stats.total_events,
            total_paid: stats.total_paid,
            reviews_given: stats.reviews_given,
            upcoming_events: stats.upcoming_events,
            past_events: stats.past_events,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamResponse {
    pub id: Uuid,
    pub event_id: Uuid,
    pub name: String,
    pub creator_id: Uuid,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
}

impl From<team::Model> for TeamResponse {
    fn from(team: team::Model) -> Self {
        TeamResponse {
            id: team.id,
            event_id: team.event_id,
            name: team.name,
            creator_id: team.creator_id,
            created_at: team.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamMemberResponse {
    pub student_id: Uuid,
    pub name: String,
    pub is_creator: bool,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TeamDetailResponse {
    #[serde(flatten)]
    pub team: TeamResponse,
    pub members: Vec<TeamMemberResponse>,
}

impl TeamDetailResponse {
    pub fn new(team: team::Model, members: Vec<student::Model>) -> Self {
        let members = members
            .into_iter()
            .map(|student| TeamMemberResponse {
                is_creator: student.id == team.creator_id,
                student_id: student.id,
                name: student.name,
            })
            .collect();

        TeamDetailResponse {
            team: team.into(),
            members,
        }
    }
}
