use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::entities::event;
use crate::repositories::{EventCreate, EventUpdate};
use crate::services::catalog::{EventStats, EventSummary};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    pub fest_id: Option<Uuid>,
    #[schema(example = "Hackathon")]
    pub name: String,
    pub description: String,
    #[schema(value_type = String, example = "2025-01-15")]
    pub event_date: NaiveDate,
    pub location: String,
    #[schema(example = 200)]
    pub fees: i32,
    #[schema(example = 100)]
    pub capacity: i32,
    #[serde(default)]
    pub team_is_allowed: bool,
    pub category: Option<String>,
    pub mode: Option<String>,
    pub cash_prize: Option<String>,
    pub first_prize: Option<String>,
    pub second_prize: Option<String>,
    pub third_prize: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub event_website: Option<String>,
    pub contact_phone: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_email: Option<String>,
    pub organizer_phone: Option<String>,
    pub rules: Option<String>,
    pub requirements: Option<String>,
    /// Defaults to the event date.
    #[schema(value_type = Option<String>, example = "2025-01-14")]
    pub registration_deadline: Option<NaiveDate>,
    /// Defaults to true.
    pub registration_open: Option<bool>,
}

impl From<CreateEventRequest> for EventCreate {
    fn from(request: CreateEventRequest) -> Self {
        EventCreate {
            // set from the caller's profile
            college_id: Uuid::nil(),
            fest_id: request.fest_id,
            name: request.name,
            description: request.description,
            event_date: request.event_date,
            location: request.location,
            fees: request.fees,
            capacity: request.capacity,
            team_is_allowed: request.team_is_allowed,
            category: request.category,
            mode: request.mode,
            cash_prize: request.cash_prize,
            first_prize: request.first_prize,
            second_prize: request.second_prize,
            third_prize: request.third_prize,
            city: request.city,
            state: request.state,
            country: request.country,
            event_website: request.event_website,
            contact_phone: request.contact_phone,
            organizer_name: request.organizer_name,
            organizer_email: request.organizer_email,
            organizer_phone: request.organizer_phone,
            rules: request.rules,
            requirements: request.requirements,
            registration_deadline: request.registration_deadline.unwrap_or(request.event_date),
            registration_open: request.registration_open.unwrap_or(true),
        }
    }
}

/// Omitted fields keep their current value. `removeFest` detaches the event from its fest.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEventRequest {
    pub fest_id: Option<Uuid>,
    #[serde(default)]
    pub remove_fest: bool,
    pub name: Option<String>,
    pub description: Option<String>,
    #[schema(value_type = Option<String>, example = "2025-01-15")]
    pub event_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub fees: Option<i32>,
    pub capacity: Option<i32>,
    pub team_is_allowed: Option<bool>,
    pub category: Option<String>,
    pub mode: Option<String>,
    pub cash_prize: Option<String>,
    pub first_prize: Option<String>,
    pub second_prize: Option<String>,
    pub third_prize: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub event_website: Option<String>,
    pub contact_phone: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_email: Option<String>,
    pub organizer_phone: Option<String>,
    pub rules: Option<String>,
    pub requirements: Option<String>,
    #[schema(value_type = Option<String>, example = "2025-01-14")]
    pub registration_deadline: Option<NaiveDate>,
    pub registration_open: Option<bool>,
}

impl From<UpdateEventRequest> for EventUpdate {
    fn from(request: UpdateEventRequest) -> Self {
        let fest_id = if request.remove_fest {
            Some(None)
        } else {
            request.fest_id.map(Some)
        };

        EventUpdate {
            fest_id,
            name: request.name,
            description: request.description,
            event_date: request.event_date,
            location: request.location,
            fees: request.fees,
            capacity: request.capacity,
            team_is_allowed: request.team_is_allowed,
            category: request.category,
            mode: request.mode,
            cash_prize: request.cash_prize,
            first_prize: request.first_prize,
            second_prize: request.second_prize,
            third_prize: request.third_prize,
            city: request.city,
            state: request.state,
            country: request.country,
            event_website: request.event_website,
            contact_phone: request.contact_phone,
            organizer_name: request.organizer_name,
            organizer_email: request.organizer_email,
            organizer_phone: request.organizer_phone,
            rules: request.rules,
            requirements: request.requirements,
            registration_deadline: request.registration_deadline,
            registration_open: request.registration_open,
            ..Default::default()
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: Uuid,
    pub college_id: Uuid,
    pub fest_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    #[schema(value_type = String)]
    pub event_date: NaiveDate,
    pub location: String,
    pub fees: i32,
    pub capacity: i32,
    pub registered_count: i32,
    pub available_slots: i32,
    pub team_is_allowed: bool,
    pub category: Option<String>,
    pub mode: Option<String>,
    pub poster_url: Option<String>,
    pub poster_thumbnail_url: Option<String>,
    pub poster_approved: bool,
    pub approved: bool,
    pub active: bool,
    pub cash_prize: Option<String>,
    pub first_prize: Option<String>,
    pub second_prize: Option<String>,
    pub third_prize: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub event_website: Option<String>,
    pub contact_phone: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_email: Option<String>,
    pub organizer_phone: Option<String>,
    pub rules: Option<String>,
    pub requirements: Option<String>,
    #[schema(value_type = String)]
    pub registration_deadline: NaiveDate,
    pub registration_open: bool,
    #[schema(value_type = String)]
    pub created_at: NaiveDateTime,
    #[schema(value_type = String)]
    pub updated_at: NaiveDateTime,
}

impl From<event::Model> for EventResponse {
    fn from(event: event::Model) -> Self {
        EventResponse {
            available_slots: event.available_slots(),
            id: event.id,
            college_id: event.college_id,
            fest_id: event.fest_id,
            name: event.name,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
            fees: event.fees,
            capacity: event.capacity,
            registered_count: event.registered_count,
            team_is_allowed: event.team_is_allowed,
            category: event.category,
            mode: event.mode,
            poster_url: event.poster_url,
            poster_thumbnail_url: event.poster_thumbnail_url,
            poster_approved: event.poster_approved,
            approved: event.approved,
            active: event.active,
            cash_prize: event.cash_prize,
            first_prize: event.first_prize,
            second_prize: event.second_prize,
            third_prize: event.third_prize,
            city: event.city,
            state: event.state,
            country: event.country,
            event_website: event.event_website,
            contact_phone: event.contact_phone,
            organizer_name: event.organizer_name,
            organizer_email: event.organizer_email,
            organizer_phone: event.organizer_phone,
            rules: event.rules,
            requirements: event.requirements,
            registration_deadline: event.registration_deadline,
            registration_open: event.registration_open,
            created_at: event.created_at,
            updated_at: event.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventSummaryResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub registration_count: i64,
    pub days_left: i64,
}

impl From<EventSummary> for EventSummaryResponse {
    fn from(summary: EventSummary) -> Self {
        EventSummaryResponse {
            event: summary.event.into(),
            registration_count: summary.registration_count,
            days_left: summary.days_left,
        }
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct RejectPosterQuery {
    pub reason: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventStatsResponse {
    pub event_id: Uuid,
    pub registration_count: i64,
    pub days_left: i64,
    #[schema(value_type = String)]
    pub registration_deadline: NaiveDate,
    #[schema(value_type = String)]
    pub event_date: NaiveDate,
}

impl From<EventStats> for EventStatsResponse {
    fn from(stats: EventStats) -> Self {
        EventStatsResponse {
            event_id: stats.event_id,
            registration_count: stats.registration_count,
            days_left: stats.days_left,
            registration_deadline: stats.registration_deadline,
            event_date: stats.event_date,
        }
    }
}
