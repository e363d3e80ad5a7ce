use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::routes::events::dto::EventResponse;
use crate::routes::fests::dto::FestResponse;
use crate::services::explore::{EventFilter, ExploreStats, ExploredEvent, ExploredFest, FestFilter};

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct FestQuery {
    pub name: Option<String>,
    pub college: Option<String>,
    /// Fests starting on or after this date.
    #[param(value_type = Option<String>, example = "2025-01-01")]
    pub start_date: Option<NaiveDate>,
    /// Fests ending on or before this date.
    #[param(value_type = Option<String>, example = "2025-12-31")]
    pub end_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub mode: Option<String>,
}

impl From<FestQuery> for FestFilter {
    fn from(query: FestQuery) -> Self {
        FestFilter {
            name: query.name,
            college: query.college,
            start_date: query.start_date,
            end_date: query.end_date,
            city: query.city,
            state: query.state,
            mode: query.mode,
        }
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EventQuery {
    pub name: Option<String>,
    pub fest: Option<String>,
    pub college: Option<String>,
    pub category: Option<String>,
    pub mode: Option<String>,
    #[param(value_type = Option<String>, example = "2025-01-01")]
    pub start_date: Option<NaiveDate>,
    #[param(value_type = Option<String>, example = "2025-12-31")]
    pub end_date: Option<NaiveDate>,
    pub min_fee: Option<i32>,
    pub max_fee: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub team_allowed: Option<bool>,
}

impl From<EventQuery> for EventFilter {
    fn from(query: EventQuery) -> Self {
        EventFilter {
            name: query.name,
            fest: query.fest,
            college: query.college,
            category: query.category,
            mode: query.mode,
            start_date: query.start_date,
            end_date: query.end_date,
            min_fee: query.min_fee,
            max_fee: query.max_fee,
            city: query.city,
            state: query.state,
            team_allowed: query.team_allowed,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExploreFestResponse {
    #[serde(flatten)]
    pub fest: FestResponse,
    pub college_name: Option<String>,
}

impl From<ExploredFest> for ExploreFestResponse {
    fn from(explored: ExploredFest) -> Self {
        ExploreFestResponse {
            fest: explored.fest.into(),
            college_name: explored.college_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExploreEventResponse {
    #[serde(flatten)]
    pub event: EventResponse,
    pub fest_name: Option<String>,
    pub college_name: Option<String>,
    /// Present only for signed-in students.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_registered: Option<bool>,
}

impl From<ExploredEvent> for ExploreEventResponse {
    fn from(explored: ExploredEvent) -> Self {
        ExploreEventResponse {
            event: explored.event.into(),
            fest_name: explored.fest_name,
            college_name: explored.college_name,
            is_registered: explored.is_registered,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExploreStatsResponse {
    pub total_fests: u64,
    pub total_events: u64,
    pub total_colleges: u64,
}

impl From<ExploreStats> for ExploreStatsResponse {
    fn from(stats: ExploreStats) -> Self {
        ExploreStatsResponse {
            total_fests: stats.total_fests,
            total_events: stats.total_events,
            total_colleges: stats.total_colleges,
        }
    }
}
