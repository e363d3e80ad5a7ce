use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entities::{college, event, fest, student};
use crate::error::AppResult;
use crate::repositories::{
    CollegeRepository, EventRegistrationRepository, EventRepository, FestRepository,
};

/// Case-insensitive substring match. A blank needle matches everything.
fn matches_text(haystack: Option<&str>, needle: Option<&str>) -> bool {
    let Some(needle) = needle.map(str::trim).filter(|n| !n.is_empty()) else {
        return true;
    };
    haystack
        .map(|h| h.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, Default)]
pub struct FestFilter {
    pub name: Option<String>,
    pub college: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub mode: Option<String>,
}

impl FestFilter {
    pub fn matches(&self, fest: &fest::Model, college_name: Option<&str>) -> bool {
        matches_text(Some(&fest.name), self.name.as_deref())
            && matches_text(college_name, self.college.as_deref())
            && self.start_date.is_none_or(|start| fest.start_date >= start)
            && self.end_date.is_none_or(|end| fest.end_date <= end)
            && matches_text(fest.city.as_deref(), self.city.as_deref())
            && matches_text(fest.state.as_deref(), self.state.as_deref())
            && matches_text(fest.mode.as_deref(), self.mode.as_deref())
    }
}

#[derive(Debug, Clone, Default)]
pub struct EventFilter {
    pub name: Option<String>,
    pub fest: Option<String>,
    pub college: Option<String>,
    pub category: Option<String>,
    pub mode: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub min_fee: Option<i32>,
    pub max_fee: Option<i32>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub team_allowed: Option<bool>,
}

impl EventFilter {
    pub fn matches(
        &self,
        event: &event::Model,
        fest_name: Option<&str>,
        college_name: Option<&str>,
    ) -> bool {
        matches_text(Some(&event.name), self.name.as_deref())
            && matches_text(fest_name, self.fest.as_deref())
            && matches_text(college_name, self.college.as_deref())
            && matches_text(event.category.as_deref(), self.category.as_deref())
            && matches_text(event.mode.as_deref(), self.mode.as_deref())
            && self.start_date.is_none_or(|start| event.event_date >= start)
            && self.end_date.is_none_or(|end| event.event_date <= end)
            && self.min_fee.is_none_or(|min| event.fees >= min)
            && self.max_fee.is_none_or(|max| event.fees <= max)
            && matches_text(event.city.as_deref(), self.city.as_deref())
            && matches_text(event.state.as_deref(), self.state.as_deref())
            && self
                .team_allowed
                .is_none_or(|allowed| event.team_is_allowed == allowed)
    }
}

async fn college_names<C: ConnectionTrait>(db: &C) -> AppResult<HashMap<Uuid, String>> {
    Ok(CollegeRepository::new(db)
        .find_all()
        .await?
        .into_iter()
        .map(|c: college::Model| (c.id, c.name))
        .collect())
}

#[derive(Debug, Clone)]
pub struct ExploredFest {
    pub fest: fest::Model,
    pub college_name: Option<String>,
}

/// Approved, active fests matching `filter`, earliest start first.
pub async fn explore_fests<C: ConnectionTrait>(
    db: &C,
    filter: &FestFilter,
) -> AppResult<Vec<ExploredFest>> {
    let colleges = college_names(db).await?;
    let mut fests: Vec<ExploredFest> = FestRepository::new(db)
        .find_public()
        .await?
        .into_iter()
        .map(|fest| ExploredFest {
            college_name: colleges.get(&fest.college_id).cloned(),
            fest,
        })
        .filter(|f| filter.matches(&f.fest, f.college_name.as_deref()))
        .collect();

    fests.sort_by_key(|f| f.fest.start_date);
    Ok(fests)
}

#[derive(Debug, Clone)]
pub struct ExploredEvent {
    pub event: event::Model,
    pub fest_name: Option<String>,
    pub college_name: Option<String>,
    /// Only known when a student is browsing.
    pub is_registered: Option<bool>,
}

/// Approved, active events matching `filter`, earliest first.
pub async fn explore_events<C: ConnectionTrait>(
    db: &C,
    filter: &EventFilter,
    viewer: Option<&student::Model>,
) -> AppResult<Vec<ExploredEvent>> {
    let events = EventRepository::new(db).find_public().await?;
    let colleges = college_names(db).await?;

    let fest_ids: Vec<Uuid> = events
        .iter()
        .filter_map(|e| e.fest_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let fests: HashMap<Uuid, String> = FestRepository::new(db)
        .find_by_ids(fest_ids)
        .await?
        .into_iter()
        .map(|f| (f.id, f.name))
        .collect();

    let registered: Option<HashSet<Uuid>> = match viewer {
        Some(student) => Some(
            EventRegistrationRepository::new(db)
                .find_by_student(student.id)
                .await?
                .into_iter()
                .map(|r| r.event_id)
                .collect(),
        ),
        None => None,
    };

    let mut explored: Vec<ExploredEvent> = events
        .into_iter()
        .map(|event| ExploredEvent {
            fest_name: event.fest_id.and_then(|id| fests.get(&id).cloned()),
            college_name: colleges.get(&event.college_id).cloned(),
            is_registered: registered.as_ref().map(|ids| ids.contains(&event.id)),
            event,
        })
        .filter(|e| {
            filter.matches(&e.event, e.fest_name.as_deref(), e.college_name.as_deref())
        })
        .collect();

    explored.sort_by_key(|e| e.event.event_date);
    Ok(explored)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExploreStats {
    pub total_fests: u64,
    pub total_events: u64,
    pub total_colleges: u64,
}

pub async fn explore_stats<C: ConnectionTrait>(db: &C) -> AppResult<ExploreStats> {
    Ok(ExploreStats {
        total_fests: FestRepository::new(db).count_public().await?,
        total_events: EventRepository::new(db).count_public().await?,
        total_colleges: CollegeRepository::new(db).count().await?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, day).unwrap()
    }

    fn fest(name: &str, city: Option<&str>) -> fest::Model {
        let now = Utc::now().naive_utc();
        fest::Model {
            id: Uuid::new_v4(),
            college_id: Uuid::new_v4(),
            name: name.to_string(),
            description: None,
            start_date: date(10),
            end_date: date(20),
            approved: true,
            active: true,
            image_url: None,
            thumbnail_url: None,
            city: city.map(str::to_string),
            state: None,
            country: None,
            mode: Some("Offline".to_string()),
            website: None,
            contact_phone: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_text_match_is_case_insensitive() {
        assert!(matches_text(Some("TechNova 2025"), Some("technova")));
        assert!(matches_text(None, Some("  ")));
        assert!(!matches_text(None, Some("pune")));
    }

    #[test]
    fn test_fest_filter() {
        let fest = fest("TechNova", Some("Pune"));

        assert!(FestFilter::default().matches(&fest, None));
        assert!(
            FestFilter {
                city: Some("pun".to_string()),
                college: Some("iit".to_string()),
                ..Default::default()
            }
            .matches(&fest, Some("IIT Bombay"))
        );
        assert!(
            !FestFilter {
                start_date: Some(date(11)),
                ..Default::default()
            }
            .matches(&fest, None)
        );
        assert!(
            FestFilter {
                start_date: Some(date(10)),
                end_date: Some(date(20)),
                ..Default::default()
            }
            .matches(&fest, None)
        );
    }
}
