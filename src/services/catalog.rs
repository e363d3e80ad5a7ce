use std::collections::HashMap;

use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entities::{college, event, fest};
use crate::error::{AppError, AppResult};
use crate::repositories::{
    EventCreate, EventRepository, EventUpdate, FestCreate, FestRepository, FestUpdate,
};
use crate::services::file_storage::{FileStorage, UploadKind, UploadedFile};
use crate::utils::time::days_left;

fn require_text(value: &str, field: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(value.to_string())
}

fn check_date_range(start: NaiveDate, end: NaiveDate) -> AppResult<()> {
    if start > end {
        return Err(AppError::validation("Start date must be before end date"));
    }
    Ok(())
}

fn check_fees_and_capacity(fees: i32, capacity: i32) -> AppResult<()> {
    if fees < 0 {
        return Err(AppError::validation("Entry fee cannot be negative"));
    }
    if capacity < 1 {
        return Err(AppError::validation("Capacity must be at least 1"));
    }
    Ok(())
}

/// Loads a fest and checks that `college` owns it.
pub async fn owned_fest<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    fest_id: Uuid,
) -> AppResult<fest::Model> {
    FestRepository::new(db)
        .find_by_id(fest_id)
        .await?
        .filter(|fest| fest.college_id == college.id)
        .ok_or_else(|| AppError::not_found("Fest not found or not owned by this college"))
}

/// Loads an event and checks that `college` owns it.
pub async fn owned_event<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    event_id: Uuid,
) -> AppResult<event::Model> {
    EventRepository::new(db)
        .find_by_id(event_id)
        .await?
        .filter(|event| event.college_id == college.id)
        .ok_or_else(|| AppError::not_found("Event not found or not owned by this college"))
}

#[derive(Debug, Clone)]
pub struct FestSummary {
    pub fest: fest::Model,
    pub event_count: usize,
    pub registration_count: i64,
}

fn summarize_fests(fests: Vec<fest::Model>, events: &[event::Model]) -> Vec<FestSummary> {
    let mut per_fest: HashMap<Uuid, (usize, i64)> = HashMap::new();
    for event in events {
        if let Some(fest_id) = event.fest_id {
            let entry = per_fest.entry(fest_id).or_default();
            entry.0 += 1;
            entry.1 += i64::from(event.registered_count);
        }
    }

    fests
        .into_iter()
        .map(|fest| {
            let (event_count, registration_count) =
                per_fest.get(&fest.id).copied().unwrap_or_default();
            FestSummary {
                fest,
                event_count,
                registration_count,
            }
        })
        .collect()
}

pub async fn list_fests<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
) -> AppResult<Vec<FestSummary>> {
    let fests = FestRepository::new(db).find_by_college(college.id).await?;
    let events = EventRepository::new(db).find_by_college(college.id).await?;
    Ok(summarize_fests(fests, &events))
}

pub async fn fest_summary<C: ConnectionTrait>(db: &C, fest: fest::Model) -> AppResult<FestSummary> {
    let events = EventRepository::new(db).find_by_fest(fest.id).await?;
    Ok(FestSummary {
        event_count: events.len(),
        registration_count: events.iter().map(|e| i64::from(e.registered_count)).sum(),
        fest,
    })
}

/// New fests wait for admin approval.
pub async fn create_fest<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    mut input: FestCreate,
) -> AppResult<fest::Model> {
    input.college_id = college.id;
    input.name = require_text(&input.name, "Fest name")?;

    let fests = FestRepository::new(db);
    if fests
        .name_exists_for_college(college.id, &input.name, None)
        .await?
    {
        return Err(AppError::conflict("Fest name already exists for this college"));
    }
    check_date_range(input.start_date, input.end_date)?;

    let fest = fests.create(input).await?;
    tracing::info!(fest_id = %fest.id, college_id = %college.id, "Fest created");
    Ok(fest)
}

pub async fn update_fest<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    fest_id: Uuid,
    mut updates: FestUpdate,
) -> AppResult<fest::Model> {
    let fest = owned_fest(db, college, fest_id).await?;
    let fests = FestRepository::new(db);

    if let Some(name) = updates.name.as_deref() {
        let name = require_text(name, "Fest name")?;
        if fests
            .name_exists_for_college(college.id, &name, Some(fest.id))
            .await?
        {
            return Err(AppError::conflict("Fest name already exists for this college"));
        }
        updates.name = Some(name);
    }

    let start = updates.start_date.unwrap_or(fest.start_date);
    let end = updates.end_date.unwrap_or(fest.end_date);
    check_date_range(start, end)?;

    let linked = EventRepository::new(db).find_by_fest(fest.id).await?;
    if linked
        .iter()
        .any(|event| event.event_date < start || event.event_date > end)
    {
        return Err(AppError::validation(
            "Event date must be within fest date range",
        ));
    }

    // moderation flags are not the owner's to change
    updates.approved = None;
    updates.active = None;

    Ok(fests.update(fest, updates).await?)
}

pub async fn delete_fest<C: ConnectionTrait>(
    db: &C,
    storage: &FileStorage,
    college: &college::Model,
    fest_id: Uuid,
) -> AppResult<()> {
    let fest = owned_fest(db, college, fest_id).await?;
    FestRepository::new(db).delete(fest.id).await?;

    if let Some(url) = fest.image_url.as_deref() {
        if let Err(e) = storage.remove(url).await {
            tracing::warn!(fest_id = %fest.id, "Failed to remove fest image: {e:#}");
        }
    }

    tracing::info!(fest_id = %fest.id, "Fest deleted");
    Ok(())
}

pub async fn upload_fest_image<C: ConnectionTrait>(
    db: &C,
    storage: &FileStorage,
    college: &college::Model,
    fest_id: Uuid,
    file: UploadedFile,
) -> AppResult<fest::Model> {
    let fest = owned_fest(db, college, fest_id).await?;
    let stored = storage.save_image(UploadKind::FestImage, file).await?;

    if let Some(old) = fest.image_url.as_deref() {
        if let Err(e) = storage.remove(old).await {
            tracing::warn!(fest_id = %fest.id, "Failed to remove old fest image: {e:#}");
        }
    }

    let updated = FestRepository::new(db)
        .update(
            fest,
            FestUpdate {
                image_url: Some(stored.url.clone()),
                thumbnail_url: Some(stored.url),
                ..Default::default()
            },
        )
        .await?;
    Ok(updated)
}

#[derive(Debug, Clone)]
pub struct EventSummary {
    pub event: event::Model,
    pub registration_count: i64,
    pub days_left: i64,
}

impl EventSummary {
    pub fn new(event: event::Model, today: NaiveDate) -> Self {
        Self {
            registration_count: i64::from(event.registered_count),
            days_left: days_left(today, event.event_date),
            event,
        }
    }
}

pub async fn list_events<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    today: NaiveDate,
) -> AppResult<Vec<EventSummary>> {
    Ok(EventRepository::new(db)
        .find_by_college(college.id)
        .await?
        .into_iter()
        .map(|event| EventSummary::new(event, today))
        .collect())
}

pub async fn fest_events<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    fest_id: Uuid,
    today: NaiveDate,
) -> AppResult<Vec<EventSummary>> {
    let fest = owned_fest(db, college, fest_id).await?;
    Ok(EventRepository::new(db)
        .find_by_fest(fest.id)
        .await?
        .into_iter()
        .map(|event| EventSummary::new(event, today))
        .collect())
}

async fn check_fest_link<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    fest_id: Uuid,
    event_date: NaiveDate,
) -> AppResult<()> {
    let fest = FestRepository::new(db)
        .find_by_id(fest_id)
        .await?
        .filter(|fest| fest.college_id == college.id)
        .ok_or_else(|| AppError::validation("Invalid fest for this college"))?;

    if !fest.contains_date(event_date) {
        return Err(AppError::validation(
            "Event date must be within fest date range",
        ));
    }
    Ok(())
}

/// New events wait for admin approval. The deadline defaults to the event date.
pub async fn create_event<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    mut input: EventCreate,
) -> AppResult<event::Model> {
    input.college_id = college.id;
    input.name = require_text(&input.name, "Event name")?;
    input.description = require_text(&input.description, "Event description")?;
    input.location = require_text(&input.location, "Location")?;
    check_fees_and_capacity(input.fees, input.capacity)?;

    let events = EventRepository::new(db);
    if events
        .name_exists_for_college(college.id, &input.name, None)
        .await?
    {
        return Err(AppError::conflict("Event name already exists for this college"));
    }

    if let Some(fest_id) = input.fest_id {
        check_fest_link(db, college, fest_id, input.event_date).await?;
    }

    let event = events.create(input).await?;
    tracing::info!(event_id = %event.id, college_id = %college.id, "Event created");
    Ok(event)
}

pub async fn update_event<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    event_id: Uuid,
    mut updates: EventUpdate,
) -> AppResult<event::Model> {
    let event = owned_event(db, college, event_id).await?;
    let events = EventRepository::new(db);

    if let Some(name) = updates.name.as_deref() {
        let name = require_text(name, "Event name")?;
        if events
            .name_exists_for_college(college.id, &name, Some(event.id))
            .await?
        {
            return Err(AppError::conflict("Event name already exists for this college"));
        }
        updates.name = Some(name);
    }
    if let Some(description) = updates.description.as_deref() {
        updates.description = Some(require_text(description, "Event description")?);
    }
    if let Some(location) = updates.location.as_deref() {
        updates.location = Some(require_text(location, "Location")?);
    }

    let fees = updates.fees.unwrap_or(event.fees);
    let capacity = updates.capacity.unwrap_or(event.capacity);
    check_fees_and_capacity(fees, capacity)?;
    if capacity < event.registered_count {
        return Err(AppError::validation(format!(
            "Capacity cannot be lower than current registrations ({})",
            event.registered_count
        )));
    }

    let event_date = updates.event_date.unwrap_or(event.event_date);
    let fest_id = updates.fest_id.unwrap_or(event.fest_id);
    if let Some(fest_id) = fest_id {
        check_fest_link(db, college, fest_id, event_date).await?;
    }

    // moderation and poster state have their own operations
    updates.approved = None;
    updates.active = None;
    updates.poster_url = None;
    updates.poster_thumbnail_url = None;
    updates.poster_approved = None;

    Ok(events.update(event, updates).await?)
}

pub async fn delete_event<C: ConnectionTrait>(
    db: &C,
    storage: &FileStorage,
    college: &college::Model,
    event_id: Uuid,
) -> AppResult<()> {
    let event = owned_event(db, college, event_id).await?;
    EventRepository::new(db).delete(event.id).await?;

    if let Some(url) = event.poster_url.as_deref() {
        if let Err(e) = storage.remove(url).await {
            tracing::warn!(event_id = %event.id, "Failed to remove poster: {e:#}");
        }
    }

    tracing::info!(event_id = %event.id, "Event deleted");
    Ok(())
}

/// Stores a new poster; it needs approval again before it is shown.
pub async fn upload_poster<C: ConnectionTrait>(
    db: &C,
    storage: &FileStorage,
    college: &college::Model,
    event_id: Uuid,
    file: UploadedFile,
) -> AppResult<event::Model> {
    let event = owned_event(db, college, event_id).await?;
    let stored = storage.save_image(UploadKind::EventPoster, file).await?;

    if let Some(old) = event.poster_url.as_deref() {
        if let Err(e) = storage.remove(old).await {
            tracing::warn!(event_id = %event.id, "Failed to remove old poster: {e:#}");
        }
    }

    let updated = EventRepository::new(db)
        .update(
            event,
            EventUpdate {
                poster_url: Some(Some(stored.url.clone())),
                poster_thumbnail_url: Some(Some(stored.url)),
                poster_approved: Some(false),
                ..Default::default()
            },
        )
        .await?;
    Ok(updated)
}

pub async fn approve_poster<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    event_id: Uuid,
) -> AppResult<event::Model> {
    let event = owned_event(db, college, event_id).await?;
    if event.poster_url.is_none() {
        return Err(AppError::validation("Event has no poster to approve"));
    }

    Ok(EventRepository::new(db)
        .update(
            event,
            EventUpdate {
                poster_approved: Some(true),
                ..Default::default()
            },
        )
        .await?)
}

/// Rejecting and deleting both clear the poster; `reason` only ends up in the log.
pub async fn remove_poster<C: ConnectionTrait>(
    db: &C,
    storage: &FileStorage,
    college: &college::Model,
    event_id: Uuid,
    reason: Option<&str>,
) -> AppResult<event::Model> {
    let event = owned_event(db, college, event_id).await?;

    if let Some(url) = event.poster_url.as_deref() {
        if let Err(e) = storage.remove(url).await {
            tracing::warn!(event_id = %event.id, "Failed to remove poster: {e:#}");
        }
    }
    tracing::info!(
        event_id = %event.id,
        reason = reason.unwrap_or("-"),
        "Poster removed"
    );

    Ok(EventRepository::new(db)
        .update(
            event,
            EventUpdate {
                poster_url: Some(None),
                poster_thumbnail_url: Some(None),
                poster_approved: Some(false),
                ..Default::default()
            },
        )
        .await?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventStats {
    pub event_id: Uuid,
    pub registration_count: i64,
    pub days_left: i64,
    pub registration_deadline: NaiveDate,
    pub event_date: NaiveDate,
}

pub async fn event_stats<C: ConnectionTrait>(
    db: &C,
    event_id: Uuid,
    today: NaiveDate,
) -> AppResult<EventStats> {
    let event = EventRepository::new(db)
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    Ok(EventStats {
        event_id: event.id,
        registration_count: i64::from(event.registered_count),
        days_left: days_left(today, event.event_date),
        registration_deadline: event.registration_deadline,
        event_date: event.event_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_range() {
        let start = NaiveDate::from_ymd_opt(2025, 1, 10).unwrap();
        let end = NaiveDate::from_ymd_opt(2025, 1, 20).unwrap();
        assert!(check_date_range(start, end).is_ok());
        assert!(check_date_range(start, start).is_ok());
        assert!(matches!(
            check_date_range(end, start),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_fees_and_capacity() {
        assert!(check_fees_and_capacity(0, 1).is_ok());
        assert!(check_fees_and_capacity(-1, 10).is_err());
        assert!(check_fees_and_capacity(100, 0).is_err());
    }

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("  Hack Night ", "Event name").unwrap(), "Hack Night");
        assert!(require_text("   ", "Event name").is_err());
    }
}
