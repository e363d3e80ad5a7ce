use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::{event, fest};
use crate::error::{AppError, AppResult};
use crate::repositories::{
    CollegeRepository, EventRegistrationRepository, EventRepository, EventUpdate, FestRepository,
    FestUpdate, PaymentRepository, UserRepository,
};

pub const DEFAULT_REJECT_REASON: &str = "No reason provided";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

/// Outcome of a moderation call. `reason` is only set for rejections.
#[derive(Debug, Clone)]
pub struct Moderated<T> {
    pub item: T,
    pub reason: Option<String>,
}

fn reject_reason(reason: Option<String>) -> String {
    reason
        .map(|r| r.trim().to_string())
        .filter(|r| !r.is_empty())
        .unwrap_or_else(|| DEFAULT_REJECT_REASON.to_string())
}

pub async fn pending_fests<C: ConnectionTrait>(db: &C) -> AppResult<Vec<fest::Model>> {
    Ok(FestRepository::new(db).find_pending().await?)
}

pub async fn pending_events<C: ConnectionTrait>(db: &C) -> AppResult<Vec<event::Model>> {
    Ok(EventRepository::new(db).find_pending().await?)
}

/// Approving publishes the fest; rejecting deactivates it and drops it from the pending queue.
pub async fn moderate_fest<C: ConnectionTrait>(
    db: &C,
    fest_id: Uuid,
    decision: Decision,
    reason: Option<String>,
) -> AppResult<Moderated<fest::Model>> {
    let fests = FestRepository::new(db);
    let fest = fests
        .find_by_id(fest_id)
        .await?
        .ok_or_else(|| AppError::not_found("Fest not found"))?;

    let (updates, reason) = match decision {
        Decision::Approve => (
            FestUpdate {
                approved: Some(true),
                ..Default::default()
            },
            None,
        ),
        Decision::Reject => (
            FestUpdate {
                active: Some(false),
                ..Default::default()
            },
            Some(reject_reason(reason)),
        ),
    };

    let fest = fests.update(fest, updates).await?;
    tracing::info!(fest_id = %fest.id, ?decision, reason = ?reason, "Fest moderated");
    Ok(Moderated { item: fest, reason })
}

pub async fn moderate_event<C: ConnectionTrait>(
    db: &C,
    event_id: Uuid,
    decision: Decision,
    reason: Option<String>,
) -> AppResult<Moderated<event::Model>> {
    let events = EventRepository::new(db);
    let event = events
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    let (updates, reason) = match decision {
        Decision::Approve => (
            EventUpdate {
                approved: Some(true),
                ..Default::default()
            },
            None,
        ),
        Decision::Reject => (
            EventUpdate {
                active: Some(false),
                ..Default::default()
            },
            Some(reject_reason(reason)),
        ),
    };

    let event = events.update(event, updates).await?;
    tracing::info!(event_id = %event.id, ?decision, reason = ?reason, "Event moderated");
    Ok(Moderated { item: event, reason })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdminStats {
    pub total_colleges: u64,
    pub total_students: u64,
    pub total_fests: u64,
    pub total_events: u64,
    pub total_registrations: u64,
    pub total_payments: u64,
    pub pending_fests: u64,
    pub pending_events: u64,
}

pub async fn admin_stats<C: ConnectionTrait>(db: &C) -> AppResult<AdminStats> {
    let fests = FestRepository::new(db);
    let events = EventRepository::new(db);

    Ok(AdminStats {
        total_colleges: CollegeRepository::new(db).count().await?,
        total_students: UserRepository::new(db)
            .count_by_role(RoleEnum::Student)
            .await?,
        total_fests: fests.count_all().await?,
        total_events: events.count_all().await?,
        total_registrations: EventRegistrationRepository::new(db).count_all().await?,
        total_payments: PaymentRepository::new(db).count().await?,
        pending_fests: fests.count_pending().await?,
        pending_events: events.count_pending().await?,
    })
}
