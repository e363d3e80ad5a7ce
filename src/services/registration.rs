use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::PaymentStatus;
use crate::entities::{event, event_registration, event_review, fest, student, team};
use crate::error::{AppError, AppResult, RegistrationError};
use crate::repositories::{
    CollegeRepository, EventRegistrationRepository, EventRepository, EventReviewRepository,
    FestRepository, RegistrationCreate, StudentRepository, TeamMemberRepository, TeamRepository,
    UserRepository,
};
use crate::services::notification::{
    Notifier, RegistrationMail, dispatch_best_effort, registration_confirmation,
};
use crate::utils::db::is_unique_violation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationType {
    Solo,
    Team,
}

impl RegistrationType {
    pub fn parse(value: &str) -> Result<Self, RegistrationError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "solo" => Ok(Self::Solo),
            "team" => Ok(Self::Team),
            _ => Err(RegistrationError::InvalidRegistrationType(value.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Solo => "solo",
            Self::Team => "team",
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterInput {
    pub event_id: Uuid,
    pub registration_type: String,
    pub team_id: Option<Uuid>,
    pub team_name: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegistrationOutcome {
    pub registration: event_registration::Model,
    pub registration_type: RegistrationType,
    pub event: event::Model,
    pub team: Option<team::Model>,
}

/// Registers `student` for an event.
///
/// Visibility, the open flag and the deadline are checked up front. The duplicate check, the
/// seat reservation and every insert share one transaction, so a failure at any step leaves
/// neither a seat taken nor a team membership behind.
pub async fn register_for_event(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    student: &student::Model,
    input: RegisterInput,
    today: NaiveDate,
) -> AppResult<RegistrationOutcome> {
    let event = EventRepository::new(db)
        .find_by_id(input.event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    if !event.is_public() {
        return Err(RegistrationError::EventUnavailable.into());
    }
    if !event.registration_open {
        return Err(RegistrationError::RegistrationClosed.into());
    }
    if today > event.registration_deadline {
        return Err(RegistrationError::DeadlinePassed.into());
    }

    let txn = db.begin().await?;
    let (registration, registration_type, team) =
        register_in_transaction(&txn, &event, student, &input).await?;
    txn.commit().await?;

    tracing::info!(
        registration_id = %registration.id,
        event_id = %event.id,
        student_id = %student.id,
        registration_type = registration_type.as_str(),
        "Registration created"
    );

    send_confirmation(db, notifier, student, &event, &registration, team.as_ref()).await;

    let event = EventRepository::new(db)
        .find_by_id(event.id)
        .await?
        .unwrap_or(event);

    Ok(RegistrationOutcome {
        registration,
        registration_type,
        event,
        team,
    })
}

async fn register_in_transaction(
    txn: &DatabaseTransaction,
    event: &event::Model,
    student: &student::Model,
    input: &RegisterInput,
) -> AppResult<(event_registration::Model, RegistrationType, Option<team::Model>)> {
    let registrations = EventRegistrationRepository::new(txn);

    if registrations
        .find_by_event_and_student(event.id, student.id)
        .await?
        .is_some()
    {
        return Err(RegistrationError::AlreadyRegistered.into());
    }

    if !EventRepository::new(txn).try_reserve_seat(event.id).await? {
        return Err(RegistrationError::EventFull.into());
    }

    let registration_type = RegistrationType::parse(&input.registration_type)?;
    let team = match registration_type {
        RegistrationType::Solo if event.team_is_allowed => {
            return Err(RegistrationError::TeamRequired.into());
        }
        RegistrationType::Team if !event.team_is_allowed => {
            return Err(RegistrationError::TeamNotAllowed.into());
        }
        RegistrationType::Solo => None,
        RegistrationType::Team => Some(join_or_create_team(txn, event, student, input).await?),
    };

    let payment_status = if event.is_free() {
        PaymentStatus::Paid
    } else {
        PaymentStatus::Pending
    };

    let registration = registrations
        .create(RegistrationCreate {
            event_id: event.id,
            student_id: student.id,
            team_id: team.as_ref().map(|t| t.id),
            payment_status,
            receipt_number: new_receipt_number(),
        })
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::from(RegistrationError::AlreadyRegistered)
            } else {
                AppError::from(e)
            }
        })?;

    Ok((registration, registration_type, team))
}

async fn join_or_create_team(
    txn: &DatabaseTransaction,
    event: &event::Model,
    student: &student::Model,
    input: &RegisterInput,
) -> AppResult<team::Model> {
    let members = TeamMemberRepository::new(txn);

    if let Some(team_id) = input.team_id {
        let team = TeamRepository::new(txn)
            .find_by_id(team_id)
            .await?
            .filter(|team| team.event_id == event.id)
            .ok_or(RegistrationError::TeamNotFound)?;

        if members.find(team.id, student.id).await?.is_some() {
            return Err(RegistrationError::AlreadyTeamMember.into());
        }
        members.add(team.id, student.id).await?;
        return Ok(team);
    }

    let name = input
        .team_name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .ok_or(RegistrationError::TeamNameRequired)?;

    let team = TeamRepository::new(txn)
        .create(event.id, name, student.id)
        .await?;
    members.add(team.id, student.id).await?;

    Ok(team)
}

fn new_receipt_number() -> String {
    format!("RCP-{}", Uuid::new_v4().simple().to_string().to_uppercase())
}

async fn send_confirmation(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    student: &student::Model,
    event: &event::Model,
    registration: &event_registration::Model,
    team: Option<&team::Model>,
) {
    let lookup = async {
        let user = UserRepository::new(db).find_by_id(student.user_id).await?;
        let college = CollegeRepository::new(db).find_by_id(event.college_id).await?;
        let fest = match event.fest_id {
            Some(fest_id) => FestRepository::new(db).find_by_id(fest_id).await?,
            None => None,
        };
        anyhow::Ok((user, college, fest))
    };

    let (user, college, fest) = match lookup.await {
        Ok((Some(user), Some(college), fest)) => (user, college, fest),
        Ok(_) => {
            tracing::warn!(registration_id = %registration.id, "Confirmation skipped, owner records missing");
            return;
        }
        Err(e) => {
            tracing::warn!(registration_id = %registration.id, "Confirmation skipped: {e:#}");
            return;
        }
    };

    let notification = registration_confirmation(RegistrationMail {
        student,
        student_email: &user.email,
        event,
        college: &college,
        fest: fest.as_ref(),
        registration,
        team,
    });
    dispatch_best_effort(notifier, notification).await;
}

/// Removes the caller's membership. The team and every registration stay as they are.
pub async fn leave_team(
    db: &DatabaseConnection,
    student: &student::Model,
    team_id: Uuid,
) -> AppResult<()> {
    TeamRepository::new(db)
        .find_by_id(team_id)
        .await?
        .ok_or(RegistrationError::TeamNotFound)?;

    let removed = TeamMemberRepository::new(db)
        .remove(team_id, student.id)
        .await?;
    if removed == 0 {
        return Err(AppError::forbidden("You are not a member of this team"));
    }

    tracing::info!(team_id = %team_id, student_id = %student.id, "Student left team");
    Ok(())
}

pub async fn teams_for_event(db: &DatabaseConnection, event_id: Uuid) -> AppResult<Vec<team::Model>> {
    EventRepository::new(db)
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;

    Ok(TeamRepository::new(db).find_by_event(event_id).await?)
}

pub async fn teams_of_student(
    db: &DatabaseConnection,
    student: &student::Model,
) -> AppResult<Vec<team::Model>> {
    let team_ids = TeamMemberRepository::new(db)
        .find_by_student(student.id)
        .await?
        .into_iter()
        .map(|membership| membership.team_id)
        .collect();

    Ok(TeamRepository::new(db).find_by_ids(team_ids).await?)
}

pub async fn team_members(
    db: &DatabaseConnection,
    team_id: Uuid,
) -> AppResult<(team::Model, Vec<student::Model>)> {
    let team = TeamRepository::new(db)
        .find_by_id(team_id)
        .await?
        .ok_or(RegistrationError::TeamNotFound)?;

    let student_ids = TeamMemberRepository::new(db)
        .find_by_team(team.id)
        .await?
        .into_iter()
        .map(|membership| membership.student_id)
        .collect();
    let students = StudentRepository::new(db).find_by_ids(student_ids).await?;

    Ok((team, students))
}

#[derive(Debug, Clone)]
pub struct MyRegistration {
    pub registration: event_registration::Model,
    pub event: event::Model,
    pub fest: Option<fest::Model>,
    pub team: Option<team::Model>,
    pub review: Option<event_review::Model>,
    pub can_review: bool,
}

pub async fn my_registrations(
    db: &DatabaseConnection,
    student: &student::Model,
    today: NaiveDate,
) -> AppResult<Vec<MyRegistration>> {
    let registrations = EventRegistrationRepository::new(db)
        .find_by_student(student.id)
        .await?;

    let event_ids: Vec<Uuid> = registrations.iter().map(|r| r.event_id).collect();
    let events: HashMap<Uuid, event::Model> = EventRepository::new(db)
        .find_by_ids(event_ids)
        .await?
        .into_iter()
        .map(|e| (e.id, e))
        .collect();

    let fest_ids: Vec<Uuid> = events
        .values()
        .filter_map(|e| e.fest_id)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let fests: HashMap<Uuid, fest::Model> = FestRepository::new(db)
        .find_by_ids(fest_ids)
        .await?
        .into_iter()
        .map(|f| (f.id, f))
        .collect();

    let team_ids: Vec<Uuid> = registrations.iter().filter_map(|r| r.team_id).collect();
    let teams: HashMap<Uuid, team::Model> = TeamRepository::new(db)
        .find_by_ids(team_ids)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    let reviews: HashMap<Uuid, event_review::Model> = EventReviewRepository::new(db)
        .find_by_student(student.id)
        .await?
        .into_iter()
        .map(|r| (r.event_id, r))
        .collect();

    let mut result = Vec::with_capacity(registrations.len());
    for registration in registrations {
        let Some(event) = events.get(&registration.event_id).cloned() else {
            continue;
        };
        let review = reviews.get(&event.id).cloned();
        let can_review = review.is_none()
            && event.event_date <= today
            && registration.is_settled(event.fees);

        result.push(MyRegistration {
            fest: event.fest_id.and_then(|id| fests.get(&id).cloned()),
            team: registration.team_id.and_then(|id| teams.get(&id).cloned()),
            registration,
            event,
            review,
            can_review,
        });
    }

    Ok(result)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentDashboardStats {
    pub total_events: u64,
    pub total_paid: u64,
    pub reviews_given: u64,
    pub upcoming_events: u64,
    pub past_events: u64,
}

pub async fn student_dashboard_stats(
    db: &DatabaseConnection,
    student: &student::Model,
    today: NaiveDate,
) -> AppResult<StudentDashboardStats> {
    let registrations = EventRegistrationRepository::new(db)
        .find_by_student(student.id)
        .await?;
    let events = EventRepository::new(db)
        .find_by_ids(registrations.iter().map(|r| r.event_id).collect())
        .await?;
    let reviews_given = EventReviewRepository::new(db)
        .count_by_student(student.id)
        .await?;

    Ok(StudentDashboardStats {
        total_events: registrations.len() as u64,
        total_paid: registrations
            .iter()
            .filter(|r| r.payment_status == PaymentStatus::Paid)
            .count() as u64,
        reviews_given,
        upcoming_events: events.iter().filter(|e| e.event_date > today).count() as u64,
        past_events: events.iter().filter(|e| e.event_date < today).count() as u64,
    })
}
