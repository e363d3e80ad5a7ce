use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::PaymentStatus;
use crate::entities::{college, event, event_registration, event_review, fest, payment, student, team};
use crate::error::{AppError, AppResult};
use crate::repositories::{
    EventRegistrationRepository, EventRepository, EventReviewRepository, FestRepository,
    PaymentRepository, StudentRepository, TeamRepository, UserRepository,
};
use crate::services::catalog::owned_event;
use crate::services::review::RatingSummary;

/// Everything a college dashboard aggregates over, loaded once per request.
#[derive(Debug, Clone, Default)]
pub struct DashboardData {
    pub events: Vec<event::Model>,
    pub fests: Vec<fest::Model>,
    pub registrations: Vec<event_registration::Model>,
    pub paid_payments: Vec<payment::Model>,
    pub reviews: Vec<event_review::Model>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollegeStats {
    pub total_events: usize,
    pub total_registrations: usize,
    pub total_paid: usize,
    pub total_reviews: usize,
    pub total_revenue: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventAmount {
    pub event_id: Uuid,
    pub event_name: String,
    pub amount: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Earnings {
    pub total_earnings: i64,
    pub breakdown: Vec<EventAmount>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRegistrationCounts {
    pub event_id: Uuid,
    pub event_name: String,
    pub total: usize,
    pub paid: usize,
    pub unpaid: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationStats {
    pub total_registrations: usize,
    pub paid_registrations: usize,
    pub unpaid_registrations: usize,
    pub event_wise: Vec<EventRegistrationCounts>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FestTotals {
    pub fest_id: Uuid,
    pub fest_name: String,
    pub registrations: usize,
    pub earnings: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTotals {
    pub date: NaiveDate,
    pub registrations: usize,
    pub earnings: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventTotals {
    pub event_id: Uuid,
    pub event_name: String,
    pub registrations: usize,
    pub earnings: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopEvents {
    pub top_by_registrations: Vec<EventTotals>,
    pub top_by_earnings: Vec<EventTotals>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EventDashboardRow {
    pub event_id: Uuid,
    pub event_name: String,
    pub event_date: NaiveDate,
    pub total_registrations: usize,
    pub paid_registrations: usize,
    pub review_count: usize,
    pub average_rating: f64,
}

impl DashboardData {
    pub async fn load<C: ConnectionTrait>(db: &C, college: &college::Model) -> AppResult<Self> {
        let events = EventRepository::new(db).find_by_college(college.id).await?;
        let fests = FestRepository::new(db).find_by_college(college.id).await?;
        let event_ids: Vec<Uuid> = events.iter().map(|e| e.id).collect();
        let registrations = EventRegistrationRepository::new(db)
            .find_by_events(event_ids.clone())
            .await?;
        let paid_payments = PaymentRepository::new(db)
            .find_paid_by_college(college.id)
            .await?;
        let reviews = EventReviewRepository::new(db).find_by_events(event_ids).await?;

        Ok(Self {
            events,
            fests,
            registrations,
            paid_payments,
            reviews,
        })
    }

    fn registrations_of(&self, event_id: Uuid) -> impl Iterator<Item = &event_registration::Model> {
        self.registrations
            .iter()
            .filter(move |r| r.event_id == event_id)
    }

    /// Paid amounts summed per event, via each payment's registration.
    fn earnings_by_event(&self) -> HashMap<Uuid, i64> {
        let event_of_registration: HashMap<Uuid, Uuid> = self
            .registrations
            .iter()
            .map(|r| (r.id, r.event_id))
            .collect();

        let mut earnings = HashMap::new();
        for payment in &self.paid_payments {
            if let Some(event_id) = event_of_registration.get(&payment.registration_id) {
                *earnings.entry(*event_id).or_insert(0) += i64::from(payment.amount);
            }
        }
        earnings
    }

    fn event_totals(&self) -> Vec<EventTotals> {
        let earnings = self.earnings_by_event();
        self.events
            .iter()
            .map(|event| EventTotals {
                event_id: event.id,
                event_name: event.name.clone(),
                registrations: self.registrations_of(event.id).count(),
                earnings: earnings.get(&event.id).copied().unwrap_or(0),
            })
            .collect()
    }

    pub fn stats(&self) -> CollegeStats {
        CollegeStats {
            total_events: self.events.len(),
            total_registrations: self.registrations.len(),
            total_paid: self
                .registrations
                .iter()
                .filter(|r| r.payment_status == PaymentStatus::Paid)
                .count(),
            total_reviews: self.reviews.len(),
            total_revenue: self.earnings_by_event().values().sum(),
        }
    }

    pub fn earnings(&self) -> Earnings {
        let breakdown: Vec<EventAmount> = self
            .event_totals()
            .into_iter()
            .map(|totals| EventAmount {
                event_id: totals.event_id,
                event_name: totals.event_name,
                amount: totals.earnings,
            })
            .collect();

        Earnings {
            total_earnings: breakdown.iter().map(|b| b.amount).sum(),
            breakdown,
        }
    }

    pub fn registration_stats(&self) -> RegistrationStats {
        let event_wise: Vec<EventRegistrationCounts> = self
            .events
            .iter()
            .map(|event| {
                let total = self.registrations_of(event.id).count();
                let paid = self
                    .registrations_of(event.id)
                    .filter(|r| r.payment_status == PaymentStatus::Paid)
                    .count();
                EventRegistrationCounts {
                    event_id: event.id,
                    event_name: event.name.clone(),
                    total,
                    paid,
                    unpaid: total - paid,
                }
            })
            .collect();

        let paid_registrations = event_wise.iter().map(|e| e.paid).sum();
        RegistrationStats {
            total_registrations: self.registrations.len(),
            paid_registrations,
            unpaid_registrations: self.registrations.len() - paid_registrations,
            event_wise,
        }
    }

    pub fn by_fest(&self) -> Vec<FestTotals> {
        let totals = self.event_totals();
        let fest_of_event: HashMap<Uuid, Uuid> = self
            .events
            .iter()
            .filter_map(|e| e.fest_id.map(|fest_id| (e.id, fest_id)))
            .collect();

        self.fests
            .iter()
            .map(|fest| {
                let in_fest = totals
                    .iter()
                    .filter(|t| fest_of_event.get(&t.event_id) == Some(&fest.id));
                let (registrations, earnings) = in_fest
                    .fold((0, 0), |(r, e), t| (r + t.registrations, e + t.earnings));
                FestTotals {
                    fest_id: fest.id,
                    fest_name: fest.name.clone(),
                    registrations,
                    earnings,
                }
            })
            .collect()
    }

    pub fn by_date(&self) -> Vec<DateTotals> {
        let totals = self.event_totals();
        let mut per_date: BTreeMap<NaiveDate, (usize, i64)> = BTreeMap::new();

        for (event, totals) in self.events.iter().zip(totals) {
            let entry = per_date.entry(event.event_date).or_default();
            entry.0 += totals.registrations;
            entry.1 += totals.earnings;
        }

        per_date
            .into_iter()
            .map(|(date, (registrations, earnings))| DateTotals {
                date,
                registrations,
                earnings,
            })
            .collect()
    }

    pub fn top_events(&self, limit: usize) -> TopEvents {
        let totals = self.event_totals();

        let mut top_by_registrations = totals.clone();
        top_by_registrations.sort_by(|a, b| b.registrations.cmp(&a.registrations));
        top_by_registrations.truncate(limit);

        let mut top_by_earnings = totals;
        top_by_earnings.sort_by(|a, b| b.earnings.cmp(&a.earnings));
        top_by_earnings.truncate(limit);

        TopEvents {
            top_by_registrations,
            top_by_earnings,
        }
    }

    pub fn event_rows(&self) -> Vec<EventDashboardRow> {
        self.events
            .iter()
            .map(|event| {
                let reviews: Vec<event_review::Model> = self
                    .reviews
                    .iter()
                    .filter(|r| r.event_id == event.id)
                    .cloned()
                    .collect();
                let rating = RatingSummary::of(&reviews);

                EventDashboardRow {
                    event_id: event.id,
                    event_name: event.name.clone(),
                    event_date: event.event_date,
                    total_registrations: self.registrations_of(event.id).count(),
                    paid_registrations: self
                        .registrations_of(event.id)
                        .filter(|r| r.payment_status == PaymentStatus::Paid)
                        .count(),
                    review_count: rating.review_count,
                    average_rating: rating.average_rating,
                }
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
pub struct RegistrationRow {
    pub registration: event_registration::Model,
    pub student: Option<student::Model>,
    pub student_email: Option<String>,
    pub team: Option<team::Model>,
    pub is_team_creator: bool,
}

#[derive(Debug, Clone)]
pub struct EventRegistrations {
    pub event: event::Model,
    pub rows: Vec<RegistrationRow>,
}

impl EventRegistrations {
    pub fn available_slots(&self) -> i32 {
        self.event.available_slots()
    }
}

pub async fn event_registrations<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    event_id: Uuid,
) -> AppResult<EventRegistrations> {
    let event = owned_event(db, college, event_id).await?;
    let registrations = EventRegistrationRepository::new(db)
        .find_by_event(event.id)
        .await?;

    let students: HashMap<Uuid, student::Model> = StudentRepository::new(db)
        .find_by_ids(registrations.iter().map(|r| r.student_id).collect())
        .await?
        .into_iter()
        .map(|s| (s.id, s))
        .collect();
    let emails: HashMap<Uuid, String> = UserRepository::new(db)
        .find_by_ids(students.values().map(|s| s.user_id).collect())
        .await?
        .into_iter()
        .map(|u| (u.id, u.email))
        .collect();
    let teams: HashMap<Uuid, team::Model> = TeamRepository::new(db)
        .find_by_ids(registrations.iter().filter_map(|r| r.team_id).collect())
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect();

    let rows = registrations
        .into_iter()
        .map(|registration| {
            let student = students.get(&registration.student_id).cloned();
            let student_email = student
                .as_ref()
                .and_then(|s| emails.get(&s.user_id).cloned());
            let team = registration.team_id.and_then(|id| teams.get(&id).cloned());
            let is_team_creator = team
                .as_ref()
                .map(|t| t.creator_id == registration.student_id)
                .unwrap_or(false);

            RegistrationRow {
                registration,
                student,
                student_email,
                team,
                is_team_creator,
            }
        })
        .collect();

    Ok(EventRegistrations { event, rows })
}

pub async fn approve_certificate<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    event_id: Uuid,
    registration_id: Uuid,
) -> AppResult<()> {
    let event = owned_event(db, college, event_id).await?;
    let registrations = EventRegistrationRepository::new(db);

    registrations
        .find_by_id(registration_id)
        .await?
        .filter(|r| r.event_id == event.id)
        .ok_or_else(|| AppError::not_found("Registration not found for this event"))?;

    registrations
        .approve_certificates(event.id, Some(vec![registration_id]))
        .await?;
    tracing::info!(event_id = %event.id, registration_id = %registration_id, "Certificate approved");
    Ok(())
}

/// Approves every registration of the event, or only `registration_ids` when given.
/// Ids belonging to other events are ignored. Returns how many were approved.
pub async fn approve_certificates<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    event_id: Uuid,
    registration_ids: Option<Vec<Uuid>>,
) -> AppResult<u64> {
    let event = owned_event(db, college, event_id).await?;
    let approved = EventRegistrationRepository::new(db)
        .approve_certificates(event.id, registration_ids)
        .await?;

    tracing::info!(event_id = %event.id, approved, "Certificates approved");
    Ok(approved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn event(name: &str, fest_id: Option<Uuid>, date: NaiveDate) -> event::Model {
        let now = Utc::now().naive_utc();
        event::Model {
            id: Uuid::new_v4(),
            college_id: Uuid::nil(),
            fest_id,
            name: name.to_string(),
            description: String::new(),
            event_date: date,
            location: "Hall A".to_string(),
            fees: 100,
            capacity: 50,
            registered_count: 0,
            team_is_allowed: false,
            category: None,
            mode: None,
            poster_url: None,
            poster_thumbnail_url: None,
            poster_approved: false,
            approved: true,
            active: true,
            cash_prize: None,
            first_prize: None,
            second_prize: None,
            third_prize: None,
            city: None,
            state: None,
            country: None,
            event_website: None,
            contact_phone: None,
            organizer_name: None,
            organizer_email: None,
            organizer_phone: None,
            rules: None,
            requirements: None,
            registration_deadline: date,
            registration_open: true,
            created_at: now,
            updated_at: now,
        }
    }

    fn registration(event_id: Uuid, status: PaymentStatus) -> event_registration::Model {
        event_registration::Model {
            id: Uuid::new_v4(),
            event_id,
            student_id: Uuid::new_v4(),
            team_id: None,
            registered_at: Utc::now().naive_utc(),
            status: event_registration::STATUS_REGISTERED.to_string(),
            payment_status: status,
            certificate_approved: false,
            receipt_number: "RCP-TEST".to_string(),
        }
    }

    fn paid(registration: &event_registration::Model, amount: i32) -> payment::Model {
        let now = Utc::now().naive_utc();
        payment::Model {
            id: Uuid::new_v4(),
            registration_id: registration.id,
            college_id: Uuid::nil(),
            gateway_order_id: format!("order_{}", registration.id.simple()),
            status: PaymentStatus::Paid,
            amount,
            currency: "INR".to_string(),
            gateway_payment_id: Some("pay_1".to_string()),
            receipt_email: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn sample() -> DashboardData {
        let day = NaiveDate::from_ymd_opt(2025, 1, 12).unwrap();
        let fest_id = Uuid::new_v4();
        let now = Utc::now().naive_utc();
        let fest = fest::Model {
            id: fest_id,
            college_id: Uuid::nil(),
            name: "TechNova".to_string(),
            description: None,
            start_date: day,
            end_date: day,
            approved: true,
            active: true,
            image_url: None,
            thumbnail_url: None,
            city: None,
            state: None,
            country: None,
            mode: None,
            website: None,
            contact_phone: None,
            created_at: now,
            updated_at: now,
        };

        let hack = event("Hackathon", Some(fest_id), day);
        let quiz = event("Quiz", None, day);
        let r1 = registration(hack.id, PaymentStatus::Paid);
        let r2 = registration(hack.id, PaymentStatus::Pending);
        let r3 = registration(quiz.id, PaymentStatus::Paid);
        let paid_payments = vec![paid(&r1, 200), paid(&r3, 50)];

        DashboardData {
            events: vec![hack, quiz],
            fests: vec![fest],
            registrations: vec![r1, r2, r3],
            paid_payments,
            reviews: Vec::new(),
        }
    }

    #[test]
    fn test_stats_and_earnings() {
        let data = sample();
        let stats = data.stats();
        assert_eq!(stats.total_events, 2);
        assert_eq!(stats.total_registrations, 3);
        assert_eq!(stats.total_paid, 2);
        assert_eq!(stats.total_revenue, 250);

        let earnings = data.earnings();
        assert_eq!(earnings.total_earnings, 250);
        assert_eq!(earnings.breakdown[0].amount, 200);
    }

    #[test]
    fn test_registration_and_fest_breakdown() {
        let data = sample();
        let stats = data.registration_stats();
        assert_eq!(stats.unpaid_registrations, 1);
        assert_eq!(stats.event_wise[0].total, 2);
        assert_eq!(stats.event_wise[0].unpaid, 1);

        let by_fest = data.by_fest();
        assert_eq!(by_fest.len(), 1);
        assert_eq!(by_fest[0].registrations, 2);
        assert_eq!(by_fest[0].earnings, 200);

        let by_date = data.by_date();
        assert_eq!(by_date.len(), 1);
        assert_eq!(by_date[0].registrations, 3);
    }

    #[test]
    fn test_top_events_ordering() {
        let top = sample().top_events(1);
        assert_eq!(top.top_by_registrations.len(), 1);
        assert_eq!(top.top_by_registrations[0].event_name, "Hackathon");
        assert_eq!(top.top_by_earnings[0].earnings, 200);
    }
}
