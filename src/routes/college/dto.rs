use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::college;
use crate::entities::sea_orm_active_enums::PaymentStatus;
use crate::repositories::PaymentConfigUpdate;
use crate::routes::student::dto::TeamResponse;
use crate::services::dashboard::{
    CollegeStats, DateTotals, Earnings, EventDashboardRow, EventRegistrationCounts,
    EventRegistrations, EventTotals, FestTotals, RegistrationRow, RegistrationStats, TopEvents,
};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfigRequest {
    #[schema(example = "acc_N2bXc8kTq1")]
    pub razorpay_account_id: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_ifsc_code: Option<String>,
    pub bank_account_holder_name: Option<String>,
    pub contact_email: Option<String>,
}

impl From<PaymentConfigRequest> for PaymentConfigUpdate {
    fn from(request: PaymentConfigRequest) -> Self {
        PaymentConfigUpdate {
            razorpay_account_id: request.razorpay_account_id.map(|id| id.trim().to_string()),
            bank_account_number: request.bank_account_number,
            bank_ifsc_code: request.bank_ifsc_code,
            bank_account_holder_name: request.bank_account_holder_name,
            contact_email: request.contact_email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentConfigResponse {
    pub college_id: Uuid,
    pub razorpay_account_id: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_ifsc_code: Option<String>,
    pub bank_account_holder_name: Option<String>,
    pub contact_email: Option<String>,
    pub is_configured: bool,
}

impl From<college::Model> for PaymentConfigResponse {
    fn from(college: college::Model) -> Self {
        PaymentConfigResponse {
            college_id: college.id,
            is_configured: college.payee_account().is_some(),
            razorpay_account_id: college.razorpay_account_id,
            bank_account_number: college.bank_account_number,
            bank_ifsc_code: college.bank_ifsc_code,
            bank_account_holder_name: college.bank_account_holder_name,
            contact_email: college.contact_email,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CollegeStatsResponse {
    pub total_events: usize,
    pub total_registrations: usize,
    pub total_paid: usize,
    pub total_reviews: usize,
    pub total_revenue: i64,
}

impl From<CollegeStats> for CollegeStatsResponse {
    fn from(stats: CollegeStats) -> Self {
        CollegeStatsResponse {
            total_events: stats.total_events,
            total_registrations: stats.total_registrations,
            total_paid: stats.total_paid,
            total_reviews: stats.total_reviews,
            total_revenue: stats.total_revenue,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventEarningResponse {
    pub event_id: Uuid,
    pub event_name: String,
    pub amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EarningsResponse {
    pub total_earnings: i64,
    pub breakdown: Vec<EventEarningResponse>,
}

impl From<Earnings> for EarningsResponse {
    fn from(earnings: Earnings) -> Self {
        EarningsResponse {
            total_earnings: earnings.total_earnings,
            breakdown: earnings
                .breakdown
                .into_iter()
                .map(|item| EventEarningResponse {
                    event_id: item.event_id,
                    event_name: item.event_name,
                    amount: item.amount,
                })
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistrationCountsResponse {
    pub event_id: Uuid,
    pub event_name: String,
    pub total: usize,
    pub paid: usize,
    pub unpaid: usize,
}

impl From<EventRegistrationCounts> for EventRegistrationCountsResponse {
    fn from(counts: EventRegistrationCounts) -> Self {
        EventRegistrationCountsResponse {
            event_id: counts.event_id,
            event_name: counts.event_name,
            total: counts.total,
            paid: counts.paid,
            unpaid: counts.unpaid,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatsResponse {
    pub total_registrations: usize,
    pub paid_registrations: usize,
    pub unpaid_registrations: usize,
    pub event_wise: Vec<EventRegistrationCountsResponse>,
}

impl From<RegistrationStats> for RegistrationStatsResponse {
    fn from(stats: RegistrationStats) -> Self {
        RegistrationStatsResponse {
            total_registrations: stats.total_registrations,
            paid_registrations: stats.paid_registrations,
            unpaid_registrations: stats.unpaid_registrations,
            event_wise: stats.event_wise.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FestTotalsResponse {
    pub fest_id: Uuid,
    pub fest_name: String,
    pub registrations: usize,
    pub earnings: i64,
}

impl From<FestTotals> for FestTotalsResponse {
    fn from(totals: FestTotals) -> Self {
        FestTotalsResponse {
            fest_id: totals.fest_id,
            fest_name: totals.fest_name,
            registrations: totals.registrations,
            earnings: totals.earnings,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DateTotalsResponse {
    #[schema(value_type = String, example = "2025-01-15")]
    pub date: NaiveDate,
    pub registrations: usize,
    pub earnings: i64,
}

impl From<DateTotals> for DateTotalsResponse {
    fn from(totals: DateTotals) -> Self {
        DateTotalsResponse {
            date: totals.date,
            registrations: totals.registrations,
            earnings: totals.earnings,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventTotalsResponse {
    pub event_id: Uuid,
    pub event_name: String,
    pub registrations: usize,
    pub earnings: i64,
}

impl From<EventTotals> for EventTotalsResponse {
    fn from(totals: EventTotals) -> Self {
        EventTotalsResponse {
            event_id: totals.event_id,
            event_name: totals.event_name,
            registrations: totals.registrations,
            earnings: totals.earnings,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TopEventsResponse {
    pub top_by_registrations: Vec<EventTotalsResponse>,
    pub top_by_earnings: Vec<EventTotalsResponse>,
}

impl From<TopEvents> for TopEventsResponse {
    fn from(top: TopEvents) -> Self {
        TopEventsResponse {
            top_by_registrations: top.top_by_registrations.into_iter().map(Into::into).collect(),
            top_by_earnings: top.top_by_earnings.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventDashboardResponse {
    pub event_id: Uuid,
    pub event_name: String,
    #[schema(value_type = String, example = "2025-01-15")]
    pub event_date: NaiveDate,
    pub total_registrations: usize,
    pub paid_registrations: usize,
    pub review_count: usize,
    pub average_rating: f64,
}

impl From<EventDashboardRow> for EventDashboardResponse {
    fn from(row: EventDashboardRow) -> Self {
        EventDashboardResponse {
            event_id: row.event_id,
            event_name: row.event_name,
            event_date: row.event_date,
            total_registrations: row.total_registrations,
            paid_registrations: row.paid_registrations,
            review_count: row.review_count,
            average_rating: row.average_rating,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrantResponse {
    pub registration_id: Uuid,
    pub student_id: Uuid,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub payment_status: PaymentStatus,
    pub certificate_approved: bool,
    pub receipt_number: String,
    #[schema(value_type = String)]
    pub registered_at: NaiveDateTime,
    pub team: Option<TeamResponse>,
    pub is_team_creator: bool,
}

impl From<RegistrationRow> for RegistrantResponse {
    fn from(row: RegistrationRow) -> Self {
        RegistrantResponse {
            registration_id: row.registration.id,
            student_id: row.registration.student_id,
            student_name: row.student.map(|s| s.name),
            student_email: row.student_email,
            payment_status: row.registration.payment_status,
            certificate_approved: row.registration.certificate_approved,
            receipt_number: row.registration.receipt_number,
            registered_at: row.registration.registered_at,
            team: row.team.map(Into::into),
            is_team_creator: row.is_team_creator,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EventRegistrationsResponse {
    pub event_id: Uuid,
    pub event_name: String,
    pub capacity: i32,
    pub available_slots: i32,
    pub registrations: Vec<RegistrantResponse>,
}

impl From<EventRegistrations> for EventRegistrationsResponse {
    fn from(list: EventRegistrations) -> Self {
        EventRegistrationsResponse {
            available_slots: list.available_slots(),
            event_id: list.event.id,
            event_name: list.event.name,
            capacity: list.event.capacity,
            registrations: list.rows.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveCertificatesRequest {
    pub registration_ids: Vec<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApprovedCertificatesResponse {
    pub message: String,
    pub approved_count: u64,
}

impl ApprovedCertificatesResponse {
    pub fn new(approved_count: u64) -> Self {
        ApprovedCertificatesResponse {
            message: format!("Approved {approved_count} certificate(s)"),
            approved_count,
        }
    }
}
