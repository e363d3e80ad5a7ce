use crate::entities::event_registration::{self, STATUS_REGISTERED};
use crate::entities::sea_orm_active_enums::PaymentStatus;
use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct RegistrationCreate {
    pub event_id: Uuid,
    pub student_id: Uuid,
    pub team_id: Option<Uuid>,
    pub payment_status: PaymentStatus,
    pub receipt_number: String,
}

pub struct EventRegistrationRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventRegistrationRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(
        &self,
        registration_id: Uuid,
    ) -> Result<Option<event_registration::Model>> {
        let registration = event_registration::Entity::find_by_id(registration_id)
            .one(self.db)
            .await?;
        Ok(registration)
    }

    pub async fn find_by_event_and_student(
        &self,
        event_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<event_registration::Model>> {
        let registration = event_registration::Entity::find()
            .filter(event_registration::Column::EventId.eq(event_id))
            .filter(event_registration::Column::StudentId.eq(student_id))
            .one(self.db)
            .await?;
        Ok(registration)
    }

    pub async fn find_by_event(&self, event_id: Uuid) -> Result<Vec<event_registration::Model>> {
        let registrations = event_registration::Entity::find()
            .filter(event_registration::Column::EventId.eq(event_id))
            .order_by_asc(event_registration::Column::RegisteredAt)
            .all(self.db)
            .await?;
        Ok(registrations)
    }

    pub async fn find_by_events(
        &self,
        event_ids: Vec<Uuid>,
    ) -> Result<Vec<event_registration::Model>> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let registrations = event_registration::Entity::find()
            .filter(event_registration::Column::EventId.is_in(event_ids))
            .order_by_asc(event_registration::Column::RegisteredAt)
            .all(self.db)
            .await?;
        Ok(registrations)
    }

    pub async fn find_by_student(
        &self,
        student_id: Uuid,
    ) -> Result<Vec<event_registration::Model>> {
        let registrations = event_registration::Entity::find()
            .filter(event_registration::Column::StudentId.eq(student_id))
            .order_by_desc(event_registration::Column::RegisteredAt)
            .all(self.db)
            .await?;
        Ok(registrations)
    }

    pub async fn count_by_event(&self, event_id: Uuid) -> Result<u64> {
        let count = event_registration::Entity::find()
            .filter(event_registration::Column::EventId.eq(event_id))
            .count(self.db)
            .await?;
        Ok(count)
    }

    pub async fn count_all(&self) -> Result<u64> {
        let count = event_registration::Entity::find().count(self.db).await?;
        Ok(count)
    }

    pub async fn create(&self, input: RegistrationCreate) -> Result<event_registration::Model> {
        let registration_model = event_registration::ActiveModel {
            id: Set(Uuid::new_v4()),
            event_id: Set(input.event_id),
            student_id: Set(input.student_id),
            team_id: Set(input.team_id),
            registered_at: Set(Utc::now().naive_utc()),
            status: Set(STATUS_REGISTERED.to_string()),
            payment_status: Set(input.payment_status),
            certificate_approved: Set(false),
            receipt_number: Set(input.receipt_number),
        };

        let result = registration_model.insert(self.db).await?;
        Ok(result)
    }

    pub async fn set_payment_status(
        &self,
        registration: event_registration::Model,
        status: PaymentStatus,
    ) -> Result<event_registration::Model> {
        let mut active_model: event_registration::ActiveModel = registration.into();
        active_model.payment_status = Set(status);
        let result = active_model.update(self.db).await?;
        Ok(result)
    }

    /// Flags certificates as approved for registrations of `event_id`.
    /// `only` narrows the update to the given registration ids.
    pub async fn approve_certificates(
        &self,
        event_id: Uuid,
        only: Option<Vec<Uuid>>,
    ) -> Result<u64> {
        let mut update = event_registration::Entity::update_many()
            .col_expr(
                event_registration::Column::CertificateApproved,
                Expr::value(true),
            )
            .filter(event_registration::Column::EventId.eq(event_id));

        if let Some(ids) = only {
            if ids.is_empty() {
                return Ok(0);
            }
            update = update.filter(event_registration::Column::Id.is_in(ids));
        }

        let result = update.exec(self.db).await?;
        Ok(result.rows_affected)
    }
}
