use crate::entities::payment;
use crate::entities::sea_orm_active_enums::PaymentStatus;
use anyhow::Result;
use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PaymentCreate {
    pub registration_id: Uuid,
    pub college_id: Uuid,
    pub gateway_order_id: String,
    pub amount: i32,
    pub currency: String,
    pub receipt_email: Option<String>,
}

pub struct PaymentRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PaymentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_order_id(&self, order_id: &str) -> Result<Option<payment::Model>> {
        let payment = payment::Entity::find()
            .filter(payment::Column::GatewayOrderId.eq(order_id))
            .one(self.db)
            .await?;
        Ok(payment)
    }

    pub async fn find_by_registration(&self, registration_id: Uuid) -> Result<Vec<payment::Model>> {
        let payments = payment::Entity::find()
            .filter(payment::Column::RegistrationId.eq(registration_id))
            .order_by_desc(payment::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(payments)
    }

    pub async fn find_paid_by_college(&self, college_id: Uuid) -> Result<Vec<payment::Model>> {
        let payments = payment::Entity::find()
            .filter(payment::Column::CollegeId.eq(college_id))
            .filter(payment::Column::Status.eq(PaymentStatus::Paid))
            .order_by_asc(payment::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(payments)
    }

    pub async fn count(&self) -> Result<u64> {
        let count = payment::Entity::find().count(self.db).await?;
        Ok(count)
    }

    pub async fn create(&self, input: PaymentCreate) -> Result<payment::Model> {
        let now = Utc::now().naive_utc();
        let payment_model = payment::ActiveModel {
            id: Set(Uuid::new_v4()),
            registration_id: Set(input.registration_id),
            college_id: Set(input.college_id),
            gateway_order_id: Set(input.gateway_order_id),
            status: Set(PaymentStatus::Pending),
            amount: Set(input.amount),
            currency: Set(input.currency),
            gateway_payment_id: Set(None),
            receipt_email: Set(input.receipt_email),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = payment_model.insert(self.db).await?;
        Ok(result)
    }

    /// Overwrites status and gateway payment id only when either differs from what is stored.
    /// Returns false when the row already holds these values, so a replay changes nothing.
    pub async fn apply_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
        gateway_payment_id: Option<String>,
    ) -> Result<bool> {
        let payment_id_differs = match &gateway_payment_id {
            Some(id) => Condition::any()
                .add(payment::Column::GatewayPaymentId.is_null())
                .add(payment::Column::GatewayPaymentId.ne(id.clone())),
            None => Condition::all().add(payment::Column::GatewayPaymentId.is_not_null()),
        };

        let result = payment::Entity::update_many()
            .col_expr(payment::Column::Status, Expr::value(status))
            .col_expr(
                payment::Column::GatewayPaymentId,
                Expr::value(gateway_payment_id),
            )
            .col_expr(payment::Column::UpdatedAt, Expr::value(Utc::now().naive_utc()))
            .filter(payment::Column::Id.eq(payment_id))
            .filter(
                Condition::any()
                    .add(payment::Column::Status.ne(status))
                    .add(payment_id_differs),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<payment::Model>> {
        let payment = payment::Entity::find_by_id(id).one(self.db).await?;
        Ok(payment)
    }
}
