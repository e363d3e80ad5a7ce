use crate::entities::college;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct CollegeCreate {
    pub user_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
}

/// Payout settings. `None` leaves a field untouched.
#[derive(Debug, Default)]
pub struct PaymentConfigUpdate {
    pub razorpay_account_id: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_ifsc_code: Option<String>,
    pub bank_account_holder_name: Option<String>,
    pub contact_email: Option<String>,
}

pub struct CollegeRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> CollegeRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, college_id: Uuid) -> Result<Option<college::Model>> {
        let college = college::Entity::find_by_id(college_id).one(self.db).await?;
        Ok(college)
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<college::Model>> {
        let college = college::Entity::find()
            .filter(college::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;
        Ok(college)
    }

    pub async fn find_all(&self) -> Result<Vec<college::Model>> {
        let colleges = college::Entity::find()
            .order_by_asc(college::Column::Name)
            .all(self.db)
            .await?;
        Ok(colleges)
    }

    pub async fn create(&self, input: CollegeCreate) -> Result<college::Model> {
        let college_model = college::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(input.user_id),
            name: Set(input.name),
            description: Set(input.description),
            address: Set(input.address),
            razorpay_account_id: Set(None),
            bank_account_number: Set(None),
            bank_ifsc_code: Set(None),
            bank_account_holder_name: Set(None),
            contact_email: Set(input.contact_email),
            created_at: Set(Utc::now().naive_utc()),
        };

        let result = college_model.insert(self.db).await?;
        Ok(result)
    }

    pub async fn update_payment_config(
        &self,
        college: college::Model,
        updates: PaymentConfigUpdate,
    ) -> Result<college::Model> {
        let mut active_model: college::ActiveModel = college.into();

        if let Some(account_id) = updates.razorpay_account_id {
            active_model.razorpay_account_id = Set(Some(account_id));
        }
        if let Some(number) = updates.bank_account_number {
            active_model.bank_account_number = Set(Some(number));
        }
        if let Some(ifsc) = updates.bank_ifsc_code {
            active_model.bank_ifsc_code = Set(Some(ifsc));
        }
        if let Some(holder) = updates.bank_account_holder_name {
            active_model.bank_account_holder_name = Set(Some(holder));
        }
        if let Some(email) = updates.contact_email {
            active_model.contact_email = Set(Some(email));
        }

        let result = active_model.update(self.db).await?;
        Ok(result)
    }

    pub async fn count(&self) -> Result<u64> {
        let count = college::Entity::find().count(self.db).await?;
        Ok(count)
    }
}
