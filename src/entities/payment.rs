//! `SeaORM` Entity for payment table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::PaymentStatus;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "payment")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub registration_id: Uuid,
    /// Payee college.
    pub college_id: Uuid,
    #[sea_orm(unique)]
    pub gateway_order_id: String,
    pub status: PaymentStatus,
    /// Major currency units, as charged.
    pub amount: i32,
    pub currency: String,
    pub gateway_payment_id: Option<String>,
    pub receipt_email: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event_registration::Entity",
        from = "Column::RegistrationId",
        to = "super::event_registration::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    EventRegistration,
    #[sea_orm(
        belongs_to = "super::college::Entity",
        from = "Column::CollegeId",
        to = "super::college::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    College,
}

impl Related<super::event_registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EventRegistration.def()
    }
}

impl Related<super::college::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::College.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
