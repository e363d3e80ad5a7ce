//! `SeaORM` Entity for college table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "college")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub address: Option<String>,
    /// Linked gateway account that receives split transfers.
    pub razorpay_account_id: Option<String>,
    pub bank_account_number: Option<String>,
    pub bank_ifsc_code: Option<String>,
    pub bank_account_holder_name: Option<String>,
    pub contact_email: Option<String>,
    pub created_at: DateTime,
}

impl Model {
    /// Payee account id, if one has been configured.
    pub fn payee_account(&self) -> Option<&str> {
        self.razorpay_account_id
            .as_deref()
            .map(str::trim)
            .filter(|account| !account.is_empty())
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
