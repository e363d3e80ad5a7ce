//! `SeaORM` Entity for fest table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "fest")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub college_id: Uuid,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub start_date: Date,
    pub end_date: Date,
    pub approved: bool,
    pub active: bool,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub mode: Option<String>,
    pub website: Option<String>,
    pub contact_phone: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn contains_date(&self, date: Date) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    pub fn is_public(&self) -> bool {
        self.approved && self.active
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::college::Entity",
        from = "Column::CollegeId",
        to = "super::college::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    College,
}

impl Related<super::college::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::College.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
