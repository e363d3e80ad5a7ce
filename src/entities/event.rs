//! `SeaORM` Entity for event table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "event")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub college_id: Uuid,
    pub fest_id: Option<Uuid>,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub event_date: Date,
    pub location: String,
    pub fees: i32,
    pub capacity: i32,
    /// Seats taken, maintained atomically by the registration transaction.
    pub registered_count: i32,
    pub team_is_allowed: bool,
    pub category: Option<String>,
    pub mode: Option<String>,
    pub poster_url: Option<String>,
    pub poster_thumbnail_url: Option<String>,
    pub poster_approved: bool,
    pub approved: bool,
    pub active: bool,
    pub cash_prize: Option<String>,
    pub first_prize: Option<String>,
    pub second_prize: Option<String>,
    pub third_prize: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub event_website: Option<String>,
    pub contact_phone: Option<String>,
    pub organizer_name: Option<String>,
    pub organizer_email: Option<String>,
    pub organizer_phone: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub rules: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub requirements: Option<String>,
    pub registration_deadline: Date,
    pub registration_open: bool,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

impl Model {
    pub fn is_public(&self) -> bool {
        self.approved && self.active
    }

    pub fn is_free(&self) -> bool {
        self.fees == 0
    }

    pub fn available_slots(&self) -> i32 {
        (self.capacity - self.registered_count).max(0)
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
    #[sea_orm(
        belongs_to = "super::fest::Entity",
        from = "Column::FestId",
        to = "super::fest::Column::Id",
        on_update = "Cascade",
        on_delete = "SetNull"
    )]
    Fest,
}

impl Related<super::college::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::College.def()
    }
}

impl Related<super::fest::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Fest.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
