use crate::entities::{team, team_member};
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

pub struct TeamRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TeamRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, team_id: Uuid) -> Result<Option<team::Model>> {
        let team = team::Entity::find_by_id(team_id).one(self.db).await?;
        Ok(team)
    }

    pub async fn find_by_ids(&self, team_ids: Vec<Uuid>) -> Result<Vec<team::Model>> {
        if team_ids.is_empty() {
            return Ok(Vec::new());
        }
        let teams = team::Entity::find()
            .filter(team::Column::Id.is_in(team_ids))
            .all(self.db)
            .await?;
        Ok(teams)
    }

    pub async fn find_by_event(&self, event_id: Uuid) -> Result<Vec<team::Model>> {
        let teams = team::Entity::find()
            .filter(team::Column::EventId.eq(event_id))
            .order_by_asc(team::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(teams)
    }

    pub async fn create(&self, event_id: Uuid, name: &str, creator_id: Uuid) -> Result<team::Model> {
        let team_model = team::ActiveModel {
            id: Set(Uuid::new_v4()),
            event_id: Set(event_id),
            name: Set(name.trim().to_string()),
            creator_id: Set(creator_id),
            created_at: Set(Utc::now().naive_utc()),
        };

        let result = team_model.insert(self.db).await?;
        Ok(result)
    }
}

pub struct TeamMemberRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> TeamMemberRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find(&self, team_id: Uuid, student_id: Uuid) -> Result<Option<team_member::Model>> {
        let member = team_member::Entity::find_by_id((team_id, student_id))
            .one(self.db)
            .await?;
        Ok(member)
    }

    pub async fn find_by_team(&self, team_id: Uuid) -> Result<Vec<team_member::Model>> {
        let members = team_member::Entity::find()
            .filter(team_member::Column::TeamId.eq(team_id))
            .order_by_asc(team_member::Column::JoinedAt)
            .all(self.db)
            .await?;
        Ok(members)
    }

    pub async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<team_member::Model>> {
        let members = team_member::Entity::find()
            .filter(team_member::Column::StudentId.eq(student_id))
            .all(self.db)
            .await?;
        Ok(members)
    }

    pub async fn add(&self, team_id: Uuid, student_id: Uuid) -> Result<team_member::Model> {
        let member_model = team_member::ActiveModel {
            team_id: Set(team_id),
            student_id: Set(student_id),
            joined_at: Set(Utc::now().naive_utc()),
        };

        let result = member_model.insert(self.db).await?;
        Ok(result)
    }

    /// Returns the number of membership rows removed (0 or 1).
    pub async fn remove(&self, team_id: Uuid, student_id: Uuid) -> Result<u64> {
        let result = team_member::Entity::delete_by_id((team_id, student_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
