use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::user;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};
use uuid::Uuid;

pub struct UserRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> UserRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<Option<user::Model>> {
        let user = user::Entity::find_by_id(user_id).one(self.db).await?;
        Ok(user)
    }

    pub async fn find_by_ids(&self, user_ids: Vec<Uuid>) -> Result<Vec<user::Model>> {
        if user_ids.is_empty() {
            return Ok(Vec::new());
        }
        let users = user::Entity::find()
            .filter(user::Column::Id.is_in(user_ids))
            .all(self.db)
            .await?;
        Ok(users)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<user::Model>> {
        let user = user::Entity::find()
            .filter(user::Column::Email.eq(email.trim().to_lowercase()))
            .one(self.db)
            .await?;
        Ok(user)
    }

    pub async fn create(
        &self,
        email: &str,
        password_hash: String,
        role: RoleEnum,
    ) -> Result<user::Model> {
        let user_model = user::ActiveModel {
            id: Set(Uuid::new_v4()),
            email: Set(email.trim().to_lowercase()),
            password: Set(password_hash),
            role: Set(role),
            created_at: Set(Utc::now().naive_utc()),
        };

        let result = user_model.insert(self.db).await?;
        Ok(result)
    }

    pub async fn update_password(&self, user_id: Uuid, password_hash: String) -> Result<()> {
        let user = self
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("User not found"))?;

        let mut active_model: user::ActiveModel = user.into();
        active_model.password = Set(password_hash);
        active_model.update(self.db).await?;
        Ok(())
    }

    pub async fn count_by_role(&self, role: RoleEnum) -> Result<u64> {
        let count = user::Entity::find()
            .filter(user::Column::Role.eq(role))
            .count(self.db)
            .await?;
        Ok(count)
    }
}
