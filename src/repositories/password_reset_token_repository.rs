use crate::entities::password_reset_token;
use anyhow::Result;
use chrono::{NaiveDateTime, Utc};
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

pub struct PasswordResetTokenRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> PasswordResetTokenRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        token: String,
        expires_at: NaiveDateTime,
    ) -> Result<password_reset_token::Model> {
        let token_model = password_reset_token::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            token: Set(token),
            expires_at: Set(expires_at),
            created_at: Set(Utc::now().naive_utc()),
        };

        let result = token_model.insert(self.db).await?;
        Ok(result)
    }

    pub async fn find_by_token(&self, token: &str) -> Result<Option<password_reset_token::Model>> {
        let token = password_reset_token::Entity::find()
            .filter(password_reset_token::Column::Token.eq(token))
            .one(self.db)
            .await?;
        Ok(token)
    }

    pub async fn delete(&self, token_id: Uuid) -> Result<()> {
        password_reset_token::Entity::delete_by_id(token_id)
            .exec(self.db)
            .await?;
        Ok(())
    }

    /// Drops every outstanding token of a user, so only the newest link works.
    pub async fn delete_by_user(&self, user_id: Uuid) -> Result<u64> {
        let result = password_reset_token::Entity::delete_many()
            .filter(password_reset_token::Column::UserId.eq(user_id))
            .exec(self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
