use crate::entities::student;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

pub struct StudentRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> StudentRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, student_id: Uuid) -> Result<Option<student::Model>> {
        let student = student::Entity::find_by_id(student_id).one(self.db).await?;
        Ok(student)
    }

    pub async fn find_by_user_id(&self, user_id: Uuid) -> Result<Option<student::Model>> {
        let student = student::Entity::find()
            .filter(student::Column::UserId.eq(user_id))
            .one(self.db)
            .await?;
        Ok(student)
    }

    pub async fn find_by_ids(&self, student_ids: Vec<Uuid>) -> Result<Vec<student::Model>> {
        if student_ids.is_empty() {
            return Ok(Vec::new());
        }
        let students = student::Entity::find()
            .filter(student::Column::Id.is_in(student_ids))
            .all(self.db)
            .await?;
        Ok(students)
    }

    pub async fn create(
        &self,
        user_id: Uuid,
        college_id: Uuid,
        name: String,
    ) -> Result<student::Model> {
        let student_model = student::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            college_id: Set(college_id),
            name: Set(name),
            created_at: Set(Utc::now().naive_utc()),
        };

        let result = student_model.insert(self.db).await?;
        Ok(result)
    }
}
