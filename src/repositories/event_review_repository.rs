use crate::entities::event_review;
use anyhow::Result;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

pub struct EventReviewRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventReviewRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_event_and_student(
        &self,
        event_id: Uuid,
        student_id: Uuid,
    ) -> Result<Option<event_review::Model>> {
        let review = event_review::Entity::find()
            .filter(event_review::Column::EventId.eq(event_id))
            .filter(event_review::Column::StudentId.eq(student_id))
            .one(self.db)
            .await?;
        Ok(review)
    }

    pub async fn find_by_event(&self, event_id: Uuid) -> Result<Vec<event_review::Model>> {
        let reviews = event_review::Entity::find()
            .filter(event_review::Column::EventId.eq(event_id))
            .order_by_desc(event_review::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(reviews)
    }

    pub async fn find_by_events(&self, event_ids: Vec<Uuid>) -> Result<Vec<event_review::Model>> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let reviews = event_review::Entity::find()
            .filter(event_review::Column::EventId.is_in(event_ids))
            .all(self.db)
            .await?;
        Ok(reviews)
    }

    pub async fn find_by_student(&self, student_id: Uuid) -> Result<Vec<event_review::Model>> {
        let reviews = event_review::Entity::find()
            .filter(event_review::Column::StudentId.eq(student_id))
            .all(self.db)
            .await?;
        Ok(reviews)
    }

    pub async fn count_by_student(&self, student_id: Uuid) -> Result<u64> {
        let count = event_review::Entity::find()
            .filter(event_review::Column::StudentId.eq(student_id))
            .count(self.db)
            .await?;
        Ok(count)
    }

    pub async fn create(
        &self,
        event_id: Uuid,
        student_id: Uuid,
        rating: i32,
        review_text: Option<String>,
    ) -> Result<event_review::Model> {
        let review_model = event_review::ActiveModel {
            id: Set(Uuid::new_v4()),
            event_id: Set(event_id),
            student_id: Set(student_id),
            rating: Set(rating),
            review_text: Set(review_text),
            created_at: Set(Utc::now().naive_utc()),
        };

        let result = review_model.insert(self.db).await?;
        Ok(result)
    }
}
