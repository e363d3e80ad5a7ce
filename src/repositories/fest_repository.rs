use crate::entities::fest;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct FestCreate {
    pub college_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub mode: Option<String>,
    pub website: Option<String>,
    pub contact_phone: Option<String>,
}

#[derive(Debug, Default)]
pub struct FestUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub mode: Option<String>,
    pub website: Option<String>,
    pub contact_phone: Option<String>,
    pub image_url: Option<String>,
    pub thumbnail_url: Option<String>,
    pub approved: Option<bool>,
    pub active: Option<bool>,
}

pub struct FestRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> FestRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, fest_id: Uuid) -> Result<Option<fest::Model>> {
        let fest = fest::Entity::find_by_id(fest_id).one(self.db).await?;
        Ok(fest)
    }

    pub async fn find_by_ids(&self, fest_ids: Vec<Uuid>) -> Result<Vec<fest::Model>> {
        if fest_ids.is_empty() {
            return Ok(Vec::new());
        }
        let fests = fest::Entity::find()
            .filter(fest::Column::Id.is_in(fest_ids))
            .all(self.db)
            .await?;
        Ok(fests)
    }

    pub async fn find_by_college(&self, college_id: Uuid) -> Result<Vec<fest::Model>> {
        let fests = fest::Entity::find()
            .filter(fest::Column::CollegeId.eq(college_id))
            .order_by_asc(fest::Column::StartDate)
            .all(self.db)
            .await?;
        Ok(fests)
    }

    /// Case-insensitive name lookup within one college, optionally ignoring one fest.
    pub async fn name_exists_for_college(
        &self,
        college_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool> {
        let mut query = fest::Entity::find()
            .filter(fest::Column::CollegeId.eq(college_id))
            .filter(
                Expr::expr(Func::lower(Expr::col(fest::Column::Name)))
                    .eq(name.trim().to_lowercase()),
            );

        if let Some(exclude_id) = exclude_id {
            query = query.filter(fest::Column::Id.ne(exclude_id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    pub async fn find_pending(&self) -> Result<Vec<fest::Model>> {
        let fests = fest::Entity::find()
            .filter(fest::Column::Approved.eq(false))
            .filter(fest::Column::Active.eq(true))
            .order_by_asc(fest::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(fests)
    }

    pub async fn find_public(&self) -> Result<Vec<fest::Model>> {
        let fests = fest::Entity::find()
            .filter(fest::Column::Approved.eq(true))
            .filter(fest::Column::Active.eq(true))
            .order_by_asc(fest::Column::StartDate)
            .all(self.db)
            .await?;
        Ok(fests)
    }

    pub async fn count_all(&self) -> Result<u64> {
        let count = fest::Entity::find().count(self.db).await?;
        Ok(count)
    }

    pub async fn count_public(&self) -> Result<u64> {
        let count = fest::Entity::find()
            .filter(fest::Column::Approved.eq(true))
            .filter(fest::Column::Active.eq(true))
            .count(self.db)
            .await?;
        Ok(count)
    }

    pub async fn count_pending(&self) -> Result<u64> {
        let count = fest::Entity::find()
            .filter(fest::Column::Approved.eq(false))
            .filter(fest::Column::Active.eq(true))
            .count(self.db)
            .await?;
        Ok(count)
    }

    pub async fn create(&self, input: FestCreate) -> Result<fest::Model> {
        let now = Utc::now().naive_utc();
        let fest_model = fest::ActiveModel {
            id: Set(Uuid::new_v4()),
            college_id: Set(input.college_id),
            name: Set(input.name),
            description: Set(input.description),
            start_date: Set(input.start_date),
            end_date: Set(input.end_date),
            approved: Set(false),
            active: Set(true),
            image_url: Set(None),
            thumbnail_url: Set(None),
            city: Set(input.city),
            state: Set(input.state),
            country: Set(input.country),
            mode: Set(input.mode),
            website: Set(input.website),
            contact_phone: Set(input.contact_phone),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = fest_model.insert(self.db).await?;
        Ok(result)
    }

    pub async fn update(&self, fest: fest::Model, updates: FestUpdate) -> Result<fest::Model> {
        let mut active_model: fest::ActiveModel = fest.into();

        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(description) = updates.description {
            active_model.description = Set(Some(description));
        }
        if let Some(start_date) = updates.start_date {
            active_model.start_date = Set(start_date);
        }
        if let Some(end_date) = updates.end_date {
            active_model.end_date = Set(end_date);
        }
        if let Some(city) = updates.city {
            active_model.city = Set(Some(city));
        }
        if let Some(state) = updates.state {
            active_model.state = Set(Some(state));
        }
        if let Some(country) = updates.country {
            active_model.country = Set(Some(country));
        }
        if let Some(mode) = updates.mode {
            active_model.mode = Set(Some(mode));
        }
        if let Some(website) = updates.website {
            active_model.website = Set(Some(website));
        }
        if let Some(contact_phone) = updates.contact_phone {
            active_model.contact_phone = Set(Some(contact_phone));
        }
        if let Some(image_url) = updates.image_url {
            active_model.image_url = Set(Some(image_url));
        }
        if let Some(thumbnail_url) = updates.thumbnail_url {
            active_model.thumbnail_url = Set(Some(thumbnail_url));
        }
        if let Some(approved) = updates.approved {
            active_model.approved = Set(approved);
        }
        if let Some(active) = updates.active {
            active_model.active = Set(active);
        }

        active_model.updated_at = Set(Utc::now().naive_utc());

        let result = active_model.update(self.db).await?;
        Ok(result)
    }

    pub async fn delete(&self, fest_id: Uuid) -> Result<u64> {
        let result = fest::Entity::delete_by_id(fest_id).exec(self.db).await?;
        Ok(result.rows_affected)
    }
}
