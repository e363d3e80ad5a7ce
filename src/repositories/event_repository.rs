use crate::entities::event;
use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct EventCreate {
    pub college_id: Uuid,
    pub fest_id: Option<Uuid>,
    pub name: String,
    pub description: String,
    pub event_date: NaiveDate,
    pub location: String,
    pub fees: i32,
    pub capacity: i32,
    pub team_is_allowed: bool,
    pub category: Option<String>,
    pub mode: Option<String>,
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
    pub rules: Option<String>,
    pub requirements: Option<String>,
    pub registration_deadline: NaiveDate,
    pub registration_open: bool,
}

/// `None` leaves a field untouched; nested options can clear nullable columns.
#[derive(Debug, Default)]
pub struct EventUpdate {
    pub fest_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<NaiveDate>,
    pub location: Option<String>,
    pub fees: Option<i32>,
    pub capacity: Option<i32>,
    pub team_is_allowed: Option<bool>,
    pub category: Option<String>,
    pub mode: Option<String>,
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
    pub rules: Option<String>,
    pub requirements: Option<String>,
    pub registration_deadline: Option<NaiveDate>,
    pub registration_open: Option<bool>,
    pub poster_url: Option<Option<String>>,
    pub poster_thumbnail_url: Option<Option<String>>,
    pub poster_approved: Option<bool>,
    pub approved: Option<bool>,
    pub active: Option<bool>,
}

pub struct EventRepository<'a, C> {
    db: &'a C,
}

impl<'a, C: ConnectionTrait> EventRepository<'a, C> {
    pub fn new(db: &'a C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, event_id: Uuid) -> Result<Option<event::Model>> {
        let event = event::Entity::find_by_id(event_id).one(self.db).await?;
        Ok(event)
    }

    pub async fn find_by_ids(&self, event_ids: Vec<Uuid>) -> Result<Vec<event::Model>> {
        if event_ids.is_empty() {
            return Ok(Vec::new());
        }
        let events = event::Entity::find()
            .filter(event::Column::Id.is_in(event_ids))
            .all(self.db)
            .await?;
        Ok(events)
    }

    pub async fn find_by_college(&self, college_id: Uuid) -> Result<Vec<event::Model>> {
        let events = event::Entity::find()
            .filter(event::Column::CollegeId.eq(college_id))
            .order_by_asc(event::Column::EventDate)
            .all(self.db)
            .await?;
        Ok(events)
    }

    pub async fn find_by_fest(&self, fest_id: Uuid) -> Result<Vec<event::Model>> {
        let events = event::Entity::find()
            .filter(event::Column::FestId.eq(fest_id))
            .order_by_asc(event::Column::EventDate)
            .all(self.db)
            .await?;
        Ok(events)
    }

    /// Case-insensitive name lookup within one college, optionally ignoring one event.
    pub async fn name_exists_for_college(
        &self,
        college_id: Uuid,
        name: &str,
        exclude_id: Option<Uuid>,
    ) -> Result<bool> {
        let mut query = event::Entity::find()
            .filter(event::Column::CollegeId.eq(college_id))
            .filter(
                Expr::expr(Func::lower(Expr::col(event::Column::Name)))
                    .eq(name.trim().to_lowercase()),
            );

        if let Some(exclude_id) = exclude_id {
            query = query.filter(event::Column::Id.ne(exclude_id));
        }

        Ok(query.count(self.db).await? > 0)
    }

    pub async fn find_pending(&self) -> Result<Vec<event::Model>> {
        let events = event::Entity::find()
            .filter(event::Column::Approved.eq(false))
            .filter(event::Column::Active.eq(true))
            .order_by_asc(event::Column::CreatedAt)
            .all(self.db)
            .await?;
        Ok(events)
    }

    pub async fn find_public(&self) -> Result<Vec<event::Model>> {
        let events = event::Entity::find()
            .filter(event::Column::Approved.eq(true))
            .filter(event::Column::Active.eq(true))
            .order_by_asc(event::Column::EventDate)
            .all(self.db)
            .await?;
        Ok(events)
    }

    /// Approved, active events held on `date`.
    pub async fn find_public_on(&self, date: NaiveDate) -> Result<Vec<event::Model>> {
        let events = event::Entity::find()
            .filter(event::Column::Approved.eq(true))
            .filter(event::Column::Active.eq(true))
            .filter(event::Column::EventDate.eq(date))
            .all(self.db)
            .await?;
        Ok(events)
    }

    pub async fn count_all(&self) -> Result<u64> {
        let count = event::Entity::find().count(self.db).await?;
        Ok(count)
    }

    pub async fn count_public(&self) -> Result<u64> {
        let count = event::Entity::find()
            .filter(event::Column::Approved.eq(true))
            .filter(event::Column::Active.eq(true))
            .count(self.db)
            .await?;
        Ok(count)
    }

    pub async fn count_pending(&self) -> Result<u64> {
        let count = event::Entity::find()
            .filter(event::Column::Approved.eq(false))
            .filter(event::Column::Active.eq(true))
            .count(self.db)
            .await?;
        Ok(count)
    }

    pub async fn create(&self, input: EventCreate) -> Result<event::Model> {
        let now = Utc::now().naive_utc();
        let event_model = event::ActiveModel {
            id: Set(Uuid::new_v4()),
            college_id: Set(input.college_id),
            fest_id: Set(input.fest_id),
            name: Set(input.name),
            description: Set(input.description),
            event_date: Set(input.event_date),
            location: Set(input.location),
            fees: Set(input.fees),
            capacity: Set(input.capacity),
            registered_count: Set(0),
            team_is_allowed: Set(input.team_is_allowed),
            category: Set(input.category),
            mode: Set(input.mode),
            poster_url: Set(None),
            poster_thumbnail_url: Set(None),
            poster_approved: Set(false),
            approved: Set(false),
            active: Set(true),
            cash_prize: Set(input.cash_prize),
            first_prize: Set(input.first_prize),
            second_prize: Set(input.second_prize),
            third_prize: Set(input.third_prize),
            city: Set(input.city),
            state: Set(input.state),
            country: Set(input.country),
            event_website: Set(input.event_website),
            contact_phone: Set(input.contact_phone),
            organizer_name: Set(input.organizer_name),
            organizer_email: Set(input.organizer_email),
            organizer_phone: Set(input.organizer_phone),
            rules: Set(input.rules),
            requirements: Set(input.requirements),
            registration_deadline: Set(input.registration_deadline),
            registration_open: Set(input.registration_open),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let result = event_model.insert(self.db).await?;
        Ok(result)
    }

    pub async fn update(&self, event: event::Model, updates: EventUpdate) -> Result<event::Model> {
        let mut active_model: event::ActiveModel = event.into();

        if let Some(fest_id) = updates.fest_id {
            active_model.fest_id = Set(fest_id);
        }
        if let Some(name) = updates.name {
            active_model.name = Set(name);
        }
        if let Some(description) = updates.description {
            active_model.description = Set(description);
        }
        if let Some(event_date) = updates.event_date {
            active_model.event_date = Set(event_date);
        }
        if let Some(location) = updates.location {
            active_model.location = Set(location);
        }
        if let Some(fees) = updates.fees {
            active_model.fees = Set(fees);
        }
        if let Some(capacity) = updates.capacity {
            active_model.capacity = Set(capacity);
        }
        if let Some(team_is_allowed) = updates.team_is_allowed {
            active_model.team_is_allowed = Set(team_is_allowed);
        }
        if let Some(category) = updates.category {
            active_model.category = Set(Some(category));
        }
        if let Some(mode) = updates.mode {
            active_model.mode = Set(Some(mode));
        }
        if let Some(cash_prize) = updates.cash_prize {
            active_model.cash_prize = Set(Some(cash_prize));
        }
        if let Some(first_prize) = updates.first_prize {
            active_model.first_prize = Set(Some(first_prize));
        }
        if let Some(second_prize) = updates.second_prize {
            active_model.second_prize = Set(Some(second_prize));
        }
        if let Some(third_prize) = updates.third_prize {
            active_model.third_prize = Set(Some(third_prize));
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
        if let Some(event_website) = updates.event_website {
            active_model.event_website = Set(Some(event_website));
        }
        if let Some(contact_phone) = updates.contact_phone {
            active_model.contact_phone = Set(Some(contact_phone));
        }
        if let Some(organizer_name) = updates.organizer_name {
            active_model.organizer_name = Set(Some(organizer_name));
        }
        if let Some(organizer_email) = updates.organizer_email {
            active_model.organizer_email = Set(Some(organizer_email));
        }
        if let Some(organizer_phone) = updates.organizer_phone {
            active_model.organizer_phone = Set(Some(organizer_phone));
        }
        if let Some(rules) = updates.rules {
            active_model.rules = Set(Some(rules));
        }
        if let Some(requirements) = updates.requirements {
            active_model.requirements = Set(Some(requirements));
        }
        if let Some(deadline) = updates.registration_deadline {
            active_model.registration_deadline = Set(deadline);
        }
        if let Some(registration_open) = updates.registration_open {
            active_model.registration_open = Set(registration_open);
        }
        if let Some(poster_url) = updates.poster_url {
            active_model.poster_url = Set(poster_url);
        }
        if let Some(poster_thumbnail_url) = updates.poster_thumbnail_url {
            active_model.poster_thumbnail_url = Set(poster_thumbnail_url);
        }
        if let Some(poster_approved) = updates.poster_approved {
            active_model.poster_approved = Set(poster_approved);
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

    pub async fn delete(&self, event_id: Uuid) -> Result<u64> {
        let result = event::Entity::delete_by_id(event_id).exec(self.db).await?;
        Ok(result.rows_affected)
    }

    /// Takes one seat if any is left. Single conditional UPDATE, so two
    /// concurrent callers can never both take the last seat.
    pub async fn try_reserve_seat(&self, event_id: Uuid) -> Result<bool> {
        let result = event::Entity::update_many()
            .col_expr(
                event::Column::RegisteredCount,
                Expr::col(event::Column::RegisteredCount).add(1),
            )
            .filter(event::Column::Id.eq(event_id))
            .filter(
                Expr::col(event::Column::RegisteredCount).lt(Expr::col(event::Column::Capacity)),
            )
            .exec(self.db)
            .await?;

        Ok(result.rows_affected == 1)
    }
}
