use chrono::NaiveDate;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::entities::{college, event, event_review, student};
use crate::error::{AppError, AppResult};
use crate::repositories::{EventRegistrationRepository, EventRepository, EventReviewRepository};
use crate::utils::db::is_unique_violation;

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;

async fn find_event<C: ConnectionTrait>(db: &C, event_id: Uuid) -> AppResult<event::Model> {
    EventRepository::new(db)
        .find_by_id(event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))
}

pub async fn submit_review<C: ConnectionTrait>(
    db: &C,
    student: &student::Model,
    event_id: Uuid,
    rating: i32,
    review_text: Option<String>,
    today: NaiveDate,
) -> AppResult<event_review::Model> {
    let event = find_event(db, event_id).await?;

    if today < event.event_date {
        return Err(AppError::validation(
            "You can only review after the event is completed",
        ));
    }

    EventRegistrationRepository::new(db)
        .find_by_event_and_student(event.id, student.id)
        .await?
        .filter(|registration| registration.is_settled(event.fees))
        .ok_or_else(|| {
            AppError::forbidden("You must be a registered and paid participant to review")
        })?;

    let reviews = EventReviewRepository::new(db);
    if reviews
        .find_by_event_and_student(event.id, student.id)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("You have already reviewed this event"));
    }

    if !(MIN_RATING..=MAX_RATING).contains(&rating) {
        return Err(AppError::validation(format!(
            "Rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }

    let review_text = review_text.filter(|text| !text.trim().is_empty());
    let review = reviews
        .create(event.id, student.id, rating, review_text)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("You have already reviewed this event")
            } else {
                AppError::from(e)
            }
        })?;

    tracing::info!(event_id = %event.id, student_id = %student.id, rating, "Review submitted");
    Ok(review)
}

pub async fn my_review<C: ConnectionTrait>(
    db: &C,
    student: &student::Model,
    event_id: Uuid,
) -> AppResult<event_review::Model> {
    let event = find_event(db, event_id).await?;

    EventReviewRepository::new(db)
        .find_by_event_and_student(event.id, student.id)
        .await?
        .ok_or_else(|| AppError::not_found("No review found"))
}

/// Reviews of an event, visible only to the college that owns it.
pub async fn reviews_for_college<C: ConnectionTrait>(
    db: &C,
    college: &college::Model,
    event_id: Uuid,
) -> AppResult<Vec<event_review::Model>> {
    let event = find_event(db, event_id).await?;
    if event.college_id != college.id {
        return Err(AppError::not_found(
            "Event not found or not owned by this college",
        ));
    }

    Ok(EventReviewRepository::new(db).find_by_event(event.id).await?)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingSummary {
    pub average_rating: f64,
    pub review_count: usize,
}

impl RatingSummary {
    pub fn of(reviews: &[event_review::Model]) -> Self {
        let review_count = reviews.len();
        let average_rating = if review_count == 0 {
            0.0
        } else {
            reviews.iter().map(|r| f64::from(r.rating)).sum::<f64>() / review_count as f64
        };

        Self {
            average_rating,
            review_count,
        }
    }
}

pub async fn event_rating<C: ConnectionTrait>(db: &C, event_id: Uuid) -> AppResult<RatingSummary> {
    let event = find_event(db, event_id).await?;
    let reviews = EventReviewRepository::new(db).find_by_event(event.id).await?;
    Ok(RatingSummary::of(&reviews))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn review(rating: i32) -> event_review::Model {
        event_review::Model {
            id: Uuid::new_v4(),
            event_id: Uuid::nil(),
            student_id: Uuid::new_v4(),
            rating,
            review_text: None,
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn test_rating_summary() {
        let summary = RatingSummary::of(&[review(5), review(4), review(3)]);
        assert_eq!(summary.review_count, 3);
        assert!((summary.average_rating - 4.0).abs() < f64::EPSILON);

        let empty = RatingSummary::of(&[]);
        assert_eq!(empty.review_count, 0);
        assert_eq!(empty.average_rating, 0.0);
    }
}
