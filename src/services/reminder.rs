use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};
use sea_orm::{ConnectionTrait, DatabaseConnection};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::AppResult;
use crate::repositories::{
    EventRegistrationRepository, EventRepository, StudentRepository, UserRepository,
};
use crate::services::notification::{Notifier, dispatch_best_effort, event_reminder};
use crate::utils::time::now;

/// Notifies every registrant of the public events held the day after `today`.
/// Returns how many reminders were handed to the notifier.
pub async fn send_reminders<C: ConnectionTrait>(
    db: &C,
    notifier: &dyn Notifier,
    today: NaiveDate,
) -> AppResult<usize> {
    let Some(tomorrow) = today.checked_add_days(Days::new(1)) else {
        return Ok(0);
    };

    let events = EventRepository::new(db).find_public_on(tomorrow).await?;
    if events.is_empty() {
        return Ok(0);
    }

    let registrations = EventRegistrationRepository::new(db)
        .find_by_events(events.iter().map(|e| e.id).collect())
        .await?;
    let students = StudentRepository::new(db)
        .find_by_ids(registrations.iter().map(|r| r.student_id).collect())
        .await?;
    let emails: HashMap<Uuid, String> = UserRepository::new(db)
        .find_by_ids(students.iter().map(|s| s.user_id).collect())
        .await?
        .into_iter()
        .map(|u| (u.id, u.email))
        .collect();
    let students: HashMap<Uuid, _> = students.into_iter().map(|s| (s.id, s)).collect();

    let mut sent = 0;
    for event in &events {
        for registration in registrations.iter().filter(|r| r.event_id == event.id) {
            let Some(student) = students.get(&registration.student_id) else {
                continue;
            };
            let Some(email) = emails.get(&student.user_id) else {
                continue;
            };
            dispatch_best_effort(notifier, event_reminder(email, &student.name, event)).await;
            sent += 1;
        }
    }

    tracing::info!(date = %tomorrow, events = events.len(), sent, "Event reminders sent");
    Ok(sent)
}

/// Time left until the next `hour_utc`:00, strictly in the future.
pub fn until_next_run(now: NaiveDateTime, hour_utc: u32) -> std::time::Duration {
    let at = NaiveTime::from_hms_opt(hour_utc.min(23), 0, 0).unwrap_or(NaiveTime::MIN);
    let mut next = now.date().and_time(at);
    if next <= now {
        next += chrono::Duration::days(1);
    }
    (next - now).to_std().unwrap_or_default()
}

/// Runs [`send_reminders`] once a day at `hour_utc`.
pub fn spawn_daily_reminders(
    db: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
    hour_utc: u32,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let wait = until_next_run(now(), hour_utc);
            tracing::debug!(seconds = wait.as_secs(), "Next reminder sweep scheduled");
            tokio::time::sleep(wait).await;

            let today = now().date();
            if let Err(e) = send_reminders(&db, notifier.as_ref(), today).await {
                tracing::error!("Reminder sweep failed: {e}");
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    #[test]
    fn test_until_next_run_same_day() {
        let wait = until_next_run(at(10, 6, 30), 8);
        assert_eq!(wait.as_secs(), 90 * 60);
    }

    #[test]
    fn test_until_next_run_rolls_over() {
        let wait = until_next_run(at(10, 8, 0), 8);
        assert_eq!(wait.as_secs(), 24 * 3600);

        let wait = until_next_run(at(10, 23, 0), 8);
        assert_eq!(wait.as_secs(), 9 * 3600);
    }
}
