mod common;

use common::*;
use unbound_backend::entities::sea_orm_active_enums::PaymentStatus;
use unbound_backend::error::{AppError, RegistrationError};
use unbound_backend::repositories::{EventRegistrationRepository, EventRepository, EventUpdate};
use unbound_backend::services::registration::{self, RegisterInput};

fn solo(event_id: uuid::Uuid) -> RegisterInput {
    RegisterInput {
        event_id,
        registration_type: "solo".to_string(),
        team_id: None,
        team_name: None,
    }
}

fn assert_registration_error(result: Result<impl std::fmt::Debug, AppError>, expected: RegistrationError) {
    match result {
        Err(AppError::Registration(err)) => assert_eq!(err, expected),
        other => panic!("expected {expected:?}, got {other:?}"),
    }
}

#[tokio::test]
async fn free_event_registration_is_paid_immediately() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 1)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;

    let outcome = registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &student,
        solo(event.id),
        today(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.registration.payment_status, PaymentStatus::Paid);
    assert!(outcome.registration.receipt_number.starts_with("RCP-"));
    assert_eq!(outcome.event.registered_count, 1);
    assert_eq!(outcome.event.available_slots(), 0);

    let email = student_email(&ctx.db, &student).await;
    assert_eq!(ctx.notifier.sent_to(&email).len(), 1);
}

#[tokio::test]
async fn paid_event_registration_starts_pending() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Hackathon", date(2025, 1, 15), 200, 10)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;

    let outcome = registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &student,
        solo(event.id),
        today(),
    )
    .await
    .unwrap();

    assert_eq!(outcome.registration.payment_status, PaymentStatus::Pending);
}

#[tokio::test]
async fn second_student_is_refused_when_event_is_full() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 1)).await;
    let first = seed_student(&ctx.db, college.id, "Asha").await;
    let second = seed_student(&ctx.db, college.id, "Ravi").await;

    registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &first, solo(event.id), today())
        .await
        .unwrap();
    let result = registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &second,
        solo(event.id),
        today(),
    )
    .await;

    assert_registration_error(result, RegistrationError::EventFull);
    assert_eq!(reload_event(&ctx.db, event.id).await.registered_count, 1);
}

/// Interleaved attempts over one connection: checks the refusal path and that the counter
/// and the rows agree. The seat guard itself is exercised by the two tests below.
#[tokio::test]
async fn concurrent_registrations_never_exceed_capacity() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 2)).await;

    let mut students = Vec::new();
    for i in 0..5 {
        students.push(seed_student(&ctx.db, college.id, &format!("Student {i}")).await);
    }

    let attempts = students.iter().map(|student| {
        registration::register_for_event(
            &ctx.db,
            ctx.notifier.as_ref(),
            student,
            solo(event.id),
            today(),
        )
    });
    let results = futures::future::join_all(attempts).await;

    let succeeded = results.iter().filter(|r| r.is_ok()).count();
    let full = results
        .iter()
        .filter(|r| matches!(r, Err(AppError::Registration(RegistrationError::EventFull))))
        .count();
    assert_eq!(succeeded, 2);
    assert_eq!(full, 3);

    let event = reload_event(&ctx.db, event.id).await;
    assert_eq!(event.registered_count, 2);
    let rows = EventRegistrationRepository::new(&ctx.db)
        .find_by_event(event.id)
        .await
        .unwrap();
    assert_eq!(rows.len(), 2);
}

#[tokio::test]
async fn seat_guard_reads_the_counter_not_the_rows() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 2)).await;
    let events = EventRepository::new(&ctx.db);

    assert!(events.try_reserve_seat(event.id).await.unwrap());
    assert!(events.try_reserve_seat(event.id).await.unwrap());
    assert!(!events.try_reserve_seat(event.id).await.unwrap());
    assert!(!events.try_reserve_seat(event.id).await.unwrap());

    // no registration rows exist, so only the conditional update can refuse
    let rows = EventRegistrationRepository::new(&ctx.db)
        .find_by_event(event.id)
        .await
        .unwrap();
    assert!(rows.is_empty());
    assert_eq!(reload_event(&ctx.db, event.id).await.registered_count, 2);

    assert!(!events.try_reserve_seat(uuid::Uuid::new_v4()).await.unwrap());
}

/// Reservations race across several pooled connections on a multi-threaded runtime. A
/// read-then-write counter loses updates here and grants more seats than the capacity.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn seat_guard_holds_across_connections() {
    let ctx = setup_with(RecordingNotifier::default(), 4).await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 3)).await;

    let tasks: Vec<_> = (0..12)
        .map(|_| {
            let db = ctx.db.clone();
            let event_id = event.id;
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                EventRepository::new(&db).try_reserve_seat(event_id).await.unwrap()
            })
        })
        .collect();

    let mut granted = 0;
    for task in tasks {
        if task.await.unwrap() {
            granted += 1;
        }
    }

    assert_eq!(granted, 3);
    assert_eq!(reload_event(&ctx.db, event.id).await.registered_count, 3);
}

#[tokio::test]
async fn duplicate_registration_is_rejected_without_taking_a_seat() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 5)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;

    registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &student, solo(event.id), today())
        .await
        .unwrap();
    let result =
        registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &student, solo(event.id), today())
            .await;

    assert_registration_error(result, RegistrationError::AlreadyRegistered);
    assert_eq!(reload_event(&ctx.db, event.id).await.registered_count, 1);
}

#[tokio::test]
async fn closed_or_past_deadline_events_refuse_registration() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;

    let closed = seed_event(&ctx.db, &college, event_input("Closed", date(2025, 1, 15), 0, 5)).await;
    let closed = EventRepository::new(&ctx.db)
        .update(
            closed,
            EventUpdate {
                registration_open: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let result =
        registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &student, solo(closed.id), today())
            .await;
    assert_registration_error(result, RegistrationError::RegistrationClosed);

    let mut input = event_input("Late", date(2025, 1, 15), 0, 5);
    input.registration_deadline = date(2025, 1, 10);
    let late = seed_event(&ctx.db, &college, input).await;
    let result = registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &student,
        solo(late.id),
        date(2025, 1, 11),
    )
    .await;
    assert_registration_error(result, RegistrationError::DeadlinePassed);

    // The deadline day itself is still open.
    registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &student,
        solo(late.id),
        date(2025, 1, 10),
    )
    .await
    .unwrap();
}

#[tokio::test]
async fn unapproved_event_is_not_available() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;
    let event = unbound_backend::services::catalog::create_event(
        &ctx.db,
        &college,
        event_input("Pending", date(2025, 1, 15), 0, 5),
    )
    .await
    .unwrap();

    let result =
        registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &student, solo(event.id), today())
            .await;
    assert_registration_error(result, RegistrationError::EventUnavailable);
}

#[tokio::test]
async fn team_events_create_then_join_teams() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let mut input = event_input("Relay", date(2025, 1, 15), 0, 10);
    input.team_is_allowed = true;
    let event = seed_event(&ctx.db, &college, input).await;
    let creator = seed_student(&ctx.db, college.id, "Asha").await;
    let joiner = seed_student(&ctx.db, college.id, "Ravi").await;

    let result =
        registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &creator, solo(event.id), today())
            .await;
    assert_registration_error(result, RegistrationError::TeamRequired);

    let nameless = RegisterInput {
        registration_type: "team".to_string(),
        ..solo(event.id)
    };
    let result =
        registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &creator, nameless, today())
            .await;
    assert_registration_error(result, RegistrationError::TeamNameRequired);
    // Refused attempts leave no seat behind.
    assert_eq!(reload_event(&ctx.db, event.id).await.registered_count, 0);

    let created = registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &creator,
        RegisterInput {
            event_id: event.id,
            registration_type: "team".to_string(),
            team_id: None,
            team_name: Some("Rockets".to_string()),
        },
        today(),
    )
    .await
    .unwrap();
    let team = created.team.expect("team created");
    assert_eq!(team.creator_id, creator.id);

    let joined = registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &joiner,
        RegisterInput {
            event_id: event.id,
            registration_type: "TEAM".to_string(),
            team_id: Some(team.id),
            team_name: None,
        },
        today(),
    )
    .await
    .unwrap();
    assert_eq!(joined.registration.team_id, Some(team.id));

    let (_, members) = registration::team_members(&ctx.db, team.id).await.unwrap();
    assert_eq!(members.len(), 2);
    assert_eq!(registration::teams_for_event(&ctx.db, event.id).await.unwrap().len(), 1);
    assert_eq!(registration::teams_of_student(&ctx.db, &joiner).await.unwrap().len(), 1);

    registration::leave_team(&ctx.db, &joiner, team.id).await.unwrap();
    let (_, members) = registration::team_members(&ctx.db, team.id).await.unwrap();
    assert_eq!(members.len(), 1);

    let again = registration::leave_team(&ctx.db, &joiner, team.id).await;
    assert!(matches!(again, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn team_registration_on_solo_event_is_refused() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 5)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;

    let result = registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &student,
        RegisterInput {
            event_id: event.id,
            registration_type: "team".to_string(),
            team_id: None,
            team_name: Some("Solo Stars".to_string()),
        },
        today(),
    )
    .await;
    assert_registration_error(result, RegistrationError::TeamNotAllowed);

    let result = registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &student,
        RegisterInput {
            registration_type: "duo".to_string(),
            ..solo(event.id)
        },
        today(),
    )
    .await;
    assert_registration_error(result, RegistrationError::InvalidRegistrationType("duo".to_string()));
}

#[tokio::test]
async fn notification_outage_does_not_fail_registration() {
    let ctx = setup_with_notifier(RecordingNotifier::failing()).await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 5)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;

    let outcome =
        registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &student, solo(event.id), today())
            .await;

    assert!(outcome.is_ok());
    assert!(ctx.notifier.sent().is_empty());
}

#[tokio::test]
async fn my_registrations_and_stats_reflect_history() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let past = seed_event(&ctx.db, &college, event_input("Past", date(2025, 1, 5), 0, 5)).await;
    let upcoming = seed_event(&ctx.db, &college, event_input("Upcoming", date(2025, 2, 5), 100, 5)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;

    for event_id in [past.id, upcoming.id] {
        registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &student, solo(event_id), today())
            .await
            .unwrap();
    }

    let later = date(2025, 1, 10);
    let mine = registration::my_registrations(&ctx.db, &student, later).await.unwrap();
    assert_eq!(mine.len(), 2);
    let past_item = mine.iter().find(|m| m.event.id == past.id).unwrap();
    assert!(past_item.can_review);
    let upcoming_item = mine.iter().find(|m| m.event.id == upcoming.id).unwrap();
    assert!(!upcoming_item.can_review);

    let stats = registration::student_dashboard_stats(&ctx.db, &student, later).await.unwrap();
    assert_eq!(stats.total_events, 2);
    assert_eq!(stats.total_paid, 1);
    assert_eq!(stats.upcoming_events, 1);
    assert_eq!(stats.past_events, 1);
    assert_eq!(stats.reviews_given, 0);
}
