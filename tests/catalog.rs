mod common;

use bytes::Bytes;
use common::*;
use unbound_backend::error::AppError;
use unbound_backend::repositories::{EventUpdate, FestUpdate};
use unbound_backend::services::catalog;
use unbound_backend::services::explore::{self, EventFilter, FestFilter};
use unbound_backend::services::file_storage::UploadedFile;
use unbound_backend::services::moderation::{self, DEFAULT_REJECT_REASON, Decision};

#[tokio::test]
async fn event_date_must_fall_inside_the_linked_fest() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let fest = catalog::create_fest(
        &ctx.db,
        &college,
        fest_input("Techfest", date(2025, 1, 10), date(2025, 1, 20)),
    )
    .await
    .unwrap();

    let mut outside = event_input("Robo Wars", date(2025, 1, 25), 0, 10);
    outside.fest_id = Some(fest.id);
    let result = catalog::create_event(&ctx.db, &college, outside).await;
    match result {
        Err(AppError::Validation(message)) => assert!(message.contains("fest date range")),
        other => panic!("expected a date range error, got {other:?}"),
    }

    let mut inside = event_input("Robo Wars", date(2025, 1, 15), 0, 10);
    inside.fest_id = Some(fest.id);
    let event = catalog::create_event(&ctx.db, &college, inside).await.unwrap();
    assert_eq!(event.fest_id, Some(fest.id));
    assert!(!event.approved);
    assert!(event.active);

    let linked = catalog::fest_events(&ctx.db, &college, fest.id, today()).await.unwrap();
    assert_eq!(linked.len(), 1);
    assert_eq!(linked[0].days_left, 14);
}

#[tokio::test]
async fn fest_range_cannot_move_away_from_linked_events() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let fest = catalog::create_fest(
        &ctx.db,
        &college,
        fest_input("Techfest", date(2025, 1, 10), date(2025, 1, 20)),
    )
    .await
    .unwrap();
    let mut input = event_input("Robo Wars", date(2025, 1, 15), 0, 10);
    input.fest_id = Some(fest.id);
    catalog::create_event(&ctx.db, &college, input).await.unwrap();

    let moved = catalog::update_fest(
        &ctx.db,
        &college,
        fest.id,
        FestUpdate {
            start_date: Some(date(2025, 1, 1)),
            end_date: Some(date(2025, 1, 5)),
            ..Default::default()
        },
    )
    .await;
    match moved {
        Err(AppError::Validation(message)) => assert!(message.contains("fest date range")),
        other => panic!("expected a date range error, got {other:?}"),
    }

    let narrowed = catalog::update_fest(
        &ctx.db,
        &college,
        fest.id,
        FestUpdate {
            end_date: Some(date(2025, 1, 14)),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(narrowed, Err(AppError::Validation(_))));

    let kept = catalog::owned_fest(&ctx.db, &college, fest.id).await.unwrap();
    assert_eq!(kept.start_date, date(2025, 1, 10));
    assert_eq!(kept.end_date, date(2025, 1, 20));

    // the event day itself may become a boundary
    let tightened = catalog::update_fest(
        &ctx.db,
        &college,
        fest.id,
        FestUpdate {
            start_date: Some(date(2025, 1, 15)),
            end_date: Some(date(2025, 1, 15)),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(tightened.start_date, date(2025, 1, 15));
}

#[tokio::test]
async fn names_are_unique_per_college_ignoring_case() {
    let ctx = setup().await;
    let mit = seed_college(&ctx.db, "MIT", None).await;
    let coep = seed_college(&ctx.db, "COEP", None).await;

    catalog::create_event(&ctx.db, &mit, event_input("Hackathon", date(2025, 2, 1), 0, 10))
        .await
        .unwrap();
    let duplicate =
        catalog::create_event(&ctx.db, &mit, event_input("hackathon", date(2025, 2, 2), 0, 10)).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    // Another college may reuse the name.
    catalog::create_event(&ctx.db, &coep, event_input("Hackathon", date(2025, 2, 1), 0, 10))
        .await
        .unwrap();

    catalog::create_fest(&ctx.db, &mit, fest_input("Spring Fest", date(2025, 3, 1), date(2025, 3, 3)))
        .await
        .unwrap();
    let duplicate_fest = catalog::create_fest(
        &ctx.db,
        &mit,
        fest_input("SPRING FEST", date(2025, 4, 1), date(2025, 4, 3)),
    )
    .await;
    assert!(matches!(duplicate_fest, Err(AppError::Conflict(_))));
}

#[tokio::test]
async fn invalid_dates_fees_and_capacity_are_rejected() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;

    let backwards =
        catalog::create_fest(&ctx.db, &college, fest_input("Fest", date(2025, 1, 20), date(2025, 1, 10))).await;
    assert!(matches!(backwards, Err(AppError::Validation(_))));

    let negative_fee =
        catalog::create_event(&ctx.db, &college, event_input("Quiz", date(2025, 2, 1), -1, 10)).await;
    assert!(matches!(negative_fee, Err(AppError::Validation(_))));

    let no_seats = catalog::create_event(&ctx.db, &college, event_input("Quiz", date(2025, 2, 1), 0, 0)).await;
    assert!(matches!(no_seats, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn owners_cannot_flip_moderation_flags_and_others_cannot_touch_events() {
    let ctx = setup().await;
    let mit = seed_college(&ctx.db, "MIT", None).await;
    let coep = seed_college(&ctx.db, "COEP", None).await;
    let event = catalog::create_event(&ctx.db, &mit, event_input("Quiz", date(2025, 2, 1), 0, 10))
        .await
        .unwrap();

    let updated = catalog::update_event(
        &ctx.db,
        &mit,
        event.id,
        EventUpdate {
            approved: Some(true),
            capacity: Some(20),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(!updated.approved);
    assert_eq!(updated.capacity, 20);

    let foreign = catalog::update_event(&ctx.db, &coep, event.id, EventUpdate::default()).await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));

    let fest = catalog::create_fest(&ctx.db, &mit, fest_input("Fest", date(2025, 1, 10), date(2025, 1, 20)))
        .await
        .unwrap();
    let fest = catalog::update_fest(
        &ctx.db,
        &mit,
        fest.id,
        FestUpdate {
            approved: Some(true),
            city: Some("Mumbai".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(!fest.approved);
    assert_eq!(fest.city.as_deref(), Some("Mumbai"));
}

#[tokio::test]
async fn capacity_cannot_drop_below_registrations() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 2, 1), 0, 5)).await;
    for name in ["Asha", "Ravi"] {
        let student = seed_student(&ctx.db, college.id, name).await;
        unbound_backend::services::registration::register_for_event(
            &ctx.db,
            ctx.notifier.as_ref(),
            &student,
            unbound_backend::services::registration::RegisterInput {
                event_id: event.id,
                registration_type: "solo".to_string(),
                team_id: None,
                team_name: None,
            },
            today(),
        )
        .await
        .unwrap();
    }

    let result = catalog::update_event(
        &ctx.db,
        &college,
        event.id,
        EventUpdate {
            capacity: Some(1),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn poster_upload_waits_for_approval_and_can_be_rejected() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 2, 1), 0, 5)).await;

    let not_an_image = catalog::upload_poster(
        &ctx.db,
        &ctx.state.storage,
        &college,
        event.id,
        UploadedFile {
            file_name: Some("notes.txt".to_string()),
            content_type: Some("text/plain".to_string()),
            data: Bytes::from_static(b"hello"),
        },
    )
    .await;
    assert!(matches!(not_an_image, Err(AppError::Validation(_))));

    let event = catalog::upload_poster(
        &ctx.db,
        &ctx.state.storage,
        &college,
        event.id,
        UploadedFile {
            file_name: Some("poster.png".to_string()),
            content_type: Some("image/png".to_string()),
            data: Bytes::from_static(b"\x89PNG fake"),
        },
    )
    .await
    .unwrap();
    let url = event.poster_url.clone().expect("poster stored");
    assert!(url.starts_with("/uploads/events/"));
    assert!(!event.poster_approved);

    let approved = catalog::approve_poster(&ctx.db, &college, event.id).await.unwrap();
    assert!(approved.poster_approved);

    let removed = catalog::remove_poster(&ctx.db, &ctx.state.storage, &college, event.id, Some("blurry"))
        .await
        .unwrap();
    assert!(removed.poster_url.is_none());
    assert!(!removed.poster_approved);
    let relative = url.trim_start_matches("/uploads/");
    assert!(!ctx.state.storage.root().join(relative).exists());
}

#[tokio::test]
async fn moderation_publishes_or_hides_listings() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let fest = catalog::create_fest(&ctx.db, &college, fest_input("Techfest", date(2025, 1, 10), date(2025, 1, 20)))
        .await
        .unwrap();
    let keep = catalog::create_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 5))
        .await
        .unwrap();
    let spam = catalog::create_event(&ctx.db, &college, event_input("Spam", date(2025, 1, 16), 0, 5))
        .await
        .unwrap();

    assert_eq!(moderation::pending_fests(&ctx.db).await.unwrap().len(), 1);
    assert_eq!(moderation::pending_events(&ctx.db).await.unwrap().len(), 2);
    assert!(explore::explore_events(&ctx.db, &EventFilter::default(), None).await.unwrap().is_empty());

    moderation::moderate_fest(&ctx.db, fest.id, Decision::Approve, None).await.unwrap();
    moderation::moderate_event(&ctx.db, keep.id, Decision::Approve, None).await.unwrap();
    let rejected = moderation::moderate_event(&ctx.db, spam.id, Decision::Reject, Some("  ".to_string()))
        .await
        .unwrap();
    assert!(!rejected.item.active);
    assert_eq!(rejected.reason.as_deref(), Some(DEFAULT_REJECT_REASON));

    assert!(moderation::pending_events(&ctx.db).await.unwrap().is_empty());
    let listed = explore::explore_events(&ctx.db, &EventFilter::default(), None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].event.id, keep.id);
    assert_eq!(listed[0].college_name.as_deref(), Some("MIT"));
    assert!(listed[0].is_registered.is_none());

    let fests = explore::explore_fests(&ctx.db, &FestFilter::default()).await.unwrap();
    assert_eq!(fests.len(), 1);

    let stats = explore::explore_stats(&ctx.db).await.unwrap();
    assert_eq!(stats.total_fests, 1);
    assert_eq!(stats.total_events, 1);
    assert_eq!(stats.total_colleges, 1);

    let admin = moderation::admin_stats(&ctx.db).await.unwrap();
    assert_eq!(admin.total_events, 2);
    assert_eq!(admin.pending_events, 0);
    assert_eq!(admin.pending_fests, 0);

    let missing = moderation::moderate_fest(&ctx.db, uuid::Uuid::new_v4(), Decision::Approve, None).await;
    assert!(matches!(missing, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn explore_marks_events_the_student_registered_for() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let joined = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 5)).await;
    let other = seed_event(&ctx.db, &college, event_input("Debate", date(2025, 1, 12), 150, 5)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;

    unbound_backend::services::registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &student,
        unbound_backend::services::registration::RegisterInput {
            event_id: joined.id,
            registration_type: "solo".to_string(),
            team_id: None,
            team_name: None,
        },
        today(),
    )
    .await
    .unwrap();

    let listed = explore::explore_events(&ctx.db, &EventFilter::default(), Some(&student))
        .await
        .unwrap();
    // Sorted by event date.
    assert_eq!(listed[0].event.id, other.id);
    assert_eq!(listed[0].is_registered, Some(false));
    assert_eq!(listed[1].event.id, joined.id);
    assert_eq!(listed[1].is_registered, Some(true));

    let cheap = EventFilter {
        max_fee: Some(100),
        college: Some("mit".to_string()),
        ..Default::default()
    };
    let listed = explore::explore_events(&ctx.db, &cheap, None).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].event.id, joined.id);
}
