mod common;

use common::*;
use unbound_backend::error::AppError;
use unbound_backend::services::certificate::{PdfCertificateRenderer, issue_certificate};
use unbound_backend::services::dashboard::{self, DashboardData};
use unbound_backend::services::payment::{self, CreateOrderInput};
use unbound_backend::services::registration::{self, RegisterInput};
use unbound_backend::services::review;

fn solo(event_id: uuid::Uuid) -> RegisterInput {
    RegisterInput {
        event_id,
        registration_type: "solo".to_string(),
        team_id: None,
        team_name: None,
    }
}

#[tokio::test]
async fn reviews_open_on_event_day_and_only_once() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 5)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;
    let outsider = seed_student(&ctx.db, college.id, "Ravi").await;
    registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &student, solo(event.id), today())
        .await
        .unwrap();

    let early = review::submit_review(&ctx.db, &student, event.id, 5, None, date(2025, 1, 14)).await;
    assert!(matches!(early, Err(AppError::Validation(_))));

    let not_registered =
        review::submit_review(&ctx.db, &outsider, event.id, 5, None, date(2025, 1, 15)).await;
    assert!(matches!(not_registered, Err(AppError::Forbidden(_))));

    let out_of_range = review::submit_review(&ctx.db, &student, event.id, 6, None, date(2025, 1, 15)).await;
    assert!(matches!(out_of_range, Err(AppError::Validation(_))));

    let saved = review::submit_review(
        &ctx.db,
        &student,
        event.id,
        4,
        Some("Great questions".to_string()),
        date(2025, 1, 15),
    )
    .await
    .unwrap();
    assert_eq!(saved.rating, 4);

    let twice = review::submit_review(&ctx.db, &student, event.id, 3, None, date(2025, 1, 16)).await;
    assert!(matches!(twice, Err(AppError::Conflict(_))));

    let mine = review::my_review(&ctx.db, &student, event.id).await.unwrap();
    assert_eq!(mine.id, saved.id);

    let rating = review::event_rating(&ctx.db, event.id).await.unwrap();
    assert_eq!(rating.review_count, 1);
    assert!((rating.average_rating - 4.0).abs() < f64::EPSILON);

    let visible = review::reviews_for_college(&ctx.db, &college, event.id).await.unwrap();
    assert_eq!(visible.len(), 1);
    let other_college = seed_college(&ctx.db, "COEP", None).await;
    let hidden = review::reviews_for_college(&ctx.db, &other_college, event.id).await;
    assert!(matches!(hidden, Err(AppError::NotFound(_))));
}

#[tokio::test]
async fn unpaid_registrations_cannot_review() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Hackathon", date(2025, 1, 15), 300, 5)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;
    registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &student, solo(event.id), today())
        .await
        .unwrap();

    let result = review::submit_review(&ctx.db, &student, event.id, 5, None, date(2025, 1, 20)).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn certificate_needs_approval_and_a_finished_event() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 5)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;
    let outcome =
        registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &student, solo(event.id), today())
            .await
            .unwrap();
    let renderer = PdfCertificateRenderer;

    let not_approved = issue_certificate(&ctx.db, &renderer, &student, event.id, date(2025, 1, 20)).await;
    match not_approved {
        Err(AppError::Forbidden(message)) => assert!(message.contains("not yet approved")),
        other => panic!("expected approval error, got {other:?}"),
    }

    dashboard::approve_certificate(&ctx.db, &college, event.id, outcome.registration.id)
        .await
        .unwrap();

    let same_day = issue_certificate(&ctx.db, &renderer, &student, event.id, date(2025, 1, 15)).await;
    assert!(matches!(same_day, Err(AppError::Forbidden(_))));

    let certificate = issue_certificate(&ctx.db, &renderer, &student, event.id, date(2025, 1, 16))
        .await
        .unwrap();
    assert!(certificate.bytes.starts_with(b"%PDF"));
    assert!(certificate.file_name.ends_with(".pdf"));
}

#[tokio::test]
async fn certificate_approval_is_scoped_to_the_owning_college() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let other = seed_college(&ctx.db, "COEP", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 5)).await;
    let second = seed_event(&ctx.db, &college, event_input("Debate", date(2025, 1, 16), 0, 5)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;
    let outcome =
        registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &student, solo(event.id), today())
            .await
            .unwrap();

    let foreign = dashboard::approve_certificate(&ctx.db, &other, event.id, outcome.registration.id).await;
    assert!(matches!(foreign, Err(AppError::NotFound(_))));

    let wrong_event =
        dashboard::approve_certificate(&ctx.db, &college, second.id, outcome.registration.id).await;
    assert!(matches!(wrong_event, Err(AppError::NotFound(_))));

    let approved = dashboard::approve_certificates(&ctx.db, &college, event.id, None)
        .await
        .unwrap();
    assert_eq!(approved, 1);

    let list = dashboard::event_registrations(&ctx.db, &college, event.id).await.unwrap();
    assert_eq!(list.rows.len(), 1);
    assert!(list.rows[0].registration.certificate_approved);
    assert_eq!(list.rows[0].student.as_ref().map(|s| s.name.as_str()), Some("Asha"));
    assert_eq!(list.available_slots(), 4);
}

#[tokio::test]
async fn dashboard_totals_follow_paid_payments() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let fest = seed_fest(&ctx.db, &college, fest_input("Techfest", date(2025, 1, 10), date(2025, 1, 20))).await;
    let mut input = event_input("Hackathon", date(2025, 1, 15), 200, 5);
    input.fest_id = Some(fest.id);
    let paid_event = seed_event(&ctx.db, &college, input).await;
    let free_event = seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 18), 0, 5)).await;

    let asha = seed_student(&ctx.db, college.id, "Asha").await;
    let ravi = seed_student(&ctx.db, college.id, "Ravi").await;

    let paid = registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &asha, solo(paid_event.id), today())
        .await
        .unwrap();
    registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &ravi, solo(paid_event.id), today())
        .await
        .unwrap();
    registration::register_for_event(&ctx.db, ctx.notifier.as_ref(), &ravi, solo(free_event.id), today())
        .await
        .unwrap();

    let order = payment::create_order(
        &ctx.db,
        ctx.gateway.as_ref(),
        &asha,
        CreateOrderInput {
            registration_id: paid.registration.id,
            ..Default::default()
        },
    )
    .await
    .unwrap();
    payment::confirm_payment(&ctx.db, ctx.notifier.as_ref(), &order.order.id, "paid", None)
        .await
        .unwrap();

    let data = DashboardData::load(&ctx.db, &college).await.unwrap();

    let stats = data.stats();
    assert_eq!(stats.total_events, 2);
    assert_eq!(stats.total_registrations, 3);
    assert_eq!(stats.total_paid, 2);
    assert_eq!(stats.total_revenue, 200);

    let registrations = data.registration_stats();
    assert_eq!(registrations.paid_registrations, 2);
    assert_eq!(registrations.unpaid_registrations, 1);

    let by_fest = data.by_fest();
    assert_eq!(by_fest.len(), 1);
    assert_eq!(by_fest[0].registrations, 2);
    assert_eq!(by_fest[0].earnings, 200);

    let top = data.top_events(1);
    assert_eq!(top.top_by_registrations[0].event_id, paid_event.id);
    assert_eq!(top.top_by_earnings[0].earnings, 200);
}
