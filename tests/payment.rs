mod common;

use common::*;
use unbound_backend::entities::sea_orm_active_enums::PaymentStatus;
use unbound_backend::error::AppError;
use unbound_backend::repositories::{
    CollegeRepository, EventRegistrationRepository, PaymentConfigUpdate, PaymentRepository,
};
use unbound_backend::services::payment::{self, CreateOrderInput, Settlement};
use unbound_backend::services::registration::{self, RegisterInput};

async fn pending_registration(
    ctx: &TestContext,
    contact_email: Option<&str>,
) -> (
    unbound_backend::entities::college::Model,
    unbound_backend::entities::student::Model,
    unbound_backend::entities::event_registration::Model,
) {
    let college = seed_college(&ctx.db, "MIT", contact_email).await;
    let event = seed_event(&ctx.db, &college, event_input("Hackathon", date(2025, 1, 15), 200, 10)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;
    let outcome = registration::register_for_event(
        &ctx.db,
        ctx.notifier.as_ref(),
        &student,
        RegisterInput {
            event_id: event.id,
            registration_type: "solo".to_string(),
            team_id: None,
            team_name: None,
        },
        today(),
    )
    .await
    .unwrap();
    (college, student, outcome.registration)
}

fn order_for(registration_id: uuid::Uuid) -> CreateOrderInput {
    CreateOrderInput {
        registration_id,
        ..Default::default()
    }
}

#[tokio::test]
async fn confirmed_payment_marks_registration_paid_and_notifies_once() {
    let ctx = setup().await;
    let (_college, student, registration) =
        pending_registration(&ctx, Some("accounts@mit.test")).await;
    let before = ctx.notifier.sent().len();

    let created = payment::create_order(
        &ctx.db,
        ctx.gateway.as_ref(),
        &student,
        order_for(registration.id),
    )
    .await
    .unwrap();
    assert_eq!(created.payment.amount, 200);
    assert_eq!(created.payment.currency, "INR");
    assert_eq!(created.payment.status, PaymentStatus::Pending);
    assert_eq!(ctx.gateway.requests()[0].amount, 20_000);

    let settlement = payment::confirm_payment(
        &ctx.db,
        ctx.notifier.as_ref(),
        &created.order.id,
        "paid",
        Some("pay_123".to_string()),
    )
    .await
    .unwrap();
    assert_eq!(settlement, Settlement::Applied);

    let registration = EventRegistrationRepository::new(&ctx.db)
        .find_by_id(registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(registration.payment_status, PaymentStatus::Paid);

    let sent = &ctx.notifier.sent()[before..];
    let email = student_email(&ctx.db, &student).await;
    assert_eq!(sent.iter().filter(|n| n.to == email).count(), 1);
    assert_eq!(sent.iter().filter(|n| n.to == "accounts@mit.test").count(), 1);
    assert_eq!(sent.len(), 2);
}

#[tokio::test]
async fn replayed_confirmation_changes_nothing() {
    let ctx = setup().await;
    let (_college, student, registration) = pending_registration(&ctx, None).await;
    let created = payment::create_order(&ctx.db, ctx.gateway.as_ref(), &student, order_for(registration.id))
        .await
        .unwrap();

    let first = payment::confirm_payment(
        &ctx.db,
        ctx.notifier.as_ref(),
        &created.order.id,
        "paid",
        Some("pay_1".to_string()),
    )
    .await
    .unwrap();
    let sent_after_first = ctx.notifier.sent().len();

    let second = payment::confirm_payment(
        &ctx.db,
        ctx.notifier.as_ref(),
        &created.order.id,
        "PAID",
        Some("pay_1".to_string()),
    )
    .await
    .unwrap();

    assert_eq!(first, Settlement::Applied);
    assert_eq!(second, Settlement::Unchanged);
    assert_eq!(ctx.notifier.sent().len(), sent_after_first);

    let payment = PaymentRepository::new(&ctx.db)
        .find_by_order_id(&created.order.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(payment.status, PaymentStatus::Paid);
    assert_eq!(payment.gateway_payment_id.as_deref(), Some("pay_1"));
}

/// Identical callbacks delivered at once over separate connections settle exactly once.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn simultaneous_confirmations_notify_once() {
    let ctx = setup_with(RecordingNotifier::default(), 4).await;
    let (_college, student, registration) =
        pending_registration(&ctx, Some("accounts@mit.test")).await;
    let created = payment::create_order(&ctx.db, ctx.gateway.as_ref(), &student, order_for(registration.id))
        .await
        .unwrap();
    let before = ctx.notifier.sent().len();

    let tasks: Vec<_> = (0..4)
        .map(|_| {
            let db = ctx.db.clone();
            let notifier = ctx.notifier.clone();
            let order_id = created.order.id.clone();
            tokio::spawn(async move {
                payment::confirm_payment(
                    &db,
                    notifier.as_ref(),
                    &order_id,
                    "paid",
                    Some("pay_1".to_string()),
                )
                .await
                .unwrap()
            })
        })
        .collect();

    let mut settlements = Vec::new();
    for task in tasks {
        settlements.push(task.await.unwrap());
    }

    let applied = settlements.iter().filter(|s| **s == Settlement::Applied).count();
    assert_eq!(applied, 1);
    assert_eq!(ctx.notifier.sent().len(), before + 2);
}

#[tokio::test]
async fn payment_status_write_applies_once_per_value() {
    let ctx = setup().await;
    let (_college, student, registration) = pending_registration(&ctx, None).await;
    let created = payment::create_order(&ctx.db, ctx.gateway.as_ref(), &student, order_for(registration.id))
        .await
        .unwrap();
    let payments = PaymentRepository::new(&ctx.db);
    let id = created.payment.id;

    assert!(payments.apply_status(id, PaymentStatus::Paid, Some("pay_1".into())).await.unwrap());
    assert!(!payments.apply_status(id, PaymentStatus::Paid, Some("pay_1".into())).await.unwrap());
    // a different gateway payment id is a new confirmation
    assert!(payments.apply_status(id, PaymentStatus::Paid, Some("pay_2".into())).await.unwrap());
    assert!(payments.apply_status(id, PaymentStatus::Paid, None).await.unwrap());
    assert!(!payments.apply_status(id, PaymentStatus::Paid, None).await.unwrap());
}

#[tokio::test]
async fn failed_retry_does_not_downgrade_a_paid_registration() {
    let ctx = setup().await;
    let (_college, student, registration) = pending_registration(&ctx, None).await;
    let paid = payment::create_order(&ctx.db, ctx.gateway.as_ref(), &student, order_for(registration.id))
        .await
        .unwrap();
    payment::confirm_payment(&ctx.db, ctx.notifier.as_ref(), &paid.order.id, "paid", None)
        .await
        .unwrap();

    // A second order is refused once the registration is paid.
    let again =
        payment::create_order(&ctx.db, ctx.gateway.as_ref(), &student, order_for(registration.id)).await;
    assert!(matches!(again, Err(AppError::Conflict(_))));

    let registration = EventRegistrationRepository::new(&ctx.db)
        .find_by_id(registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(registration.payment_status, PaymentStatus::Paid);
}

#[tokio::test]
async fn failed_confirmation_marks_registration_failed() {
    let ctx = setup().await;
    let (_college, student, registration) = pending_registration(&ctx, None).await;
    let created = payment::create_order(&ctx.db, ctx.gateway.as_ref(), &student, order_for(registration.id))
        .await
        .unwrap();

    payment::confirm_payment(&ctx.db, ctx.notifier.as_ref(), &created.order.id, "failed", None)
        .await
        .unwrap();

    let registration = EventRegistrationRepository::new(&ctx.db)
        .find_by_id(registration.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(registration.payment_status, PaymentStatus::Failed);
}

#[tokio::test]
async fn unknown_order_and_status_are_rejected() {
    let ctx = setup().await;

    let unknown = payment::confirm_payment(&ctx.db, ctx.notifier.as_ref(), "order_missing", "paid", None).await;
    assert!(matches!(unknown, Err(AppError::NotFound(_))));

    let bad_status =
        payment::confirm_payment(&ctx.db, ctx.notifier.as_ref(), "order_missing", "refunded", None).await;
    assert!(matches!(bad_status, Err(AppError::Validation(_))));
}

#[tokio::test]
async fn orders_are_scoped_to_the_owning_student() {
    let ctx = setup().await;
    let (college, _student, registration) = pending_registration(&ctx, None).await;
    let other = seed_student(&ctx.db, college.id, "Ravi").await;

    let result = payment::create_order(&ctx.db, ctx.gateway.as_ref(), &other, order_for(registration.id)).await;
    assert!(matches!(result, Err(AppError::Forbidden(_))));
}

#[tokio::test]
async fn non_positive_amount_is_rejected() {
    let ctx = setup().await;
    let (_college, student, registration) = pending_registration(&ctx, None).await;

    let result = payment::create_order(
        &ctx.db,
        ctx.gateway.as_ref(),
        &student,
        CreateOrderInput {
            registration_id: registration.id,
            amount: Some(0),
            ..Default::default()
        },
    )
    .await;
    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(ctx.gateway.requests().is_empty());
}

#[tokio::test]
async fn configured_payee_receives_a_split_transfer() {
    let ctx = setup().await;
    let (college, student, registration) = pending_registration(&ctx, None).await;
    CollegeRepository::new(&ctx.db)
        .update_payment_config(
            college,
            PaymentConfigUpdate {
                razorpay_account_id: Some("acc_college".to_string()),
                bank_account_number: None,
                bank_ifsc_code: None,
                bank_account_holder_name: None,
                contact_email: None,
            },
        )
        .await
        .unwrap();

    payment::create_order(&ctx.db, ctx.gateway.as_ref(), &student, order_for(registration.id))
        .await
        .unwrap();

    let request = &ctx.gateway.requests()[0];
    assert_eq!(request.transfers.len(), 1);
    assert_eq!(request.transfers[0].account, "acc_college");
    assert_eq!(request.transfers[0].amount, request.amount);
}
