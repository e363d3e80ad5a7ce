use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::config::DEFAULT_CURRENCY;
use crate::entities::sea_orm_active_enums::PaymentStatus;
use crate::entities::{payment, student};
use crate::error::{AppError, AppResult};
use crate::repositories::{
    CollegeRepository, EventRegistrationRepository, EventRepository, PaymentCreate,
    PaymentRepository, StudentRepository, UserRepository,
};
use crate::services::notification::{
    Notifier, PaymentMail, college_payment_notice, dispatch_best_effort, payment_receipt,
};
use crate::services::payment_gateway::{GatewayOrder, OrderRequest, PaymentGateway};

#[derive(Debug, Clone, Default)]
pub struct CreateOrderInput {
    pub registration_id: Uuid,
    pub amount: Option<i32>,
    pub currency: Option<String>,
    pub receipt_email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreatedOrder {
    pub order: GatewayOrder,
    pub payment: payment::Model,
}

/// Opens a gateway order for one of the caller's registrations and records it as pending.
pub async fn create_order(
    db: &DatabaseConnection,
    gateway: &dyn PaymentGateway,
    student: &student::Model,
    input: CreateOrderInput,
) -> AppResult<CreatedOrder> {
    let registration = EventRegistrationRepository::new(db)
        .find_by_id(input.registration_id)
        .await?
        .ok_or_else(|| AppError::not_found("Registration not found"))?;

    if registration.student_id != student.id {
        return Err(AppError::forbidden(
            "You can only pay for your own registrations",
        ));
    }
    if registration.payment_status == PaymentStatus::Paid {
        return Err(AppError::conflict("Registration is already paid"));
    }

    let event = EventRepository::new(db)
        .find_by_id(registration.event_id)
        .await?
        .ok_or_else(|| AppError::not_found("Event not found"))?;
    let college = CollegeRepository::new(db)
        .find_by_id(event.college_id)
        .await?
        .ok_or_else(|| AppError::not_found("College not found"))?;

    let amount = input.amount.unwrap_or(event.fees);
    if amount <= 0 {
        return Err(AppError::validation("Amount must be greater than zero"));
    }
    let currency = input
        .currency
        .map(|c| c.trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let request =
        OrderRequest::for_registration(registration.id, amount, &currency, college.payee_account());
    let order = gateway.create_order(&request).await.map_err(|e| {
        tracing::error!(registration_id = %registration.id, "Gateway order failed: {e}");
        AppError::PaymentFailed(e.to_string())
    })?;

    let payment = PaymentRepository::new(db)
        .create(PaymentCreate {
            registration_id: registration.id,
            college_id: college.id,
            gateway_order_id: order.id.clone(),
            amount,
            currency,
            receipt_email: input.receipt_email.filter(|email| !email.trim().is_empty()),
        })
        .await?;

    tracing::info!(
        registration_id = %registration.id,
        order_id = %order.id,
        split = college.payee_account().is_some(),
        "Payment order created"
    );

    Ok(CreatedOrder { order, payment })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Applied,
    /// Same status and payment id were already recorded.
    Unchanged,
}

/// Reconciles a gateway callback into the payment and its registration.
///
/// Confirmations overwrite state rather than accumulate it, so a replayed callback settles to
/// the same rows and sends nothing, even when the replay arrives concurrently.
pub async fn confirm_payment(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    gateway_order_id: &str,
    status: &str,
    gateway_payment_id: Option<String>,
) -> AppResult<Settlement> {
    let status = PaymentStatus::parse(status)
        .ok_or_else(|| AppError::validation(format!("Unknown payment status '{status}'")))?;

    let Some(payment) = PaymentRepository::new(db)
        .find_by_order_id(gateway_order_id)
        .await?
    else {
        tracing::warn!(order_id = %gateway_order_id, "Confirmation for unknown order");
        return Err(AppError::not_found("Payment order not found"));
    };

    let txn = db.begin().await?;
    let payments = PaymentRepository::new(&txn);
    // the conditional write is the replay guard: of two identical callbacks only one applies
    if !payments
        .apply_status(payment.id, status, gateway_payment_id)
        .await?
    {
        txn.rollback().await?;
        tracing::info!(order_id = %gateway_order_id, "Duplicate confirmation ignored");
        return Ok(Settlement::Unchanged);
    }
    let payment = payments
        .find_by_id(payment.id)
        .await?
        .ok_or_else(|| AppError::not_found("Payment order not found"))?;

    let registrations = EventRegistrationRepository::new(&txn);
    let registration = registrations
        .find_by_id(payment.registration_id)
        .await?
        .ok_or_else(|| AppError::not_found("Registration not found"))?;

    // A failed retry never downgrades a registration that another order already paid.
    let next = match status {
        PaymentStatus::Paid => Some(PaymentStatus::Paid),
        PaymentStatus::Failed if registration.payment_status != PaymentStatus::Paid => {
            Some(PaymentStatus::Failed)
        }
        _ => None,
    };
    let registration = match next {
        Some(next) if next != registration.payment_status => {
            registrations.set_payment_status(registration, next).await?
        }
        _ => registration,
    };
    txn.commit().await?;

    tracing::info!(
        order_id = %payment.gateway_order_id,
        registration_id = %registration.id,
        status = status.as_str(),
        "Payment settled"
    );

    if status == PaymentStatus::Paid {
        send_payment_notifications(db, notifier, &payment, registration.student_id, registration.event_id)
            .await;
    }

    Ok(Settlement::Applied)
}

async fn send_payment_notifications(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    payment: &payment::Model,
    student_id: Uuid,
    event_id: Uuid,
) {
    let lookup = async {
        let student = StudentRepository::new(db).find_by_id(student_id).await?;
        let event = EventRepository::new(db).find_by_id(event_id).await?;
        let college = CollegeRepository::new(db).find_by_id(payment.college_id).await?;
        let user = match &student {
            Some(student) => UserRepository::new(db).find_by_id(student.user_id).await?,
            None => None,
        };
        anyhow::Ok((student, event, college, user))
    };

    let (student, event, college, user) = match lookup.await {
        Ok((Some(student), Some(event), Some(college), Some(user))) => {
            (student, event, college, user)
        }
        Ok(_) => {
            tracing::warn!(order_id = %payment.gateway_order_id, "Payment notifications skipped, records missing");
            return;
        }
        Err(e) => {
            tracing::warn!(order_id = %payment.gateway_order_id, "Payment notifications skipped: {e:#}");
            return;
        }
    };

    let mail = PaymentMail {
        payment,
        student: &student,
        student_email: &user.email,
        event: &event,
        college: &college,
    };

    let receipt_to = payment.receipt_email.as_deref().unwrap_or(&user.email);
    dispatch_best_effort(notifier, payment_receipt(receipt_to, &mail)).await;

    if let Some(contact) = college
        .contact_email
        .as_deref()
        .filter(|email| !email.trim().is_empty())
    {
        dispatch_best_effort(notifier, college_payment_notice(contact, &mail)).await;
    }
}
