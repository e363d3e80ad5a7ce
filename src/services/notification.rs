use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use lapin::{BasicProperties, Connection, ConnectionProperties, options::*};
use serde_json::json;

use crate::entities::{college, event, event_registration, fest, payment, student, team};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Outbound mail. Implementations only deliver; callers decide whether failure matters.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<()>;
}

/// Publishes mail jobs to the mail worker queue.
pub struct RabbitMqNotifier {
    connection: Connection,
    queue: String,
}

impl RabbitMqNotifier {
    pub async fn connect(uri: &str, queue: &str) -> Result<Self> {
        let connection = Connection::connect(uri, ConnectionProperties::default())
            .await
            .context("Failed to connect to RabbitMQ")?;

        let channel = connection
            .create_channel()
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create RabbitMQ channel: {}", e))?;

        channel
            .queue_declare(
                queue,
                QueueDeclareOptions::default(),
                Default::default(),
            )
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create RabbitMQ queue: {}", e))?;

        Ok(Self {
            connection,
            queue: queue.to_string(),
        })
    }
}

#[async_trait]
impl Notifier for RabbitMqNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        let standard_msg = json!({
            "pattern": "send-email",
            "data": {
                "to": notification.to,
                "subject": notification.subject,
                "text": notification.body
            }
        });

        let channel = self.connection.create_channel().await?;

        channel
            .basic_publish(
                "",
                self.queue.as_str(),
                BasicPublishOptions::default(),
                standard_msg.to_string().as_bytes(),
                BasicProperties::default(),
            )
            .await?;

        Ok(())
    }
}

/// Used when no broker is configured.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<()> {
        tracing::info!(
            to = %notification.to,
            subject = %notification.subject,
            "Mail queue not configured, notification logged only"
        );
        Ok(())
    }
}

/// Sends and swallows failures. A notification outage never fails the caller.
pub async fn dispatch_best_effort(notifier: &dyn Notifier, notification: Notification) {
    if let Err(e) = notifier.send(&notification).await {
        tracing::warn!(
            to = %notification.to,
            subject = %notification.subject,
            "Failed to dispatch notification: {e:#}"
        );
    }
}

pub struct RegistrationMail<'a> {
    pub student: &'a student::Model,
    pub student_email: &'a str,
    pub event: &'a event::Model,
    pub college: &'a college::Model,
    pub fest: Option<&'a fest::Model>,
    pub registration: &'a event_registration::Model,
    pub team: Option<&'a team::Model>,
}

pub fn registration_confirmation(mail: RegistrationMail<'_>) -> Notification {
    let RegistrationMail {
        student,
        student_email,
        event,
        college,
        fest,
        registration,
        team,
    } = mail;

    let registration_type = if team.is_some() { "TEAM" } else { "SOLO" };
    let mut body = format!(
        "Dear {},\n\nThank you for registering for the event!\n\n\
         === REGISTRATION RECEIPT ===\n\
         Receipt Number: {}\n\
         Registration Date: {}\n\
         Registration Type: {}\n\n\
         === EVENT DETAILS ===\n\
         Event Name: {}\n\
         Event Date: {}\n\
         Location: {}\n\
         Entry Fee: {}\n\
         Registration Deadline: {}\n\n",
        student.name,
        registration.receipt_number,
        format_datetime(registration.registered_at),
        registration_type,
        event.name,
        event.event_date,
        event.location,
        event.fees,
        event.registration_deadline,
    );

    if let Some(cash_prize) = event.cash_prize.as_deref().filter(|p| !p.is_empty()) {
        body.push_str("=== PRIZES ===\n");
        body.push_str(&format!("Cash Prize: {cash_prize}\n"));
        for (label, prize) in [
            ("1st Prize", &event.first_prize),
            ("2nd Prize", &event.second_prize),
            ("3rd Prize", &event.third_prize),
        ] {
            if let Some(prize) = prize {
                body.push_str(&format!("{label}: {prize}\n"));
            }
        }
        body.push('\n');
    }

    body.push_str("=== ORGANIZER DETAILS ===\n");
    body.push_str(&format!("College: {}\n", college.name));
    if let Some(fest) = fest {
        body.push_str(&format!("Fest: {}\n", fest.name));
    }
    if let Some(organizer) = &event.organizer_name {
        body.push_str(&format!("Organizer: {organizer}\n"));
    }
    if let Some(organizer_email) = &event.organizer_email {
        body.push_str(&format!("Organizer Email: {organizer_email}\n"));
    }
    body.push('\n');

    if let Some(team) = team {
        body.push_str(&format!("=== TEAM DETAILS ===\nTeam Name: {}\n\n", team.name));
    }

    body.push_str(&format!(
        "=== PAYMENT STATUS ===\nStatus: {}\n",
        registration.payment_status.as_str().to_uppercase()
    ));
    if !event.is_free() && !registration.is_settled(event.fees) {
        body.push_str("Please complete your payment to confirm your registration.\n");
    }
    body.push_str("\nWe look forward to seeing you at the event!\n\n- Unbound Platform Team\n");

    Notification {
        to: student_email.to_string(),
        subject: format!("Registration Confirmation - {}", event.name),
        body,
    }
}

pub struct PaymentMail<'a> {
    pub payment: &'a payment::Model,
    pub student: &'a student::Model,
    pub student_email: &'a str,
    pub event: &'a event::Model,
    pub college: &'a college::Model,
}

pub fn payment_receipt(to: &str, mail: &PaymentMail<'_>) -> Notification {
    let payment = mail.payment;
    let body = format!(
        "Dear {},\n\n\
         Your payment for event '{}' was successful!\n\n\
         Payment Details:\n\
         - Amount: {} {}\n\
         - Payment ID: {}\n\
         - Order ID: {}\n\
         - College: {}\n\
         - Event: {}\n\n\
         The payment has been received by {}.\n\n\
         Thank you for registering!\n\n\
         - Unbound Platform Team",
        mail.student.name,
        mail.event.name,
        payment.amount,
        payment.currency,
        payment.gateway_payment_id.as_deref().unwrap_or("-"),
        payment.gateway_order_id,
        mail.college.name,
        mail.event.name,
        mail.college.name,
    );

    Notification {
        to: to.to_string(),
        subject: "Payment Receipt - Unbound Event Registration".to_string(),
        body,
    }
}

pub fn college_payment_notice(to: &str, mail: &PaymentMail<'_>) -> Notification {
    let payment = mail.payment;
    let body = format!(
        "Dear {},\n\n\
         A new payment has been received for your event!\n\n\
         Payment Details:\n\
         - Student: {} ({})\n\
         - Event: {}\n\
         - Amount: {} {}\n\
         - Payment ID: {}\n\
         - Order ID: {}\n\n\
         The payment has been credited to your account.\n\n\
         - Unbound Platform Team",
        mail.college.name,
        mail.student.name,
        mail.student_email,
        mail.event.name,
        payment.amount,
        payment.currency,
        payment.gateway_payment_id.as_deref().unwrap_or("-"),
        payment.gateway_order_id,
    );

    Notification {
        to: to.to_string(),
        subject: "New Payment Received - Event Registration".to_string(),
        body,
    }
}

pub fn event_reminder(to: &str, student_name: &str, event: &event::Model) -> Notification {
    Notification {
        to: to.to_string(),
        subject: format!("Reminder: {} is tomorrow", event.name),
        body: format!(
            "Dear {},\n\nThis is a reminder that '{}' takes place on {} at {}.\n\n\
             Please arrive 15 minutes early and bring your college ID card.\n\n\
             - Unbound Platform Team",
            student_name, event.name, event.event_date, event.location
        ),
    }
}

pub fn password_reset(to: &str, reset_link: &str, valid_minutes: i64) -> Notification {
    Notification {
        to: to.to_string(),
        subject: "Password Reset Request".to_string(),
        body: format!(
            "To reset your password, open the link below:\n{reset_link}\n\n\
             This link is valid for {valid_minutes} minutes. If you did not request a reset, \
             ignore this email."
        ),
    }
}

fn format_datetime(value: NaiveDateTime) -> String {
    value.format("%Y-%m-%dT%H:%M:%S").to_string()
}

pub fn format_date(value: NaiveDate) -> String {
    value.format("%Y-%m-%d").to_string()
}
