#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tempfile::TempDir;
use uuid::Uuid;

use unbound_backend::config::Config;
use unbound_backend::entities::sea_orm_active_enums::RoleEnum;
use unbound_backend::entities::{college, event, fest, student};
use unbound_backend::repositories::{
    CollegeCreate, CollegeRepository, EventCreate, EventRepository, EventUpdate, FestCreate,
    FestRepository, FestUpdate, StudentRepository, UserRepository,
};
use unbound_backend::services::catalog;
use unbound_backend::services::certificate::PdfCertificateRenderer;
use unbound_backend::services::notification::{Notification, Notifier};
use unbound_backend::services::payment_gateway::{
    GatewayError, GatewayOrder, OrderRequest, PaymentGateway,
};
use unbound_backend::state::AppState;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Reference "today" for scenarios; events are dated after it.
pub fn today() -> NaiveDate {
    date(2025, 1, 1)
}

#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<Notification>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }

    pub fn sent_to(&self, to: &str) -> Vec<Notification> {
        self.sent().into_iter().filter(|n| n.to == to).collect()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, notification: &Notification) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("mail queue unavailable");
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeGateway {
    counter: AtomicUsize,
    requests: Mutex<Vec<OrderRequest>>,
}

impl FakeGateway {
    pub fn requests(&self) -> Vec<OrderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(&self, request: &OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.requests.lock().unwrap().push(request.clone());
        Ok(GatewayOrder {
            id: format!("order_test_{n}"),
            amount: request.amount,
            currency: request.currency.clone(),
            receipt: Some(request.receipt.clone()),
            status: "created".to_string(),
        })
    }
}

pub struct TestContext {
    pub db: DatabaseConnection,
    pub state: AppState,
    pub notifier: Arc<RecordingNotifier>,
    pub gateway: Arc<FakeGateway>,
    _dir: TempDir,
}

pub async fn setup() -> TestContext {
    setup_with(RecordingNotifier::default(), 1).await
}

pub async fn setup_with_notifier(notifier: RecordingNotifier) -> TestContext {
    setup_with(notifier, 1).await
}

/// File-backed SQLite migrated from scratch. One connection serializes every transaction;
/// more let independent statements race on separate connections.
pub async fn setup_with(notifier: RecordingNotifier, max_connections: u32) -> TestContext {
    let dir = tempfile::tempdir().unwrap();
    let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());

    let mut opt = ConnectOptions::new(url.clone());
    opt.max_connections(max_connections).sqlx_logging(false);
    let db = Database::connect(opt).await.unwrap();
    Migrator::up(&db, None).await.unwrap();

    let mut config = Config::for_tests(&url);
    config.upload_dir = dir.path().join("uploads").to_string_lossy().into_owned();

    let notifier = Arc::new(notifier);
    let gateway = Arc::new(FakeGateway::default());
    let state = AppState::new(
        db.clone(),
        config,
        gateway.clone(),
        notifier.clone(),
        Arc::new(PdfCertificateRenderer),
    );

    TestContext {
        db,
        state,
        notifier,
        gateway,
        _dir: dir,
    }
}

pub async fn seed_college(
    db: &DatabaseConnection,
    name: &str,
    contact_email: Option<&str>,
) -> college::Model {
    let email = format!("college-{}@unbound.test", Uuid::new_v4().simple());
    let user = UserRepository::new(db)
        .create(&email, "hash".to_string(), RoleEnum::College)
        .await
        .unwrap();

    CollegeRepository::new(db)
        .create(CollegeCreate {
            user_id: user.id,
            name: name.to_string(),
            description: None,
            address: None,
            contact_email: contact_email.map(str::to_string),
        })
        .await
        .unwrap()
}

pub async fn seed_student(db: &DatabaseConnection, college_id: Uuid, name: &str) -> student::Model {
    let email = format!("student-{}@unbound.test", Uuid::new_v4().simple());
    let user = UserRepository::new(db)
        .create(&email, "hash".to_string(), RoleEnum::Student)
        .await
        .unwrap();

    StudentRepository::new(db)
        .create(user.id, college_id, name.to_string())
        .await
        .unwrap()
}

pub async fn student_email(db: &DatabaseConnection, student: &student::Model) -> String {
    UserRepository::new(db)
        .find_by_id(student.user_id)
        .await
        .unwrap()
        .unwrap()
        .email
}

pub fn event_input(name: &str, event_date: NaiveDate, fees: i32, capacity: i32) -> EventCreate {
    EventCreate {
        college_id: Uuid::nil(),
        fest_id: None,
        name: name.to_string(),
        description: format!("{name} description"),
        event_date,
        location: "Main Hall".to_string(),
        fees,
        capacity,
        team_is_allowed: false,
        category: Some("Technical".to_string()),
        mode: Some("Offline".to_string()),
        cash_prize: None,
        first_prize: None,
        second_prize: None,
        third_prize: None,
        city: Some("Pune".to_string()),
        state: Some("Maharashtra".to_string()),
        country: Some("India".to_string()),
        event_website: None,
        contact_phone: None,
        organizer_name: None,
        organizer_email: None,
        organizer_phone: None,
        rules: None,
        requirements: None,
        registration_deadline: event_date,
        registration_open: true,
    }
}

pub fn fest_input(name: &str, start_date: NaiveDate, end_date: NaiveDate) -> FestCreate {
    FestCreate {
        college_id: Uuid::nil(),
        name: name.to_string(),
        description: None,
        start_date,
        end_date,
        city: Some("Pune".to_string()),
        state: Some("Maharashtra".to_string()),
        country: Some("India".to_string()),
        mode: Some("Offline".to_string()),
        website: None,
        contact_phone: None,
    }
}

/// Creates the event through the catalog and approves it, so it is open for registration.
pub async fn seed_event(
    db: &DatabaseConnection,
    college: &college::Model,
    input: EventCreate,
) -> event::Model {
    let event = catalog::create_event(db, college, input).await.unwrap();
    EventRepository::new(db)
        .update(
            event,
            EventUpdate {
                approved: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

pub async fn seed_fest(
    db: &DatabaseConnection,
    college: &college::Model,
    input: FestCreate,
) -> fest::Model {
    let fest = catalog::create_fest(db, college, input).await.unwrap();
    FestRepository::new(db)
        .update(
            fest,
            FestUpdate {
                approved: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap()
}

pub async fn reload_event(db: &DatabaseConnection, event_id: Uuid) -> event::Model {
    EventRepository::new(db)
        .find_by_id(event_id)
        .await
        .unwrap()
        .unwrap()
}
