use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use unbound_backend::bootstrap::initialize_admin_user;
use unbound_backend::config::Config;
use unbound_backend::database::init_database;
use unbound_backend::services::certificate::PdfCertificateRenderer;
use unbound_backend::services::notification::{LogNotifier, Notifier, RabbitMqNotifier};
use unbound_backend::services::payment_gateway::RazorpayGateway;
use unbound_backend::services::reminder::spawn_daily_reminders;
use unbound_backend::state::AppState;
use unbound_backend::{app, utils::tracing::init_standard_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = Config::parse();
    init_standard_tracing(env!("CARGO_CRATE_NAME"), &config.log_level);

    tracing::info!(env = %config.app_env, "Starting application...");

    let db = init_database(&config).await?;

    let notifier: Arc<dyn Notifier> = match config.rabbitmq_uri.as_deref() {
        Some(uri) => match RabbitMqNotifier::connect(uri, &config.mail_queue).await {
            Ok(notifier) => {
                tracing::info!(queue = %config.mail_queue, "Mail queue ready");
                Arc::new(notifier)
            }
            Err(e) => {
                tracing::error!("Failed to connect to mail queue: {e:#}");
                tracing::warn!("Continuing with notifications logged only...");
                Arc::new(LogNotifier)
            }
        },
        None => Arc::new(LogNotifier),
    };

    let gateway = Arc::new(RazorpayGateway::new(&config)?);
    let state = AppState::new(
        db.clone(),
        config,
        gateway,
        notifier.clone(),
        Arc::new(PdfCertificateRenderer),
    );

    state.storage.ensure_dirs().await?;

    if let Err(e) = initialize_admin_user(&db, &state.config).await {
        tracing::error!("Failed to initialize admin user: {e:#}");
        tracing::warn!("Continuing without admin user initialization...");
    }

    let reminders = spawn_daily_reminders(db, notifier, state.config.reminder_hour_utc);

    let http_address = format!("0.0.0.0:{}", state.config.port);
    let app = app::create_app(state);

    tracing::info!("HTTP server listening on {}", &http_address);
    let listener = tokio::net::TcpListener::bind(&http_address).await?;

    let result = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await;

    reminders.abort();
    result?;

    Ok(())
}
