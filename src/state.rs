use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::jwt::JwtManager;
use crate::services::certificate::CertificateRenderer;
use crate::services::file_storage::FileStorage;
use crate::services::notification::Notifier;
use crate::services::payment_gateway::PaymentGateway;

/// Shared handles for every request. Cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
    pub jwt: JwtManager,
    pub gateway: Arc<dyn PaymentGateway>,
    pub notifier: Arc<dyn Notifier>,
    pub renderer: Arc<dyn CertificateRenderer>,
    pub storage: FileStorage,
}

impl AppState {
    pub fn new(
        db: DatabaseConnection,
        config: Config,
        gateway: Arc<dyn PaymentGateway>,
        notifier: Arc<dyn Notifier>,
        renderer: Arc<dyn CertificateRenderer>,
    ) -> Self {
        let jwt = JwtManager::new(&config.jwt_secret, config.jwt_expires_in);
        let storage = FileStorage::new(&config.upload_dir);

        Self {
            db,
            config: Arc::new(config),
            jwt,
            gateway,
            notifier,
            renderer,
            storage,
        }
    }
}
