use std::time::Duration;

use anyhow::{Context, Result};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};

use crate::config::Config;

pub async fn get_database_connection(database_url: &str) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url);
    opt.connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    Database::connect(opt)
        .await
        .context("Failed to connect to database")
}

/// Connects and, when enabled, brings the schema up to date.
pub async fn init_database(config: &Config) -> Result<DatabaseConnection> {
    let db = get_database_connection(&config.database_url).await?;

    if config.run_migrations {
        Migrator::up(&db, None)
            .await
            .context("Failed to run migrations")?;
        tracing::info!("Database migrations applied");
    }

    Ok(db)
}
