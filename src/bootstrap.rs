use anyhow::{Context, Result};
use sea_orm::DatabaseConnection;

use crate::config::Config;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::repositories::UserRepository;

/// Seeds the admin account from configuration. Admins cannot self-register.
pub async fn initialize_admin_user(db: &DatabaseConnection, config: &Config) -> Result<()> {
    let users = UserRepository::new(db);

    if let Some(existing) = users
        .find_by_email(&config.admin_email)
        .await
        .context("Failed to check existing admin")?
    {
        if existing.role != RoleEnum::Admin {
            tracing::warn!(email = %existing.email, "Admin email belongs to a non-admin account");
        } else {
            tracing::info!("Admin user already exists, skipping initialization");
        }
        return Ok(());
    }

    tracing::info!("Creating default admin user...");

    let hashed_password = bcrypt::hash(&config.admin_password, config.bcrypt_cost)
        .context("Failed to hash admin password")?;

    let admin = users
        .create(&config.admin_email, hashed_password, RoleEnum::Admin)
        .await
        .context("Failed to insert admin user")?;

    tracing::info!(email = %admin.email, "Admin user created");
    tracing::warn!("Change the default admin password after first login");

    Ok(())
}
