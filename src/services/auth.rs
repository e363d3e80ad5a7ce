use anyhow::Context;
use chrono::Duration;
use sea_orm::{DatabaseConnection, TransactionTrait};
use uuid::Uuid;

use crate::config::PASSWORD_RESET_EXPIRED_MINUTES;
use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::user;
use crate::error::{AppError, AppResult};
use crate::jwt::JwtManager;
use crate::repositories::{
    CollegeCreate, CollegeRepository, PasswordResetTokenRepository, StudentRepository,
    UserRepository,
};
use crate::services::notification::{Notifier, dispatch_best_effort, password_reset};
use crate::utils::db::is_unique_violation;
use crate::utils::time::now;

const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
pub struct RegisterAccount {
    pub email: String,
    pub password: String,
    pub role: String,
    pub name: String,
    pub college_id: Option<Uuid>,
    pub description: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub token: String,
    pub role: RoleEnum,
    pub email: String,
    pub student_name: Option<String>,
    pub college_name: Option<String>,
}

fn validate_credentials(email: &str, password: &str) -> AppResult<()> {
    let email = email.trim();
    if email.is_empty() || !email.contains('@') {
        return Err(AppError::validation("A valid email is required"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

fn hash_password(password: &str, cost: u32) -> AppResult<String> {
    Ok(bcrypt::hash(password, cost).context("Failed to hash password")?)
}

pub async fn register(
    db: &DatabaseConnection,
    jwt: &JwtManager,
    bcrypt_cost: u32,
    input: RegisterAccount,
) -> AppResult<AuthSession> {
    validate_credentials(&input.email, &input.password)?;

    let role = RoleEnum::parse(&input.role)
        .ok_or_else(|| AppError::validation(format!("Unknown role '{}'", input.role)))?;
    if role == RoleEnum::Admin {
        return Err(AppError::forbidden("Admin accounts cannot be self-registered"));
    }

    let name = input.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::validation("Name is required"));
    }

    if UserRepository::new(db)
        .find_by_email(&input.email)
        .await?
        .is_some()
    {
        return Err(AppError::conflict("Email already registered"));
    }

    let college_id = match role {
        RoleEnum::Student => {
            let college_id = input.college_id.ok_or_else(|| {
                AppError::validation("College ID is required for student registration")
            })?;
            CollegeRepository::new(db)
                .find_by_id(college_id)
                .await?
                .ok_or_else(|| AppError::not_found("College not found for given collegeId"))?;
            Some(college_id)
        }
        _ => None,
    };

    let password_hash = hash_password(&input.password, bcrypt_cost)?;

    let txn = db.begin().await?;
    let user = UserRepository::new(&txn)
        .create(&input.email, password_hash, role)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                AppError::conflict("Email already registered")
            } else {
                AppError::from(e)
            }
        })?;

    let (student_name, college_name) = match (role, college_id) {
        (RoleEnum::Student, Some(college_id)) => {
            let student = StudentRepository::new(&txn)
                .create(user.id, college_id, name)
                .await?;
            (Some(student.name), None)
        }
        _ => {
            let college = CollegeRepository::new(&txn)
                .create(CollegeCreate {
                    user_id: user.id,
                    name,
                    description: input.description,
                    address: input.address,
                    contact_email: input.contact_email,
                })
                .await?;
            (None, Some(college.name))
        }
    };
    txn.commit().await?;

    tracing::info!(user_id = %user.id, role = role.as_str(), "Account registered");

    let token = jwt.create_jwt(user.id, &user.email, user.role)?;
    Ok(AuthSession {
        token,
        role: user.role,
        email: user.email,
        student_name,
        college_name,
    })
}

pub async fn login(
    db: &DatabaseConnection,
    jwt: &JwtManager,
    email: &str,
    password: &str,
) -> AppResult<AuthSession> {
    let invalid = || AppError::Unauthorized("Invalid credentials".to_string());

    let user = UserRepository::new(db)
        .find_by_email(email)
        .await?
        .ok_or_else(invalid)?;

    let valid = bcrypt::verify(password, &user.password).context("Failed to verify password")?;
    if !valid {
        tracing::debug!(user_id = %user.id, "Login rejected");
        return Err(invalid());
    }

    let (student_name, college_name) = profile_names(db, &user).await?;
    let token = jwt.create_jwt(user.id, &user.email, user.role)?;

    Ok(AuthSession {
        token,
        role: user.role,
        email: user.email,
        student_name,
        college_name,
    })
}

async fn profile_names(
    db: &DatabaseConnection,
    user: &user::Model,
) -> AppResult<(Option<String>, Option<String>)> {
    Ok(match user.role {
        RoleEnum::Student => (
            StudentRepository::new(db)
                .find_by_user_id(user.id)
                .await?
                .map(|s| s.name),
            None,
        ),
        RoleEnum::College => (
            None,
            CollegeRepository::new(db)
                .find_by_user_id(user.id)
                .await?
                .map(|c| c.name),
        ),
        RoleEnum::Admin => (None, None),
    })
}

/// Issues a reset token and mails the link. Earlier tokens of the user stop working.
pub async fn forgot_password(
    db: &DatabaseConnection,
    notifier: &dyn Notifier,
    public_base_url: &str,
    email: &str,
) -> AppResult<()> {
    let user = UserRepository::new(db)
        .find_by_email(email)
        .await?
        .ok_or_else(|| AppError::not_found("Email not found"))?;

    let tokens = PasswordResetTokenRepository::new(db);
    tokens.delete_by_user(user.id).await?;

    let token = Uuid::new_v4().to_string();
    let expires_at = now() + Duration::minutes(PASSWORD_RESET_EXPIRED_MINUTES);
    tokens.create(user.id, token.clone(), expires_at).await?;

    let link = format!(
        "{}/reset-password?token={}",
        public_base_url.trim_end_matches('/'),
        token
    );
    dispatch_best_effort(
        notifier,
        password_reset(&user.email, &link, PASSWORD_RESET_EXPIRED_MINUTES),
    )
    .await;

    tracing::info!(user_id = %user.id, "Password reset requested");
    Ok(())
}

pub async fn reset_password(
    db: &DatabaseConnection,
    bcrypt_cost: u32,
    token: &str,
    new_password: &str,
) -> AppResult<()> {
    let invalid = || AppError::validation("Invalid or expired token");

    let tokens = PasswordResetTokenRepository::new(db);
    let reset_token = tokens.find_by_token(token).await?.ok_or_else(invalid)?;
    if reset_token.expires_at < now() {
        tokens.delete(reset_token.id).await?;
        return Err(invalid());
    }

    if new_password.len() < MIN_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    let password_hash = hash_password(new_password, bcrypt_cost)?;

    let txn = db.begin().await?;
    UserRepository::new(&txn)
        .update_password(reset_token.user_id, password_hash)
        .await?;
    PasswordResetTokenRepository::new(&txn)
        .delete(reset_token.id)
        .await?;
    txn.commit().await?;

    tracing::info!(user_id = %reset_token.user_id, "Password reset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_credentials() {
        assert!(validate_credentials("a@b.com", "secret1").is_ok());
        assert!(matches!(
            validate_credentials("not-an-email", "secret1"),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate_credentials("a@b.com", "123"),
            Err(AppError::Validation(_))
        ));
    }
}
