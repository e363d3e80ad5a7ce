use anyhow::{Context, Result};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RoleEnum;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// User id.
    pub sub: Uuid,
    pub email: String,
    pub role: RoleEnum,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in: i64,
}

impl JwtManager {
    pub fn new(secret: &str, expires_in: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
        }
    }

    pub fn expires_in(&self) -> i64 {
        self.expires_in
    }

    pub fn create_jwt(&self, user_id: Uuid, email: &str, role: RoleEnum) -> Result<String> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            role,
            iat: now,
            exp: now + self.expires_in,
        };

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to sign token")
    }

    pub fn decode_jwt(&self, token: &str) -> Result<Claims> {
        let data = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .context("Invalid token")?;
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_decode() {
        let manager = JwtManager::new("secret", 3600);
        let user_id = Uuid::new_v4();

        let token = manager
            .create_jwt(user_id, "a@b.com", RoleEnum::Student)
            .unwrap();
        let claims = manager.decode_jwt(&token).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.role, RoleEnum::Student);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_expired_token_rejected() {
        // past the default 60s leeway
        let manager = JwtManager::new("secret", -600);
        let token = manager
            .create_jwt(Uuid::new_v4(), "a@b.com", RoleEnum::Admin)
            .unwrap();

        assert!(manager.decode_jwt(&token).is_err());
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtManager::new("one", 3600)
            .create_jwt(Uuid::new_v4(), "a@b.com", RoleEnum::College)
            .unwrap();

        assert!(JwtManager::new("two", 3600).decode_jwt(&token).is_err());
    }
}
