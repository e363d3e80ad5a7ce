//! `SeaORM` active enums stored as short strings

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum RoleEnum {
    #[sea_orm(string_value = "Student")]
    Student,
    #[sea_orm(string_value = "College")]
    College,
    #[sea_orm(string_value = "Admin")]
    Admin,
}

impl RoleEnum {
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleEnum::Student => "Student",
            RoleEnum::College => "College",
            RoleEnum::Admin => "Admin",
        }
    }

    /// Case-insensitive parse, used for registration payloads and token claims.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Some(RoleEnum::Student),
            "college" => Some(RoleEnum::College),
            "admin" => Some(RoleEnum::Admin),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "paid")]
    Paid,
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "pending" | "created" => Some(PaymentStatus::Pending),
            "paid" | "captured" => Some(PaymentStatus::Paid),
            "failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_is_case_insensitive() {
        assert_eq!(RoleEnum::parse("student"), Some(RoleEnum::Student));
        assert_eq!(RoleEnum::parse(" COLLEGE "), Some(RoleEnum::College));
        assert_eq!(RoleEnum::parse("manager"), None);
    }

    #[test]
    fn test_payment_status_accepts_gateway_aliases() {
        assert_eq!(PaymentStatus::parse("captured"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::parse("Paid"), Some(PaymentStatus::Paid));
        assert_eq!(PaymentStatus::parse("refunded"), None);
    }
}
