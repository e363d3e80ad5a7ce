use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::services::auth::{AuthSession, RegisterAccount};

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[schema(example = "student@college.edu")]
    pub email: String,

    #[schema(example = "password123")]
    pub password: String,

    /// `Student` or `College`.
    #[schema(example = "Student")]
    pub role: String,

    /// Student or college display name.
    #[schema(example = "Asha Rao")]
    pub name: String,

    /// Required for students.
    pub college_id: Option<Uuid>,

    pub description: Option<String>,
    pub address: Option<String>,
    pub contact_email: Option<String>,
}

impl From<RegisterRequest> for RegisterAccount {
    fn from(request: RegisterRequest) -> Self {
        RegisterAccount {
            email: request.email,
            password: request.password,
            role: request.role,
            name: request.name,
            college_id: request.college_id,
            description: request.description,
            address: request.address,
            contact_email: request.contact_email,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "student@college.edu")]
    pub email: String,

    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub role: RoleEnum,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cname: Option<String>,
}

impl AuthResponse {
    pub fn new(session: AuthSession, expires_in: i64) -> Self {
        AuthResponse {
            token: session.token,
            token_type: "Bearer".to_string(),
            expires_in,
            role: session.role,
            email: session.email,
            sname: session.student_name,
            cname: session.college_name,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ForgotPasswordRequest {
    #[schema(example = "student@college.edu")]
    pub email: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    pub token: String,

    #[schema(example = "newPassword123")]
    pub new_password: String,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub user_id: Uuid,
    pub email: String,
    pub role: RoleEnum,
    /// Student or college profile id; absent for admins.
    pub profile_id: Option<Uuid>,
    pub name: Option<String>,
    pub college_id: Option<Uuid>,
}
