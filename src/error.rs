use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use http::StatusCode;
use sea_orm::DbErr;
use serde::Serialize;
use utoipa::ToSchema;

pub type AppResult<T> = Result<T, AppError>;

/// Every way a registration attempt can be refused, in the order the checks run.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationError {
    #[error("Event is not available for registration")]
    EventUnavailable,
    #[error("Registration for this event is closed")]
    RegistrationClosed,
    #[error("Registration deadline has passed")]
    DeadlinePassed,
    #[error("Already registered for this event")]
    AlreadyRegistered,
    #[error("Event is full")]
    EventFull,
    #[error("This event requires team registration")]
    TeamRequired,
    #[error("This event does not allow team registration")]
    TeamNotAllowed,
    #[error("Invalid registration type: {0}")]
    InvalidRegistrationType(String),
    #[error("Team name is required to create a team")]
    TeamNameRequired,
    #[error("Team not found")]
    TeamNotFound,
    #[error("Already a member of this team")]
    AlreadyTeamMember,
}

impl RegistrationError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::EventUnavailable | Self::TeamNotFound => StatusCode::NOT_FOUND,
            Self::RegistrationClosed | Self::DeadlinePassed | Self::EventFull => {
                StatusCode::FORBIDDEN
            }
            Self::AlreadyRegistered | Self::AlreadyTeamMember => StatusCode::CONFLICT,
            Self::TeamRequired
            | Self::TeamNotAllowed
            | Self::InvalidRegistrationType(_)
            | Self::TeamNameRequired => StatusCode::BAD_REQUEST,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::EventUnavailable => "Event Not Found",
            Self::RegistrationClosed | Self::DeadlinePassed | Self::EventFull => {
                "Registration Closed"
            }
            Self::AlreadyRegistered => "Already Registered",
            Self::TeamRequired | Self::TeamNotAllowed | Self::InvalidRegistrationType(_) => {
                "Invalid Registration Type"
            }
            Self::TeamNameRequired => "Validation Failed",
            Self::TeamNotFound => "Team Not Found",
            Self::AlreadyTeamMember => "Already Team Member",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Registration(#[from] RegistrationError),

    #[error("Payment gateway error: {0}")]
    PaymentFailed(String),

    #[error("Certificate generation failed: {0}")]
    Certificate(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Registration(e) => e.status_code(),
            Self::PaymentFailed(_) => StatusCode::PAYMENT_REQUIRED,
            Self::Certificate(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn title(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "Not Found",
            Self::Unauthorized(_) => "Unauthorized",
            Self::Forbidden(_) => "Forbidden",
            Self::Conflict(_) => "Conflict",
            Self::Validation(_) => "Validation Failed",
            Self::Registration(e) => e.title(),
            Self::PaymentFailed(_) => "Payment Failed",
            Self::Certificate(_) => "Certificate Generation Failed",
            Self::Internal(_) => "Internal Server Error",
        }
    }

    /// Message safe to hand back to the caller.
    fn public_message(&self) -> String {
        match self {
            Self::Internal(_) => "Something went wrong".to_string(),
            Self::Certificate(_) => "Could not generate the certificate".to_string(),
            Self::PaymentFailed(_) => "Payment gateway error".to_string(),
            other => other.to_string(),
        }
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        Self::Internal(err.into())
    }
}

impl From<MultipartError> for AppError {
    fn from(err: MultipartError) -> Self {
        Self::Validation(format!("Failed to read multipart field: {err}"))
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::Validation(rejection.body_text())
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    #[schema(example = "Not Found")]
    pub error: String,
    #[schema(example = "Event not found")]
    pub message: String,
    #[schema(example = "2025-01-10T08:00:00Z")]
    pub timestamp: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(status = %status, error = %self, "request rejected");
        }

        let body = ErrorBody {
            error: self.title().to_string(),
            message: self.public_message(),
            timestamp: Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}
