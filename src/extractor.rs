use axum::RequestPartsExt;
use axum::extract::{FromRequest, FromRequestParts, OptionalFromRequestParts};
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;
use http::request::Parts;

use crate::entities::sea_orm_active_enums::RoleEnum;
use crate::entities::{college, student, user};
use crate::error::AppError;
use crate::jwt::Claims;
use crate::repositories::{CollegeRepository, StudentRepository, UserRepository};
use crate::state::AppState;

/// `Json` whose rejections render as [`AppError::Validation`].
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

/// `Query` whose rejections render as [`AppError::Validation`].
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct AppQuery<T>(pub T);

/// Verified bearer token claims.
#[derive(Debug, Clone)]
pub struct AuthClaims(pub Claims);

impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::Unauthorized("Missing bearer token".to_string()))?;

        let claims = state.jwt.decode_jwt(bearer.token()).map_err(|e| {
            tracing::debug!("Rejected token: {e:#}");
            AppError::Unauthorized("Invalid or expired token".to_string())
        })?;

        Ok(AuthClaims(claims))
    }
}

/// The authenticated caller with its profile loaded.
#[derive(Debug, Clone)]
pub enum Principal {
    Student(student::Model),
    College(college::Model),
    Admin(user::Model),
}

impl Principal {
    pub fn role(&self) -> RoleEnum {
        match self {
            Principal::Student(_) => RoleEnum::Student,
            Principal::College(_) => RoleEnum::College,
            Principal::Admin(_) => RoleEnum::Admin,
        }
    }

    async fn resolve(state: &AppState, claims: &Claims) -> Result<Self, AppError> {
        let gone = || AppError::Unauthorized("Account no longer exists".to_string());

        let principal = match claims.role {
            RoleEnum::Student => Principal::Student(
                StudentRepository::new(&state.db)
                    .find_by_user_id(claims.sub)
                    .await?
                    .ok_or_else(gone)?,
            ),
            RoleEnum::College => Principal::College(
                CollegeRepository::new(&state.db)
                    .find_by_user_id(claims.sub)
                    .await?
                    .ok_or_else(gone)?,
            ),
            RoleEnum::Admin => Principal::Admin(
                UserRepository::new(&state.db)
                    .find_by_id(claims.sub)
                    .await?
                    .filter(|u| u.role == RoleEnum::Admin)
                    .ok_or_else(gone)?,
            ),
        };
        Ok(principal)
    }
}

impl FromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthClaims(claims) = AuthClaims::from_request_parts(parts, state).await?;
        Principal::resolve(state, &claims).await
    }
}

/// Optional caller for public pages. A missing header is anonymous, a bad token is still 401.
impl OptionalFromRequestParts<AppState> for Principal {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Option<Self>, Self::Rejection> {
        if !parts.headers.contains_key(http::header::AUTHORIZATION) {
            return Ok(None);
        }
        let principal = <Principal as FromRequestParts<AppState>>::from_request_parts(parts, state)
            .await?;
        Ok(Some(principal))
    }
}

fn wrong_role(expected: RoleEnum) -> AppError {
    AppError::forbidden(format!("Only {} accounts can access this resource", expected.as_str()))
}

#[derive(Debug, Clone)]
pub struct StudentPrincipal(pub student::Model);

impl FromRequestParts<AppState> for StudentPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match <Principal as FromRequestParts<AppState>>::from_request_parts(parts, state).await? {
            Principal::Student(student) => Ok(StudentPrincipal(student)),
            _ => Err(wrong_role(RoleEnum::Student)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CollegePrincipal(pub college::Model);

impl FromRequestParts<AppState> for CollegePrincipal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match <Principal as FromRequestParts<AppState>>::from_request_parts(parts, state).await? {
            Principal::College(college) => Ok(CollegePrincipal(college)),
            _ => Err(wrong_role(RoleEnum::College)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminPrincipal(pub user::Model);

impl FromRequestParts<AppState> for AdminPrincipal {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match <Principal as FromRequestParts<AppState>>::from_request_parts(parts, state).await? {
            Principal::Admin(user) => Ok(AdminPrincipal(user)),
            _ => Err(wrong_role(RoleEnum::Admin)),
        }
    }
}
