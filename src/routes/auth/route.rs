use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router, http::StatusCode};

use super::dto::{
    AuthResponse, ForgotPasswordRequest, LoginRequest, MeResponse, RegisterRequest,
    ResetPasswordRequest,
};
use crate::error::AppResult;
use crate::extractor::{AppJson, AuthClaims, Principal};
use crate::routes::common::MessageResponse;
use crate::services::auth;
use crate::state::AppState;

pub fn create_route() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
        .route("/api/auth/forgot-password", post(forgot_password))
        .route("/api/auth/reset-password", post(reset_password))
        .route("/api/auth/me", get(me))
}

#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = AuthResponse),
        (status = 400, description = "Invalid payload"),
        (status = 403, description = "Admin self-registration"),
        (status = 404, description = "College not found"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Authentication"
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AuthResponse>)> {
    let session = auth::register(
        &state.db,
        &state.jwt,
        state.config.bcrypt_cost,
        payload.into(),
    )
    .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse::new(session, state.jwt.expires_in())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Authentication"
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    let session = auth::login(&state.db, &state.jwt, &payload.email, &payload.password).await?;
    Ok(Json(AuthResponse::new(session, state.jwt.expires_in())))
}

#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 200, description = "Reset link sent", body = MessageResponse),
        (status = 404, description = "Email not found")
    ),
    tag = "Authentication"
)]
pub async fn forgot_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ForgotPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    auth::forgot_password(
        &state.db,
        state.notifier.as_ref(),
        &state.config.public_base_url,
        &payload.email,
    )
    .await?;

    Ok(Json(MessageResponse::new(
        "Password reset link sent to your email",
    )))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password",
    request_body = ResetPasswordRequest,
    responses(
        (status = 200, description = "Password updated", body = MessageResponse),
        (status = 400, description = "Invalid or expired token")
    ),
    tag = "Authentication"
)]
pub async fn reset_password(
    State(state): State<AppState>,
    AppJson(payload): AppJson<ResetPasswordRequest>,
) -> AppResult<Json<MessageResponse>> {
    auth::reset_password(
        &state.db,
        state.config.bcrypt_cost,
        &payload.token,
        &payload.new_password,
    )
    .await?;

    Ok(Json(MessageResponse::new("Password has been reset successfully")))
}

#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current account", body = MeResponse),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Authentication"
)]
pub async fn me(AuthClaims(claims): AuthClaims, principal: Principal) -> Json<MeResponse> {
    let (profile_id, name, college_id) = match &principal {
        Principal::Student(student) => (
            Some(student.id),
            Some(student.name.clone()),
            Some(student.college_id),
        ),
        Principal::College(college) => (Some(college.id), Some(college.name.clone()), Some(college.id)),
        Principal::Admin(_) => (None, None, None),
    };

    Json(MeResponse {
        user_id: claims.sub,
        email: claims.email,
        role: principal.role(),
        profile_id,
        name,
        college_id,
    })
}
