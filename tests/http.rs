mod common;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use common::*;
use unbound_backend::app::create_app;
use unbound_backend::entities::sea_orm_active_enums::RoleEnum;
use unbound_backend::entities::{college, student};
use unbound_backend::repositories::UserRepository;

fn app(ctx: &TestContext) -> Router {
    create_app(ctx.state.clone())
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn token_for_user(ctx: &TestContext, user_id: uuid::Uuid, role: RoleEnum) -> String {
    let user = UserRepository::new(&ctx.db)
        .find_by_id(user_id)
        .await
        .unwrap()
        .unwrap();
    ctx.state.jwt.create_jwt(user.id, &user.email, role).unwrap()
}

async fn student_token(ctx: &TestContext, student: &student::Model) -> String {
    token_for_user(ctx, student.user_id, RoleEnum::Student).await
}

async fn college_token(ctx: &TestContext, college: &college::Model) -> String {
    token_for_user(ctx, college.user_id, RoleEnum::College).await
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, token: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body)).unwrap()
}

#[tokio::test]
async fn ping_answers_pong() {
    let ctx = setup().await;
    let response = app(&ctx).oneshot(get("/ping", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], b"pong");
}

#[tokio::test]
async fn missing_token_is_unauthorized_with_error_body() {
    let ctx = setup().await;
    let response = app(&ctx)
        .oneshot(get("/api/student/events/my", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Unauthorized");
    assert!(body["message"].is_string());
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn garbage_token_is_unauthorized() {
    let ctx = setup().await;
    let response = app(&ctx)
        .oneshot(get("/api/auth/me", Some("not-a-jwt")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn student_token_cannot_reach_college_routes() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;
    let token = student_token(&ctx, &student).await;

    let response = app(&ctx)
        .oneshot(get("/api/college/dashboard/stats", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_json(response).await["error"], "Forbidden");
}

#[tokio::test]
async fn college_dashboard_reports_its_own_events() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 5)).await;
    let token = college_token(&ctx, &college).await;

    let response = app(&ctx)
        .oneshot(get("/api/college/dashboard/stats", Some(&token)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["totalEvents"], 1);
    assert_eq!(body["totalRegistrations"], 0);
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let ctx = setup().await;
    let response = app(&ctx)
        .oneshot(post_json("/api/auth/login", None, "{\"email\":".to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Validation Failed");
}

#[tokio::test]
async fn register_then_login_then_me() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;

    let register = json!({
        "email": "asha@mit.test",
        "password": "password123",
        "role": "student",
        "name": "Asha",
        "collegeId": college.id,
    });
    let response = app(&ctx)
        .oneshot(post_json("/api/auth/register", None, register.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let login = json!({ "email": "asha@mit.test", "password": "password123" });
    let response = app(&ctx)
        .oneshot(post_json("/api/auth/login", None, login.to_string()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["role"], "Student");
    let token = body["token"].as_str().unwrap().to_string();

    let response = app(&ctx)
        .oneshot(get("/api/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let me = body_json(response).await;
    assert_eq!(me["email"], "asha@mit.test");
    assert_eq!(me["collegeId"], college.id.to_string());
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let ctx = setup().await;
    let login = json!({ "email": "nobody@mit.test", "password": "password123" });
    let response = app(&ctx)
        .oneshot(post_json("/api/auth/login", None, login.to_string()))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn explore_is_public_and_hides_unapproved_events() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    seed_event(&ctx.db, &college, event_input("Quiz", date(2025, 1, 15), 0, 5)).await;
    unbound_backend::services::catalog::create_event(
        &ctx.db,
        &college,
        event_input("Pending", date(2025, 1, 16), 0, 5),
    )
    .await
    .unwrap();

    let response = app(&ctx)
        .oneshot(get("/api/explore/events", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|e| e["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Quiz"]);
}

#[tokio::test]
async fn registering_twice_over_http_is_a_conflict() {
    let ctx = setup().await;
    let college = seed_college(&ctx.db, "MIT", None).await;
    let event = seed_event(&ctx.db, &college, event_input("Quiz", date(2099, 1, 15), 0, 5)).await;
    let student = seed_student(&ctx.db, college.id, "Asha").await;
    let token = student_token(&ctx, &student).await;
    let payload = json!({ "eventId": event.id, "registrationType": "solo" }).to_string();

    let first = app(&ctx)
        .oneshot(post_json("/api/student/events/register", Some(&token), payload.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app(&ctx)
        .oneshot(post_json("/api/student/events/register", Some(&token), payload))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    assert_eq!(body_json(second).await["error"], "Already Registered");
}
