use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error::ErrorBody;
use crate::routes::common::MessageResponse;
use crate::routes::{admin, auth, college, events, explore, fests, health, payments, reviews, student};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Unbound API",
        description = "College fests, events, registrations and payments"
    ),
    paths(
        health::route::health,
        health::route::ping,
        auth::route::register,
        auth::route::login,
        auth::route::forgot_password,
        auth::route::reset_password,
        auth::route::me,
        fests::route::create_fest,
        fests::route::list_fests,
        fests::route::get_fest,
        fests::route::update_fest,
        fests::route::delete_fest,
        fests::route::fest_events,
        fests::route::upload_image,
        events::route::create_event,
        events::route::list_events,
        events::route::get_event,
        events::route::update_event,
        events::route::delete_event,
        events::route::event_stats,
        events::route::upload_poster,
        events::route::approve_poster,
        events::route::reject_poster,
        events::route::delete_poster,
        reviews::route::submit_review,
        reviews::route::my_review,
        reviews::route::event_reviews,
        reviews::route::event_rating,
        student::route::register_for_event,
        student::route::my_registrations,
        student::route::dashboard_stats,
        student::route::download_certificate,
        student::route::event_teams,
        student::route::my_teams,
        student::route::team_detail,
        student::route::leave_team,
        payments::route::create_order,
        payments::route::verify_payment,
        college::route::update_payment_config,
        college::route::get_payment_config,
        college::route::dashboard_stats,
        college::route::earnings,
        college::route::registration_stats,
        college::route::analytics_by_fest,
        college::route::analytics_by_date,
        college::route::top_events,
        college::route::dashboard_events,
        college::route::event_registrations,
        college::route::approve_certificate,
        college::route::approve_all_certificates,
        college::route::approve_selected_certificates,
        admin::route::pending_fests,
        admin::route::pending_events,
        admin::route::approve_fest,
        admin::route::reject_fest,
        admin::route::approve_event,
        admin::route::reject_event,
        admin::route::dashboard_stats,
        admin::route::list_colleges,
        explore::route::explore_fests,
        explore::route::explore_events,
        explore::route::explore_stats,
    ),
    components(schemas(ErrorBody, MessageResponse)),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness and readiness"),
        (name = "Authentication", description = "Accounts and sessions"),
        (name = "Fests", description = "Fest management for colleges"),
        (name = "Events", description = "Event management for colleges"),
        (name = "Reviews", description = "Post-event ratings"),
        (name = "Student", description = "Registrations and certificates"),
        (name = "Teams", description = "Team membership"),
        (name = "Payments", description = "Gateway orders and confirmations"),
        (name = "College", description = "College payout settings"),
        (name = "College Dashboard", description = "College analytics and certificate approval"),
        (name = "Admin", description = "Moderation and platform totals"),
        (name = "Explore", description = "Public browsing")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            let scheme = HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .build();
            components.add_security_scheme("bearer_auth", SecurityScheme::Http(scheme));
        }
    }
}
