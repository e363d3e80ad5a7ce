use std::collections::HashSet;
use std::sync::Arc;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use http::header;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::{
    ServiceBuilderExt,
    cors::{AllowOrigin, Any, CorsLayer},
    propagate_header::PropagateHeaderLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api_docs::ApiDoc;
use crate::config::Config;
use crate::middleware::http_logger::http_logger;
use crate::routes;
use crate::services::file_storage::UPLOADS_URL_PREFIX;
use crate::state::AppState;

/// Poster and banner uploads are capped at 10 MiB.
const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

pub fn create_app(state: AppState) -> Router {
    let mut router = Router::new()
        .merge(routes::health::create_route())
        .merge(routes::auth::create_route())
        .merge(routes::fests::create_route())
        .merge(routes::events::create_route())
        .merge(routes::reviews::create_route())
        .merge(routes::student::create_route())
        .merge(routes::payments::create_route())
        .merge(routes::college::create_route())
        .merge(routes::admin::create_route())
        .merge(routes::explore::create_route())
        .nest_service(UPLOADS_URL_PREFIX, ServeDir::new(state.storage.root()));

    if state.config.swagger_enabled {
        router = router.merge(
            SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()),
        );
    }

    let router = router.layer(middleware::from_fn_with_state(state.clone(), http_logger));

    let sensitive_headers: Arc<[_]> = vec![header::AUTHORIZATION, header::COOKIE].into();
    let middleware = ServiceBuilder::new()
        .layer(cors_layer(&state.config))
        .layer(PropagateHeaderLayer::new(header::HeaderName::from_static(
            "x-request-id",
        )))
        .sensitive_request_headers(sensitive_headers.clone())
        .sensitive_response_headers(sensitive_headers)
        .compression();

    router
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(middleware)
        .with_state(state)
}

fn cors_layer(config: &Config) -> CorsLayer {
    let allowed_headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        header::ACCEPT,
        header::ACCEPT_LANGUAGE,
    ];
    let allowed_methods = [
        http::Method::GET,
        http::Method::POST,
        http::Method::PUT,
        http::Method::DELETE,
        http::Method::PATCH,
        http::Method::OPTIONS,
    ];

    // Credentials cannot be combined with a wildcard origin.
    if config.cors_allowed_origins.trim() == "*" {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(allowed_methods)
            .allow_headers(allowed_headers)
            .allow_credentials(false);
    }

    let origins: Vec<http::HeaderValue> = config
        .cors_allowed_origins
        .split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .collect::<HashSet<_>>()
        .into_iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(allowed_methods)
        .allow_headers(allowed_headers)
        .allow_credentials(true)
}
