use std::time::Instant;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, header};
use http_body_util::BodyExt;
use serde_json::Value;

use crate::error::AppError;
use crate::state::AppState;

const REDACTED: &str = "[REDACTED]";

const SENSITIVE_FIELDS: [&str; 10] = [
    "password",
    "newpassword",
    "token",
    "authorization",
    "secret",
    "api_key",
    "apikey",
    "bankaccountnumber",
    "bank_account_number",
    "credentials",
];

const SENSITIVE_HEADERS: [&str; 4] = ["authorization", "cookie", "set-cookie", "x-api-key"];

fn should_ignore_path(path: &str) -> bool {
    matches!(path, "/ping" | "/api/health" | "/api/health/") || path.starts_with("/uploads/")
}

fn is_sensitive_field(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    SENSITIVE_FIELDS.contains(&name.as_str())
}

/// Replaces sensitive values at any depth.
fn redact(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| {
                    if is_sensitive_field(&key) {
                        (key, Value::String(REDACTED.to_string()))
                    } else {
                        (key, redact(value))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(redact).collect()),
        other => other,
    }
}

fn redact_headers(headers: &HeaderMap) -> HeaderMap {
    let mut filtered = headers.clone();
    for name in SENSITIVE_HEADERS {
        if filtered.contains_key(name) {
            filtered.insert(name, HeaderValue::from_static(REDACTED));
        }
    }
    filtered
}

fn json_or_empty(bytes: &[u8]) -> Value {
    serde_json::from_slice::<Value>(bytes)
        .map(redact)
        .unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
}

fn is_json(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|ct| ct.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/json"))
}

pub async fn http_logger(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let start_time = Instant::now();

    let method = req.method().clone();
    let uri = req.uri().clone();
    let path = uri.path().to_string();

    if should_ignore_path(&path) || method == Method::OPTIONS {
        return Ok(next.run(req).await);
    }

    let req_headers = req.headers().clone();
    let x_request_id = req_headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Multipart uploads pass through untouched.
    let (req, req_body) = if is_json(&req_headers) {
        let (parts, body) = req.into_parts();
        let bytes = buffer_body("request", body).await?;
        let logged = json_or_empty(&bytes);
        (Request::from_parts(parts, Body::from(bytes)), logged)
    } else {
        (req, Value::Object(serde_json::Map::new()))
    };

    let response = next.run(req).await;
    let latency = start_time.elapsed();
    let status = response.status();

    let (response, res_body) = if is_json(response.headers()) {
        let (parts, body) = response.into_parts();
        let bytes = buffer_body("response", body).await?;
        let logged = json_or_empty(&bytes);
        (Response::from_parts(parts, Body::from(bytes)), logged)
    } else {
        (response, Value::Object(serde_json::Map::new()))
    };

    tracing::info!(
        method = %method,
        uri = %uri,
        path = %path,
        x_request_id = %x_request_id,
        req_headers = ?redact_headers(&req_headers),
        req_body = %req_body,
        status = status.as_u16(),
        latency_ms = latency.as_millis(),
        res_body = %res_body,
        app_env = %state.config.app_env,
        "HTTP request completed"
    );

    Ok(response)
}

async fn buffer_body<B>(direction: &str, body: B) -> Result<Bytes, AppError>
where
    B: BodyExt,
    B::Error: std::fmt::Display,
{
    body.collect()
        .await
        .map(|collected| collected.to_bytes())
        .map_err(|err| AppError::validation(format!("failed to read {direction} body: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_redact_nested_fields() {
        let body = json!({
            "email": "a@b.com",
            "password": "hunter22",
            "config": { "bankAccountNumber": "1234", "ifsc": "X" },
            "items": [{ "token": "abc" }]
        });

        let redacted = redact(body);
        assert_eq!(redacted["email"], "a@b.com");
        assert_eq!(redacted["password"], REDACTED);
        assert_eq!(redacted["config"]["bankAccountNumber"], REDACTED);
        assert_eq!(redacted["config"]["ifsc"], "X");
        assert_eq!(redacted["items"][0]["token"], REDACTED);
    }

    #[test]
    fn test_redact_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer x"));
        headers.insert(header::ACCEPT, HeaderValue::from_static("*/*"));

        let filtered = redact_headers(&headers);
        assert_eq!(filtered[header::AUTHORIZATION], REDACTED);
        assert_eq!(filtered[header::ACCEPT], "*/*");
    }
}
