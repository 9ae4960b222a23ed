//! HTTP middleware (CORS, timing headers, request logging, 404 handler)

use std::time::Instant;

use axum::extract::Request;
use axum::http::{HeaderName, HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use tower_http::cors::{AllowOrigin, CorsLayer};

use super::types::ApiError;
use crate::core::config::is_all_interfaces;

pub const REQUEST_TIME_HEADER: HeaderName = HeaderName::from_static("request-time");
pub const ACTION_TIME_HEADER: HeaderName = HeaderName::from_static("action-time");

/// Paths that are polled often enough to drown the request log
const UNLOGGED_PATHS: &[&str] = &["/", "/health", "/ping"];

/// Allowed origins configuration
#[derive(Debug, Clone)]
pub struct AllowedOrigins {
    origins: Vec<String>,
}

impl AllowedOrigins {
    /// Create allowed origins from host and port configuration
    pub fn new(host: &str, port: u16) -> Self {
        let mut origins = Vec::new();
        let is_all = is_all_interfaces(host);

        let base_hosts: Vec<&str> = if is_all || host == "127.0.0.1" || host == "localhost" {
            vec!["localhost", "127.0.0.1"]
        } else {
            vec![host]
        };

        for h in &base_hosts {
            origins.push(format!("http://{}:{}", h, port));
            origins.push(format!("http://{}", h));
        }

        // LAN clients reach us by interface address
        if is_all && let Ok(interfaces) = local_ip_address::list_afinet_netifas() {
            for (_, ip) in interfaces
                .iter()
                .filter(|(_, ip)| ip.is_ipv4() && !ip.is_loopback())
            {
                origins.push(format!("http://{}:{}", ip, port));
            }
        }

        Self { origins }
    }

    pub fn is_allowed(&self, origin: &str) -> bool {
        self.origins.iter().any(|o| o == origin)
    }

    fn as_header_values(&self) -> Vec<HeaderValue> {
        self.origins.iter().filter_map(|o| o.parse().ok()).collect()
    }
}

/// Create CORS layer
pub fn cors(allowed: &AllowedOrigins) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed.as_header_values()))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            header::ORIGIN,
            header::ACCEPT_LANGUAGE,
        ])
        .expose_headers([REQUEST_TIME_HEADER, ACTION_TIME_HEADER])
}

/// Elapsed milliseconds, never reported as zero
fn elapsed_millis(start: Instant) -> u128 {
    start.elapsed().as_millis().max(1)
}

/// Set `Request-Time` and `Action-Time` unless a handler already did
pub async fn timing_headers(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let mut response = next.run(req).await;

    let value = HeaderValue::from(elapsed_millis(start) as u64);
    let headers = response.headers_mut();
    if !headers.contains_key(&REQUEST_TIME_HEADER) {
        headers.insert(REQUEST_TIME_HEADER, value.clone());
    }
    if !headers.contains_key(&ACTION_TIME_HEADER) {
        headers.insert(ACTION_TIME_HEADER, value);
    }
    response
}

/// Log method, path, status and duration of every request outside
/// [`UNLOGGED_PATHS`]
pub async fn log_requests(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let request_id = req
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let response = next.run(req).await;

    if !UNLOGGED_PATHS.contains(&path.as_str()) {
        tracing::info!(
            method = %method,
            path = %path,
            status = response.status().as_u16(),
            request_id = request_id.as_deref().unwrap_or("-"),
            took_ms = start.elapsed().as_millis() as u64,
            "Request handled"
        );
    }
    response
}

/// JSON 404 for unknown routes
pub async fn handle_404(req: Request) -> impl IntoResponse {
    tracing::debug!(method = %req.method(), uri = %req.uri(), "[404]");
    ApiError::not_found(
        "ROUTE_NOT_FOUND",
        format!("No route for {} {}", req.method(), req.uri().path()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::body::Body;
    use axum::http::StatusCode;
    use axum::routing::get;
    use tower::ServiceExt;

    #[test]
    fn test_allowed_origins_localhost() {
        let allowed = AllowedOrigins::new("127.0.0.1", 8080);
        assert!(allowed.is_allowed("http://localhost:8080"));
        assert!(allowed.is_allowed("http://127.0.0.1:8080"));
        assert!(!allowed.is_allowed("http://evil.example:8080"));
    }

    #[test]
    fn test_allowed_origins_custom_host() {
        let allowed = AllowedOrigins::new("users.internal", 9000);
        assert!(allowed.is_allowed("http://users.internal:9000"));
        assert!(!allowed.is_allowed("http://localhost:9000"));
    }

    #[tokio::test]
    async fn test_timing_headers_are_at_least_one() {
        let app = Router::new()
            .route("/x", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn(timing_headers));

        let response = app
            .oneshot(Request::builder().uri("/x").body(Body::empty()).unwrap())
            .await
            .unwrap();

        for name in [REQUEST_TIME_HEADER, ACTION_TIME_HEADER] {
            let value: u64 = response.headers()[&name].to_str().unwrap().parse().unwrap();
            assert!(value >= 1);
        }
    }

    #[tokio::test]
    async fn test_handler_timing_header_is_kept() {
        let app = Router::new()
            .route(
                "/x",
                get(|| async { ([(ACTION_TIME_HEADER, HeaderValue::from_static("7"))], "ok") }),
            )
            .layer(axum::middleware::from_fn(timing_headers));

        let response = app
            .oneshot(Request::builder().uri("/x").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.headers()[&ACTION_TIME_HEADER], "7");
    }

    #[tokio::test]
    async fn test_404_is_json() {
        let app = Router::new().fallback(handle_404);
        let response = app
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/json"
        );
    }
}
