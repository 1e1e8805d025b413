use axum::body::Body;
use axum::http::header::HeaderName;
use axum::http::{Request, StatusCode};
use axum::Router;
use std::time::Duration;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{Level, Span};

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Per-request bounds enforced in front of every route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpLimits {
    /// Requests still running after this are answered with 408.
    pub request_timeout: Duration,
    /// Larger bodies are answered with 413 before any handler runs.
    pub max_body_bytes: usize,
}

impl Default for HttpLimits {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            max_body_bytes: 2 * 1024 * 1024,
        }
    }
}

fn request_span(service_name: &'static str) -> impl Fn(&Request<Body>) -> Span + Clone {
    move |request: &Request<Body>| {
        let request_id = request
            .headers()
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or("-");
        tracing::info_span!(
            "http.request",
            service = service_name,
            method = %request.method(),
            uri = %request.uri(),
            request_id = %request_id
        )
    }
}

/// Wraps `router` with request ids, the configured limits, tracing and
/// per-route metrics. The request id is assigned first so every later layer
/// and the access log see it.
pub fn apply_service_layers(
    router: Router,
    service_name: &'static str,
    limits: HttpLimits,
) -> Router {
    tracing::debug!(
        timeout_ms = limits.request_timeout.as_millis() as u64,
        max_body_bytes = limits.max_body_bytes,
        "http limits"
    );

    let request_id = HeaderName::from_static(REQUEST_ID_HEADER);
    let trace = TraceLayer::new_for_http()
        .make_span_with(request_span(service_name))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    router
        .layer(crate::metrics::MetricsLayer::new(service_name))
        .layer(trace)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            limits.request_timeout,
        ))
        .layer(RequestBodyLimitLayer::new(limits.max_body_bytes))
        .layer(PropagateRequestIdLayer::new(request_id.clone()))
        .layer(SetRequestIdLayer::new(request_id, MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::{get, post};
    use tower::ServiceExt;

    fn echo_router(limits: HttpLimits) -> Router {
        let router = Router::new()
            .route("/", get(|| async { StatusCode::OK }))
            .route("/echo", post(|body: String| async move { body }))
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    StatusCode::OK
                }),
            );
        apply_service_layers(router, "bm-test", limits)
    }

    fn post_bytes(len: usize) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/echo")
            .header(axum::http::header::CONTENT_LENGTH, len)
            .body(Body::from(vec![b'a'; len]))
            .unwrap()
    }

    #[tokio::test]
    async fn assigns_a_request_id() {
        let response = echo_router(HttpLimits::default())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(REQUEST_ID_HEADER).is_some());
    }

    #[tokio::test]
    async fn keeps_the_callers_request_id() {
        let response = echo_router(HttpLimits::default())
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(REQUEST_ID_HEADER, "req-42")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.headers().get(REQUEST_ID_HEADER).unwrap(), "req-42");
    }

    #[tokio::test]
    async fn body_limit_follows_configuration() {
        let limits = HttpLimits {
            max_body_bytes: 16,
            ..HttpLimits::default()
        };

        let within = echo_router(limits).oneshot(post_bytes(16)).await.unwrap();
        assert_eq!(within.status(), StatusCode::OK);

        let over = echo_router(limits).oneshot(post_bytes(17)).await.unwrap();
        assert_eq!(over.status(), StatusCode::PAYLOAD_TOO_LARGE);
    }

    #[tokio::test]
    async fn slow_requests_time_out() {
        let limits = HttpLimits {
            request_timeout: Duration::from_millis(20),
            ..HttpLimits::default()
        };

        let response = echo_router(limits)
            .oneshot(Request::builder().uri("/slow").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::REQUEST_TIMEOUT);
    }
}
