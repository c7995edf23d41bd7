//! # HTTP Metrics
//!
//! Request-level metrics recorded through the `metrics` facade:
//!
//! - `lacns_http_requests_total{method, path, status}`
//! - `lacns_http_request_duration_seconds{method, path}`
//! - `lacns_http_errors_total{method, path, status}` (4xx and 5xx)
//!
//! `path` is the matched route template (`/v1/names/{fqn}`), not the raw
//! URI, so label cardinality stays bounded by the route table.
//!
//! Registry gauges (`lacns_names_active`, `lacns_fee_balance`,
//! `lacns_paused`) are refreshed on each `/metrics` scrape, see
//! [`record_registry_gauges`].

use std::time::Instant;

use axum::extract::{MatchedPath, Request};
use axum::middleware::Next;
use axum::response::Response;
use lacns_registry::Registry;

/// Label used for requests that matched no route.
const UNMATCHED: &str = "unmatched";

/// Record one finished HTTP request.
fn record_request(method: String, path: String, status: u16, duration_secs: f64) {
    let status = status.to_string();
    metrics::counter!(
        "lacns_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "lacns_http_request_duration_seconds",
        "method" => method.clone(),
        "path" => path.clone()
    )
    .record(duration_secs);
    if status.starts_with('4') || status.starts_with('5') {
        metrics::counter!(
            "lacns_http_errors_total",
            "method" => method,
            "path" => path,
            "status" => status
        )
        .increment(1);
    }
}

/// Middleware that records HTTP request metrics.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| UNMATCHED.to_string());
    let start = Instant::now();

    let response = next.run(request).await;

    record_request(
        method,
        path,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}

/// Set the registry gauges from current state (pull model).
pub fn record_registry_gauges(registry: &Registry) {
    metrics::gauge!("lacns_names_active").set(registry.active_count() as f64);
    metrics::gauge!("lacns_names_stored").set(registry.record_count() as f64);
    metrics::gauge!("lacns_fee_balance").set(registry.fee_balance().units() as f64);
    metrics::gauge!("lacns_registration_counter").set(registry.registration_counter() as f64);
    metrics::gauge!("lacns_paused").set(if registry.is_paused() { 1.0 } else { 0.0 });
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::middleware::from_fn;
    use axum::routing::get;
    use axum::Router;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use tower::ServiceExt;

    #[tokio::test]
    async fn records_matched_route_template() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();

        let app = Router::new()
            .route("/v1/names/{fqn}", get(|| async { StatusCode::NOT_FOUND }))
            .layer(from_fn(metrics_middleware));

        let req = Request::builder()
            .uri("/v1/names/fer.lac")
            .body(Body::empty())
            .unwrap();

        let guard = metrics::set_default_local_recorder(&recorder);
        let resp = app.oneshot(req).await.unwrap();
        drop(guard);
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let rendered = handle.render();
        assert!(rendered.contains("lacns_http_requests_total"));
        assert!(rendered.contains(r#"path="/v1/names/{fqn}""#));
        assert!(!rendered.contains("fer.lac"));
        assert!(rendered.contains("lacns_http_errors_total"));
    }

    #[test]
    fn registry_gauges_track_active_and_stored_names() {
        use crate::routes::test_support::{harness, ALICE};
        use lacns_core::{Amount, DomainType, Identity, Label};
        use lacns_registry::RegisterRequest;

        let h = harness();
        let alice = Identity::new(ALICE).unwrap();
        let request = RegisterRequest {
            label: Label::new("fer").unwrap(),
            domain_type: DomainType::new("lac").unwrap(),
            years: 1,
            resolver: alice.clone(),
        };
        h.state
            .registry
            .lock()
            .register(&alice, request, Amount::new(800_000_000_000_000_000))
            .unwrap();

        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_registry_gauges(&h.state.registry.lock())
        });
        let rendered = handle.render();
        assert!(rendered.contains("lacns_names_active 1"), "{rendered}");
        assert!(rendered.contains("lacns_names_stored 1"), "{rendered}");
        assert!(rendered.contains("lacns_paused 0"), "{rendered}");

        h.clock.advance(31_536_000);
        metrics::with_local_recorder(&recorder, || {
            record_registry_gauges(&h.state.registry.lock())
        });
        let rendered = handle.render();
        assert!(rendered.contains("lacns_names_active 0"), "{rendered}");
        assert!(rendered.contains("lacns_names_stored 1"), "{rendered}");
    }
}
