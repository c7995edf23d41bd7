//! # lacns-api: Axum API Service for the Name Registry
//!
//! Exposes every registry operation over JSON. The [`Registry`] lives
//! behind one lock in [`AppState`]; each handler performs exactly one
//! registry call under it.
//!
//! [`Registry`]: lacns_registry::Registry
//!
//! ## API Surface
//!
//! | Prefix                 | Module               | Domain                  |
//! |------------------------|----------------------|-------------------------|
//! | `/v1/domain-types/*`   | [`routes::domains`]  | Domain-type allow-set   |
//! | `/v1/names/*`          | [`routes::names`]    | Names                   |
//! | `/v1/quote`            | [`routes::names`]    | Price quotes            |
//! | `/v1/registry`         | [`routes::admin`]    | Configuration and counters |
//! | `/v1/admin/*`          | [`routes::admin`]    | Administrative controls |
//! | `/openapi.json`        | [`openapi`]          | Generated OpenAPI document |
//! | `/health/*`, `/metrics`| this module          | Probes and scrape (unauthenticated) |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → MetricsMiddleware → AuthMiddleware → Handler
//! ```

pub mod auth;
pub mod bootstrap;
pub mod error;
pub mod middleware;
pub mod openapi;
pub mod routes;
pub mod state;

use axum::extract::{DefaultBodyLimit, State};
use axum::http::StatusCode;
use axum::middleware::from_fn;
use axum::response::IntoResponse;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::auth::AuthConfig;

pub use error::AppError;
pub use state::{AppConfig, AppState};

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) and `/metrics` are mounted outside the auth
/// middleware so they remain accessible without credentials.
pub fn app(state: AppState) -> Router {
    let auth_config = AuthConfig {
        token: state.config.auth_token.clone(),
    };

    // Auth is innermost so rejected requests are still counted and traced.
    let api = Router::new()
        .merge(routes::domains::router())
        .merge(routes::names::router())
        .merge(routes::admin::router())
        .merge(openapi::router())
        .layer(DefaultBodyLimit::max(64 * 1024))
        .layer(from_fn(auth::auth_middleware))
        .layer(from_fn(middleware::metrics::metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(axum::Extension(auth_config))
        .with_state(state.clone());

    let unauthenticated = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness))
        .route("/metrics", axum::routing::get(prometheus_metrics))
        .with_state(state);

    Router::new().merge(unauthenticated).merge(api)
}

/// GET /metrics: Prometheus metrics scrape endpoint.
///
/// Refreshes the registry gauges, then renders the recorder in Prometheus
/// text exposition format.
async fn prometheus_metrics(State(state): State<AppState>) -> impl IntoResponse {
    middleware::metrics::record_registry_gauges(&state.registry.lock());
    (
        StatusCode::OK,
        [(
            axum::http::header::CONTENT_TYPE,
            "text/plain; version=0.0.4; charset=utf-8",
        )],
        state.metrics.render(),
    )
}

/// Liveness probe: always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe: 200 "ready" once the registry lock can be taken
/// without blocking, 503 otherwise.
async fn readiness(State(state): State<AppState>) -> impl IntoResponse {
    if state.registry.try_lock().is_none() {
        return (StatusCode::SERVICE_UNAVAILABLE, "registry locked").into_response();
    }
    (StatusCode::OK, "ready").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{body_json, harness, request, ADMIN, ALICE};
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn with_token(state: AppState, token: &str) -> AppState {
        let mut state = state;
        state.config.auth_token = Some(token.to_string());
        state
    }

    async fn text(resp: axum::response::Response) -> String {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn health_probes() {
        let app = app(harness().state);
        let resp = app
            .clone()
            .oneshot(request("GET", "/health/liveness", None, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, "ok");

        let resp = app
            .oneshot(request("GET", "/health/readiness", None, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(text(resp).await, "ready");
    }

    #[tokio::test]
    async fn bearer_token_guards_v1_but_not_probes() {
        let app = app(with_token(harness().state, "s3cret"));

        let resp = app
            .clone()
            .oneshot(request("GET", "/v1/domain-types", None, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let req = Request::builder()
            .uri("/v1/domain-types")
            .header("authorization", "Bearer s3cret")
            .body(Body::empty())
            .unwrap();
        let resp = app.clone().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .clone()
            .oneshot(request("GET", "/health/liveness", None, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let resp = app
            .oneshot(request("GET", "/metrics", None, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn openapi_document_served() {
        let app = app(harness().state);
        let resp = app
            .oneshot(request("GET", "/openapi.json", None, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let doc: serde_json::Value = body_json(resp).await;
        assert!(doc["paths"]["/v1/names"].is_object());
    }

    #[tokio::test]
    async fn full_router_register_and_resolve() {
        let app = app(harness().state);
        let body = serde_json::json!({
            "label": "fer",
            "domain_type": "num",
            "years": 1,
            "resolver": ALICE,
        })
        .to_string();

        // The administrator registers without payment.
        let resp = app
            .clone()
            .oneshot(request("POST", "/v1/names", Some(ADMIN), Some(&body)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);

        let resp = app
            .oneshot(request("GET", "/v1/names/fer.num", None, None))
            .await
            .unwrap();
        let res: routes::names::ResolutionResponse = body_json(resp).await;
        assert_eq!(res.resolver, ALICE);
        assert_eq!(res.owner, ADMIN);
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let app = app(harness().state);
        let resp = app
            .oneshot(request("GET", "/v1/nothing-here", None, None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
