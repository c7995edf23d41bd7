//! # Administrative API
//!
//! - `GET  /v1/registry`       : Public configuration and counters
//! - `POST /v1/admin/pause`    : Toggle the pause flag
//! - `PUT  /v1/admin/prices`   : Replace the price table
//! - `POST /v1/admin/withdraw` : Transfer the fee balance to the administrator
//! - `GET  /v1/admin/snapshot` : Full registry state for durable handoff
//!
//! Writes are checked against the registry administrator by the registry
//! itself. The snapshot read has no registry-side check, so its handler
//! compares the caller with the administrator.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use lacns_core::Amount;
use lacns_registry::{PriceTable, RegistrySnapshot};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Caller;
use crate::error::{extract_json, AppError};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Yearly price per length tier, in the smallest currency unit.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct PriceTableBody {
    #[schema(value_type = String, example = "800000000000000000")]
    pub three_char: Amount,
    #[schema(value_type = String, example = "600000000000000000")]
    pub four_char: Amount,
    #[schema(value_type = String, example = "450000000000000000")]
    pub five_plus_char: Amount,
}

impl From<PriceTable> for PriceTableBody {
    fn from(table: PriceTable) -> Self {
        Self {
            three_char: table.three_char,
            four_char: table.four_char,
            five_plus_char: table.five_plus_char,
        }
    }
}

impl From<PriceTableBody> for PriceTable {
    fn from(body: PriceTableBody) -> Self {
        PriceTable::new(body.three_char, body.four_char, body.five_plus_char)
    }
}

/// Pause flag after a toggle.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PauseResponse {
    pub paused: bool,
}

/// Amount transferred by a withdrawal.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct WithdrawResponse {
    #[schema(value_type = String)]
    pub amount: Amount,
}

/// Public registry configuration and counters.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegistryStatus {
    pub administrator: String,
    pub paused: bool,
    pub prices: PriceTableBody,
    #[schema(value_type = String)]
    pub fee_balance: Amount,
    pub registration_counter: u64,
    pub seconds_per_year: u64,
    pub domain_types: Vec<String>,
    /// Records whose expiry is still in the future.
    pub active_names: usize,
    /// The registry clock (ISO 8601, UTC).
    pub now: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the administrative router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/registry", get(registry_status))
        .route("/v1/admin/pause", post(toggle_pause))
        .route("/v1/admin/prices", put(change_prices))
        .route("/v1/admin/withdraw", post(withdraw))
        .route("/v1/admin/snapshot", get(snapshot))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/v1/registry",
    responses(
        (status = 200, description = "Registry configuration and counters", body = RegistryStatus),
    ),
    tag = "admin"
)]
pub(crate) async fn registry_status(State(state): State<AppState>) -> Json<RegistryStatus> {
    let registry = state.registry.lock();
    Json(RegistryStatus {
        administrator: registry.administrator().to_string(),
        paused: registry.is_paused(),
        prices: registry.prices().into(),
        fee_balance: registry.fee_balance(),
        registration_counter: registry.registration_counter(),
        seconds_per_year: registry.seconds_per_year(),
        domain_types: registry.allowed_domain_types().map(ToString::to_string).collect(),
        active_names: registry.active_count(),
        now: registry.now().to_iso8601(),
    })
}

#[utoipa::path(
    post,
    path = "/v1/admin/pause",
    responses(
        (status = 200, description = "Pause flag toggled", body = PauseResponse),
        (status = 403, description = "Caller is not the administrator", body = crate::error::ErrorBody),
    ),
    tag = "admin"
)]
pub(crate) async fn toggle_pause(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<PauseResponse>, AppError> {
    let paused = state.registry.lock().change_paused(&caller)?;
    Ok(Json(PauseResponse { paused }))
}

#[utoipa::path(
    put,
    path = "/v1/admin/prices",
    request_body = PriceTableBody,
    responses(
        (status = 200, description = "Price table replaced", body = PriceTableBody),
        (status = 403, description = "Caller is not the administrator", body = crate::error::ErrorBody),
    ),
    tag = "admin"
)]
pub(crate) async fn change_prices(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<PriceTableBody>, JsonRejection>,
) -> Result<Json<PriceTableBody>, AppError> {
    let table: PriceTable = extract_json(body)?.into();
    state.registry.lock().change_price(&caller, table)?;
    Ok(Json(table.into()))
}

#[utoipa::path(
    post,
    path = "/v1/admin/withdraw",
    responses(
        (status = 200, description = "Fee balance transferred", body = WithdrawResponse),
        (status = 403, description = "Caller is not the administrator", body = crate::error::ErrorBody),
        (status = 500, description = "Transfer failed; balance untouched", body = crate::error::ErrorBody),
    ),
    tag = "admin"
)]
pub(crate) async fn withdraw(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<WithdrawResponse>, AppError> {
    let amount = state.registry.lock().withdraw(&caller)?;
    Ok(Json(WithdrawResponse { amount }))
}

/// The snapshot document is the `RegistrySnapshot` serde form.
#[utoipa::path(
    get,
    path = "/v1/admin/snapshot",
    responses(
        (status = 200, description = "Registry snapshot (JSON)"),
        (status = 403, description = "Caller is not the administrator", body = crate::error::ErrorBody),
    ),
    tag = "admin"
)]
pub(crate) async fn snapshot(
    State(state): State<AppState>,
    Caller(caller): Caller,
) -> Result<Json<RegistrySnapshot>, AppError> {
    let registry = state.registry.lock();
    if registry.administrator() != &caller {
        return Err(lacns_registry::RegistryError::NotAdministrator.into());
    }
    Ok(Json(registry.snapshot()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorBody;
    use crate::routes::names;
    use crate::routes::test_support::{body_json, harness, request, ADMIN, ALICE};
    use axum::http::StatusCode;
    use lacns_registry::Registry;
    use tower::ServiceExt;

    fn app(state: AppState) -> Router {
        Router::new()
            .merge(router())
            .merge(names::router())
            .with_state(state)
    }

    fn register_body(label: &str, payment: &str) -> String {
        serde_json::json!({
            "label": label,
            "domain_type": "lac",
            "years": 1,
            "resolver": ALICE,
            "payment": payment,
        })
        .to_string()
    }

    #[tokio::test]
    async fn pause_blocks_registration_until_toggled_back() {
        let h = harness();
        let app = app(h.state);

        let resp = app
            .clone()
            .oneshot(request("POST", "/v1/admin/pause", Some(ADMIN), None))
            .await
            .unwrap();
        let body: PauseResponse = body_json(resp).await;
        assert!(body.paused);

        let resp = app
            .clone()
            .oneshot(request(
                "POST",
                "/v1/names",
                Some(ALICE),
                Some(&register_body("ferna", "450000000000000000")),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

        let resp = app
            .clone()
            .oneshot(request("POST", "/v1/admin/pause", Some(ADMIN), None))
            .await
            .unwrap();
        let body: PauseResponse = body_json(resp).await;
        assert!(!body.paused);

        let resp = app
            .oneshot(request(
                "POST",
                "/v1/names",
                Some(ALICE),
                Some(&register_body("ferna", "450000000000000000")),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn admin_endpoints_reject_others() {
        let h = harness();
        let app = app(h.state);
        for (method, uri) in [
            ("POST", "/v1/admin/pause"),
            ("POST", "/v1/admin/withdraw"),
            ("GET", "/v1/admin/snapshot"),
        ] {
            let resp = app
                .clone()
                .oneshot(request(method, uri, Some(ALICE), None))
                .await
                .unwrap();
            assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{method} {uri}");
            let body: ErrorBody = body_json(resp).await;
            assert_eq!(body.error.message, "Ownable: caller is not the owner");
        }
    }

    #[tokio::test]
    async fn price_change_applies_to_quotes() {
        let h = harness();
        let app = app(h.state);
        let table = r#"{"three_char":"3","four_char":"2","five_plus_char":1}"#;

        let resp = app
            .clone()
            .oneshot(request("PUT", "/v1/admin/prices", Some(ALICE), Some(table)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        let resp = app
            .clone()
            .oneshot(request("PUT", "/v1/admin/prices", Some(ADMIN), Some(table)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body: PriceTableBody = body_json(resp).await;
        assert_eq!(body.five_plus_char, Amount::new(1));

        let resp = app
            .oneshot(request("GET", "/v1/quote?name=fer&years=2", None, None))
            .await
            .unwrap();
        let quote: names::QuoteResponse = body_json(resp).await;
        assert_eq!(quote.price, "6");
    }

    #[tokio::test]
    async fn withdraw_empties_fee_balance() {
        let h = harness();
        let app = app(h.state);
        app.clone()
            .oneshot(request(
                "POST",
                "/v1/names",
                Some(ALICE),
                Some(&register_body("fer", "900000000000000000")),
            ))
            .await
            .unwrap();

        let resp = app
            .clone()
            .oneshot(request("POST", "/v1/admin/withdraw", Some(ADMIN), None))
            .await
            .unwrap();
        let body: WithdrawResponse = body_json(resp).await;
        assert_eq!(body.amount, Amount::new(900_000_000_000_000_000));

        let resp = app
            .oneshot(request("GET", "/v1/registry", None, None))
            .await
            .unwrap();
        let status: RegistryStatus = body_json(resp).await;
        assert_eq!(status.fee_balance, Amount::ZERO);
        assert_eq!(status.registration_counter, 2);
        assert_eq!(status.active_names, 1);
        assert_eq!(status.domain_types, vec!["lac", "num"]);
    }

    #[tokio::test]
    async fn snapshot_restores_to_equal_registry() {
        let h = harness();
        let app = app(h.state);
        app.clone()
            .oneshot(request(
                "POST",
                "/v1/names",
                Some(ALICE),
                Some(&register_body("fer", "800000000000000000")),
            ))
            .await
            .unwrap();

        let resp = app
            .oneshot(request("GET", "/v1/admin/snapshot", Some(ADMIN), None))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let snapshot: RegistrySnapshot = body_json(resp).await;
        assert_eq!(snapshot.records.len(), 1);

        let restored = Registry::restore(snapshot.clone()).unwrap();
        assert_eq!(restored.snapshot(), snapshot);
    }
}
