//! # OpenAPI Document Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 document.
//! Serves at `/openapi.json`.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::state::AppState;

/// Adds the bearer security scheme to the OpenAPI document.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Shared bearer secret. Set via LACNS_AUTH_TOKEN env var.",
                        ))
                        .build(),
                ),
            );
        }
    }
}

/// Assembled OpenAPI document for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "LACNS API",
        description = "Name registry for the LaChain network.\n\nMaps `label.domain_type` names to a resolver identity for a paid, renewable period.\n\nThe caller identity is taken from the `x-lacns-caller` header. When a bearer secret is configured, every `/v1/*` request must also carry `Authorization: Bearer <token>`. Health probes and `/metrics` are unauthenticated.",
        license(name = "AGPL-3.0-or-later")
    ),
    servers(
        (url = "http://localhost:8080", description = "Local development server"),
    ),
    security(
        ("bearer_auth" = [])
    ),
    paths(
        // ── Domain types ─────────────────────────────────────────────────
        crate::routes::domains::list_domain_types,
        crate::routes::domains::get_domain_type,
        crate::routes::domains::add_domain_type,
        crate::routes::domains::remove_domain_type,
        // ── Names ────────────────────────────────────────────────────────
        crate::routes::names::register_name,
        crate::routes::names::resolve_name,
        crate::routes::names::get_record,
        crate::routes::names::get_availability,
        crate::routes::names::renew_name,
        crate::routes::names::change_resolver,
        crate::routes::names::change_personal_info,
        crate::routes::names::quote,
        // ── Administration ───────────────────────────────────────────────
        crate::routes::admin::registry_status,
        crate::routes::admin::toggle_pause,
        crate::routes::admin::change_prices,
        crate::routes::admin::withdraw,
        crate::routes::admin::snapshot,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::domains::DomainTypeStatus,
        crate::routes::domains::DomainTypeList,
        crate::routes::names::RegisterBody,
        crate::routes::names::RenewBody,
        crate::routes::names::ResolverBody,
        crate::routes::names::PersonalInfoBody,
        crate::routes::names::NameRecordResponse,
        crate::routes::names::ResolutionResponse,
        crate::routes::names::AvailabilityResponse,
        crate::routes::names::QuoteResponse,
        crate::routes::admin::PriceTableBody,
        crate::routes::admin::PauseResponse,
        crate::routes::admin::WithdrawResponse,
        crate::routes::admin::RegistryStatus,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "domain-types", description = "Allow-set of registrable suffixes"),
        (name = "names", description = "Registration, resolution, renewal and profile updates"),
        (name = "admin", description = "Pause flag, price table, fee withdrawal and snapshots"),
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI JSON document at `/openapi.json`.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI document.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/v1/domain-types",
            "/v1/domain-types/{id}",
            "/v1/names",
            "/v1/names/{fqn}",
            "/v1/names/{fqn}/record",
            "/v1/names/{fqn}/availability",
            "/v1/names/{fqn}/renew",
            "/v1/names/{fqn}/resolver",
            "/v1/names/{fqn}/personal-info",
            "/v1/quote",
            "/v1/registry",
            "/v1/admin/pause",
            "/v1/admin/prices",
            "/v1/admin/withdraw",
            "/v1/admin/snapshot",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }

    #[test]
    fn document_serializes_to_json() {
        let json = serde_json::to_value(ApiDoc::openapi()).unwrap();
        assert_eq!(json["info"]["title"], "LACNS API");
    }
}
