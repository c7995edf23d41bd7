//! # Domain-Type API
//!
//! - `GET    /v1/domain-types`     : List allowed domain types
//! - `GET    /v1/domain-types/{id}`: Whether a domain type is allowed
//! - `PUT    /v1/domain-types/{id}`: Allow a domain type (administrator)
//! - `DELETE /v1/domain-types/{id}`: Disallow a domain type (administrator)

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use lacns_core::DomainType;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::Caller;
use crate::error::AppError;
use crate::state::AppState;

/// Allow-set membership of one domain type.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DomainTypeStatus {
    /// The domain type, e.g. "lac".
    pub domain_type: String,
    /// Whether registrations and renewals are accepted under it.
    pub allowed: bool,
}

/// Every allowed domain type, sorted.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DomainTypeList {
    pub domain_types: Vec<String>,
}

/// Build the domain-type router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/domain-types", get(list_domain_types))
        .route(
            "/v1/domain-types/{id}",
            get(get_domain_type)
                .put(add_domain_type)
                .delete(remove_domain_type),
        )
}

fn status(domain_type: &DomainType, allowed: bool) -> Json<DomainTypeStatus> {
    Json(DomainTypeStatus {
        domain_type: domain_type.to_string(),
        allowed,
    })
}

#[utoipa::path(
    get,
    path = "/v1/domain-types",
    responses(
        (status = 200, description = "Allowed domain types", body = DomainTypeList),
    ),
    tag = "domain-types"
)]
pub(crate) async fn list_domain_types(State(state): State<AppState>) -> Json<DomainTypeList> {
    let domain_types = state
        .registry
        .lock()
        .allowed_domain_types()
        .map(ToString::to_string)
        .collect();
    Json(DomainTypeList { domain_types })
}

#[utoipa::path(
    get,
    path = "/v1/domain-types/{id}",
    params(("id" = String, Path, description = "Domain type")),
    responses(
        (status = 200, description = "Allow-set membership", body = DomainTypeStatus),
        (status = 422, description = "Malformed domain type", body = crate::error::ErrorBody),
    ),
    tag = "domain-types"
)]
pub(crate) async fn get_domain_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DomainTypeStatus>, AppError> {
    let domain_type = DomainType::new(id)?;
    let allowed = state.registry.lock().is_domain_type_allowed(&domain_type);
    Ok(status(&domain_type, allowed))
}

#[utoipa::path(
    put,
    path = "/v1/domain-types/{id}",
    params(("id" = String, Path, description = "Domain type")),
    responses(
        (status = 200, description = "Domain type allowed", body = DomainTypeStatus),
        (status = 403, description = "Caller is not the administrator", body = crate::error::ErrorBody),
    ),
    tag = "domain-types"
)]
pub(crate) async fn add_domain_type(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<DomainTypeStatus>, AppError> {
    let domain_type = DomainType::new(id)?;
    state
        .registry
        .lock()
        .add_domain_type(&caller, domain_type.clone())?;
    Ok(status(&domain_type, true))
}

#[utoipa::path(
    delete,
    path = "/v1/domain-types/{id}",
    params(("id" = String, Path, description = "Domain type")),
    responses(
        (status = 200, description = "Domain type disallowed", body = DomainTypeStatus),
        (status = 403, description = "Caller is not the administrator", body = crate::error::ErrorBody),
    ),
    tag = "domain-types"
)]
pub(crate) async fn remove_domain_type(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(id): Path<String>,
) -> Result<Json<DomainTypeStatus>, AppError> {
    let domain_type = DomainType::new(id)?;
    state
        .registry
        .lock()
        .remove_domain_type(&caller, &domain_type)?;
    Ok(status(&domain_type, false))
}
