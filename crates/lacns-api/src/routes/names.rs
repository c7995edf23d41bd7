//! # Name API
//!
//! - `POST /v1/names`                      : Register a name
//! - `GET  /v1/names/{fqn}`                : Resolve an active name
//! - `GET  /v1/names/{fqn}/record`         : Stored record, expired or not
//! - `GET  /v1/names/{fqn}/availability`   : Whether the name can be registered now
//! - `POST /v1/names/{fqn}/renew`          : Extend a name (owner)
//! - `PUT  /v1/names/{fqn}/resolver`       : Replace the resolver (owner)
//! - `PUT  /v1/names/{fqn}/personal-info`  : Replace personal info (owner)
//! - `GET  /v1/quote?name=&years=`         : Price a non-administrator would pay
//!
//! Payment travels in the `payment` body field as a decimal string (or a
//! JSON integer) in the smallest currency unit, and defaults to zero.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use lacns_core::{Amount, DomainType, FullyQualifiedName, Identity, Label};
use lacns_registry::{NameRecord, PersonalInfo, PriceTier, RegisterRequest, Resolution};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::auth::Caller;
use crate::error::{extract_json, AppError};
use crate::routes::parse_name;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

/// Request to register a name.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RegisterBody {
    /// Base name, e.g. "fer".
    #[schema(value_type = String)]
    pub label: Label,
    /// Suffix, e.g. "lac".
    #[schema(value_type = String)]
    pub domain_type: DomainType,
    /// Registration period in years, at least 1.
    pub years: u64,
    /// Identity the name will resolve to.
    #[schema(value_type = String)]
    pub resolver: Identity,
    /// Attached payment in the smallest currency unit.
    #[serde(default)]
    #[schema(value_type = String, example = "800000000000000000")]
    pub payment: Amount,
}

/// Request to renew a name.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct RenewBody {
    /// Years to add, at least 1.
    pub years: u64,
    /// Attached payment in the smallest currency unit.
    #[serde(default)]
    #[schema(value_type = String)]
    pub payment: Amount,
}

/// Request to replace a name's resolver.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(deny_unknown_fields)]
pub struct ResolverBody {
    #[schema(value_type = String)]
    pub resolver: Identity,
}

/// The four free-form profile fields. Omitted fields are set to empty.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(deny_unknown_fields, default)]
pub struct PersonalInfoBody {
    pub avatar: String,
    pub email: String,
    pub handle: String,
    pub alias: String,
}

impl From<PersonalInfoBody> for PersonalInfo {
    fn from(body: PersonalInfoBody) -> Self {
        PersonalInfo::new(body.avatar, body.email, body.handle, body.alias)
    }
}

impl From<&PersonalInfo> for PersonalInfoBody {
    fn from(info: &PersonalInfo) -> Self {
        Self {
            avatar: info.avatar.clone(),
            email: info.email.clone(),
            handle: info.handle.clone(),
            alias: info.alias.clone(),
        }
    }
}

/// A stored name record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NameRecordResponse {
    pub name: String,
    pub owner: String,
    pub resolver: String,
    pub personal_info: PersonalInfoBody,
    /// Expiry instant (ISO 8601, UTC).
    pub expiry: String,
    /// Registration counter value when the name was (re)registered.
    pub registration_order: u64,
}

impl From<&NameRecord> for NameRecordResponse {
    fn from(record: &NameRecord) -> Self {
        Self {
            name: record.name.to_string(),
            owner: record.owner.to_string(),
            resolver: record.resolver.to_string(),
            personal_info: PersonalInfoBody::from(&record.personal_info),
            expiry: record.expiry.to_iso8601(),
            registration_order: record.registration_order,
        }
    }
}

/// Resolution of an active name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ResolutionResponse {
    pub name: String,
    pub resolver: String,
    pub owner: String,
    pub personal_info: PersonalInfoBody,
}

impl ResolutionResponse {
    fn new(name: &FullyQualifiedName, resolution: &Resolution) -> Self {
        Self {
            name: name.to_string(),
            resolver: resolution.resolver.to_string(),
            owner: resolution.owner.to_string(),
            personal_info: PersonalInfoBody::from(&resolution.personal_info),
        }
    }
}

/// Availability of a name.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AvailabilityResponse {
    pub name: String,
    /// True when the name is unregistered or expired.
    pub available: bool,
}

/// Price quote query.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct QuoteQuery {
    /// Base name ("fer") or fully-qualified name ("fer.lac").
    pub name: String,
    /// Years, default 1.
    pub years: Option<u64>,
}

/// Price quote.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuoteResponse {
    pub label: String,
    pub years: u64,
    /// Price tier: three_char, four_char or five_plus_char.
    pub tier: String,
    /// Required payment in the smallest currency unit.
    pub price: String,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Build the names router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/names", post(register_name))
        .route("/v1/names/{fqn}", get(resolve_name))
        .route("/v1/names/{fqn}/record", get(get_record))
        .route("/v1/names/{fqn}/availability", get(get_availability))
        .route("/v1/names/{fqn}/renew", post(renew_name))
        .route("/v1/names/{fqn}/resolver", put(change_resolver))
        .route("/v1/names/{fqn}/personal-info", put(change_personal_info))
        .route("/v1/quote", get(quote))
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /v1/names: Register a name.
#[utoipa::path(
    post,
    path = "/v1/names",
    request_body = RegisterBody,
    responses(
        (status = 201, description = "Name registered", body = NameRecordResponse),
        (status = 402, description = "Payment below the required price", body = crate::error::ErrorBody),
        (status = 409, description = "Name held by an active record", body = crate::error::ErrorBody),
        (status = 422, description = "Invalid duration or domain type not allowed", body = crate::error::ErrorBody),
        (status = 503, description = "Registration paused", body = crate::error::ErrorBody),
    ),
    tag = "names"
)]
pub(crate) async fn register_name(
    State(state): State<AppState>,
    Caller(caller): Caller,
    body: Result<Json<RegisterBody>, JsonRejection>,
) -> Result<(StatusCode, Json<NameRecordResponse>), AppError> {
    let body = extract_json(body)?;
    let request = RegisterRequest {
        label: body.label,
        domain_type: body.domain_type,
        years: body.years,
        resolver: body.resolver,
    };
    let record = state.registry.lock().register(&caller, request, body.payment)?;
    Ok((StatusCode::CREATED, Json(NameRecordResponse::from(&record))))
}

/// GET /v1/names/{fqn}: Resolve an active name.
#[utoipa::path(
    get,
    path = "/v1/names/{fqn}",
    params(("fqn" = String, Path, description = "Fully-qualified name, e.g. fer.lac")),
    responses(
        (status = 200, description = "Resolution", body = ResolutionResponse),
        (status = 404, description = "Expired or not registered", body = crate::error::ErrorBody),
    ),
    tag = "names"
)]
pub(crate) async fn resolve_name(
    State(state): State<AppState>,
    Path(fqn): Path<String>,
) -> Result<Json<ResolutionResponse>, AppError> {
    let name = parse_name(&fqn)?;
    let resolution = state.registry.lock().resolve(&name)?;
    Ok(Json(ResolutionResponse::new(&name, &resolution)))
}

/// GET /v1/names/{fqn}/record: Stored record, including an expired one.
#[utoipa::path(
    get,
    path = "/v1/names/{fqn}/record",
    params(("fqn" = String, Path, description = "Fully-qualified name")),
    responses(
        (status = 200, description = "Stored record", body = NameRecordResponse),
        (status = 404, description = "Never registered", body = crate::error::ErrorBody),
    ),
    tag = "names"
)]
pub(crate) async fn get_record(
    State(state): State<AppState>,
    Path(fqn): Path<String>,
) -> Result<Json<NameRecordResponse>, AppError> {
    let name = parse_name(&fqn)?;
    let registry = state.registry.lock();
    let record = registry
        .record(&name)
        .ok_or(lacns_registry::RegistryError::ExpiredOrUnregistered)?;
    Ok(Json(NameRecordResponse::from(record)))
}

/// GET /v1/names/{fqn}/availability: Whether the name can be registered now.
#[utoipa::path(
    get,
    path = "/v1/names/{fqn}/availability",
    params(("fqn" = String, Path, description = "Fully-qualified name")),
    responses(
        (status = 200, description = "Availability", body = AvailabilityResponse),
    ),
    tag = "names"
)]
pub(crate) async fn get_availability(
    State(state): State<AppState>,
    Path(fqn): Path<String>,
) -> Result<Json<AvailabilityResponse>, AppError> {
    let name = parse_name(&fqn)?;
    let available = state.registry.lock().is_available(&name);
    Ok(Json(AvailabilityResponse {
        name: name.to_string(),
        available,
    }))
}

/// POST /v1/names/{fqn}/renew: Extend a name.
#[utoipa::path(
    post,
    path = "/v1/names/{fqn}/renew",
    params(("fqn" = String, Path, description = "Fully-qualified name")),
    request_body = RenewBody,
    responses(
        (status = 200, description = "Name renewed", body = NameRecordResponse),
        (status = 402, description = "Payment below the required price", body = crate::error::ErrorBody),
        (status = 403, description = "Caller is not the stored owner", body = crate::error::ErrorBody),
    ),
    tag = "names"
)]
pub(crate) async fn renew_name(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(fqn): Path<String>,
    body: Result<Json<RenewBody>, JsonRejection>,
) -> Result<Json<NameRecordResponse>, AppError> {
    let name = parse_name(&fqn)?;
    let body = extract_json(body)?;
    let record = state
        .registry
        .lock()
        .renew(&caller, &name, body.years, body.payment)?;
    Ok(Json(NameRecordResponse::from(&record)))
}

/// PUT /v1/names/{fqn}/resolver: Replace the resolver.
#[utoipa::path(
    put,
    path = "/v1/names/{fqn}/resolver",
    params(("fqn" = String, Path, description = "Fully-qualified name")),
    request_body = ResolverBody,
    responses(
        (status = 204, description = "Resolver replaced"),
        (status = 403, description = "Caller is not the stored owner", body = crate::error::ErrorBody),
    ),
    tag = "names"
)]
pub(crate) async fn change_resolver(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(fqn): Path<String>,
    body: Result<Json<ResolverBody>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let name = parse_name(&fqn)?;
    let body = extract_json(body)?;
    state
        .registry
        .lock()
        .change_resolver(&caller, &name, body.resolver)?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /v1/names/{fqn}/personal-info: Replace all four personal-info fields.
#[utoipa::path(
    put,
    path = "/v1/names/{fqn}/personal-info",
    params(("fqn" = String, Path, description = "Fully-qualified name")),
    request_body = PersonalInfoBody,
    responses(
        (status = 204, description = "Personal info replaced"),
        (status = 403, description = "Caller is not the stored owner", body = crate::error::ErrorBody),
    ),
    tag = "names"
)]
pub(crate) async fn change_personal_info(
    State(state): State<AppState>,
    Caller(caller): Caller,
    Path(fqn): Path<String>,
    body: Result<Json<PersonalInfoBody>, JsonRejection>,
) -> Result<StatusCode, AppError> {
    let name = parse_name(&fqn)?;
    let body = extract_json(body)?;
    state
        .registry
        .lock()
        .change_personal_info(&caller, &name, body.into())?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /v1/quote: Price a non-administrator would pay.
#[utoipa::path(
    get,
    path = "/v1/quote",
    params(QuoteQuery),
    responses(
        (status = 200, description = "Quote", body = QuoteResponse),
        (status = 422, description = "Malformed name or zero years", body = crate::error::ErrorBody),
    ),
    tag = "names"
)]
pub(crate) async fn quote(
    State(state): State<AppState>,
    Query(query): Query<QuoteQuery>,
) -> Result<Json<QuoteResponse>, AppError> {
    let label = if query.name.contains('.') {
        parse_name(&query.name)?.label().clone()
    } else {
        Label::new(query.name)?
    };
    let years = query.years.unwrap_or(1);
    let price = state.registry.lock().quote(&label, years)?;
    Ok(Json(QuoteResponse {
        tier: PriceTier::for_length(label.char_len()).to_string(),
        label: label.to_string(),
        years,
        price: price.to_string(),
    }))
}
