//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Maps registry rejections and validation failures to HTTP status codes
//! with a JSON body carrying a machine-readable code and the registry's
//! own message text.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use lacns_registry::RegistryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "PAUSED", "VALIDATION_ERROR").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Request validation failed (422).
    #[error("validation error: {0}")]
    Validation(String),

    /// Request body could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Missing caller identity or bad bearer token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// The registry rejected the call.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}

impl AppError {
    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::Validation(_) => (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR"),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Registry(err) => (registry_status(err), err.kind()),
        }
    }
}

fn registry_status(err: &RegistryError) -> StatusCode {
    match err {
        RegistryError::NotAdministrator | RegistryError::OwnerOnly(_) => StatusCode::FORBIDDEN,
        RegistryError::Paused => StatusCode::SERVICE_UNAVAILABLE,
        RegistryError::InvalidDuration | RegistryError::DomainNotAllowed => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        RegistryError::NameUnavailable => StatusCode::CONFLICT,
        RegistryError::InsufficientPayment => StatusCode::PAYMENT_REQUIRED,
        RegistryError::ExpiredOrUnregistered => StatusCode::NOT_FOUND,
        RegistryError::Payout(_) | RegistryError::Arithmetic(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = self.to_string();

        if status.is_server_error() {
            tracing::error!(error = %self, "internal server error");
        }

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<lacns_core::ValidationError> for AppError {
    fn from(err: lacns_core::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Extract a JSON body, mapping rejections to API errors.
///
/// Well-formed JSON that fails field validation (a malformed name or
/// identity) is a 422; anything else is a 400.
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    match result {
        Ok(Json(value)) => Ok(value),
        Err(JsonRejection::JsonDataError(err)) => Err(AppError::Validation(err.body_text())),
        Err(err) => Err(AppError::BadRequest(err.body_text())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use lacns_registry::{OwnerAction, PayoutError};

    fn status_of(err: RegistryError) -> StatusCode {
        AppError::from(err).status_and_code().0
    }

    #[test]
    fn registry_status_mapping() {
        assert_eq!(status_of(RegistryError::NotAdministrator), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(RegistryError::OwnerOnly(OwnerAction::Renew)),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_of(RegistryError::Paused), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_of(RegistryError::InvalidDuration),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            status_of(RegistryError::DomainNotAllowed),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(status_of(RegistryError::NameUnavailable), StatusCode::CONFLICT);
        assert_eq!(
            status_of(RegistryError::InsufficientPayment),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(
            status_of(RegistryError::ExpiredOrUnregistered),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(RegistryError::Payout(PayoutError::Rejected("x".into()))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            status_of(RegistryError::Arithmetic("expiry")),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_status_code() {
        let (status, code) = AppError::Validation("bad".into()).status_and_code();
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(code, "VALIDATION_ERROR");
    }

    #[test]
    fn unauthorized_status_code() {
        let (status, code) = AppError::Unauthorized("no caller".into()).status_and_code();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(code, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn registry_message_passed_through() {
        let resp = AppError::from(RegistryError::Paused).into_response();
        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.code, "PAUSED");
        assert_eq!(body.error.message, "Error: Contract is currently paused.");
    }

    #[tokio::test]
    async fn payout_failure_is_500_with_registry_message() {
        let err = RegistryError::Payout(PayoutError::Rejected("ledger offline".into()));
        let expected = err.to_string();
        let resp = AppError::from(err).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body: ErrorBody = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.error.message, expected);
    }
}
