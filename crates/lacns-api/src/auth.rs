//! # Caller Identity & Bearer Authentication
//!
//! The hosting environment names the caller of each request in the
//! `x-lacns-caller` header. Handlers receive it through the [`Caller`]
//! extractor; a request that needs a caller and lacks one is a 401.
//!
//! Independently, when a shared bearer secret is configured, every
//! `/v1/*` request must present `Authorization: Bearer <secret>`. The
//! comparison is constant-time.

use axum::extract::{FromRequestParts, Request};
use axum::http::request::Parts;
use axum::http::header;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use lacns_core::Identity;
use subtle::ConstantTimeEq;

use crate::error::AppError;

/// Header carrying the caller identity.
pub const CALLER_HEADER: &str = "x-lacns-caller";

/// Identity of the caller, taken from [`CALLER_HEADER`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Caller(pub Identity);

impl<S: Send + Sync> FromRequestParts<S> for Caller {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(CALLER_HEADER)
            .ok_or_else(|| AppError::Unauthorized(format!("missing {CALLER_HEADER} header")))?;
        let text = value
            .to_str()
            .map_err(|_| AppError::Unauthorized(format!("{CALLER_HEADER} is not valid text")))?;
        Identity::new(text)
            .map(Caller)
            .map_err(|e| AppError::Unauthorized(e.to_string()))
    }
}

/// Auth configuration injected into request extensions.
///
/// Custom `Debug` redacts the token value to prevent credential leakage in logs.
#[derive(Clone)]
pub struct AuthConfig {
    pub token: Option<String>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Constant-time comparison of bearer tokens.
///
/// When lengths differ, performs a dummy comparison so the mismatch takes
/// about as long as a same-length one.
fn constant_time_token_eq(provided: &str, expected: &str) -> bool {
    let provided = provided.as_bytes();
    let expected = expected.as_bytes();
    if provided.len() != expected.len() {
        let _ = expected.ct_eq(expected);
        return false;
    }
    provided.ct_eq(expected).into()
}

/// Reject requests without the configured bearer secret.
///
/// When `AuthConfig.token` is `None` (or no `AuthConfig` extension is
/// present) every request passes.
pub async fn auth_middleware(request: Request, next: Next) -> Response {
    let expected = request
        .extensions()
        .get::<AuthConfig>()
        .and_then(|c| c.token.clone());

    let Some(expected) = expected else {
        return next.run(request).await;
    };

    let verdict = match request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
    {
        Some(value) => match value.strip_prefix("Bearer ") {
            Some(token) if constant_time_token_eq(token, &expected) => Ok(()),
            Some(_) => Err("invalid bearer token"),
            None => Err("authorization header must use Bearer scheme"),
        },
        None => Err("missing authorization header"),
    };

    match verdict {
        Ok(()) => next.run(request).await,
        Err(reason) => {
            tracing::warn!(reason, "authentication failed");
            AppError::Unauthorized(reason.to_string()).into_response()
        }
    }
}
