//! # API Route Modules
//!
//! - `domains`: domain-type allow-set: query, add, remove.
//! - `names`: registration, resolution, availability, renewal, resolver
//!   and personal-info updates, price quotes.
//! - `admin`: pause toggle, price table, fee withdrawal, registry status
//!   and snapshot.

pub mod admin;
pub mod domains;
pub mod names;

use lacns_core::FullyQualifiedName;

use crate::error::AppError;

/// Parse a `label.domain_type` path segment.
pub(crate) fn parse_name(raw: &str) -> Result<FullyQualifiedName, AppError> {
    Ok(raw.parse::<FullyQualifiedName>()?)
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use axum::response::Response;
    use http_body_util::BodyExt;
    use lacns_core::{DomainType, Identity, Timestamp};
    use lacns_registry::{EventLog, ManualClock, Registry, RegistryConfig};

    use crate::auth::CALLER_HEADER;
    use crate::state::AppState;

    pub const ADMIN: &str = "0xadmin";
    pub const ALICE: &str = "0xalice";
    pub const BOB: &str = "0xbob";
    pub const START: i64 = 1_700_000_000;

    pub struct Harness {
        pub state: AppState,
        pub clock: ManualClock,
        pub log: EventLog,
    }

    /// A registry with `lac` and `num` allowed and a manual clock.
    pub fn harness() -> Harness {
        let clock = ManualClock::new(Timestamp::from_epoch_secs(START).unwrap());
        let log = EventLog::new();
        let config = RegistryConfig::new(Identity::new(ADMIN).unwrap())
            .with_domain_type(DomainType::new("lac").unwrap())
            .with_domain_type(DomainType::new("num").unwrap());
        let registry = Registry::new(config)
            .unwrap()
            .with_clock(Arc::new(clock.clone()))
            .with_sink(Arc::new(log.clone()));
        Harness {
            state: AppState::new(registry),
            clock,
            log,
        }
    }

    pub fn request(method: &str, uri: &str, caller: Option<&str>, body: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(caller) = caller {
            builder = builder.header(CALLER_HEADER, caller);
        }
        match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    pub async fn body_json<T: serde::de::DeserializeOwned>(resp: Response) -> T {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }
}
