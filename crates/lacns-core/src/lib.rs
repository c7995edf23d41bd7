//! # lacns-core: Foundational Types for the Name Service
//!
//! Leaf crate of the workspace. Defines the validated primitives every
//! other crate speaks in, so that a raw `String` never stands in for a
//! name, a domain type, or a caller.
//!
//! ## Key Design Principles
//!
//! 1. **Newtypes with validating constructors.** [`Identity`], [`Label`],
//!    [`DomainType`] and [`FullyQualifiedName`] reject malformed input at
//!    construction and at deserialization.
//!
//! 2. **Exact comparison.** Identities and domain types are case-sensitive;
//!    `"LAC"` and `"lac"` are distinct suffixes.
//!
//! 3. **Integer money.** [`Amount`] is a `u128` in the smallest currency
//!    unit with checked arithmetic, serialized as a decimal string.
//!
//! 4. **UTC-only timestamps.** [`Timestamp`] is seconds precision, the
//!    granularity expiry is tracked at.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `lacns-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod amount;
pub mod error;
pub mod identity;
pub mod name;
pub mod temporal;

// Re-export primary types for ergonomic imports.
pub use amount::Amount;
pub use error::ValidationError;
pub use identity::Identity;
pub use name::{DomainType, FullyQualifiedName, Label};
pub use temporal::Timestamp;
