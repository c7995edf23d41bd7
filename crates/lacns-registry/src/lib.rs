//! # lacns-registry: Name Registry State Machine
//!
//! Maps `label.domain_type` names to owners, resolvers, and profile data for
//! a limited, renewable period, charging a length-tiered yearly price.
//!
//! ## Components
//!
//! - **Registry** (`registry.rs`): the single state owner. Domain-type
//!   allow-set, registration, renewal, resolution, owner edits, and the
//!   administrative controls (pause, price table, fee withdrawal).
//!
//! - **Pricing** (`pricing.rs`): three-tier price table keyed on label
//!   character length.
//!
//! - **Records** (`record.rs`): [`NameRecord`], [`PersonalInfo`], and the
//!   [`Resolution`] view. A record is active while its expiry lies strictly
//!   in the future.
//!
//! - **Collaborators**: [`Clock`] (`clock.rs`), [`NotificationSink`]
//!   (`events.rs`), and [`Payout`] (`treasury.rs`). The registry never
//!   reaches for ambient time, global event buses, or real value transfer.
//!
//! - **Configuration** (`config.rs`): genesis parameters from YAML or JSON.
//!
//! ## Design
//!
//! Each operation computes all of its effects before writing any of them,
//! so a rejected call leaves no trace. Rejections carry stable message
//! texts (see [`RegistryError`]) that clients may match on.

pub mod clock;
pub mod config;
pub mod error;
pub mod events;
pub mod pricing;
pub mod record;
pub mod registry;
pub mod treasury;

// ─── Registry re-exports ────────────────────────────────────────────

pub use registry::{RegisterRequest, Registry, RegistrySnapshot, GENESIS_COUNTER};

// ─── Supporting types ───────────────────────────────────────────────

pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, RegistryConfig, SECONDS_PER_YEAR};
pub use error::{OwnerAction, PayoutError, RegistryError};
pub use events::{EventLog, FanOut, Notification, NotificationSink, TracingSink};
pub use pricing::{PriceTable, PriceTier};
pub use record::{NameRecord, PersonalInfo, Resolution};
pub use treasury::{LedgerPayout, Payout, TracingPayout, Transfer};
