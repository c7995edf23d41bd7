//! # Registry State Machine
//!
//! [`Registry`] owns all state: the domain-type allow-set, the name records,
//! the price table, the pause flag, the fee balance, and the registration
//! counter. Every operation follows the same shape:
//!
//! 1. read the clock once;
//! 2. check preconditions in a fixed order, the first failure wins;
//! 3. compute every new value (with checked arithmetic) before writing;
//! 4. apply the writes;
//! 5. publish one notification.
//!
//! A rejected call therefore never leaves partial effects. The registry
//! takes `&mut self` for writes; a concurrent host must serialize access
//! behind one lock so that step 2 and step 4 cannot interleave with
//! another caller.
//!
//! ## Record lifecycle
//!
//! ```text
//!            register                       clock passes expiry
//! (absent) ──────────▶ Active ─────────────────────────────────▶ Expired
//!                       │  ▲ renew (extends from expiry)           │ │
//!                       └──┘                                       │ │ renew by stored owner
//!                                          register by anyone      │ │ (extends from now)
//!                       Active ◀───────────────────────────────────┘ │
//!                       Active ◀─────────────────────────────────────┘
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::Arc;

use lacns_core::{Amount, DomainType, FullyQualifiedName, Identity, Label, Timestamp};
use serde::{Deserialize, Serialize};

use crate::clock::{Clock, SystemClock};
use crate::config::{ConfigError, RegistryConfig};
use crate::error::{OwnerAction, RegistryError};
use crate::events::{Notification, NotificationSink, TracingSink};
use crate::pricing::PriceTable;
use crate::record::{NameRecord, PersonalInfo, Resolution};
use crate::treasury::{Payout, TracingPayout};

/// Counter value at genesis. The first registration publishes `GENESIS_COUNTER + 1`.
pub const GENESIS_COUNTER: u64 = 1;

/// Arguments of a registration call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterRequest {
    /// Base name to register.
    pub label: Label,
    /// Suffix to register it under.
    pub domain_type: DomainType,
    /// Number of years, at least 1.
    pub years: u64,
    /// Resolution target; may be the caller or anyone else.
    pub resolver: Identity,
}

impl RegisterRequest {
    /// The fully-qualified key this request targets.
    pub fn name(&self) -> FullyQualifiedName {
        FullyQualifiedName::new(self.label.clone(), self.domain_type.clone())
    }
}

/// Serializable image of the entire registry state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistrySnapshot {
    pub administrator: Identity,
    pub seconds_per_year: u64,
    pub domain_types: BTreeSet<DomainType>,
    pub records: Vec<NameRecord>,
    pub prices: PriceTable,
    pub paused: bool,
    pub fee_balance: Amount,
    pub registration_counter: u64,
}

impl RegistrySnapshot {
    /// Parse a JSON snapshot.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read and parse a JSON snapshot file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Resolve a name against this snapshot at `now`, without building a registry.
    pub fn resolve(&self, name: &FullyQualifiedName, now: Timestamp) -> Result<Resolution, RegistryError> {
        self.records
            .iter()
            .find(|r| &r.name == name)
            .filter(|r| r.is_active(now))
            .map(NameRecord::resolution)
            .ok_or(RegistryError::ExpiredOrUnregistered)
    }

    /// Number of records active at `now`.
    pub fn active_count(&self, now: Timestamp) -> usize {
        self.records.iter().filter(|r| r.is_active(now)).count()
    }
}

/// The name registry.
pub struct Registry {
    administrator: Identity,
    seconds_per_year: u64,
    domain_types: BTreeSet<DomainType>,
    records: BTreeMap<FullyQualifiedName, NameRecord>,
    prices: PriceTable,
    paused: bool,
    fee_balance: Amount,
    registration_counter: u64,
    clock: Arc<dyn Clock>,
    sink: Arc<dyn NotificationSink>,
    payout: Arc<dyn Payout>,
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registry")
            .field("administrator", &self.administrator)
            .field("seconds_per_year", &self.seconds_per_year)
            .field("domain_types", &self.domain_types)
            .field("records", &self.records.len())
            .field("prices", &self.prices)
            .field("paused", &self.paused)
            .field("fee_balance", &self.fee_balance)
            .field("registration_counter", &self.registration_counter)
            .finish()
    }
}

impl Registry {
    /// Create a registry at genesis.
    ///
    /// Collaborators default to the wall clock, a [`TracingSink`] and a
    /// [`TracingPayout`]; replace them with the `with_*` methods.
    pub fn new(config: RegistryConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        tracing::info!(
            administrator = %config.administrator,
            seconds_per_year = config.seconds_per_year,
            domain_types = config.domain_types.len(),
            "registry initialized"
        );
        Ok(Self {
            administrator: config.administrator,
            seconds_per_year: config.seconds_per_year,
            domain_types: config.domain_types.into_iter().collect(),
            records: BTreeMap::new(),
            prices: config.prices,
            paused: config.paused,
            fee_balance: Amount::ZERO,
            registration_counter: GENESIS_COUNTER,
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink),
            payout: Arc::new(TracingPayout),
        })
    }

    /// Rebuild a registry from a snapshot.
    pub fn restore(snapshot: RegistrySnapshot) -> Result<Self, ConfigError> {
        if snapshot.seconds_per_year == 0 {
            return Err(ConfigError::Invalid(
                "seconds_per_year must be greater than 0".to_string(),
            ));
        }
        let mut records = BTreeMap::new();
        for record in snapshot.records {
            let name = record.name.clone();
            if records.insert(name.clone(), record).is_some() {
                return Err(ConfigError::Invalid(format!(
                    "duplicate record for {name} in snapshot"
                )));
            }
        }
        Ok(Self {
            administrator: snapshot.administrator,
            seconds_per_year: snapshot.seconds_per_year,
            domain_types: snapshot.domain_types,
            records,
            prices: snapshot.prices,
            paused: snapshot.paused,
            fee_balance: snapshot.fee_balance,
            registration_counter: snapshot.registration_counter,
            clock: Arc::new(SystemClock),
            sink: Arc::new(TracingSink),
            payout: Arc::new(TracingPayout),
        })
    }

    /// Replace the clock.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Replace the notification sink.
    pub fn with_sink(mut self, sink: Arc<dyn NotificationSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Replace the value-transfer collaborator.
    pub fn with_payout(mut self, payout: Arc<dyn Payout>) -> Self {
        self.payout = payout;
        self
    }

    // ── Domain-type management ──────────────────────────────────────────

    /// Allow registrations under `domain_type`. Idempotent.
    pub fn add_domain_type(
        &mut self,
        caller: &Identity,
        domain_type: DomainType,
    ) -> Result<(), RegistryError> {
        observe("add_domain_type", self.require_administrator(caller))?;
        let added = self.domain_types.insert(domain_type.clone());
        tracing::info!(%domain_type, added, "domain type allowed");
        Ok(())
    }

    /// Stop allowing registrations and renewals under `domain_type`.
    /// Idempotent. Existing records keep their data and keep resolving.
    pub fn remove_domain_type(
        &mut self,
        caller: &Identity,
        domain_type: &DomainType,
    ) -> Result<(), RegistryError> {
        observe("remove_domain_type", self.require_administrator(caller))?;
        let removed = self.domain_types.remove(domain_type);
        tracing::info!(%domain_type, removed, "domain type disallowed");
        Ok(())
    }

    /// Whether `domain_type` is currently in the allow-set.
    pub fn is_domain_type_allowed(&self, domain_type: &DomainType) -> bool {
        self.domain_types.contains(domain_type)
    }

    /// The allow-set, in sorted order.
    pub fn allowed_domain_types(&self) -> impl Iterator<Item = &DomainType> {
        self.domain_types.iter()
    }

    // ── Registration ────────────────────────────────────────────────────

    /// Register a name for `years` years.
    ///
    /// Preconditions, in order: not paused; `years >= 1`; domain type
    /// allowed; name unregistered or expired; payment covers
    /// `price_per_year * years` (waived for the administrator). Overpayment
    /// is kept. A registration over an expired record replaces every field.
    pub fn register(
        &mut self,
        caller: &Identity,
        request: RegisterRequest,
        payment: Amount,
    ) -> Result<NameRecord, RegistryError> {
        let now = self.clock.now();
        let name = request.name();
        let plan = observe("register", self.plan_registration(caller, &request, &name, now, payment))?;

        let record = NameRecord {
            name: name.clone(),
            owner: caller.clone(),
            resolver: request.resolver,
            personal_info: PersonalInfo::default(),
            expiry: plan.expiry,
            registration_order: plan.counter,
        };
        let previous = self.records.insert(name.clone(), record.clone());
        self.registration_counter = plan.counter;
        self.fee_balance = plan.fee_balance;

        tracing::info!(
            %name,
            owner = %record.owner,
            expiry = %record.expiry,
            counter = plan.counter,
            reclaimed = previous.is_some(),
            "name registered"
        );
        metrics::counter!("lacns_registrations_total").increment(1);
        self.sink.publish(&Notification::Registration {
            name,
            owner: record.owner.clone(),
            resolver: record.resolver.clone(),
            personal_info: record.personal_info.clone(),
            expiry: record.expiry,
            counter: plan.counter,
        });
        Ok(record)
    }

    fn plan_registration(
        &self,
        caller: &Identity,
        request: &RegisterRequest,
        name: &FullyQualifiedName,
        now: Timestamp,
        payment: Amount,
    ) -> Result<RegistrationPlan, RegistryError> {
        if self.paused {
            return Err(RegistryError::Paused);
        }
        if request.years < 1 {
            return Err(RegistryError::InvalidDuration);
        }
        if !self.is_domain_type_allowed(&request.domain_type) {
            return Err(RegistryError::DomainNotAllowed);
        }
        if self.records.get(name).is_some_and(|r| r.is_active(now)) {
            return Err(RegistryError::NameUnavailable);
        }
        self.check_payment(caller, &request.label, request.years, payment)?;

        let expiry = self.extend(now, request.years)?;
        let fee_balance = self.credit(payment)?;
        let counter = self
            .registration_counter
            .checked_add(1)
            .ok_or(RegistryError::Arithmetic("registration counter"))?;
        Ok(RegistrationPlan {
            expiry,
            fee_balance,
            counter,
        })
    }

    // ── Renewal ─────────────────────────────────────────────────────────

    /// Extend a name by `years` years.
    ///
    /// Only the stored owner may renew, whether or not the record has
    /// expired. An active record is extended from its current expiry; an
    /// expired one from now.
    pub fn renew(
        &mut self,
        caller: &Identity,
        name: &FullyQualifiedName,
        years: u64,
        payment: Amount,
    ) -> Result<NameRecord, RegistryError> {
        let now = self.clock.now();
        let (expiry, fee_balance) =
            observe("renew", self.plan_renewal(caller, name, years, now, payment))?;

        let record = match self.records.get_mut(name) {
            Some(record) => record,
            None => return Err(RegistryError::OwnerOnly(OwnerAction::Renew)),
        };
        record.expiry = expiry;
        let record = record.clone();
        self.fee_balance = fee_balance;

        tracing::info!(%name, expiry = %expiry, years, "name renewed");
        metrics::counter!("lacns_renewals_total").increment(1);
        self.sink.publish(&Notification::Renewal {
            name: name.clone(),
            expiry,
        });
        Ok(record)
    }

    fn plan_renewal(
        &self,
        caller: &Identity,
        name: &FullyQualifiedName,
        years: u64,
        now: Timestamp,
        payment: Amount,
    ) -> Result<(Timestamp, Amount), RegistryError> {
        let record = self
            .records
            .get(name)
            .filter(|r| r.is_owned_by(caller))
            .ok_or(RegistryError::OwnerOnly(OwnerAction::Renew))?;
        if years < 1 {
            return Err(RegistryError::InvalidDuration);
        }
        if !self.is_domain_type_allowed(name.domain_type()) {
            return Err(RegistryError::DomainNotAllowed);
        }
        self.check_payment(caller, name.label(), years, payment)?;

        let base = record.expiry.max(now);
        let expiry = self.extend(base, years)?;
        let fee_balance = self.credit(payment)?;
        Ok((expiry, fee_balance))
    }

    // ── Resolution ──────────────────────────────────────────────────────

    /// Resolve an active name to its resolver, owner, and personal info.
    pub fn resolve(&self, name: &FullyQualifiedName) -> Result<Resolution, RegistryError> {
        let now = self.clock.now();
        self.records
            .get(name)
            .filter(|r| r.is_active(now))
            .map(NameRecord::resolution)
            .ok_or(RegistryError::ExpiredOrUnregistered)
    }

    /// Whether `name` could be registered right now (absent or expired).
    pub fn is_available(&self, name: &FullyQualifiedName) -> bool {
        let now = self.clock.now();
        !self.records.get(name).is_some_and(|r| r.is_active(now))
    }

    /// The stored record, including an expired one.
    pub fn record(&self, name: &FullyQualifiedName) -> Option<&NameRecord> {
        self.records.get(name)
    }

    // ── Resolver / personal info ────────────────────────────────────────

    /// Point `name` at a new resolver. Stored owner only; expiry is not checked.
    pub fn change_resolver(
        &mut self,
        caller: &Identity,
        name: &FullyQualifiedName,
        resolver: Identity,
    ) -> Result<(), RegistryError> {
        let record = observe(
            "change_resolver",
            self.owned_record_mut(caller, name, OwnerAction::ChangeResolve),
        )?;
        record.resolver = resolver.clone();

        tracing::info!(%name, %resolver, "resolver changed");
        self.sink.publish(&Notification::ResolveChanged {
            name: name.clone(),
            resolver,
        });
        Ok(())
    }

    /// Replace all four personal-info fields. Stored owner only; expiry is not checked.
    pub fn change_personal_info(
        &mut self,
        caller: &Identity,
        name: &FullyQualifiedName,
        personal_info: PersonalInfo,
    ) -> Result<(), RegistryError> {
        let record = observe(
            "change_personal_info",
            self.owned_record_mut(caller, name, OwnerAction::ChangePersonalInfo),
        )?;
        record.personal_info = personal_info.clone();

        tracing::info!(%name, "personal info changed");
        self.sink.publish(&Notification::PersonalInfoChanged {
            name: name.clone(),
            personal_info,
        });
        Ok(())
    }

    fn owned_record_mut(
        &mut self,
        caller: &Identity,
        name: &FullyQualifiedName,
        action: OwnerAction,
    ) -> Result<&mut NameRecord, RegistryError> {
        self.records
            .get_mut(name)
            .filter(|r| r.is_owned_by(caller))
            .ok_or(RegistryError::OwnerOnly(action))
    }

    // ── Administrative controls ─────────────────────────────────────────

    /// Flip the pause flag and return the new value.
    pub fn change_paused(&mut self, caller: &Identity) -> Result<bool, RegistryError> {
        observe("change_paused", self.require_administrator(caller))?;
        self.paused = !self.paused;
        tracing::info!(paused = self.paused, "pause flag toggled");
        Ok(self.paused)
    }

    /// Replace all three price tiers at once.
    pub fn change_price(
        &mut self,
        caller: &Identity,
        prices: PriceTable,
    ) -> Result<(), RegistryError> {
        observe("change_price", self.require_administrator(caller))?;
        self.prices = prices;
        tracing::info!(
            three_char = %prices.three_char,
            four_char = %prices.four_char,
            five_plus_char = %prices.five_plus_char,
            "price table replaced"
        );
        Ok(())
    }

    /// Transfer the whole fee balance to the administrator and zero it.
    ///
    /// A zero balance still succeeds (a zero transfer). If the transfer
    /// fails, the balance is left untouched.
    pub fn withdraw(&mut self, caller: &Identity) -> Result<Amount, RegistryError> {
        observe("withdraw", self.require_administrator(caller))?;
        let amount = self.fee_balance;
        observe(
            "withdraw",
            self.payout
                .transfer(&self.administrator, amount)
                .map_err(RegistryError::from),
        )?;
        self.fee_balance = Amount::ZERO;
        tracing::info!(%amount, recipient = %self.administrator, "fees withdrawn");
        Ok(amount)
    }

    // ── Reads ───────────────────────────────────────────────────────────

    /// The price a non-administrator would pay for `label` over `years`.
    pub fn quote(&self, label: &Label, years: u64) -> Result<Amount, RegistryError> {
        if years < 1 {
            return Err(RegistryError::InvalidDuration);
        }
        self.prices
            .required_payment(label, years)
            .ok_or(RegistryError::Arithmetic("price"))
    }

    /// The administrator identity.
    pub fn administrator(&self) -> &Identity {
        &self.administrator
    }

    /// The current price table.
    pub fn prices(&self) -> PriceTable {
        self.prices
    }

    /// Whether registration is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Fees collected and not yet withdrawn.
    pub fn fee_balance(&self) -> Amount {
        self.fee_balance
    }

    /// Current registration counter.
    pub fn registration_counter(&self) -> u64 {
        self.registration_counter
    }

    /// Length of one registration year, in seconds.
    pub fn seconds_per_year(&self) -> u64 {
        self.seconds_per_year
    }

    /// The current time as seen by this registry's clock.
    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    /// Number of stored records, expired ones included.
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Number of records whose expiry is still in the future.
    pub fn active_count(&self) -> usize {
        let now = self.clock.now();
        self.records.values().filter(|r| r.is_active(now)).count()
    }

    /// Image of the entire state.
    pub fn snapshot(&self) -> RegistrySnapshot {
        RegistrySnapshot {
            administrator: self.administrator.clone(),
            seconds_per_year: self.seconds_per_year,
            domain_types: self.domain_types.clone(),
            records: self.records.values().cloned().collect(),
            prices: self.prices,
            paused: self.paused,
            fee_balance: self.fee_balance,
            registration_counter: self.registration_counter,
        }
    }

    // ── Shared checks ───────────────────────────────────────────────────

    fn require_administrator(&self, caller: &Identity) -> Result<(), RegistryError> {
        if caller == &self.administrator {
            Ok(())
        } else {
            Err(RegistryError::NotAdministrator)
        }
    }

    fn check_payment(
        &self,
        caller: &Identity,
        label: &Label,
        years: u64,
        payment: Amount,
    ) -> Result<(), RegistryError> {
        if caller == &self.administrator {
            return Ok(());
        }
        // An unrepresentable price cannot be covered by any payment.
        match self.prices.required_payment(label, years) {
            Some(required) if payment >= required => Ok(()),
            _ => Err(RegistryError::InsufficientPayment),
        }
    }

    fn extend(&self, base: Timestamp, years: u64) -> Result<Timestamp, RegistryError> {
        years
            .checked_mul(self.seconds_per_year)
            .and_then(|secs| base.checked_add_secs(secs))
            .ok_or(RegistryError::Arithmetic("expiry"))
    }

    fn credit(&self, payment: Amount) -> Result<Amount, RegistryError> {
        self.fee_balance
            .checked_add(payment)
            .ok_or(RegistryError::Arithmetic("fee balance"))
    }
}

/// Values computed for a registration before anything is written.
struct RegistrationPlan {
    expiry: Timestamp,
    fee_balance: Amount,
    counter: u64,
}

/// Log and count a rejection, passing the result through.
fn observe<T>(operation: &'static str, result: Result<T, RegistryError>) -> Result<T, RegistryError> {
    if let Err(err) = &result {
        tracing::debug!(operation, kind = err.kind(), error = %err, "call rejected");
        metrics::counter!("lacns_rejections_total", "kind" => err.kind()).increment(1);
    }
    result
}
