//! # Snapshot Subcommand
//!
//! Offline inspection of a registry snapshot, the JSON document served by
//! `GET /v1/admin/snapshot`.
//!
//! - `resolve <FILE> <FQN> [--at EPOCH]`: resolve as the registry would
//!   at the given instant (default: now).
//! - `summary <FILE>`: configuration and counters.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use lacns_core::{Amount, FullyQualifiedName, Timestamp};
use lacns_registry::{Registry, RegistrySnapshot, Resolution};
use serde::Serialize;

/// Arguments for the `lacns snapshot` subcommand.
#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub command: SnapshotCommand,
}

/// Snapshot subcommands.
#[derive(Subcommand, Debug)]
pub enum SnapshotCommand {
    /// Resolve a name against a snapshot.
    Resolve {
        /// Snapshot file (JSON).
        file: PathBuf,
        /// Fully-qualified name, e.g. "fer.lac".
        fqn: String,
        /// Evaluate at this Unix time instead of now.
        #[arg(long)]
        at: Option<i64>,
    },
    /// Summarize a snapshot.
    Summary {
        /// Snapshot file (JSON).
        file: PathBuf,
    },
}

/// Answer of a snapshot resolution.
#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResolveReport {
    Resolved {
        name: String,
        at: Timestamp,
        #[serde(flatten)]
        resolution: Resolution,
    },
    Unresolved {
        name: String,
        at: Timestamp,
        error: String,
    },
}

/// Snapshot configuration and counters.
#[derive(Debug, Serialize)]
pub struct Summary {
    pub administrator: String,
    pub seconds_per_year: u64,
    pub domain_types: Vec<String>,
    pub paused: bool,
    pub fee_balance: Amount,
    pub registration_counter: u64,
    pub records: usize,
    pub active: usize,
    pub at: Timestamp,
}

/// Load a snapshot and check it restores to a consistent registry.
pub fn load_snapshot(path: &Path) -> Result<RegistrySnapshot> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read snapshot: {}", path.display()))?;
    let snapshot = RegistrySnapshot::from_json(&text)
        .with_context(|| format!("failed to parse snapshot: {}", path.display()))?;
    Registry::restore(snapshot.clone())
        .with_context(|| format!("inconsistent snapshot: {}", path.display()))?;
    Ok(snapshot)
}

fn instant(at: Option<i64>) -> Result<Timestamp> {
    match at {
        Some(secs) => Ok(Timestamp::from_epoch_secs(secs)?),
        None => Ok(Timestamp::now()),
    }
}

/// Resolve `fqn` against `snapshot` at `at`.
pub fn resolve_in(snapshot: &RegistrySnapshot, fqn: &str, at: Timestamp) -> Result<ResolveReport> {
    let name: FullyQualifiedName = fqn.parse()?;
    Ok(match snapshot.resolve(&name, at) {
        Ok(resolution) => ResolveReport::Resolved {
            name: name.to_string(),
            at,
            resolution,
        },
        Err(e) => ResolveReport::Unresolved {
            name: name.to_string(),
            at,
            error: e.to_string(),
        },
    })
}

/// Summarize `snapshot` as of `at`.
pub fn summarize(snapshot: &RegistrySnapshot, at: Timestamp) -> Summary {
    Summary {
        administrator: snapshot.administrator.to_string(),
        seconds_per_year: snapshot.seconds_per_year,
        domain_types: snapshot.domain_types.iter().map(ToString::to_string).collect(),
        paused: snapshot.paused,
        fee_balance: snapshot.fee_balance,
        registration_counter: snapshot.registration_counter,
        records: snapshot.records.len(),
        active: snapshot.active_count(at),
        at,
    }
}

fn describe_resolution(report: &ResolveReport) -> String {
    match report {
        ResolveReport::Resolved { name, resolution, .. } => {
            let mut out = format!(
                "{name}\n  resolver: {}\n  owner:    {}",
                resolution.resolver, resolution.owner
            );
            let info = &resolution.personal_info;
            if !info.is_empty() {
                out.push_str(&format!(
                    "\n  avatar:   {}\n  email:    {}\n  handle:   {}\n  alias:    {}",
                    info.avatar, info.email, info.handle, info.alias
                ));
            }
            out
        }
        ResolveReport::Unresolved { name, error, .. } => format!("{name}: {error}"),
    }
}

fn describe_summary(s: &Summary) -> String {
    format!(
        "administrator:        {}\nseconds_per_year:     {}\ndomain_types:         {}\npaused:               {}\nfee_balance:          {}\nregistration_counter: {}\nrecords:              {} ({} active at {})",
        s.administrator,
        s.seconds_per_year,
        s.domain_types.join(", "),
        s.paused,
        s.fee_balance,
        s.registration_counter,
        s.records,
        s.active,
        s.at,
    )
}

/// Execute the snapshot subcommand.
pub fn run_snapshot(args: &SnapshotArgs, json: bool) -> Result<u8> {
    match &args.command {
        SnapshotCommand::Resolve { file, fqn, at } => {
            let snapshot = load_snapshot(file)?;
            let report = resolve_in(&snapshot, fqn, instant(*at)?)?;
            let code = match report {
                ResolveReport::Resolved { .. } => 0,
                ResolveReport::Unresolved { .. } => 1,
            };
            println!("{}", crate::render(&report, json, describe_resolution)?);
            Ok(code)
        }
        SnapshotCommand::Summary { file } => {
            let snapshot = load_snapshot(file)?;
            let summary = summarize(&snapshot, Timestamp::now());
            println!("{}", crate::render(&summary, json, describe_summary)?);
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use lacns_core::{DomainType, Identity, Label};
    use lacns_registry::{ManualClock, PersonalInfo, RegisterRequest, RegistryConfig};

    const START: i64 = 1_700_000_000;

    fn id(s: &str) -> Identity {
        Identity::new(s).unwrap()
    }

    /// A snapshot holding fer.lac (alice, 60-second years, 1 year).
    fn sample() -> RegistrySnapshot {
        let clock = ManualClock::new(Timestamp::from_epoch_secs(START).unwrap());
        let config = RegistryConfig::new(id("0xadmin"))
            .with_seconds_per_year(60)
            .with_domain_type(DomainType::new("lac").unwrap());
        let mut registry = Registry::new(config)
            .unwrap()
            .with_clock(Arc::new(clock));
        let request = RegisterRequest {
            label: Label::new("fer").unwrap(),
            domain_type: DomainType::new("lac").unwrap(),
            years: 1,
            resolver: id("0xalice"),
        };
        registry
            .register(&id("0xalice"), request, Amount::new(800_000_000_000_000_000))
            .unwrap();
        let name: FullyQualifiedName = "fer.lac".parse().unwrap();
        registry
            .change_personal_info(
                &id("0xalice"),
                &name,
                PersonalInfo::new("fer.jpg", "fer@mail.com", "@fer", "@fergmolina"),
            )
            .unwrap();
        registry.snapshot()
    }

    fn at(secs: i64) -> Timestamp {
        Timestamp::from_epoch_secs(secs).unwrap()
    }

    #[test]
    fn resolves_before_expiry_only() {
        let snapshot = sample();
        match resolve_in(&snapshot, "fer.lac", at(START + 59)).unwrap() {
            ResolveReport::Resolved { resolution, .. } => {
                assert_eq!(resolution.resolver.as_str(), "0xalice");
                assert_eq!(resolution.personal_info.email, "fer@mail.com");
            }
            other => panic!("expected resolved, got {other:?}"),
        }
        match resolve_in(&snapshot, "fer.lac", at(START + 60)).unwrap() {
            ResolveReport::Unresolved { error, .. } => {
                assert_eq!(error, "Error: Domain is expired or not registered.");
            }
            other => panic!("expected unresolved, got {other:?}"),
        }
    }

    #[test]
    fn malformed_name_is_an_error() {
        assert!(resolve_in(&sample(), "nodot", at(START)).is_err());
    }

    #[test]
    fn summary_counts() {
        let s = summarize(&sample(), at(START + 1));
        assert_eq!(s.records, 1);
        assert_eq!(s.active, 1);
        assert_eq!(s.registration_counter, 2);
        assert_eq!(s.fee_balance, Amount::new(800_000_000_000_000_000));
        assert_eq!(summarize(&sample(), at(START + 60)).active, 0);
        assert!(describe_summary(&s).contains("domain_types:         lac"));
    }

    #[test]
    fn load_round_trips_file_and_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("snap.json");
        std::fs::write(&good, serde_json::to_string(&sample()).unwrap()).unwrap();
        assert_eq!(load_snapshot(&good).unwrap(), sample());

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{}").unwrap();
        assert!(load_snapshot(&bad).is_err());
    }

    #[test]
    fn json_report_is_tagged() {
        let report = resolve_in(&sample(), "fer.lac", at(START)).unwrap();
        let out = crate::render(&report, true, describe_resolution).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["status"], "resolved");
        assert_eq!(value["owner"], "0xalice");
    }
}
