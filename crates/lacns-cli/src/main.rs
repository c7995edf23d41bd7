//! # lacns CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lacns_cli::config::{run_config, ConfigArgs};
use lacns_cli::quote::{run_quote, QuoteArgs};
use lacns_cli::snapshot::{run_snapshot, SnapshotArgs};

/// LaChain Name Service CLI.
///
/// Price quotes, registry configuration checks, and offline snapshot
/// inspection.
#[derive(Parser, Debug)]
#[command(name = "lacns", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Required payment for a name and duration.
    Quote(QuoteArgs),

    /// Registry configuration files.
    Config(ConfigArgs),

    /// Saved registry snapshots.
    Snapshot(SnapshotArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match &cli.command {
        Commands::Quote(args) => run_quote(args, cli.json),
        Commands::Config(args) => run_config(args, cli.json),
        Commands::Snapshot(args) => run_snapshot(args, cli.json),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use lacns_cli::config::ConfigCommand;
    use lacns_cli::snapshot::SnapshotCommand;

    #[test]
    fn cli_parse_quote_defaults() {
        let cli = Cli::try_parse_from(["lacns", "quote", "fer"]).unwrap();
        match cli.command {
            Commands::Quote(args) => {
                assert_eq!(args.name, "fer");
                assert_eq!(args.years, 1);
                assert!(args.config.is_none());
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(!cli.json);
    }

    #[test]
    fn cli_parse_quote_with_flags() {
        let cli = Cli::try_parse_from([
            "lacns", "quote", "fer.lac", "--years", "3", "--config", "r.yaml", "--json",
        ])
        .unwrap();
        assert!(cli.json);
        if let Commands::Quote(args) = cli.command {
            assert_eq!(args.years, 3);
            assert_eq!(args.config, Some(PathBuf::from("r.yaml")));
        }
    }

    #[test]
    fn cli_parse_config_check() {
        let cli = Cli::try_parse_from(["lacns", "config", "check", "r.yaml"]).unwrap();
        match cli.command {
            Commands::Config(ConfigArgs {
                command: ConfigCommand::Check { file },
            }) => assert_eq!(file, PathBuf::from("r.yaml")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cli_parse_snapshot_resolve_at() {
        let cli = Cli::try_parse_from([
            "lacns", "snapshot", "resolve", "snap.json", "fer.lac", "--at", "1700000000",
        ])
        .unwrap();
        match cli.command {
            Commands::Snapshot(SnapshotArgs {
                command: SnapshotCommand::Resolve { file, fqn, at },
            }) => {
                assert_eq!(file, PathBuf::from("snap.json"));
                assert_eq!(fqn, "fer.lac");
                assert_eq!(at, Some(1_700_000_000));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn cli_parse_snapshot_summary_verbose() {
        let cli = Cli::try_parse_from(["lacns", "-vv", "snapshot", "summary", "snap.json"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Snapshot(_)));
    }

    #[test]
    fn cli_rejects_missing_subcommand() {
        assert!(Cli::try_parse_from(["lacns"]).is_err());
    }
}
