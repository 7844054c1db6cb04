//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for LedgerBridge using clap.

pub mod commands;

use clap::{Parser, Subcommand};

/// LedgerBridge - pipeline records to Zoho Books
#[derive(Parser, Debug)]
#[command(name = "ledgerbridge")]
#[command(version, about, long_about = None)]
#[command(author = "LedgerBridge Contributors")]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, default_value = "ledgerbridge.toml", env = "LEDGERBRIDGE_CONFIG")]
    pub config: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LEDGERBRIDGE_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Submit records read from a message stream
    Sync(commands::sync::SyncArgs),

    /// Validate configuration file and mapping document
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_sync() {
        let cli = Cli::parse_from(["ledgerbridge", "sync"]);
        assert_eq!(cli.config, "ledgerbridge.toml");
        match cli.command {
            Commands::Sync(args) => {
                assert!(args.input.is_none());
                assert!(!args.dry_run);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_sync_options() {
        let cli = Cli::parse_from([
            "ledgerbridge",
            "--config",
            "custom.toml",
            "sync",
            "--input",
            "records.jsonl",
            "--dry-run",
            "--fail-fast",
        ]);
        assert_eq!(cli.config, "custom.toml");
        match cli.command {
            Commands::Sync(args) => {
                assert_eq!(args.input.unwrap().to_str(), Some("records.jsonl"));
                assert!(args.dry_run);
                assert!(args.fail_fast);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_cli_parse_with_log_level() {
        let cli = Cli::parse_from(["ledgerbridge", "--log-level", "debug", "sync"]);
        assert_eq!(cli.log_level, Some("debug".to_string()));
    }

    #[test]
    fn test_cli_parse_validate_config() {
        let cli = Cli::parse_from(["ledgerbridge", "validate-config"]);
        assert!(matches!(cli.command, Commands::ValidateConfig(_)));
    }

    #[test]
    fn test_cli_parse_init() {
        let cli = Cli::parse_from(["ledgerbridge", "init", "--with-mapping", "mapping.json"]);
        match cli.command {
            Commands::Init(args) => {
                assert_eq!(args.output, "ledgerbridge.toml");
                assert_eq!(args.with_mapping.as_deref(), Some("mapping.json"));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }
}
