//! Sync command implementation
//!
//! Reads pipeline messages from a file or stdin and submits every record to
//! the accounting API.

use crate::adapters::books::BooksClient;
use crate::config::load_config;
use crate::core::mapping::MappingStore;
use crate::core::process::RecordProcessor;
use crate::core::report::SyncSummary;
use crate::core::sync::{SyncOptions, SyncRunner};
use crate::domain::LedgerError;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::BufReader;
use tokio::sync::watch;

/// Arguments for the sync command
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Read messages from this file instead of stdin
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Build and resolve payloads without submitting them
    #[arg(long)]
    pub dry_run: bool,

    /// Stop at the first failed record
    #[arg(long)]
    pub fail_fast: bool,
}

impl SyncArgs {
    /// Execute the sync command
    pub async fn execute(
        &self,
        config_path: &str,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Starting sync command");

        let mut config = match load_config(config_path) {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        if self.dry_run {
            tracing::info!("Enabling dry-run mode from CLI");
            config.application.dry_run = true;
        }
        if self.fail_fast {
            config.application.fail_fast = true;
        }

        let mappings = match MappingStore::load(&config.mapping) {
            Ok(mappings) => mappings,
            Err(e) => {
                eprintln!("Configuration error: {e}");
                return Ok(2);
            }
        };

        let client = match BooksClient::new(&config.books) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                eprintln!("Failed to initialize API client: {e}");
                return Ok(5);
            }
        };

        if config.application.dry_run {
            eprintln!("🔍 DRY RUN MODE - payloads are built but not submitted");
        }

        let processor = RecordProcessor::new(client, mappings, config.policy)
            .with_dry_run(config.application.dry_run);
        let runner = SyncRunner::new(
            &processor,
            SyncOptions {
                fail_fast: config.application.fail_fast,
            },
            shutdown_signal,
        );

        let result = match &self.input {
            Some(path) => {
                let file = tokio::fs::File::open(path)
                    .await
                    .map_err(|e| LedgerError::Io(format!("{}: {}", path.display(), e)))?;
                runner.run(BufReader::new(file)).await
            }
            None => runner.run(BufReader::new(tokio::io::stdin())).await,
        };

        let summary = match result {
            Ok(summary) => summary,
            Err(e) => {
                tracing::error!(error = %e, "Sync failed");
                eprintln!("Sync failed: {e}");
                return Ok(5);
            }
        };

        if let Some(state) = &summary.last_state {
            println!("{state}");
        }

        print_summary(&summary);
        Ok(exit_code(&summary))
    }
}

fn print_summary(summary: &SyncSummary) {
    eprintln!();
    eprintln!("📊 Sync Summary:");
    eprintln!("  Total Records: {}", summary.total_records);
    eprintln!("  Submitted: {}", summary.submitted);
    eprintln!("  Skipped: {}", summary.skipped);
    eprintln!("  Failed: {}", summary.failed);
    eprintln!("  Duration: {:.2}s", summary.duration.as_secs_f64());
    eprintln!("  Success Rate: {:.2}%", summary.success_rate());

    if !summary.errors.is_empty() {
        eprintln!();
        eprintln!("⚠️  Errors encountered:");
        for error in &summary.errors {
            eprintln!(
                "  - line {} ({}) [{}]: {}",
                error.line, error.stream, error.kind, error.message
            );
        }
    }
    eprintln!();
}

/// 130 when interrupted, 1 when any record failed, 0 otherwise
fn exit_code(summary: &SyncSummary) -> i32 {
    if summary.interrupted {
        eprintln!("⚠️  Sync interrupted before the end of input");
        130
    } else if summary.is_successful() {
        eprintln!("✅ Sync completed successfully!");
        0
    } else {
        eprintln!("⚠️  Sync completed with failures");
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{LedgerError, RecordOutcome};

    #[test]
    fn test_exit_codes() {
        let mut summary = SyncSummary::new();
        assert_eq!(exit_code(&summary), 0);

        summary.record(
            "Invoices",
            1,
            &Err::<RecordOutcome, _>(LedgerError::Mapping("quantity is missing".to_string())),
        );
        assert_eq!(exit_code(&summary), 1);

        summary.interrupted = true;
        assert_eq!(exit_code(&summary), 130);
    }

    #[tokio::test]
    async fn test_missing_config_is_configuration_error() {
        let args = SyncArgs {
            input: None,
            dry_run: false,
            fail_fast: false,
        };
        let (_tx, rx) = watch::channel(false);

        let code = args.execute("does-not-exist.toml", rx).await.unwrap();
        assert_eq!(code, 2);
    }
}
