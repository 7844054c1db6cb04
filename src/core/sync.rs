//! Sync run orchestration
//!
//! Feeds pipeline messages to a [`RecordProcessor`] one record at a time
//! and accumulates a [`SyncSummary`].

use crate::core::ingest::{MessageReader, StreamMessage};
use crate::core::process::RecordProcessor;
use crate::core::report::SyncSummary;
use crate::domain::{BooksApiError, LedgerError, Result};
use crate::log_error_with_context;
use std::time::Instant;
use tokio::io::AsyncBufRead;
use tokio::sync::watch;

/// How a run reacts to failures
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Stop at the first failed record or unparsable line
    pub fail_fast: bool,
}

/// Drives one sync run
pub struct SyncRunner<'a> {
    processor: &'a RecordProcessor,
    options: SyncOptions,
    shutdown_signal: watch::Receiver<bool>,
}

impl<'a> SyncRunner<'a> {
    /// Create a runner
    ///
    /// A `true` on `shutdown_signal` stops the run after the record in
    /// flight.
    pub fn new(
        processor: &'a RecordProcessor,
        options: SyncOptions,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Self {
        Self {
            processor,
            options,
            shutdown_signal,
        }
    }

    /// Process every message of the input
    ///
    /// Record failures and unparsable lines are counted in the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the input cannot be read or the accounts server
    /// rejects the credentials. Other record failures are counted.
    pub async fn run<R>(&self, reader: R) -> Result<SyncSummary>
    where
        R: AsyncBufRead + Unpin,
    {
        let start = Instant::now();
        let mut summary = SyncSummary::new();
        let mut messages = MessageReader::new(reader);

        loop {
            if *self.shutdown_signal.borrow() {
                tracing::warn!(
                    line = messages.line_number(),
                    "Shutdown requested, stopping before next message"
                );
                summary.interrupted = true;
                break;
            }

            let message = match messages.next_message().await {
                Ok(Some(message)) => message,
                Ok(None) => break,
                Err(LedgerError::Io(msg)) => return Err(LedgerError::Io(msg)),
                Err(error) => {
                    let line = messages.line_number();
                    log_error_with_context!(&error, format!("Input line {line}"));
                    summary.record("-", line, &Err(error));
                    if self.options.fail_fast {
                        break;
                    }
                    continue;
                }
            };

            match message {
                StreamMessage::Record { stream, record } => {
                    let line = messages.line_number();
                    let result = self.processor.process(&stream, &record).await;
                    // Rejected credentials fail every later record too
                    if let Err(
                        error @ LedgerError::BooksApi(BooksApiError::AuthenticationFailed(_)),
                    ) = result
                    {
                        log_error_with_context!(&error, format!("Record on line {line} of stream {stream}"));
                        return Err(error);
                    }
                    if let Err(error) = &result {
                        log_error_with_context!(error, format!("Record on line {line} of stream {stream}"));
                    }
                    let failed = result.is_err();
                    summary.record(&stream, line, &result);
                    if failed && self.options.fail_fast {
                        tracing::warn!("Stopping at first failure");
                        break;
                    }
                }
                StreamMessage::Schema { stream, .. } => {
                    tracing::debug!(stream = %stream, "Schema message received");
                    summary.other_messages += 1;
                }
                StreamMessage::State { value } => {
                    summary.other_messages += 1;
                    summary.last_state = Some(value);
                }
            }
        }

        let summary = summary.with_duration(start.elapsed());
        summary.log_summary();
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::mapping::MappingStore;
    use crate::core::process::ResolutionPolicies;
    use crate::core::resolve::fake::FakeApi;
    use serde_json::json;
    use std::sync::Arc;

    const INPUT: &str = r#"{"type": "SCHEMA", "stream": "BuyOrders", "schema": {}}
{"type": "RECORD", "stream": "BuyOrders", "record": {"supplier_name": "Ghost", "lineItems": [{"product_id": "P-1", "quantity": 1}]}}
{"type": "RECORD", "stream": "BuyOrders", "record": {"supplier_name": "Acme", "lineItems": [{"product_id": "P-2", "quantity": 2}]}}
{"type": "RECORD", "stream": "BuyOrders", "record": {"supplier_name": "Acme", "lineItems": [{"name": "loose", "quantity": 2}]}}
{"type": "STATE", "value": {"bookmarks": {"BuyOrders": 3}}}
"#;

    fn processor(api: Arc<FakeApi>) -> RecordProcessor {
        RecordProcessor::new(
            api,
            MappingStore::builtin().unwrap(),
            ResolutionPolicies::default(),
        )
    }

    fn api() -> Arc<FakeApi> {
        Arc::new(FakeApi::new().with_entity("contacts", "Acme", json!({"contact_id": "V-1"})))
    }

    #[tokio::test]
    async fn test_failures_are_isolated_by_default() {
        let api = api();
        let processor = processor(api.clone());
        let (_tx, rx) = watch::channel(false);

        let summary = SyncRunner::new(&processor, SyncOptions::default(), rx)
            .run(INPUT.as_bytes())
            .await
            .unwrap();

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.submitted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.other_messages, 2);
        assert_eq!(summary.errors[0].line, 2);
        assert_eq!(summary.last_state, Some(json!({"bookmarks": {"BuyOrders": 3}})));
        assert!(!summary.interrupted);
        assert_eq!(api.created().len(), 1);
    }

    #[tokio::test]
    async fn test_fail_fast_stops_at_first_failure() {
        let api = api();
        let processor = processor(api.clone());
        let (_tx, rx) = watch::channel(false);

        let summary = SyncRunner::new(&processor, SyncOptions { fail_fast: true }, rx)
            .run(INPUT.as_bytes())
            .await
            .unwrap();

        assert_eq!(summary.total_records, 1);
        assert_eq!(summary.failed, 1);
        assert!(api.created().is_empty());
    }

    #[tokio::test]
    async fn test_bad_line_counted_as_failure() {
        let api = api();
        let processor = processor(api);
        let (_tx, rx) = watch::channel(false);

        let summary = SyncRunner::new(&processor, SyncOptions::default(), rx)
            .run("{not json}\n".as_bytes())
            .await
            .unwrap();

        assert_eq!(summary.failed, 1);
        assert_eq!(summary.errors[0].kind, "serialization");
    }

    #[tokio::test]
    async fn test_undecodable_line_does_not_end_run() {
        let api = api();
        let processor = processor(api.clone());
        let (_tx, rx) = watch::channel(false);
        let mut input = b"\xff{\"type\": \"RECORD\"}\n".to_vec();
        input.extend_from_slice(INPUT.as_bytes());

        let summary = SyncRunner::new(&processor, SyncOptions::default(), rx)
            .run(input.as_slice())
            .await
            .unwrap();

        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.errors[0].stream, "-");
        assert_eq!(summary.errors[0].line, 1);
        assert_eq!(summary.errors[0].kind, "serialization");
        assert_eq!(summary.submitted, 1);
        assert_eq!(api.created().len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_signal_stops_run() {
        let api = api();
        let processor = processor(api.clone());
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let summary = SyncRunner::new(&processor, SyncOptions::default(), rx)
            .run(INPUT.as_bytes())
            .await
            .unwrap();

        assert!(summary.interrupted);
        assert_eq!(summary.total_records, 0);
        assert!(api.created().is_empty());
    }
}
