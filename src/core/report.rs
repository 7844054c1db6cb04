//! Submission reporting
//!
//! [`ResultReporter`] classifies create responses and counts successes for
//! one session. [`SyncSummary`] aggregates a whole run for the CLI.

use crate::adapters::books::ApiResponse;
use crate::domain::{BooksApiError, LedgerError, RecordOutcome, Result};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Classifies create responses and counts successful submissions
#[derive(Debug, Default)]
pub struct ResultReporter {
    submitted: AtomicU64,
}

impl ResultReporter {
    /// Create a reporter with a zero count
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify a create response
    ///
    /// Returns the running count of successful submissions.
    ///
    /// # Errors
    ///
    /// Any non-2xx status becomes [`BooksApiError::SubmissionFailed`]
    /// carrying the response body. The count is left unchanged.
    pub fn report(&self, response: &ApiResponse) -> Result<u64> {
        if !response.is_success() {
            return Err(BooksApiError::SubmissionFailed {
                status: response.status,
                body: response.body.clone(),
            }
            .into());
        }

        let total = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::info!(
            status = response.status,
            total,
            "Status: {}, {} records processed so far",
            response.status,
            total
        );
        Ok(total)
    }

    /// Successful submissions so far
    pub fn submitted(&self) -> u64 {
        self.submitted.load(Ordering::SeqCst)
    }
}

/// Summary of a sync run
#[derive(Debug, Clone)]
pub struct SyncSummary {
    /// Records received
    pub total_records: usize,

    /// Records the API accepted
    pub submitted: usize,

    /// Records intentionally not submitted
    pub skipped: usize,

    /// Records that failed
    pub failed: usize,

    /// Non-record messages seen (schema, state)
    pub other_messages: usize,

    /// Duration of the run
    pub duration: Duration,

    /// Errors encountered, one per failed record
    pub errors: Vec<RecordError>,

    /// Most recent state message value
    pub last_state: Option<Value>,

    /// Whether the run stopped on a shutdown signal
    pub interrupted: bool,
}

impl SyncSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self {
            total_records: 0,
            submitted: 0,
            skipped: 0,
            failed: 0,
            other_messages: 0,
            duration: Duration::from_secs(0),
            errors: Vec::new(),
            last_state: None,
            interrupted: false,
        }
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Count one record's result
    pub fn record(&mut self, stream: &str, line: usize, result: &Result<RecordOutcome>) {
        self.total_records += 1;
        match result {
            Ok(RecordOutcome::Submitted { .. }) => self.submitted += 1,
            Ok(RecordOutcome::Skipped { .. }) => self.skipped += 1,
            Err(error) => {
                self.failed += 1;
                self.errors.push(RecordError::new(stream, line, error));
            }
        }
    }

    /// True when no record failed
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }

    /// Get success rate as a percentage of records that were not skipped
    pub fn success_rate(&self) -> f64 {
        let attempted = self.submitted + self.failed;
        if attempted == 0 {
            return 100.0;
        }
        (self.submitted as f64 / attempted as f64) * 100.0
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_records = self.total_records,
            submitted = self.submitted,
            skipped = self.skipped,
            failed = self.failed,
            interrupted = self.interrupted,
            other_messages = self.other_messages,
            duration_secs = self.duration.as_secs(),
            success_rate = format!("{:.2}%", self.success_rate()),
            "Sync completed"
        );

        if !self.errors.is_empty() {
            tracing::warn!(error_count = self.errors.len(), "Sync completed with errors");
            for error in &self.errors {
                tracing::warn!(
                    stream = %error.stream,
                    line = error.line,
                    kind = error.kind,
                    message = %error.message,
                    "Record error"
                );
            }
        }
    }
}

impl Default for SyncSummary {
    fn default() -> Self {
        Self::new()
    }
}

/// A failed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordError {
    /// Stream the record came from
    pub stream: String,

    /// Input line number (1-based)
    pub line: usize,

    /// Error category, see [`LedgerError::kind`]
    pub kind: &'static str,

    /// Error message
    pub message: String,
}

impl RecordError {
    /// Create a record error
    pub fn new(stream: &str, line: usize, error: &LedgerError) -> Self {
        Self {
            stream: stream.to_string(),
            line,
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SkipReason;

    #[test]
    fn test_success_increments_counter() {
        let reporter = ResultReporter::new();
        assert_eq!(reporter.report(&ApiResponse::new(201, "{}")).unwrap(), 1);
        assert_eq!(reporter.report(&ApiResponse::new(200, "{}")).unwrap(), 2);
        assert_eq!(reporter.submitted(), 2);
    }

    #[test]
    fn test_failure_carries_body_and_keeps_count() {
        let reporter = ResultReporter::new();
        reporter.report(&ApiResponse::new(201, "{}")).unwrap();

        let err = reporter
            .report(&ApiResponse::new(400, r#"{"message":"Invalid customer"}"#))
            .unwrap_err();

        match err {
            LedgerError::BooksApi(BooksApiError::SubmissionFailed { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("Invalid customer"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(reporter.submitted(), 1);
    }

    #[test]
    fn test_redirect_is_a_failure() {
        let reporter = ResultReporter::new();
        assert!(reporter.report(&ApiResponse::new(302, "")).is_err());
    }

    #[test]
    fn test_summary_counts() {
        let mut summary = SyncSummary::new();
        summary.record("Invoices", 1, &Ok(RecordOutcome::Submitted { status: 201, total: 1 }));
        summary.record(
            "BuyOrders",
            2,
            &Ok(RecordOutcome::Skipped {
                reason: SkipReason::NoResolvableLineItems,
                payload: None,
            }),
        );
        summary.record(
            "BuyOrders",
            3,
            &Err(LedgerError::Resolution("Supplier 'Nope' not found".to_string())),
        );

        assert_eq!(summary.total_records, 3);
        assert_eq!(summary.submitted, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.failed, 1);
        assert!(!summary.is_successful());
        assert_eq!(summary.success_rate(), 50.0);
        assert_eq!(summary.errors[0].line, 3);
        assert_eq!(summary.errors[0].kind, "resolution");
    }

    #[test]
    fn test_empty_summary_is_successful() {
        let summary = SyncSummary::default().with_duration(Duration::from_secs(3));
        assert!(summary.is_successful());
        assert_eq!(summary.success_rate(), 100.0);
        assert_eq!(summary.duration, Duration::from_secs(3));
    }
}
