//! Per-record processing outcomes

use serde_json::Value;

/// Why a record was not submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Purchase order had no line item with an item identifier
    NoResolvableLineItems,
    /// Stream name has no pipeline
    UnknownStream(String),
    /// Dry-run mode: payload built but not submitted
    DryRun,
}

impl SkipReason {
    /// Short label for logs and summaries
    pub fn as_str(&self) -> &str {
        match self {
            SkipReason::NoResolvableLineItems => "no_resolvable_line_items",
            SkipReason::UnknownStream(_) => "unknown_stream",
            SkipReason::DryRun => "dry_run",
        }
    }
}

/// Result of processing one record that did not fail
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// The create call succeeded
    Submitted {
        /// HTTP status returned by the create call
        status: u16,
        /// Running count of successful submissions in this session
        total: u64,
    },
    /// The record was intentionally not submitted
    Skipped {
        /// Why the record was skipped
        reason: SkipReason,
        /// Payload built before the skip, if any
        payload: Option<Value>,
    },
}

impl RecordOutcome {
    /// Returns true if the record was submitted
    pub fn is_submitted(&self) -> bool {
        matches!(self, RecordOutcome::Submitted { .. })
    }
}
