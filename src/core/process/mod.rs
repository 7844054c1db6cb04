//! Per-record processing
//!
//! [`RecordProcessor`] dispatches each record by stream name and runs the
//! matching pipeline: map, normalize, resolve, submit, report.
//!
//! | Stream      | Mapping      | Endpoint         |
//! |-------------|--------------|------------------|
//! | `Invoices`  | `invoices`   | `invoices`       |
//! | `Bills`     | `bills`      | `bills`          |
//! | `BuyOrders` | `buy_orders` | `purchaseorders` |

mod bill;
pub mod dates;
mod invoice;
pub mod policy;
mod purchase_order;

pub use policy::{ResolutionPolicies, ResolutionPolicy};

use crate::adapters::books::AccountingApi;
use crate::core::mapping::{build_payload, MappingStore, Payload};
use crate::core::report::ResultReporter;
use crate::core::resolve::EntityResolver;
use crate::domain::{InputRecord, LedgerError, RecordOutcome, Result, SkipReason, StreamKind};
use crate::log_record_skipped;
use serde_json::Value;
use std::sync::Arc;

/// Result of a type-specific pipeline before submission
#[derive(Debug)]
pub(crate) enum Prepared {
    Submit(Payload),
    Skip(SkipReason, Payload),
}

/// Runs records through their pipelines
///
/// # Example
///
/// ```no_run
/// use ledgerbridge::adapters::books::BooksClient;
/// use ledgerbridge::config::load_config;
/// use ledgerbridge::core::mapping::MappingStore;
/// use ledgerbridge::core::process::RecordProcessor;
/// use serde_json::json;
/// use std::sync::Arc;
///
/// # async fn example() -> ledgerbridge::domain::Result<()> {
/// let config = load_config("ledgerbridge.toml")?;
/// let client = Arc::new(BooksClient::new(&config.books)?);
/// let processor = RecordProcessor::new(client, MappingStore::builtin()?, config.policy);
///
/// let record = json!({"customer_name": "Acme", "lineItems": []});
/// let outcome = processor.process("Invoices", record.as_object().unwrap()).await?;
/// println!("{outcome:?}");
/// # Ok(())
/// # }
/// ```
pub struct RecordProcessor {
    api: Arc<dyn AccountingApi>,
    mappings: MappingStore,
    policies: ResolutionPolicies,
    dry_run: bool,
    reporter: ResultReporter,
}

impl RecordProcessor {
    /// Create a processor that submits records
    pub fn new(
        api: Arc<dyn AccountingApi>,
        mappings: MappingStore,
        policies: ResolutionPolicies,
    ) -> Self {
        Self {
            api,
            mappings,
            policies,
            dry_run: false,
            reporter: ResultReporter::new(),
        }
    }

    /// Build and resolve payloads without submitting them
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Session reporter
    pub fn reporter(&self) -> &ResultReporter {
        &self.reporter
    }

    /// Process one record of the named stream
    ///
    /// # Errors
    ///
    /// Returns the record's failure: malformed input, a required reference
    /// that did not resolve, an API or authentication error, or a rejected
    /// submission. Skips are not errors.
    pub async fn process(&self, stream: &str, record: &InputRecord) -> Result<RecordOutcome> {
        let kind = match stream.parse::<StreamKind>() {
            Ok(kind) => kind,
            Err(_) => {
                tracing::warn!(stream, "No pipeline for stream, skipping record");
                return Ok(RecordOutcome::Skipped {
                    reason: SkipReason::UnknownStream(stream.to_string()),
                    payload: None,
                });
            }
        };

        let spec = self.mappings.get(kind.mapping_key()).ok_or_else(|| {
            LedgerError::Configuration(format!(
                "Mapping document has no '{}' entry",
                kind.mapping_key()
            ))
        })?;

        let payload = build_payload(record, &spec)?;
        let line_items = spec.record.line_items.as_ref().map(|li| li.target.as_str());
        let resolver = EntityResolver::new(self.api.as_ref());

        let prepared = match kind {
            StreamKind::Invoices => Prepared::Submit(
                invoice::prepare(&resolver, &self.policies, line_items, payload).await?,
            ),
            StreamKind::Bills => Prepared::Submit(
                bill::prepare(&resolver, &self.policies, record, &spec, payload).await?,
            ),
            StreamKind::BuyOrders => {
                purchase_order::prepare(&resolver, &self.policies, line_items, record, payload)
                    .await?
            }
        };

        let payload = match prepared {
            Prepared::Submit(payload) => Value::Object(payload),
            Prepared::Skip(reason, payload) => {
                log_record_skipped!(kind, reason.as_str());
                return Ok(RecordOutcome::Skipped {
                    reason,
                    payload: Some(Value::Object(payload)),
                });
            }
        };

        if self.dry_run {
            tracing::debug!(stream = %kind, payload = %payload, "Dry run, payload not submitted");
            log_record_skipped!(kind, SkipReason::DryRun.as_str());
            return Ok(RecordOutcome::Skipped {
                reason: SkipReason::DryRun,
                payload: Some(payload),
            });
        }

        let response = self.api.create(kind.endpoint(), &payload).await?;
        let total = self.reporter.report(&response)?;
        Ok(RecordOutcome::Submitted {
            status: response.status,
            total,
        })
    }
}
