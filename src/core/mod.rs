//! Core mapping-and-resolution logic for LedgerBridge.
//!
//! # Modules
//!
//! - [`mapping`] - Declarative mapping document and payload construction
//! - [`resolve`] - Name-to-identifier lookups against the accounting API
//! - [`process`] - Per-record-type pipelines
//! - [`report`] - Submission classification and run summaries
//! - [`ingest`] - Pipeline message parsing
//! - [`sync`] - Run orchestration over a message stream
//!
//! # Record Workflow
//!
//! 1. **Dispatch**: pick the pipeline by stream name
//! 2. **Map**: build the payload from the record type's mapping
//! 3. **Normalize**: rewrite dates into the API's format
//! 4. **Resolve**: fill in customer, vendor and item identifiers
//! 5. **Submit**: one create call per record
//! 6. **Report**: classify the response and count successes
//!
//! # Example
//!
//! ```rust,no_run
//! use ledgerbridge::adapters::books::BooksClient;
//! use ledgerbridge::config::load_config;
//! use ledgerbridge::core::mapping::MappingStore;
//! use ledgerbridge::core::process::RecordProcessor;
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ledgerbridge.toml")?;
//! let client = Arc::new(BooksClient::new(&config.books)?);
//! let mappings = MappingStore::load(&config.mapping)?;
//! let processor = RecordProcessor::new(client, mappings, config.policy);
//!
//! let record = json!({"supplier_name": "Acme Supply", "lineItems": []});
//! let outcome = processor.process("BuyOrders", record.as_object().unwrap()).await?;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod ingest;
pub mod mapping;
pub mod process;
pub mod report;
pub mod resolve;
pub mod sync;
