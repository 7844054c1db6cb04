//! Declarative mapping tables
//!
//! A mapping document describes, per record type, which source fields land
//! under which target keys. It is plain data: adding a record type means
//! adding an entry to the document, not touching code.
//!
//! ```json
//! {
//!   "ignore": ["invoice_id"],
//!   "invoices": {
//!     "fields": { "customer_name": "customer_name" },
//!     "nested": [
//!       { "source": "address", "target": "billing_address", "fields": { "city": "city" } }
//!     ],
//!     "line_items": { "source": "lineItems", "fields": { "quantity": "quantity" } }
//!   }
//! }
//! ```

use crate::config::MappingConfig;
use crate::domain::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Mapping document compiled into the binary
const BUILTIN_DOCUMENT: &str = include_str!("../../../mapping/default.json");

/// A nested sub-object built from one source object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NestedMapping {
    /// Source key holding the nested object
    pub source: String,
    /// Target key the sub-object is written to
    pub target: String,
    /// Source field → target field inside the sub-object
    pub fields: BTreeMap<String, String>,
}

/// Mapping applied to every element of a repeated source list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemMapping {
    /// Source key holding the list
    pub source: String,
    /// Target key of the mapped list
    #[serde(default = "default_line_items_target")]
    pub target: String,
    /// Source field → target field inside each element
    pub fields: BTreeMap<String, String>,
}

/// Mapping for one record type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordMapping {
    /// Flat source field → target field
    #[serde(default)]
    pub fields: BTreeMap<String, String>,
    /// Nested sub-objects
    #[serde(default)]
    pub nested: Vec<NestedMapping>,
    /// Repeated sub-objects
    #[serde(default)]
    pub line_items: Option<LineItemMapping>,
}

impl RecordMapping {
    /// Rejects mappings that would write the same target key twice
    fn validate(&self, record_type: &str) -> Result<()> {
        let mut targets = BTreeSet::new();
        let section_targets = self
            .nested
            .iter()
            .map(|n| n.target.as_str())
            .chain(self.line_items.iter().map(|li| li.target.as_str()));

        for target in self.fields.values().map(String::as_str).chain(section_targets) {
            if target.trim().is_empty() {
                return Err(LedgerError::Configuration(format!(
                    "Mapping '{record_type}' has an empty target key"
                )));
            }
            if !targets.insert(target) {
                return Err(LedgerError::Configuration(format!(
                    "Mapping '{record_type}' writes target key '{target}' more than once"
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct MappingDocument {
    #[serde(default)]
    ignore: BTreeSet<String>,
    #[serde(flatten)]
    records: BTreeMap<String, RecordMapping>,
}

/// The mapping for one record type plus the global ignore-set
#[derive(Debug, Clone, Copy)]
pub struct MappingSpec<'a> {
    /// Record-type mapping
    pub record: &'a RecordMapping,
    /// Target keys dropped from every payload
    pub ignore: &'a BTreeSet<String>,
}

/// Loaded mapping document, keyed by record type
#[derive(Debug, Clone)]
pub struct MappingStore {
    ignore: BTreeSet<String>,
    records: BTreeMap<String, RecordMapping>,
}

impl MappingStore {
    /// The mapping document shipped with the binary
    ///
    /// # Errors
    ///
    /// Returns an error only if the embedded document is invalid.
    pub fn builtin() -> Result<Self> {
        Self::from_json(BUILTIN_DOCUMENT)
    }

    /// Parse a mapping document
    ///
    /// # Errors
    ///
    /// Returns a configuration error for invalid JSON or conflicting targets.
    pub fn from_json(json: &str) -> Result<Self> {
        let document: MappingDocument = serde_json::from_str(json)
            .map_err(|e| LedgerError::Configuration(format!("Invalid mapping document: {e}")))?;

        for (record_type, mapping) in &document.records {
            mapping.validate(record_type)?;
        }

        Ok(Self {
            ignore: document.ignore,
            records: document.records,
        })
    }

    /// Read a mapping document from disk
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            LedgerError::Configuration(format!(
                "Failed to read mapping document {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&contents)
    }

    /// Load the configured document, or the built-in one
    ///
    /// # Errors
    ///
    /// Propagates errors from [`from_file`](Self::from_file) and
    /// [`builtin`](Self::builtin).
    pub fn load(config: &MappingConfig) -> Result<Self> {
        let store = match &config.path {
            Some(path) => {
                tracing::info!(path = %path, "Loading mapping document");
                Self::from_file(path)?
            }
            None => Self::builtin()?,
        };
        tracing::debug!(
            record_types = ?store.record_types().collect::<Vec<_>>(),
            ignored = store.ignore.len(),
            "Mapping document loaded"
        );
        Ok(store)
    }

    /// Mapping for a record type, if the document defines one
    pub fn get(&self, record_type: &str) -> Option<MappingSpec<'_>> {
        self.records.get(record_type).map(|record| MappingSpec {
            record,
            ignore: &self.ignore,
        })
    }

    /// Global ignore-set
    pub fn ignore(&self) -> &BTreeSet<String> {
        &self.ignore
    }

    /// Record types the document defines
    pub fn record_types(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }
}

fn default_line_items_target() -> String {
    "line_items".to_string()
}
