//! Declarative record mapping
//!
//! - [`spec`] - the mapping document and its store
//! - [`engine`] - turns one input record into a payload

pub mod engine;
pub mod spec;

pub use engine::{build_payload, coerce_quantity, is_truthy, Payload};
pub use spec::{LineItemMapping, MappingSpec, MappingStore, NestedMapping, RecordMapping};
