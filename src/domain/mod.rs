//! Domain models and types for LedgerBridge.
//!
//! # Overview
//!
//! The domain layer provides:
//! - **Stream kinds** ([`StreamKind`]) naming the record types the sink handles
//! - **Outcomes** ([`RecordOutcome`], [`SkipReason`]) for processed records
//! - **Error types** ([`LedgerError`], [`BooksApiError`])
//! - **Result type alias** ([`Result`])
//!
//! # Error Handling
//!
//! All fallible operations return [`Result<T, LedgerError>`]:
//!
//! ```rust,no_run
//! use ledgerbridge::domain::Result;
//!
//! fn example() -> Result<()> {
//!     let config = ledgerbridge::config::load_config("ledgerbridge.toml")?;
//!     Ok(())
//! }
//! ```

pub mod context;
pub mod errors;
pub mod outcome;
pub mod result;
pub mod stream;

pub use errors::{BooksApiError, LedgerError};
pub use outcome::{RecordOutcome, SkipReason};
pub use result::Result;
pub use stream::{InputRecord, StreamKind};
