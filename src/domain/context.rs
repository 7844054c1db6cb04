//! Error context extension trait
//!
//! Adds `.context()` and `.with_context()` to any `Result` whose error
//! converts into [`LedgerError`], in the spirit of `anyhow::Context` but
//! without leaving the library's error type.
//!
//! # Examples
//!
//! ```rust
//! use ledgerbridge::domain::Result;
//! use ledgerbridge::domain::context::ResultExt;
//!
//! fn read_input(path: &str) -> Result<String> {
//!     std::fs::read_to_string(path)
//!         .with_context(|| format!("Failed to read input file: {}", path))
//! }
//! ```

use crate::domain::errors::LedgerError;
use crate::domain::result::Result;

/// Extension trait for adding context to `Result` types
///
/// Context is prepended to the error message. The variant is kept, so the
/// error's [`kind`](LedgerError::kind) survives, except for API errors,
/// which are flattened into [`LedgerError::Other`].
pub trait ResultExt<T> {
    /// Add context to an error
    ///
    /// The context is evaluated eagerly; use `.with_context()` if it is
    /// expensive to compute.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static;

    /// Add context to an error using a closure (lazy evaluation)
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<LedgerError>,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| wrap(e.into(), context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: std::fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|e| wrap(e.into(), f()))
    }
}

fn wrap(err: LedgerError, context: impl std::fmt::Display) -> LedgerError {
    match err {
        LedgerError::Configuration(msg) => LedgerError::Configuration(format!("{context}: {msg}")),
        LedgerError::Mapping(msg) => LedgerError::Mapping(format!("{context}: {msg}")),
        LedgerError::Resolution(msg) => LedgerError::Resolution(format!("{context}: {msg}")),
        LedgerError::Validation(msg) => LedgerError::Validation(format!("{context}: {msg}")),
        LedgerError::Serialization(msg) => LedgerError::Serialization(format!("{context}: {msg}")),
        LedgerError::Io(msg) => LedgerError::Io(format!("{context}: {msg}")),
        other => LedgerError::Other(format!("{context}: {other}")),
    }
}
