//! Logging and observability
//!
//! Structured logging with:
//! - Console output with configurable level
//! - Optional JSON log files with rotation
//! - Record-level macros so every pipeline logs outcomes the same way
//!
//! # Example
//!
//! ```no_run
//! use ledgerbridge::logging::init_logging;
//! use ledgerbridge::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Sync started");
//! tracing::error!(error = "Something went wrong", "Error occurred");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};

/// Log a record that was intentionally not submitted
///
/// # Example
///
/// ```no_run
/// use ledgerbridge::log_record_skipped;
///
/// log_record_skipped!("BuyOrders", "no_resolvable_line_items");
/// ```
#[macro_export]
macro_rules! log_record_skipped {
    ($stream:expr, $reason:expr) => {
        tracing::info!(
            stream = %$stream,
            reason = $reason,
            "Skipping record"
        );
    };
}

/// Log an error with context
///
/// # Example
///
/// ```no_run
/// use ledgerbridge::log_error_with_context;
/// use ledgerbridge::domain::LedgerError;
///
/// let error = LedgerError::Resolution("Supplier 'Nope' not found".to_string());
/// log_error_with_context!(&error, "Record 12 of stream BuyOrders");
/// ```
#[macro_export]
macro_rules! log_error_with_context {
    ($error:expr, $context:expr) => {
        tracing::error!(
            error = %$error,
            kind = $error.kind(),
            context = %$context,
            "Error occurred"
        );
    };
}
