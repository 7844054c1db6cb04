//! Result type alias for LedgerBridge

use super::errors::LedgerError;

/// Result type alias for LedgerBridge operations
///
/// # Examples
///
/// ```
/// use ledgerbridge::domain::result::Result;
/// use ledgerbridge::domain::errors::LedgerError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(LedgerError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, LedgerError>;
