//! Configuration management for LedgerBridge.
//!
//! LedgerBridge reads a TOML file (or a flat JSON file as written by
//! pipeline tooling) with support for:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LEDGERBRIDGE_<SECTION>_<KEY>` overrides
//! - Default values for optional settings
//! - Validation on load
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//! fail_fast = false
//!
//! [books]
//! client_id = "1000.XXXXXXXX"
//! client_secret = "${ZOHO_CLIENT_SECRET}"
//! refresh_token = "${ZOHO_REFRESH_TOKEN}"
//! accounts_server = "https://accounts.zoho.eu"
//! organization_id = "60001234"
//!
//! [mapping]
//! path = "mapping.json"
//!
//! [policy]
//! bill_vendor = "optional"
//! purchase_order_vendor = "required"
//! ```
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use ledgerbridge::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("ledgerbridge.toml")?;
//! println!("API base: {}", config.books.api_base_url());
//! # Ok(())
//! # }
//! ```

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{ApplicationConfig, BooksConfig, LedgerConfig, LoggingConfig, MappingConfig};
pub use secret::{secret_string, SecretString, SecretValue};
