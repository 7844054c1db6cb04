//! External system integrations for LedgerBridge.
//!
//! - [`books`] - Zoho Books accounting API (auth, search, create)
//!
//! # Design Pattern
//!
//! Adapters isolate external dependencies behind traits so the core can be
//! exercised against in-memory fakes. The core only sees
//! [`books::AccountingApi`].
//!
//! ```rust,no_run
//! use ledgerbridge::adapters::books::BooksClient;
//! use ledgerbridge::config::{secret_string, BooksConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut config = BooksConfig::new(
//!     "1000.CLIENT",
//!     secret_string("client-secret"),
//!     secret_string("1000.refresh"),
//! );
//! config.accounts_server = "https://accounts.zoho.eu".to_string();
//!
//! let client = BooksClient::new(&config)?;
//! assert_eq!(client.api_base(), "https://books.zoho.eu/api/v3");
//! # Ok(())
//! # }
//! ```

pub mod books;
