//! Configuration schema types
//!
//! This module defines the configuration structure for LedgerBridge.

use crate::adapters::books::region;
use crate::config::SecretString;
use crate::core::process::ResolutionPolicies;
use serde::{Deserialize, Serialize};

/// Main LedgerBridge configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Accounting API credentials and endpoints
    pub books: BooksConfig,

    /// Mapping document location
    #[serde(default)]
    pub mapping: MappingConfig,

    /// Per record type resolution strictness
    #[serde(default)]
    pub policy: ResolutionPolicies,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl LedgerConfig {
    /// Build a configuration with defaults everywhere except the credentials
    pub fn from_books(books: BooksConfig) -> Self {
        Self {
            application: ApplicationConfig::default(),
            books,
            mapping: MappingConfig::default(),
            policy: ResolutionPolicies::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.books.validate()?;
        self.mapping.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Build and resolve payloads without submitting them
    #[serde(default)]
    pub dry_run: bool,

    /// Stop the run at the first failed record
    #[serde(default)]
    pub fail_fast: bool,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            dry_run: false,
            fail_fast: false,
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Accounting API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BooksConfig {
    /// OAuth client id
    pub client_id: String,

    /// OAuth client secret
    pub client_secret: SecretString,

    /// Long-lived refresh token exchanged for access tokens
    pub refresh_token: SecretString,

    /// Accounts server; its domain also selects the API region
    #[serde(default = "default_accounts_server", alias = "accounts-server")]
    pub accounts_server: String,

    /// Organization sent with every API call when set
    #[serde(default)]
    pub organization_id: Option<String>,

    /// Explicit API base URL, bypassing the region table
    #[serde(default)]
    pub api_base: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl BooksConfig {
    /// Create a configuration from the three required credentials
    pub fn new(
        client_id: impl Into<String>,
        client_secret: SecretString,
        refresh_token: SecretString,
    ) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret,
            refresh_token,
            accounts_server: default_accounts_server(),
            organization_id: None,
            api_base: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }

    /// Token endpoint on the accounts server
    pub fn token_url(&self) -> String {
        format!("{}/oauth/v2/token", self.accounts_server.trim_end_matches('/'))
    }

    /// API base URL: the explicit override, or the region of the accounts server
    pub fn api_base_url(&self) -> String {
        match &self.api_base {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => region::api_base_for(&self.accounts_server).to_string(),
        }
    }

    fn validate(&self) -> Result<(), String> {
        use secrecy::ExposeSecret;

        if self.client_id.trim().is_empty() {
            return Err("books.client_id cannot be empty".to_string());
        }
        if self.client_secret.expose_secret().is_empty() {
            return Err("books.client_secret cannot be empty".to_string());
        }
        if self.refresh_token.expose_secret().is_empty() {
            return Err("books.refresh_token cannot be empty".to_string());
        }

        if !is_http_url(&self.accounts_server) {
            return Err("books.accounts_server must start with http:// or https://".to_string());
        }
        if let Some(base) = &self.api_base {
            if !is_http_url(base) {
                return Err("books.api_base must start with http:// or https://".to_string());
            }
        }

        if self.timeout_seconds == 0 {
            return Err("books.timeout_seconds must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Mapping document configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MappingConfig {
    /// Path to a JSON mapping document; the built-in document is used when unset
    #[serde(default)]
    pub path: Option<String>,
}

impl MappingConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(path) = &self.path {
            if path.trim().is_empty() {
                return Err("mapping.path cannot be empty when set".to_string());
            }
        }
        Ok(())
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write JSON logs to a rolling file
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for log files
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Rotation: daily, hourly, never
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        if self.local_enabled && self.local_path.trim().is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }
        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_accounts_server() -> String {
    "https://accounts.zoho.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    60
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn books() -> BooksConfig {
        BooksConfig::new(
            "1000.CLIENT",
            secret_string("client-secret"),
            secret_string("1000.refresh"),
        )
    }

    #[test]
    fn test_minimal_config_is_valid() {
        let config = LedgerConfig::from_books(books());
        assert!(config.validate().is_ok());
        assert_eq!(config.application.log_level, "info");
        assert!(!config.application.dry_run);
    }

    #[test]
    fn test_empty_client_id_rejected() {
        let mut config = LedgerConfig::from_books(books());
        config.books.client_id = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.contains("client_id"));
    }

    #[test]
    fn test_empty_refresh_token_rejected() {
        let mut config = LedgerConfig::from_books(books());
        config.books.refresh_token = secret_string("");
        let err = config.validate().unwrap_err();
        assert!(err.contains("refresh_token"));
    }

    #[test]
    fn test_invalid_log_level_rejected() {
        let mut config = LedgerConfig::from_books(books());
        config.application.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_accounts_server_must_be_http() {
        let mut config = LedgerConfig::from_books(books());
        config.books.accounts_server = "accounts.zoho.eu".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_token_url_trims_trailing_slash() {
        let mut books = books();
        books.accounts_server = "https://accounts.zoho.eu/".to_string();
        assert_eq!(books.token_url(), "https://accounts.zoho.eu/oauth/v2/token");
    }

    #[test]
    fn test_api_base_follows_region_unless_overridden() {
        let mut books = books();
        books.accounts_server = "https://accounts.zoho.eu".to_string();
        assert_eq!(books.api_base_url(), "https://books.zoho.eu/api/v3");

        books.api_base = Some("http://127.0.0.1:9000/api/v3/".to_string());
        assert_eq!(books.api_base_url(), "http://127.0.0.1:9000/api/v3");
    }

    #[test]
    fn test_accounts_server_hyphen_alias() {
        let json = r#"{
            "client_id": "id",
            "client_secret": "secret",
            "refresh_token": "token",
            "accounts-server": "https://accounts.zoho.in"
        }"#;
        let books: BooksConfig = serde_json::from_str(json).unwrap();
        assert_eq!(books.accounts_server, "https://accounts.zoho.in");
        assert_eq!(books.timeout_seconds, 60);
    }

    #[test]
    fn test_invalid_rotation_rejected() {
        let mut config = LedgerConfig::from_books(books());
        config.logging.local_rotation = "weekly".to_string();
        assert!(config.validate().is_err());
    }
}
