//! Configuration loader with TOML/JSON parsing and environment variable overrides

use super::schema::{BooksConfig, LedgerConfig};
use super::secret::secret_string;
use crate::domain::errors::LedgerError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a file
///
/// This function:
/// 1. Reads the file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses TOML, or JSON when the file ends in `.json`
/// 4. Applies environment variable overrides (LEDGERBRIDGE_* prefix)
/// 5. Validates the configuration
///
/// A JSON file may either mirror the TOML layout (with a `books` section)
/// or be a flat pipeline-style object holding only `client_id`,
/// `client_secret`, `refresh_token` and `accounts-server`.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, a referenced
/// environment variable is missing, or validation fails.
///
/// # Examples
///
/// ```no_run
/// use ledgerbridge::config::loader::load_config;
///
/// let config = load_config("ledgerbridge.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<LedgerConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(LedgerError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        LedgerError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    let contents = substitute_env_vars(&contents)?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let mut config = if is_json {
        parse_json_config(&contents)?
    } else {
        toml::from_str(&contents)
            .map_err(|e| LedgerError::Configuration(format!("Failed to parse TOML: {e}")))?
    };

    apply_env_overrides(&mut config);

    config.validate().map_err(|e| {
        LedgerError::Configuration(format!("Configuration validation failed: {e}"))
    })?;

    Ok(config)
}

/// Parses a JSON configuration, accepting both the sectioned and the flat layout
fn parse_json_config(contents: &str) -> Result<LedgerConfig> {
    let value: serde_json::Value = serde_json::from_str(contents)
        .map_err(|e| LedgerError::Configuration(format!("Failed to parse JSON: {e}")))?;

    if value.get("books").is_some() {
        serde_json::from_value(value)
            .map_err(|e| LedgerError::Configuration(format!("Invalid configuration: {e}")))
    } else {
        let books: BooksConfig = serde_json::from_value(value)
            .map_err(|e| LedgerError::Configuration(format!("Invalid configuration: {e}")))?;
        Ok(LedgerConfig::from_books(books))
    }
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are copied untouched.
///
/// # Errors
///
/// Returns an error listing every referenced variable that is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| LedgerError::Other(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures<'_>| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(LedgerError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the LEDGERBRIDGE_* prefix
///
/// Variables follow the pattern LEDGERBRIDGE_<SECTION>_<KEY>, for example
/// LEDGERBRIDGE_BOOKS_REFRESH_TOKEN or LEDGERBRIDGE_APPLICATION_DRY_RUN.
fn apply_env_overrides(config: &mut LedgerConfig) {
    // Application overrides
    if let Ok(val) = std::env::var("LEDGERBRIDGE_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }
    if let Ok(val) = std::env::var("LEDGERBRIDGE_APPLICATION_DRY_RUN") {
        config.application.dry_run = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("LEDGERBRIDGE_APPLICATION_FAIL_FAST") {
        config.application.fail_fast = val.parse().unwrap_or(false);
    }

    // Books overrides
    if let Ok(val) = std::env::var("LEDGERBRIDGE_BOOKS_CLIENT_ID") {
        config.books.client_id = val;
    }
    if let Ok(val) = std::env::var("LEDGERBRIDGE_BOOKS_CLIENT_SECRET") {
        config.books.client_secret = secret_string(val);
    }
    if let Ok(val) = std::env::var("LEDGERBRIDGE_BOOKS_REFRESH_TOKEN") {
        config.books.refresh_token = secret_string(val);
    }
    if let Ok(val) = std::env::var("LEDGERBRIDGE_BOOKS_ACCOUNTS_SERVER") {
        config.books.accounts_server = val;
    }
    if let Ok(val) = std::env::var("LEDGERBRIDGE_BOOKS_ORGANIZATION_ID") {
        config.books.organization_id = Some(val);
    }
    if let Ok(val) = std::env::var("LEDGERBRIDGE_BOOKS_API_BASE") {
        config.books.api_base = Some(val);
    }
    if let Ok(val) = std::env::var("LEDGERBRIDGE_BOOKS_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.books.timeout_seconds = timeout;
        }
    }

    // Mapping overrides
    if let Ok(val) = std::env::var("LEDGERBRIDGE_MAPPING_PATH") {
        config.mapping.path = Some(val);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("LEDGERBRIDGE_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("LEDGERBRIDGE_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("LB_LOADER_TEST_VAR", "test_value");
        let input = "refresh_token = \"${LB_LOADER_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "refresh_token = \"test_value\"\n");
        std::env::remove_var("LB_LOADER_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("LB_LOADER_MISSING_VAR");
        let input = "client_secret = \"${LB_LOADER_MISSING_VAR}\"";
        let err = substitute_env_vars(input).unwrap_err();
        assert!(err.to_string().contains("LB_LOADER_MISSING_VAR"));
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("LB_LOADER_COMMENTED_VAR");
        let input = "# token = \"${LB_LOADER_COMMENTED_VAR}\"";
        assert!(substitute_env_vars(input).is_ok());
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_toml_config() {
        let toml_content = r#"
[application]
log_level = "debug"

[books]
client_id = "1000.CLIENT"
client_secret = "secret"
refresh_token = "1000.refresh"
accounts_server = "https://accounts.zoho.eu"
organization_id = "60001234"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.application.log_level, "debug");
        assert_eq!(config.books.client_id, "1000.CLIENT");
        assert_eq!(config.books.organization_id.as_deref(), Some("60001234"));
        assert_eq!(config.books.api_base_url(), "https://books.zoho.eu/api/v3");
    }

    #[test]
    fn test_load_flat_json_config() {
        let json_content = r#"{
            "client_id": "1000.CLIENT",
            "client_secret": "secret",
            "refresh_token": "1000.refresh",
            "accounts-server": "https://accounts.zoho.com.au"
        }"#;

        let mut temp_file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        temp_file.write_all(json_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.books.refresh_token.expose_secret(), "1000.refresh");
        assert_eq!(config.books.api_base_url(), "https://books.zoho.com.au/api/v3");
        assert!(config.mapping.path.is_none());
    }

    #[test]
    fn test_flat_json_missing_credentials_fails() {
        let err = parse_json_config(r#"{"client_id": "1000.CLIENT"}"#).unwrap_err();
        assert!(matches!(err, LedgerError::Configuration(_)));
    }
}
