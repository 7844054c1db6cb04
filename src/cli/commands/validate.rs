//! Validate config command implementation
//!
//! Loads the configuration and the mapping document it points to, and
//! prints a summary without contacting the API.

use crate::config::load_config;
use crate::core::mapping::MappingStore;
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        // load_config validates as part of loading
        let config = match load_config(config_path) {
            Ok(c) => {
                println!("✅ Configuration is valid");
                c
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        let mappings = match MappingStore::load(&config.mapping) {
            Ok(m) => {
                println!("✅ Mapping document is valid");
                m
            }
            Err(e) => {
                println!("❌ Mapping document is invalid");
                println!("   Error: {e}");
                return Ok(2);
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!("  Dry Run: {}", config.application.dry_run);
        println!("  Fail Fast: {}", config.application.fail_fast);
        println!("  Client ID: {}", config.books.client_id);
        println!("  Accounts Server: {}", config.books.accounts_server);
        println!("  API Base: {}", config.books.api_base_url());
        println!(
            "  Organization: {}",
            config.books.organization_id.as_deref().unwrap_or("(default)")
        );
        println!(
            "  Mapping: {}",
            config.mapping.path.as_deref().unwrap_or("(built-in)")
        );
        println!(
            "  Record Types: {}",
            mappings.record_types().collect::<Vec<_>>().join(", ")
        );
        println!("  Resolution Policy: {:?}", config.policy);
        println!();
        Ok(0)
    }
}
