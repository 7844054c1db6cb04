//! Init command implementation
//!
//! Writes a sample configuration file, and optionally a copy of the
//! built-in mapping document to customize.

use clap::Args;
use std::fs;
use std::path::Path;

/// Built-in mapping document, written by `--with-mapping`
const DEFAULT_MAPPING: &str = include_str!("../../../mapping/default.json");

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "ledgerbridge.toml")]
    pub output: String,

    /// Include every option with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Also write the built-in mapping document to this path
    #[arg(long, value_name = "PATH")]
    pub with_mapping: Option<String>,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing LedgerBridge configuration");
        println!();

        let targets = std::iter::once(self.output.as_str()).chain(self.with_mapping.as_deref());
        for target in targets {
            if Path::new(target).exists() && !self.force {
                println!("❌ File already exists: {target}");
                println!("   Use --force to overwrite");
                return Ok(2);
            }
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples(self.with_mapping.as_deref())
        } else {
            Self::generate_minimal_config()
        };

        if let Err(e) = fs::write(&self.output, config_content) {
            println!("❌ Failed to write configuration file");
            println!("   Error: {e}");
            return Ok(5);
        }
        println!("✅ Configuration file created: {}", self.output);

        if let Some(mapping_path) = &self.with_mapping {
            if let Err(e) = fs::write(mapping_path, DEFAULT_MAPPING) {
                println!("❌ Failed to write mapping document");
                println!("   Error: {e}");
                return Ok(5);
            }
            println!("✅ Mapping document created: {mapping_path}");
        }

        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your settings", self.output);
        println!("  2. Create a .env file with your credentials:");
        println!("     - Set ZOHO_CLIENT_SECRET and ZOHO_REFRESH_TOKEN");
        println!("  3. Validate configuration: ledgerbridge validate-config");
        println!("  4. Run a sync: tap-source | ledgerbridge sync");
        println!();
        Ok(0)
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# LedgerBridge Configuration File

[application]
log_level = "info"
dry_run = false
fail_fast = false

[books]
client_id = "1000.XXXXXXXXXXXXXXXX"
client_secret = "${ZOHO_CLIENT_SECRET}"
refresh_token = "${ZOHO_REFRESH_TOKEN}"
accounts_server = "https://accounts.zoho.com"

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#
        .to_string()
    }

    /// Generate configuration with examples and comments
    fn generate_config_with_examples(mapping_path: Option<&str>) -> String {
        let mapping_line = match mapping_path {
            Some(path) => format!("path = \"{path}\""),
            None => "# path = \"mapping.json\"".to_string(),
        };

        format!(
            r#"# LedgerBridge Configuration File
#
# This file contains all configuration options with examples and explanations.
# Values of the form ${{VAR}} are read from the environment (or a .env file).
# Any option can also be overridden with LEDGERBRIDGE_<SECTION>_<KEY>.

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# Build and resolve payloads without submitting them
dry_run = false

# Stop at the first failed record instead of continuing
fail_fast = false

# ============================================================================
# Books API
# ============================================================================
[books]
# OAuth client registered in the developer console
client_id = "1000.XXXXXXXXXXXXXXXX"
client_secret = "${{ZOHO_CLIENT_SECRET}}"

# Long-lived refresh token; access tokens are obtained and renewed from it
refresh_token = "${{ZOHO_REFRESH_TOKEN}}"

# Accounts server the refresh token was issued by. Its domain selects the
# data center: .com, .eu, .in, .com.au, .jp
accounts_server = "https://accounts.zoho.com"

# Organization to write to (optional; the account's default otherwise)
# organization_id = "60001234"

# Override the API base URL derived from accounts_server
# api_base = "https://books.zoho.com/api/v3"

# Request timeout in seconds
timeout_seconds = 60

# ============================================================================
# Mapping
# ============================================================================
[mapping]
# Mapping document (JSON). The built-in document is used when unset.
{mapping_line}

# ============================================================================
# Resolution Policy
# ============================================================================
# What happens when a referenced entity cannot be found by name:
#   required - the record fails
#   optional - the record is submitted without the identifier
[policy]
invoice_customer = "required"
invoice_line_item = "optional"
bill_vendor = "optional"
purchase_order_vendor = "required"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Write JSON logs to files in addition to the console
local_enabled = false

# Directory for log files
local_path = "./logs"

# Rotation (daily, hourly, never)
local_rotation = "daily"
"#
        )
    }
}
