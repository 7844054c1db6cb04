//! HTTP client for the Books REST API
//!
//! Every request carries a bearer token from the session's
//! [`TokenManager`] and, when configured, the `organization_id` query
//! parameter.

use super::api::{AccountingApi, ApiResponse};
use super::auth::TokenManager;
use crate::config::BooksConfig;
use crate::domain::{BooksApiError, LedgerError, Result};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use secrecy::ExposeSecret;
use serde_json::Value;
use std::time::Duration;

/// Books API client
///
/// # Example
///
/// ```no_run
/// use ledgerbridge::adapters::books::{AccountingApi, BooksClient};
/// use ledgerbridge::config::{secret_string, BooksConfig};
///
/// # async fn example() -> ledgerbridge::domain::Result<()> {
/// let config = BooksConfig::new(
///     "1000.CLIENT",
///     secret_string("client-secret"),
///     secret_string("1000.refresh"),
/// );
/// let client = BooksClient::new(&config)?;
///
/// let contacts = client.search("contacts", &[("contact_name", "Acme")]).await?;
/// println!("{} matches", contacts.len());
/// # Ok(())
/// # }
/// ```
pub struct BooksClient {
    http: Client,
    api_base: String,
    organization_id: Option<String>,
    tokens: TokenManager,
}

impl BooksClient {
    /// Create a client for the configured region
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &BooksConfig) -> Result<Self> {
        let http = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| LedgerError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        let api_base = config.api_base_url();
        tracing::debug!(
            api_base = %api_base,
            accounts_server = %config.accounts_server,
            "Configured Books API client"
        );

        Ok(Self {
            tokens: TokenManager::new(http.clone(), config),
            http,
            api_base,
            organization_id: config.organization_id.clone(),
        })
    }

    /// API base URL in use
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Token session shared by every request of this client
    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/{}", self.api_base, collection)
    }

    /// Adds auth and organization to a request
    async fn authorize(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self.tokens.access_token().await?;
        let token: &str = token.expose_secret().as_ref();
        let mut request = request
            .header("Content-Type", "application/json")
            .bearer_auth(token);
        if let Some(org) = &self.organization_id {
            request = request.query(&[("organization_id", org.as_str())]);
        }
        Ok(request)
    }
}

#[async_trait]
impl AccountingApi for BooksClient {
    async fn search(&self, collection: &str, query: &[(&str, &str)]) -> Result<Vec<Value>> {
        let url = self.collection_url(collection);
        tracing::debug!(url = %url, query = ?query, "Searching entities");

        let request = self.authorize(self.http.get(&url).query(query)).await?;
        let response = request
            .send()
            .await
            .map_err(|e| BooksApiError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| BooksApiError::ConnectionFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(BooksApiError::SearchFailed {
                collection: collection.to_string(),
                status: status.as_u16(),
                body,
            }
            .into());
        }

        let json: Value = serde_json::from_str(&body).map_err(|e| {
            BooksApiError::InvalidResponse(format!("Search in '{collection}' returned invalid JSON: {e}"))
        })?;

        Ok(json
            .get(collection)
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default())
    }

    async fn create(&self, collection: &str, payload: &Value) -> Result<ApiResponse> {
        let url = self.collection_url(collection);
        tracing::debug!(url = %url, "Creating entity");

        let request = self.authorize(self.http.post(&url).json(payload)).await?;
        let response = request
            .send()
            .await
            .map_err(|e| BooksApiError::ConnectionFailed(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BooksApiError::ConnectionFailed(e.to_string()))?;

        Ok(ApiResponse::new(status, body))
    }
}
