//! OAuth access-token lifecycle
//!
//! The Books API authenticates with short-lived access tokens minted from a
//! long-lived refresh token. [`TokenManager`] owns the current token and
//! renews it on demand:
//!
//! ```text
//! Unset ──exchange──▶ Valid ──time passes──▶ Expired ──exchange──▶ Valid ...
//! ```
//!
//! A token counts as expired [`CLOCK_SKEW_SECS`] seconds before the server
//! says it does. The state sits behind an async mutex that is held across
//! the whole check-and-refresh section, so concurrent callers cause at most
//! one exchange and all of them see its result. Failed exchanges are not
//! retried here.

use crate::config::{BooksConfig, SecretString};
use crate::domain::{BooksApiError, LedgerError, Result};
use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use secrecy::ExposeSecret;
use serde::Deserialize;
use serde_json::Value;
use tokio::sync::Mutex;

/// Seconds shaved off every token lifetime to absorb clock drift
pub const CLOCK_SKEW_SECS: i64 = 10;

/// A cached access token and the server-reported expiry
#[derive(Debug, Clone)]
pub struct TokenState {
    access_token: SecretString,
    expires_at: DateTime<Utc>,
}

impl TokenState {
    /// Create a token state
    pub fn new(access_token: SecretString, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token,
            expires_at,
        }
    }

    /// Server-reported expiry
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Whether the token may still be used at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(CLOCK_SKEW_SECS) < self.expires_at
    }
}

/// Observable token status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenStatus {
    /// No token has been acquired yet
    Unset,
    /// A token is cached and usable
    Valid,
    /// A token is cached but must be renewed before use
    Expired,
}

/// Token endpoint response: either a token or an `error` field
#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

/// Owns the bearer token for one Books session
pub struct TokenManager {
    client: Client,
    token_url: String,
    client_id: String,
    client_secret: SecretString,
    refresh_token: SecretString,
    state: Mutex<Option<TokenState>>,
}

impl TokenManager {
    /// Create a manager that exchanges the configured refresh token
    ///
    /// No network call happens until the first token is requested.
    pub fn new(client: Client, config: &BooksConfig) -> Self {
        Self {
            client,
            token_url: config.token_url(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            refresh_token: config.refresh_token.clone(),
            state: Mutex::new(None),
        }
    }

    /// Returns a usable access token, renewing it if needed
    ///
    /// # Errors
    ///
    /// Returns [`BooksApiError::AuthenticationFailed`] when the accounts
    /// server rejects the exchange, and connection or response errors when
    /// it cannot be reached or answers with something unexpected.
    pub async fn access_token(&self) -> Result<SecretString> {
        self.access_token_at(Utc::now()).await
    }

    /// Same as [`access_token`](Self::access_token) with an explicit clock
    pub async fn access_token_at(&self, now: DateTime<Utc>) -> Result<SecretString> {
        let mut state = self.state.lock().await;

        if let Some(current) = state.as_ref() {
            if current.is_valid_at(now) {
                return Ok(current.access_token.clone());
            }
            tracing::debug!(
                expires_at = %current.expires_at,
                "Access token expired or about to expire, renewing"
            );
        }

        let fresh = self.exchange(now).await?;
        let token = fresh.access_token.clone();
        *state = Some(fresh);
        Ok(token)
    }

    /// Current status of the cached token at `now`
    pub async fn status_at(&self, now: DateTime<Utc>) -> TokenStatus {
        match self.state.lock().await.as_ref() {
            None => TokenStatus::Unset,
            Some(current) if current.is_valid_at(now) => TokenStatus::Valid,
            Some(_) => TokenStatus::Expired,
        }
    }

    /// Install a token obtained out of band, replacing the cached one
    pub async fn prime(&self, state: TokenState) {
        *self.state.lock().await = Some(state);
    }

    /// Performs the refresh-token grant
    async fn exchange(&self, now: DateTime<Utc>) -> Result<TokenState> {
        tracing::debug!(token_url = %self.token_url, "Requesting access token");

        let form = [
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose_secret().as_ref()),
            ("refresh_token", self.refresh_token.expose_secret().as_ref()),
            ("grant_type", "refresh_token"),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| {
                BooksApiError::ConnectionFailed(format!("Failed to request access token: {e}"))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            BooksApiError::ConnectionFailed(format!("Failed to read token response: {e}"))
        })?;

        let parsed: TokenResponse = match serde_json::from_str(&body) {
            Ok(parsed) => parsed,
            Err(_) if !status.is_success() => {
                return Err(auth_failed(&body));
            }
            Err(e) => {
                return Err(BooksApiError::InvalidResponse(format!(
                    "Failed to parse token response: {e}"
                ))
                .into());
            }
        };

        if parsed.error.is_some() || !status.is_success() {
            return Err(auth_failed(&body));
        }

        let access_token = parsed.access_token.ok_or_else(|| {
            BooksApiError::InvalidResponse("Token response has no access_token".to_string())
        })?;
        let expires_in = parsed
            .expires_in
            .as_ref()
            .and_then(seconds_from)
            .ok_or_else(|| {
                BooksApiError::InvalidResponse(
                    "Token response has no usable expires_in".to_string(),
                )
            })?;

        let expires_at = Duration::try_seconds(expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                BooksApiError::InvalidResponse(format!(
                    "Token response has an out-of-range expires_in: {expires_in}"
                ))
            })?;
        tracing::info!(expires_at = %expires_at, "Acquired access token");

        Ok(TokenState::new(
            crate::config::secret_string(access_token),
            expires_at,
        ))
    }
}

fn auth_failed(body: &str) -> LedgerError {
    BooksApiError::AuthenticationFailed(format!("Auth request failed with response {body}")).into()
}

/// `expires_in` arrives as a number, occasionally as a numeric string
fn seconds_from(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
