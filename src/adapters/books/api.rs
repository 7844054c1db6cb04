//! Accounting API trait definition
//!
//! The record pipelines talk to the remote API only through
//! [`AccountingApi`], which keeps them testable against in-memory fakes and
//! leaves the HTTP details to [`BooksClient`](super::BooksClient).

use crate::domain::Result;
use async_trait::async_trait;
use serde_json::Value;

/// Raw response of a create call
///
/// Classification into success or failure happens in the reporter, so the
/// status and body are passed through untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body as text
    pub body: String,
}

impl ApiResponse {
    /// Create a response
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Returns true for 2xx statuses
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Operations the record pipelines need from the accounting API
#[async_trait]
pub trait AccountingApi: Send + Sync {
    /// Search a collection with query filters
    ///
    /// Returns every entity listed under the collection key of the response,
    /// in server order. A response without that key yields an empty list.
    ///
    /// # Errors
    ///
    /// Returns an error for transport failures, non-2xx statuses, and
    /// unparsable bodies. An empty result is not an error.
    async fn search(&self, collection: &str, query: &[(&str, &str)]) -> Result<Vec<Value>>;

    /// Create an entity in a collection
    ///
    /// # Errors
    ///
    /// Returns an error only when no response was obtained. Non-2xx
    /// responses are returned as [`ApiResponse`] values.
    async fn create(&self, collection: &str, payload: &Value) -> Result<ApiResponse>;
}
