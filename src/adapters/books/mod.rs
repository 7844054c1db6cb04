//! Books accounting API adapter
//!
//! This module provides the integration with the Zoho Books REST API:
//! region selection, the OAuth token session, the HTTP client, and the
//! [`AccountingApi`] trait the record pipelines are written against.

pub mod api;
pub mod auth;
pub mod client;
pub mod region;

pub use api::{AccountingApi, ApiResponse};
pub use auth::{TokenManager, TokenState, TokenStatus};
pub use client::BooksClient;
