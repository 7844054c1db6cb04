// LedgerBridge - pipeline records to Zoho Books
// Copyright (c) 2025 LedgerBridge Contributors
// Licensed under the MIT License

//! # LedgerBridge - pipeline records to Zoho Books
//!
//! LedgerBridge takes generic business records (invoices, bills, purchase
//! orders) from a data-integration pipeline and submits them to the Zoho
//! Books API.
//!
//! ## Overview
//!
//! This library provides:
//! - **Mapping** input records to API payloads with a declarative document
//! - **Resolving** customers, vendors and items named only informally
//! - **Authenticating** with a refresh token and renewing access tokens
//! - **Reporting** each record's success, skip or failure
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Mapping, resolution, per-record pipelines, reporting
//! - [`adapters`] - The Books HTTP client and token session
//! - [`domain`] - Errors, stream kinds, outcomes
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ledgerbridge::adapters::books::BooksClient;
//! use ledgerbridge::config::load_config;
//! use ledgerbridge::core::mapping::MappingStore;
//! use ledgerbridge::core::process::RecordProcessor;
//! use ledgerbridge::core::sync::{SyncOptions, SyncRunner};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("ledgerbridge.toml")?;
//!     let client = Arc::new(BooksClient::new(&config.books)?);
//!     let processor =
//!         RecordProcessor::new(client, MappingStore::load(&config.mapping)?, config.policy);
//!
//!     let (_tx, shutdown) = tokio::sync::watch::channel(false);
//!     let input = tokio::io::BufReader::new(tokio::io::stdin());
//!     let summary = SyncRunner::new(&processor, SyncOptions::default(), shutdown)
//!         .run(input)
//!         .await?;
//!
//!     println!("Submitted {} records", summary.submitted);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library functions return [`domain::Result`], whose error type is
//! [`domain::LedgerError`]. A record that fails does not stop a run unless
//! `fail_fast` is set.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
