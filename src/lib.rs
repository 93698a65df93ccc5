// Sonarex - SonarQube Issue Export Tool
// Copyright (c) 2025 Sonarex Contributors
// Licensed under the MIT License

//! # Sonarex - SonarQube Issue Export
//!
//! Sonarex is an ETL tool built in Rust that bulk-exports issues from a
//! SonarQube server to CSV for reporting, auditing, and offline analysis.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** issues from the paginated `/api/issues/search` endpoint,
//!   partitioned into date windows that stay under the server's per-query
//!   result cap
//! - **Transforming** nested issue records into a fixed flat column schema
//! - **Loading** rows into CSV files in bounded-memory chunks
//! - **Managing** export state with per-project watermarks for incremental
//!   sync
//!
//! ## Architecture
//!
//! Sonarex follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (windows, flatten, writer, state, export)
//! - [`adapters`] - External integrations (SonarQube)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sonarex::config::load_config;
//! use sonarex::core::export::ExportCoordinator;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Load configuration
//!     let config = load_config("sonarex.toml")?;
//!
//!     // Create the coordinator and run the export
//!     let coordinator = ExportCoordinator::new(&config)?;
//!     let summary = coordinator.execute_export().await;
//!
//!     println!(
//!         "Exported {} issues across {} project(s)",
//!         summary.total_issues, summary.succeeded
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Incremental Sync
//!
//! Sonarex persists the last successfully exported boundary date per project
//! in a small JSON state file. In incremental mode a later run resumes from
//! that boundary instead of the configured start date:
//!
//! ```rust,no_run
//! use sonarex::core::state::WatermarkStore;
//! use sonarex::domain::ProjectKey;
//! use std::str::FromStr;
//!
//! # fn example() -> sonarex::domain::Result<()> {
//! let store = WatermarkStore::new(".");
//! let key = ProjectKey::from_str("my-org:my-project").unwrap();
//!
//! if let Some(watermark) = store.load(&key)? {
//!     println!("Next run resumes from {}", watermark.last_export_date);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The watermark is written only after a project's entire date range has
//! exported successfully, so a failed or interrupted run never causes the
//! next one to skip records.
//!
//! ## Error Handling
//!
//! Sonarex uses the [`domain::SonarexError`] type for all errors:
//!
//! ```rust,no_run
//! use sonarex::domain::SonarexError;
//!
//! fn example() -> Result<(), SonarexError> {
//!     let config = sonarex::config::load_config("sonarex.toml")?;
//!     Ok(())
//! }
//! ```
//!
//! Transient server errors are retried with backoff; credential and
//! addressing errors abort the affected project; a failing project never
//! stops the remaining projects from exporting.

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
