//! Logging and observability
//!
//! Structured logging with configurable log levels and optional local file
//! logging with rotation.
//!
//! # Example
//!
//! ```no_run
//! use sonarex::logging::init_logging;
//! use sonarex::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

pub use structured::{init_logging, LoggingGuard};
