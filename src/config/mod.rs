//! Configuration management
//!
//! TOML-backed configuration with environment variable substitution,
//! `SONAREX_*` overrides, and secrecy-backed token handling.

pub mod loader;
pub mod schema;
pub mod secret;

pub use loader::load_config;
pub use schema::{
    ApplicationConfig, ExportConfig, ExportMode, FilterConfig, LoggingConfig, RetryConfig,
    SonarQubeConfig, SonarexConfig, StateConfig,
};
pub use secret::{secret_string, SecretString, SecretValue};
