//! Configuration schema types
//!
//! This module defines the configuration structure for Sonarex. The root
//! `SonarexConfig` maps to the TOML file; the core pipeline only ever sees
//! this resolved, immutable value - it never reads environment variables,
//! CLI flags, or config files itself.

use crate::config::SecretString;
use chrono::{NaiveDate, Utc};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

/// Export mode selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExportMode {
    /// Export the full configured date range every run
    #[default]
    Full,
    /// Resume from the stored per-project watermark when one exists
    Incremental,
}

/// Main Sonarex configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Serialize, Deserialize)]
pub struct SonarexConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// SonarQube server configuration
    pub sonarqube: SonarQubeConfig,

    /// Export settings
    pub export: ExportConfig,

    /// Issue filters (severities, types, statuses)
    #[serde(default)]
    pub filters: FilterConfig,

    /// State management configuration
    #[serde(default)]
    pub state: StateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SonarexConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.sonarqube.validate()?;
        self.export.validate()?;
        self.filters.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

/// Retry configuration for page requests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per page request (first try included)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_delay_ms")]
    pub max_delay_ms: u64,

    /// Backoff multiplier
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
            backoff_multiplier: default_backoff_multiplier(),
        }
    }
}

/// SonarQube server configuration
#[derive(Debug, Serialize, Deserialize)]
pub struct SonarQubeConfig {
    /// Base URL of the SonarQube server (without `/api/...`)
    pub base_url: String,

    /// User token for authentication
    /// Stored securely in memory and automatically zeroized on drop
    pub token: SecretString,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,

    /// Page size for issue search requests (server maximum is 500)
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Retry policy for page requests
    #[serde(default)]
    pub retry: RetryConfig,
}

impl SonarQubeConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_url.trim().is_empty() {
            return Err("sonarqube.base_url must not be empty".to_string());
        }
        if url::Url::parse(&self.base_url).is_err() {
            return Err(format!(
                "sonarqube.base_url is not a valid URL: {}",
                self.base_url
            ));
        }
        if self.token.expose_secret().is_empty() {
            return Err("sonarqube.token must not be empty".to_string());
        }
        if self.page_size == 0 || self.page_size > 500 {
            return Err(format!(
                "sonarqube.page_size must be between 1 and 500, got {}",
                self.page_size
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err("sonarqube.retry.max_attempts must be at least 1".to_string());
        }
        Ok(())
    }
}

/// Export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Project keys to export, processed strictly in this order
    pub project_keys: Vec<String>,

    /// Start of the export range (YYYY-MM-DD)
    #[serde(default = "default_start_date")]
    pub start_date: String,

    /// End of the export range (YYYY-MM-DD); defaults to today when absent
    #[serde(default)]
    pub end_date: Option<String>,

    /// Export mode (full or incremental)
    #[serde(default)]
    pub mode: ExportMode,

    /// Maximum window span in days
    #[serde(default = "default_window_days")]
    pub window_days: i64,

    /// Rows buffered before each flush to the CSV sink
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Directory for the per-project CSV files and the run summary
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Whether an existing output file may be replaced. When false, a
    /// project whose sink already exists fails validation instead of
    /// overwriting it.
    #[serde(default = "default_overwrite_existing")]
    pub overwrite_existing: bool,
}

impl ExportConfig {
    fn validate(&self) -> Result<(), String> {
        if self.project_keys.is_empty() {
            return Err("export.project_keys must list at least one project".to_string());
        }
        for key in &self.project_keys {
            if key.trim().is_empty() {
                return Err("export.project_keys must not contain empty keys".to_string());
            }
        }
        parse_date(&self.start_date)
            .map_err(|e| format!("export.start_date is invalid: {e}"))?;
        if let Some(ref end) = self.end_date {
            parse_date(end).map_err(|e| format!("export.end_date is invalid: {e}"))?;
        }
        if self.window_days < 1 {
            return Err(format!(
                "export.window_days must be at least 1, got {}",
                self.window_days
            ));
        }
        if self.chunk_size == 0 {
            return Err("export.chunk_size must be at least 1".to_string());
        }
        if self.output_dir.trim().is_empty() {
            return Err("export.output_dir must not be empty".to_string());
        }
        Ok(())
    }

    /// Parsed start date.
    pub fn start_date(&self) -> Result<NaiveDate, String> {
        parse_date(&self.start_date)
    }

    /// Parsed end date; today (UTC) when not configured.
    pub fn end_date(&self) -> Result<NaiveDate, String> {
        match self.end_date {
            Some(ref end) => parse_date(end),
            None => Ok(Utc::now().date_naive()),
        }
    }
}

/// Issue filters
///
/// Each list is an ordered set of enum values sent as a comma-separated
/// query parameter. An empty list means the filter is not applied and the
/// server default is used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub severities: Vec<String>,

    #[serde(default)]
    pub types: Vec<String>,

    #[serde(default)]
    pub statuses: Vec<String>,
}

const VALID_SEVERITIES: [&str; 5] = ["BLOCKER", "CRITICAL", "MAJOR", "MINOR", "INFO"];
const VALID_TYPES: [&str; 3] = ["BUG", "VULNERABILITY", "CODE_SMELL"];
const VALID_STATUSES: [&str; 5] = ["OPEN", "CONFIRMED", "REOPENED", "RESOLVED", "CLOSED"];

impl FilterConfig {
    fn validate(&self) -> Result<(), String> {
        validate_enum_list("filters.severities", &self.severities, &VALID_SEVERITIES)?;
        validate_enum_list("filters.types", &self.types, &VALID_TYPES)?;
        validate_enum_list("filters.statuses", &self.statuses, &VALID_STATUSES)?;
        Ok(())
    }
}

fn validate_enum_list(field: &str, values: &[String], allowed: &[&str]) -> Result<(), String> {
    for value in values {
        if !allowed.contains(&value.as_str()) {
            return Err(format!(
                "Invalid value '{}' in {}. Must be one of: {}",
                value,
                field,
                allowed.join(", ")
            ));
        }
    }
    Ok(())
}

/// State management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// Directory holding the per-project watermark files
    #[serde(default = "default_state_dir")]
    pub state_dir: String,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            state_dir: default_state_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Directory for local log files
    #[serde(default = "default_log_path")]
    pub local_path: String,

    /// Rotation policy (daily, hourly)
    #[serde(default = "default_log_rotation")]
    pub local_rotation: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_log_path(),
            local_rotation: default_log_rotation(),
        }
    }
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }
        Ok(())
    }
}

fn parse_date(value: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("'{value}' is not a valid YYYY-MM-DD date"))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    1000
}

fn default_max_delay_ms() -> u64 {
    8000
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_timeout_seconds() -> u64 {
    30
}

fn default_page_size() -> usize {
    500
}

fn default_start_date() -> String {
    "2000-01-01".to_string()
}

fn default_window_days() -> i64 {
    30
}

fn default_chunk_size() -> usize {
    5000
}

fn default_output_dir() -> String {
    "./export".to_string()
}

fn default_overwrite_existing() -> bool {
    true
}

fn default_state_dir() -> String {
    ".".to_string()
}

fn default_log_path() -> String {
    "./logs".to_string()
}

fn default_log_rotation() -> String {
    "daily".to_string()
}
