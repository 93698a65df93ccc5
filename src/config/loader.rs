//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::SonarexConfig;
use crate::config::secret_string;
use crate::domain::errors::SonarexError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into SonarexConfig
/// 4. Applies environment variable overrides (SONAREX_* prefix)
/// 5. Validates the configuration
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - Environment variable substitution fails
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use sonarex::config::loader::load_config;
///
/// let config = load_config("sonarex.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<SonarexConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(SonarexError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        SonarexError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    // Perform environment variable substitution
    let contents = substitute_env_vars(&contents)?;

    // Parse TOML
    let mut config: SonarexConfig = toml::from_str(&contents)
        .map_err(|e| SonarexError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    // Apply environment variable overrides
    apply_env_overrides(&mut config);

    // Validate configuration
    config.validate().map_err(|e| {
        SonarexError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// # Arguments
///
/// * `input` - String containing ${VAR} placeholders
///
/// # Errors
///
/// Returns an error if a referenced environment variable is not set
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
    let mut result = String::new();
    let mut missing_vars = Vec::new();

    // Process line by line to skip comments
    for line in input.lines() {
        let trimmed = line.trim_start();

        // Skip comment lines - don't process env vars in comments
        if trimmed.starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let mut processed_line = line.to_string();
        for cap in re.captures_iter(line) {
            let var_name = &cap[1];
            match std::env::var(var_name) {
                Ok(value) => {
                    let placeholder = format!("${{{}}}", var_name);
                    processed_line = processed_line.replace(&placeholder, &value);
                }
                Err(_) => {
                    if !missing_vars.contains(&var_name.to_string()) {
                        missing_vars.push(var_name.to_string());
                    }
                }
            }
        }
        result.push_str(&processed_line);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(SonarexError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using SONAREX_* prefix
///
/// Environment variables follow the pattern: SONAREX_<SECTION>_<KEY>
/// For example: SONAREX_SONARQUBE_BASE_URL, SONAREX_EXPORT_MODE
///
/// # Arguments
///
/// * `config` - Mutable reference to the configuration to update
fn apply_env_overrides(config: &mut SonarexConfig) {
    use crate::config::schema::ExportMode;

    // Application overrides
    if let Ok(val) = std::env::var("SONAREX_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // SonarQube overrides
    if let Ok(val) = std::env::var("SONAREX_SONARQUBE_BASE_URL") {
        config.sonarqube.base_url = val;
    }
    if let Ok(val) = std::env::var("SONAREX_SONARQUBE_TOKEN") {
        config.sonarqube.token = secret_string(val);
    }
    if let Ok(val) = std::env::var("SONAREX_SONARQUBE_TIMEOUT_SECONDS") {
        if let Ok(timeout) = val.parse() {
            config.sonarqube.timeout_seconds = timeout;
        }
    }
    if let Ok(val) = std::env::var("SONAREX_SONARQUBE_PAGE_SIZE") {
        if let Ok(size) = val.parse() {
            config.sonarqube.page_size = size;
        }
    }

    // Export overrides
    if let Ok(val) = std::env::var("SONAREX_EXPORT_PROJECT_KEYS") {
        config.export.project_keys = val.split(',').map(|s| s.trim().to_string()).collect();
    }
    if let Ok(val) = std::env::var("SONAREX_EXPORT_START_DATE") {
        config.export.start_date = val;
    }
    if let Ok(val) = std::env::var("SONAREX_EXPORT_END_DATE") {
        config.export.end_date = Some(val);
    }
    if let Ok(val) = std::env::var("SONAREX_EXPORT_MODE") {
        match val.to_lowercase().as_str() {
            "full" => config.export.mode = ExportMode::Full,
            "incremental" => config.export.mode = ExportMode::Incremental,
            _ => {}
        }
    }
    if let Ok(val) = std::env::var("SONAREX_EXPORT_WINDOW_DAYS") {
        if let Ok(days) = val.parse() {
            config.export.window_days = days;
        }
    }
    if let Ok(val) = std::env::var("SONAREX_EXPORT_CHUNK_SIZE") {
        if let Ok(size) = val.parse() {
            config.export.chunk_size = size;
        }
    }
    if let Ok(val) = std::env::var("SONAREX_EXPORT_OUTPUT_DIR") {
        config.export.output_dir = val;
    }

    // State overrides
    if let Ok(val) = std::env::var("SONAREX_STATE_STATE_DIR") {
        config.state.state_dir = val;
    }

    // Logging overrides
    if let Ok(val) = std::env::var("SONAREX_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("SONAREX_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_substitute_env_vars() {
        std::env::set_var("SONAREX_TEST_VAR", "test_value");
        let input = "token = \"${SONAREX_TEST_VAR}\"";
        let result = substitute_env_vars(input).unwrap();
        assert_eq!(result, "token = \"test_value\"\n");
        std::env::remove_var("SONAREX_TEST_VAR");
    }

    #[test]
    fn test_substitute_env_vars_missing() {
        std::env::remove_var("SONAREX_MISSING_VAR");
        let input = "token = \"${SONAREX_MISSING_VAR}\"";
        let result = substitute_env_vars(input);
        assert!(result.is_err());
    }

    #[test]
    fn test_substitute_skips_comments() {
        std::env::remove_var("SONAREX_COMMENTED_VAR");
        let input = "# token = \"${SONAREX_COMMENTED_VAR}\"\nkey = \"value\"";
        let result = substitute_env_vars(input).unwrap();
        assert!(result.contains("${SONAREX_COMMENTED_VAR}"));
    }

    #[test]
    fn test_load_config_missing_file() {
        let result = load_config("nonexistent.toml");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_valid() {
        let toml_content = r#"
[sonarqube]
base_url = "https://sonar.example.com"
token = "squ_test_token"

[export]
project_keys = ["my-project"]
start_date = "2025-01-01"
end_date = "2025-06-01"
mode = "incremental"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_ok());

        let config = result.unwrap();
        assert_eq!(config.sonarqube.base_url, "https://sonar.example.com");
        assert_eq!(config.export.project_keys, vec!["my-project"]);
        assert_eq!(config.sonarqube.page_size, 500);
        assert_eq!(config.export.window_days, 30);
        assert_eq!(config.export.chunk_size, 5000);
    }

    #[test]
    fn test_load_config_invalid_filter() {
        let toml_content = r#"
[sonarqube]
base_url = "https://sonar.example.com"
token = "squ_test_token"

[export]
project_keys = ["my-project"]
start_date = "2025-01-01"
end_date = "2025-06-01"

[filters]
severities = ["NOT_A_SEVERITY"]
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
    }
}
