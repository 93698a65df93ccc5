//! Init command implementation
//!
//! Writes a commented starter configuration file.

use clap::Args;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path of the configuration file to create
    #[arg(short, long, default_value = "sonarex.toml")]
    pub output: String,

    /// Overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

const CONFIG_TEMPLATE: &str = r#"# Sonarex configuration

[application]
# Log level: trace, debug, info, warn, error
log_level = "info"

[sonarqube]
# Base URL of the SonarQube server (no trailing /api)
base_url = "https://sonarqube.example.com"
# User token; ${SONAR_TOKEN} is substituted from the environment at load time
token = "${SONAR_TOKEN}"
timeout_seconds = 30
# Server maximum is 500
page_size = 500

[sonarqube.retry]
max_attempts = 3
initial_delay_ms = 1000
max_delay_ms = 8000
backoff_multiplier = 2.0

[export]
# Projects to export, processed in order
project_keys = ["my-org:my-project"]
start_date = "2020-01-01"
# end_date defaults to today when omitted
# end_date = "2025-12-31"
# "full" re-exports the whole range; "incremental" resumes from the watermark
mode = "incremental"
# Keep each window small enough to stay under the 10,000-result query cap
window_days = 30
chunk_size = 5000
output_dir = "./export"
overwrite_existing = true

[filters]
# Empty lists apply no filter (server default)
severities = []           # BLOCKER, CRITICAL, MAJOR, MINOR, INFO
types = []                # BUG, VULNERABILITY, CODE_SMELL
statuses = []             # OPEN, CONFIRMED, REOPENED, RESOLVED, CLOSED

[state]
# Watermark files (.last_export_<project>.json) live here
state_dir = "."

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"
"#;

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        let path = Path::new(&self.output);

        if path.exists() && !self.force {
            eprintln!(
                "Configuration file {} already exists. Use --force to overwrite.",
                path.display()
            );
            return Ok(2);
        }

        std::fs::write(path, CONFIG_TEMPLATE)?;
        println!("Created {}", path.display());
        println!("Set the SONAR_TOKEN environment variable and adjust the settings before running 'sonarex export'.");

        Ok(0)
    }
}
