//! Export command implementation
//!
//! Runs the export pipeline over the configured projects and persists the
//! run summary as JSON next to the CSV output.

use crate::config::{load_config, ExportMode};
use crate::core::export::ExportCoordinator;
use clap::Args;
use std::path::Path;

/// Arguments for the export command
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Override project key(s) to export (comma-separated)
    #[arg(long)]
    pub project: Option<String>,

    /// Override export mode (full or incremental)
    #[arg(long)]
    pub mode: Option<String>,

    /// Override the start of the export range (YYYY-MM-DD)
    #[arg(long)]
    pub start_date: Option<String>,

    /// Override the end of the export range (YYYY-MM-DD)
    #[arg(long)]
    pub end_date: Option<String>,

    /// Override the output directory
    #[arg(long)]
    pub output_dir: Option<String>,
}

impl ExportArgs {
    /// Execute the export command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!("Starting export command");

        let mut config = load_config(config_path)?;

        // Apply CLI overrides
        if let Some(projects) = &self.project {
            let keys: Vec<String> = projects.split(',').map(|s| s.trim().to_string()).collect();
            tracing::info!(project_keys = ?keys, "Overriding project keys from CLI");
            config.export.project_keys = keys;
        }

        if let Some(mode) = &self.mode {
            match mode.to_lowercase().as_str() {
                "full" => config.export.mode = ExportMode::Full,
                "incremental" => config.export.mode = ExportMode::Incremental,
                other => {
                    tracing::error!(mode = %other, "Invalid export mode");
                    eprintln!("Invalid export mode: {other}. Use 'full' or 'incremental'");
                    return Ok(2);
                }
            }
            tracing::info!(mode = ?config.export.mode, "Overriding export mode from CLI");
        }

        if let Some(start) = &self.start_date {
            config.export.start_date = start.clone();
        }
        if let Some(end) = &self.end_date {
            config.export.end_date = Some(end.clone());
        }
        if let Some(dir) = &self.output_dir {
            config.export.output_dir = dir.clone();
        }

        // Revalidate after overrides
        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let coordinator = match ExportCoordinator::new(&config) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create export coordinator");
                eprintln!("Failed to initialize export: {e}");
                return Ok(5);
            }
        };

        println!("Starting export of {} project(s)...", config.export.project_keys.len());
        println!();

        let summary = coordinator.execute_export().await;

        // Persist the machine-readable run summary
        let summary_path = Path::new(&config.export.output_dir).join("export_summary.json");
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => {
                if let Err(e) = std::fs::write(&summary_path, json) {
                    tracing::warn!(
                        path = %summary_path.display(),
                        error = %e,
                        "Failed to write run summary"
                    );
                }
            }
            Err(e) => tracing::warn!(error = %e, "Failed to serialize run summary"),
        }

        // Display summary
        println!();
        println!("Export Summary:");
        println!("  Projects: {}", summary.outcomes.len());
        println!("  Succeeded: {}", summary.succeeded);
        println!("  Failed: {}", summary.failed);
        println!("  Total issues: {}", summary.total_issues);
        println!("  Duration: {:.2}s", summary.duration_secs);
        println!();

        for entry in &summary.outcomes {
            if entry.outcome.is_success() {
                println!(
                    "  [ok]     {} - {} issues -> {}",
                    entry.project_key,
                    entry.outcome.issue_count,
                    entry.outcome.output_path.as_deref().unwrap_or("")
                );
            } else {
                println!(
                    "  [failed] {} - {}",
                    entry.project_key,
                    entry.outcome.error.as_deref().unwrap_or("unknown error")
                );
            }
        }
        println!();

        let exit_code = if summary.is_successful() {
            println!("Export completed successfully.");
            0
        } else if summary.succeeded > 0 {
            println!("Export completed with failures. Failed projects keep their previous watermark and will retry from it next run.");
            1
        } else {
            println!("Export failed for every project.");
            1
        };

        Ok(exit_code)
    }
}
