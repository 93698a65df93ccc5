//! Status command implementation
//!
//! Prints the stored per-project watermarks so an operator can see where
//! the next incremental run will resume from.

use crate::config::load_config;
use crate::core::state::WatermarkStore;
use clap::Args;

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {}

impl StatusArgs {
    /// Execute the status command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        let config = load_config(config_path)?;
        let store = WatermarkStore::new(&config.state.state_dir);

        let watermarks = store.list()?;
        if watermarks.is_empty() {
            println!("No export state found in {}", config.state.state_dir);
            println!("The next export will cover the full configured range.");
            return Ok(0);
        }

        println!("Export state ({} project(s)):", watermarks.len());
        println!();
        for watermark in &watermarks {
            println!("  {}", watermark.project_key);
            println!("    Last export boundary: {}", watermark.last_export_date);
            println!(
                "    Exported at: {}",
                watermark.last_export_timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            );
            println!("    Issues: {}", watermark.issue_count);
        }

        Ok(0)
    }
}
