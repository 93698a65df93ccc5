//! File-backed watermark store
//!
//! Persists one JSON file per project under the configured state directory,
//! named `.last_export_<sanitized key>.json`. Loading a key with no file is
//! the normal first-run case and returns `None` rather than an error.

use crate::core::state::watermark::ExportWatermark;
use crate::domain::errors::SonarexError;
use crate::domain::ids::ProjectKey;
use crate::domain::result::Result;
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

/// Map a project key to a storage-safe identifier.
///
/// Deterministic: replaces the characters disallowed in file names that
/// project keys commonly contain (`:` and `/`) with `_`. Known risk: two
/// distinct keys that differ only in those characters (`a:b` vs `a/b`)
/// collide on the same identifier. This mirrors the upstream behavior and is
/// deliberately not resolved here; deployments with adversarial key spaces
/// should keep per-tenant state directories.
pub fn sanitize_project_key(key: &str) -> String {
    key.replace([':', '/'], "_")
}

/// File-backed store for per-project export watermarks.
pub struct WatermarkStore {
    state_dir: PathBuf,
}

impl WatermarkStore {
    /// Create a store rooted at `state_dir`. The directory is created on
    /// first save, not here.
    pub fn new(state_dir: impl AsRef<Path>) -> Self {
        Self {
            state_dir: state_dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the state file for a project key.
    fn state_file(&self, key: &ProjectKey) -> PathBuf {
        self.state_dir
            .join(format!(".last_export_{}.json", sanitize_project_key(key.as_str())))
    }

    /// Load the watermark for a project.
    ///
    /// Returns `Ok(None)` when no prior state exists - the first-run case.
    ///
    /// # Errors
    ///
    /// Returns `State` if the file exists but cannot be read or parsed.
    pub fn load(&self, key: &ProjectKey) -> Result<Option<ExportWatermark>> {
        let path = self.state_file(key);
        if !path.exists() {
            return Ok(None);
        }

        let contents = fs::read_to_string(&path).map_err(|e| {
            SonarexError::State(format!(
                "Failed to read state file {}: {}",
                path.display(),
                e
            ))
        })?;

        let watermark: ExportWatermark = serde_json::from_str(&contents).map_err(|e| {
            SonarexError::State(format!(
                "Failed to parse state file {}: {}",
                path.display(),
                e
            ))
        })?;

        Ok(Some(watermark))
    }

    /// Save a fresh watermark for a project, overwriting any prior state.
    ///
    /// Called only after the project's full export range has completed
    /// successfully.
    ///
    /// # Errors
    ///
    /// Returns `State` if the state directory or file cannot be written.
    pub fn save(&self, key: &ProjectKey, boundary: NaiveDate, issue_count: u64) -> Result<()> {
        fs::create_dir_all(&self.state_dir).map_err(|e| {
            SonarexError::State(format!(
                "Failed to create state directory {}: {}",
                self.state_dir.display(),
                e
            ))
        })?;

        let watermark = ExportWatermark::new(key.as_str(), boundary, issue_count);
        let path = self.state_file(key);
        let json = serde_json::to_string_pretty(&watermark)
            .map_err(|e| SonarexError::State(format!("Failed to serialize watermark: {e}")))?;

        fs::write(&path, json).map_err(|e| {
            SonarexError::State(format!(
                "Failed to write state file {}: {}",
                path.display(),
                e
            ))
        })?;

        tracing::info!(
            project_key = %key,
            boundary = %boundary,
            issue_count = issue_count,
            "Saved export watermark"
        );

        Ok(())
    }

    /// List all stored watermarks, sorted by project key.
    ///
    /// Unparseable state files are skipped with a warning rather than
    /// failing the listing.
    pub fn list(&self) -> Result<Vec<ExportWatermark>> {
        if !self.state_dir.exists() {
            return Ok(Vec::new());
        }

        let mut watermarks = Vec::new();
        let entries = fs::read_dir(&self.state_dir).map_err(|e| {
            SonarexError::State(format!(
                "Failed to read state directory {}: {}",
                self.state_dir.display(),
                e
            ))
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| SonarexError::State(e.to_string()))?;
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if !name.starts_with(".last_export_") || !name.ends_with(".json") {
                continue;
            }

            match fs::read_to_string(entry.path())
                .map_err(|e| e.to_string())
                .and_then(|c| serde_json::from_str::<ExportWatermark>(&c).map_err(|e| e.to_string()))
            {
                Ok(watermark) => watermarks.push(watermark),
                Err(e) => {
                    tracing::warn!(
                        file = %entry.path().display(),
                        error = %e,
                        "Skipping unreadable state file"
                    );
                }
            }
        }

        watermarks.sort_by(|a, b| a.project_key.cmp(&b.project_key));
        Ok(watermarks)
    }
}
