//! Per-project export pipeline
//!
//! Drives one project through planning, windowed fetching, flattening,
//! chunked writing, and watermark persistence. Every error is caught at
//! this boundary and converted into a failed `ExportOutcome`; nothing
//! escapes to stop the orchestrator's loop.
//!
//! A window that cannot be fetched - fatal error, exhausted retries, or a
//! malformed response - aborts the whole project. Skipping the window and
//! continuing would produce an export that under-counts while reporting
//! success, which is worse than failing loudly. The watermark is advanced
//! only after every window of the range has been written.

use crate::adapters::sonarqube::IssueSource;
use crate::config::{ExportMode, FilterConfig, SonarexConfig};
use crate::core::export::summary::ExportOutcome;
use crate::core::flatten::flatten_issue;
use crate::core::state::{sanitize_project_key, WatermarkStore};
use crate::core::windows::plan_windows;
use crate::core::writer::ChunkedCsvWriter;
use crate::domain::errors::SonarexError;
use crate::domain::ids::ProjectKey;
use crate::domain::result::Result;
use crate::domain::window::DateRange;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::sync::Arc;

/// Resolved, immutable settings for the export pipeline.
///
/// Derived once from the validated configuration; the pipeline never reads
/// configuration sources itself.
#[derive(Debug, Clone)]
pub struct ExportSettings {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub mode: ExportMode,
    pub window_days: i64,
    pub chunk_size: usize,
    pub output_dir: PathBuf,
    pub overwrite_existing: bool,
    pub filters: FilterConfig,
}

impl ExportSettings {
    /// Resolve settings from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if the configured dates cannot be parsed.
    pub fn from_config(config: &SonarexConfig) -> Result<Self> {
        let start_date = config
            .export
            .start_date()
            .map_err(SonarexError::Validation)?;
        let end_date = config.export.end_date().map_err(SonarexError::Validation)?;

        Ok(Self {
            start_date,
            end_date,
            mode: config.export.mode,
            window_days: config.export.window_days,
            chunk_size: config.export.chunk_size,
            output_dir: PathBuf::from(&config.export.output_dir),
            overwrite_existing: config.export.overwrite_existing,
            filters: config.filters.clone(),
        })
    }
}

/// Exports one project end to end.
pub struct ProjectExporter {
    source: Arc<dyn IssueSource>,
    store: Arc<WatermarkStore>,
    settings: ExportSettings,
}

impl ProjectExporter {
    /// Create an exporter over an issue source and watermark store.
    pub fn new(
        source: Arc<dyn IssueSource>,
        store: Arc<WatermarkStore>,
        settings: ExportSettings,
    ) -> Self {
        Self {
            source,
            store,
            settings,
        }
    }

    /// Export one project and return its outcome.
    ///
    /// Never fails: all errors become a `Failed` outcome carrying the cause.
    pub async fn export_project(&self, project: &ProjectKey) -> ExportOutcome {
        let range = match self.resolve_range(project) {
            Ok(range) => range,
            Err(e) => {
                tracing::error!(project_key = %project, error = %e, "Export planning failed");
                return ExportOutcome::failed(e.to_string(), None);
            }
        };

        tracing::info!(
            project_key = %project,
            range = %range,
            mode = ?self.settings.mode,
            "Starting project export"
        );

        match self.run_pipeline(project, range).await {
            Ok((issue_count, output_path)) => {
                tracing::info!(
                    project_key = %project,
                    issue_count = issue_count,
                    output_path = %output_path.display(),
                    "Project export completed"
                );
                ExportOutcome::success(issue_count, output_path.display().to_string(), range)
            }
            Err(e) => {
                tracing::error!(project_key = %project, error = %e, "Project export failed");
                ExportOutcome::failed(e.to_string(), Some(range))
            }
        }
    }

    /// Resolve the effective export range for a project.
    ///
    /// In incremental mode a stored watermark overrides the configured start
    /// date; otherwise the configured range is used as-is.
    fn resolve_range(&self, project: &ProjectKey) -> Result<DateRange> {
        let mut start = self.settings.start_date;

        if self.settings.mode == ExportMode::Incremental {
            match self.store.load(project)? {
                Some(watermark) => {
                    tracing::info!(
                        project_key = %project,
                        watermark = %watermark.last_export_date,
                        configured_start = %self.settings.start_date,
                        "Resuming from stored watermark"
                    );
                    start = watermark.last_export_date;
                }
                None => {
                    tracing::info!(
                        project_key = %project,
                        "No watermark found - full range export"
                    );
                }
            }
        }

        let end = self.settings.end_date;
        if start >= end {
            return Err(SonarexError::Validation(format!(
                "Nothing to export for {project}: effective start {start} is not before end {end}"
            )));
        }

        Ok(DateRange { start, end })
    }

    /// The fallible pipeline body: plan windows, fetch each in order,
    /// flatten and write before the next window starts, then close the sink
    /// and persist the watermark.
    async fn run_pipeline(
        &self,
        project: &ProjectKey,
        range: DateRange,
    ) -> Result<(u64, PathBuf)> {
        let output_path = self.output_path(project);
        if output_path.exists() && !self.settings.overwrite_existing {
            return Err(SonarexError::Validation(format!(
                "Output file {} already exists and overwrite_existing is disabled",
                output_path.display()
            )));
        }
        if output_path.exists() {
            std::fs::remove_file(&output_path).map_err(|e| {
                SonarexError::Io(format!(
                    "Failed to replace output file {}: {}",
                    output_path.display(),
                    e
                ))
            })?;
        }
        std::fs::create_dir_all(&self.settings.output_dir).map_err(|e| {
            SonarexError::Io(format!(
                "Failed to create output directory {}: {}",
                self.settings.output_dir.display(),
                e
            ))
        })?;

        let windows = plan_windows(range, self.settings.window_days)?;
        let mut writer = ChunkedCsvWriter::create(&output_path, self.settings.chunk_size)?;

        for window in windows {
            tracing::info!(project_key = %project, window = %window, "Fetching window");

            let issues = self
                .source
                .fetch_window(project, &window, &self.settings.filters)
                .await?;

            tracing::debug!(
                project_key = %project,
                window = %window,
                issues = issues.len(),
                "Window fetched"
            );

            writer.append(issues.iter().map(flatten_issue))?;
        }

        let issue_count = writer.close()?;

        if self.settings.mode == ExportMode::Incremental {
            self.store.save(project, range.end, issue_count)?;
        }

        Ok((issue_count, output_path))
    }

    /// Sink path for a project: `<output_dir>/<sanitized key>_issues.csv`.
    fn output_path(&self, project: &ProjectKey) -> PathBuf {
        self.settings
            .output_dir
            .join(format!("{}_issues.csv", sanitize_project_key(project.as_str())))
    }
}
