//! Export coordinator - orchestrates the run across projects
//!
//! Processes the configured projects strictly in input order, one at a time.
//! A failing project is recorded in the summary and never stops the loop:
//! partial failure is a reportable result of a run, not a reason to abandon
//! the remaining projects.

use crate::adapters::sonarqube::{IssueSource, SonarClient};
use crate::config::SonarexConfig;
use crate::core::export::exporter::{ExportSettings, ProjectExporter};
use crate::core::export::summary::RunSummary;
use crate::core::state::WatermarkStore;
use crate::domain::errors::SonarexError;
use crate::domain::ids::ProjectKey;
use crate::domain::result::Result;
use std::sync::Arc;
use std::time::Instant;

/// Orchestrates one export run.
pub struct ExportCoordinator {
    projects: Vec<ProjectKey>,
    exporter: ProjectExporter,
}

impl ExportCoordinator {
    /// Create a coordinator from the loaded configuration.
    ///
    /// The HTTP client is built once here and shared, read-only, across all
    /// projects and windows of the run.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built, a configured
    /// project key is invalid, or the configured dates cannot be resolved.
    pub fn new(config: &SonarexConfig) -> Result<Self> {
        let client: Arc<dyn IssueSource> = Arc::new(SonarClient::new(&config.sonarqube)?);
        Self::with_source(config, client)
    }

    /// Create a coordinator over an explicit issue source.
    ///
    /// Used by tests to run the pipeline against an in-memory source.
    pub fn with_source(config: &SonarexConfig, source: Arc<dyn IssueSource>) -> Result<Self> {
        let projects = config
            .export
            .project_keys
            .iter()
            .map(|key| ProjectKey::new(key.clone()).map_err(SonarexError::Validation))
            .collect::<Result<Vec<_>>>()?;

        let store = Arc::new(WatermarkStore::new(&config.state.state_dir));
        let settings = ExportSettings::from_config(config)?;
        let exporter = ProjectExporter::new(source, store, settings);

        Ok(Self { projects, exporter })
    }

    /// Run the export over every configured project and aggregate the
    /// outcomes.
    pub async fn execute_export(&self) -> RunSummary {
        let started = Instant::now();
        let mut summary = RunSummary::new();

        tracing::info!(project_count = self.projects.len(), "Starting export run");

        for project in &self.projects {
            let outcome = self.exporter.export_project(project).await;
            summary.add_outcome(project, outcome);
        }

        let summary = summary.with_duration(started.elapsed());
        summary.log_summary();
        summary
    }
}
