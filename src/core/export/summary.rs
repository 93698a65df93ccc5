//! Export outcomes and run summary
//!
//! One `ExportOutcome` per project per run, aggregated into a `RunSummary`
//! that is logged at the end of the run and persisted as a machine-readable
//! JSON report.

use crate::domain::ids::ProjectKey;
use crate::domain::window::DateRange;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Terminal status of one project's export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportStatus {
    Success,
    Failed,
}

/// Result of one project's export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutcome {
    /// Terminal status
    pub status: ExportStatus,

    /// Issues written to the sink (zero for failed exports)
    pub issue_count: u64,

    /// Path of the CSV sink, when one was targeted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_path: Option<String>,

    /// Human-readable cause for a failed export
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Date range the export covered (or attempted to cover)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<DateRange>,
}

impl ExportOutcome {
    /// Build a successful outcome.
    pub fn success(issue_count: u64, output_path: String, range: DateRange) -> Self {
        Self {
            status: ExportStatus::Success,
            issue_count,
            output_path: Some(output_path),
            error: None,
            range: Some(range),
        }
    }

    /// Build a failed outcome. No watermark was advanced and the sink, if
    /// partially written, holds only rows that were already flushed.
    pub fn failed(error: String, range: Option<DateRange>) -> Self {
        Self {
            status: ExportStatus::Failed,
            issue_count: 0,
            output_path: None,
            error: Some(error),
            range,
        }
    }

    /// Whether the export succeeded.
    pub fn is_success(&self) -> bool {
        self.status == ExportStatus::Success
    }
}

/// One project's outcome, keyed for the run report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectOutcome {
    pub project_key: String,

    #[serde(flatten)]
    pub outcome: ExportOutcome,
}

/// Aggregated result of one run across all configured projects.
///
/// Outcomes keep the input processing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Projects that exported successfully
    pub succeeded: usize,

    /// Projects whose export failed
    pub failed: usize,

    /// Total issues exported across successful projects
    pub total_issues: u64,

    /// Wall-clock duration of the run in seconds
    pub duration_secs: f64,

    /// Per-project outcomes, in processing order
    pub outcomes: Vec<ProjectOutcome>,
}

impl RunSummary {
    /// Create an empty summary.
    pub fn new() -> Self {
        Self {
            succeeded: 0,
            failed: 0,
            total_issues: 0,
            duration_secs: 0.0,
            outcomes: Vec::new(),
        }
    }

    /// Set the run duration.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration_secs = duration.as_secs_f64();
        self
    }

    /// Record a project's outcome and update the aggregates.
    pub fn add_outcome(&mut self, project: &ProjectKey, outcome: ExportOutcome) {
        if outcome.is_success() {
            self.succeeded += 1;
            self.total_issues += outcome.issue_count;
        } else {
            self.failed += 1;
        }
        self.outcomes.push(ProjectOutcome {
            project_key: project.to_string(),
            outcome,
        });
    }

    /// Look up the outcome for a project key.
    pub fn outcome_for(&self, project_key: &str) -> Option<&ExportOutcome> {
        self.outcomes
            .iter()
            .find(|o| o.project_key == project_key)
            .map(|o| &o.outcome)
    }

    /// Whether every project exported successfully.
    pub fn is_successful(&self) -> bool {
        self.failed == 0
    }

    /// Log the summary.
    pub fn log_summary(&self) {
        tracing::info!(
            succeeded = self.succeeded,
            failed = self.failed,
            total_issues = self.total_issues,
            duration_secs = format!("{:.2}", self.duration_secs),
            "Export run completed"
        );

        for entry in &self.outcomes {
            match entry.outcome.status {
                ExportStatus::Success => tracing::info!(
                    project_key = %entry.project_key,
                    issue_count = entry.outcome.issue_count,
                    output_path = entry.outcome.output_path.as_deref().unwrap_or(""),
                    "Project exported"
                ),
                ExportStatus::Failed => tracing::warn!(
                    project_key = %entry.project_key,
                    error = entry.outcome.error.as_deref().unwrap_or("unknown"),
                    "Project export failed"
                ),
            }
        }
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}
