//! Watermark model for tracking export state
//!
//! One watermark per project records the last successfully exported boundary
//! date. An incremental run resumes from that boundary instead of the
//! configured start date. The watermark is only ever written after a
//! project's full range of windows has completed, so resuming from it can
//! never skip a gap.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Export watermark persisted per project.
///
/// Overwritten wholesale on every successful export (last-write-wins, no
/// merge, no history); never deleted automatically.
///
/// # Examples
///
/// ```
/// use sonarex::core::state::ExportWatermark;
/// use chrono::NaiveDate;
///
/// let boundary = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let watermark = ExportWatermark::new("my-org:my-project", boundary, 150);
///
/// assert_eq!(watermark.last_export_date, boundary);
/// assert_eq!(watermark.issue_count, 150);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportWatermark {
    /// Project key this watermark tracks (unsanitized)
    pub project_key: String,

    /// End boundary of the last successful export range
    pub last_export_date: NaiveDate,

    /// Wall-clock time the watermark was written
    pub last_export_timestamp: DateTime<Utc>,

    /// Issues exported by that run
    pub issue_count: u64,
}

impl ExportWatermark {
    /// Build a watermark stamped with the current time.
    pub fn new(project_key: impl Into<String>, boundary: NaiveDate, issue_count: u64) -> Self {
        Self {
            project_key: project_key.into(),
            last_export_date: boundary,
            last_export_timestamp: Utc::now(),
            issue_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_watermark_creation() {
        let watermark = ExportWatermark::new("org:proj", date(2025, 11, 13), 150);

        assert_eq!(watermark.project_key, "org:proj");
        assert_eq!(watermark.last_export_date, date(2025, 11, 13));
        assert_eq!(watermark.issue_count, 150);
    }

    #[test]
    fn test_watermark_serialization() {
        let watermark = ExportWatermark::new("org:proj", date(2025, 3, 1), 42);

        let json = serde_json::to_string(&watermark).unwrap();
        assert!(json.contains("\"project_key\":\"org:proj\""));
        assert!(json.contains("\"last_export_date\":\"2025-03-01\""));
        assert!(json.contains("\"issue_count\":42"));

        let deserialized: ExportWatermark = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.project_key, "org:proj");
        assert_eq!(deserialized.last_export_date, date(2025, 3, 1));
        assert_eq!(deserialized.issue_count, 42);
    }
}
