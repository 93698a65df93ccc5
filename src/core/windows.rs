//! Date window planning
//!
//! The issue search endpoint caps total results per query, so an export
//! range is split into sequential windows small enough to stay under the
//! cap. The windows are contiguous, non-overlapping, and their union equals
//! the input range exactly - the orchestrator relies on this to advance the
//! watermark to the range end only after every window has succeeded.

use crate::domain::errors::SonarexError;
use crate::domain::result::Result;
use crate::domain::window::{DateRange, ExportWindow};
use chrono::{Duration, NaiveDate};

/// Plan the windows covering `range`, each spanning at most `max_days`.
///
/// # Errors
///
/// Returns `Validation` if the range is empty or inverted, or if `max_days`
/// is not positive.
///
/// # Examples
///
/// ```
/// use sonarex::core::windows::plan_windows;
/// use sonarex::domain::DateRange;
/// use chrono::NaiveDate;
///
/// let range = DateRange {
///     start: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
///     end: NaiveDate::from_ymd_opt(2025, 2, 15).unwrap(),
/// };
/// let windows: Vec<_> = plan_windows(range, 30).unwrap().collect();
/// assert_eq!(windows.len(), 2);
/// ```
pub fn plan_windows(range: DateRange, max_days: i64) -> Result<WindowPlan> {
    if range.start >= range.end {
        return Err(SonarexError::Validation(format!(
            "Invalid export range: start {} must be before end {}",
            range.start, range.end
        )));
    }
    if max_days < 1 {
        return Err(SonarexError::Validation(format!(
            "Window span must be at least 1 day, got {max_days}"
        )));
    }

    Ok(WindowPlan {
        cursor: range.start,
        end: range.end,
        max_days,
    })
}

/// Lazy, restartable sequence of export windows.
///
/// Cloning the plan restarts iteration from its current cursor.
#[derive(Debug, Clone)]
pub struct WindowPlan {
    cursor: NaiveDate,
    end: NaiveDate,
    max_days: i64,
}

impl Iterator for WindowPlan {
    type Item = ExportWindow;

    fn next(&mut self) -> Option<ExportWindow> {
        if self.cursor >= self.end {
            return None;
        }

        let window_end = std::cmp::min(self.cursor + Duration::days(self.max_days), self.end);
        let window = ExportWindow {
            start: self.cursor,
            end: window_end,
        };
        self.cursor = window_end;
        Some(window)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn range(start: NaiveDate, end: NaiveDate) -> DateRange {
        DateRange { start, end }
    }

    #[test]
    fn test_single_window_when_range_fits() {
        let windows: Vec<_> = plan_windows(range(date(2025, 1, 1), date(2025, 1, 10)), 30)
            .unwrap()
            .collect();

        assert_eq!(windows.len(), 1);
        assert_eq!(windows[0].start, date(2025, 1, 1));
        assert_eq!(windows[0].end, date(2025, 1, 10));
    }

    #[test]
    fn test_range_split_into_expected_windows() {
        // 2025-01-01..2025-02-15 with 30-day spans:
        // [01-01, 01-31) then [01-31, 02-15)
        let windows: Vec<_> = plan_windows(range(date(2025, 1, 1), date(2025, 2, 15)), 30)
            .unwrap()
            .collect();

        assert_eq!(windows.len(), 2);
        assert_eq!(windows[0].start, date(2025, 1, 1));
        assert_eq!(windows[0].end, date(2025, 1, 31));
        assert_eq!(windows[1].start, date(2025, 1, 31));
        assert_eq!(windows[1].end, date(2025, 2, 15));
    }

    #[test_case(1; "one day spans")]
    #[test_case(7; "weekly spans")]
    #[test_case(30; "monthly spans")]
    #[test_case(365; "oversized span")]
    fn test_windows_contiguous_and_cover_range(max_days: i64) {
        let input = range(date(2024, 11, 15), date(2025, 3, 2));
        let windows: Vec<_> = plan_windows(input, max_days).unwrap().collect();

        assert!(!windows.is_empty());
        assert_eq!(windows.first().unwrap().start, input.start);
        assert_eq!(windows.last().unwrap().end, input.end);

        for window in &windows {
            assert!(window.start < window.end);
            assert!((window.end - window.start).num_days() <= max_days);
        }

        // contiguous: each window starts where the previous ended
        for pair in windows.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = plan_windows(range(date(2025, 2, 1), date(2025, 1, 1)), 30);
        assert!(matches!(result, Err(SonarexError::Validation(_))));
    }

    #[test]
    fn test_empty_range_rejected() {
        let result = plan_windows(range(date(2025, 1, 1), date(2025, 1, 1)), 30);
        assert!(matches!(result, Err(SonarexError::Validation(_))));
    }

    #[test]
    fn test_non_positive_span_rejected() {
        let result = plan_windows(range(date(2025, 1, 1), date(2025, 2, 1)), 0);
        assert!(matches!(result, Err(SonarexError::Validation(_))));
    }

    #[test]
    fn test_plan_is_restartable_via_clone() {
        let plan = plan_windows(range(date(2025, 1, 1), date(2025, 2, 15)), 30).unwrap();
        let first: Vec<_> = plan.clone().collect();
        let second: Vec<_> = plan.collect();
        assert_eq!(first, second);
    }
}
