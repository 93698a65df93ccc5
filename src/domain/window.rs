//! Date range and export window types
//!
//! Both types are half-open `[start, end)` with day granularity, matching
//! the `createdAfter`/`createdBefore` query parameters of the issue search
//! endpoint.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An absolute date range requested for an export, half-open `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a new range, validating `start < end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if start >= end {
            return Err(format!(
                "Invalid date range: start {start} must be before end {end}"
            ));
        }
        Ok(Self { start, end })
    }

    /// Number of days covered by the range.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// One planned sub-range of an export, half-open `[start, end)`.
///
/// Windows are sized by the planner so each stays under the server's
/// per-query result cap. Invariant: `start < end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl ExportWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, String> {
        if start >= end {
            return Err(format!(
                "Invalid export window: start {start} must be before end {end}"
            ));
        }
        Ok(Self { start, end })
    }

    /// Window start formatted for the `createdAfter` query parameter.
    pub fn created_after(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    /// Window end formatted for the `createdBefore` query parameter.
    pub fn created_before(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

impl fmt::Display for ExportWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
