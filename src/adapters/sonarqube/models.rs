//! Wire models for the issue search endpoint

use crate::domain::issue::RawIssue;
use serde::Deserialize;

/// Response payload of `GET /api/issues/search`.
///
/// Only the fields the pipeline consumes are modeled; issues themselves stay
/// untyped (`RawIssue`) until the flattening step. A missing `issues` key
/// deserializes to an empty page, which the fetcher treats as zero results.
#[derive(Debug, Deserialize)]
pub struct IssueSearchResponse {
    #[serde(default)]
    pub issues: Vec<RawIssue>,

    #[serde(default)]
    pub paging: Option<Paging>,
}

/// Paging metadata returned alongside each page.
#[derive(Debug, Deserialize)]
pub struct Paging {
    #[serde(rename = "pageIndex")]
    pub page_index: u32,

    #[serde(rename = "pageSize")]
    pub page_size: u32,

    pub total: u64,
}
