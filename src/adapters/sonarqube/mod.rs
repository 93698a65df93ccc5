//! SonarQube integration
//!
//! HTTP client for the issue search API and the `IssueSource` seam the
//! export pipeline consumes.

pub mod client;
pub mod models;

pub use client::{IssueSource, SonarClient};
