//! Export pipeline
//!
//! The per-project exporter, the multi-project coordinator, and the outcome
//! and summary types they report with.

pub mod coordinator;
pub mod exporter;
pub mod summary;

pub use coordinator::ExportCoordinator;
pub use exporter::{ExportSettings, ProjectExporter};
pub use summary::{ExportOutcome, ExportStatus, ProjectOutcome, RunSummary};
