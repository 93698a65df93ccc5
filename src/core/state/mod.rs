//! Export state management
//!
//! Watermark model and the file-backed store that persists one watermark
//! per project for incremental exports.

pub mod store;
pub mod watermark;

pub use store::{sanitize_project_key, WatermarkStore};
pub use watermark::ExportWatermark;
