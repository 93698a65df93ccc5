//! Core domain types and models
//!
//! This module contains the domain layer: error taxonomy, identifier
//! newtypes, the raw issue boundary type, and date range/window types.

pub mod errors;
pub mod ids;
pub mod issue;
pub mod result;
pub mod window;

pub use errors::{SonarApiError, SonarexError};
pub use ids::ProjectKey;
pub use issue::RawIssue;
pub use result::Result;
pub use window::{DateRange, ExportWindow};
