//! Result type alias for Sonarex

use super::errors::SonarexError;

/// Result type alias for Sonarex operations
///
/// This is a convenience type alias that uses `SonarexError` as the error
/// type. Use this throughout the codebase for fallible operations.
///
/// # Examples
///
/// ```
/// use sonarex::domain::result::Result;
/// use sonarex::domain::errors::SonarexError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(SonarexError::Validation("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, SonarexError>;
