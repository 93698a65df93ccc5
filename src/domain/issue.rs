//! Raw issue boundary type
//!
//! The SonarQube issue search endpoint returns dynamically-shaped JSON
//! objects whose field set varies by server version and rule type. `RawIssue`
//! keeps that shape as an untyped key-value map at the adapter boundary; the
//! flattening step in `core::flatten` is the single place that imposes a
//! fixed schema. Nothing beyond the flattener should reach into a `RawIssue`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One issue as returned by the SonarQube API, untyped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawIssue(pub Map<String, Value>);

impl RawIssue {
    /// Create an empty issue (every field absent).
    pub fn empty() -> Self {
        Self(Map::new())
    }

    /// Look up a raw field value.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    /// Scalar field as a string; empty string when absent.
    ///
    /// Strings are copied verbatim; numbers and booleans are stringified.
    /// Objects and arrays are not scalars and yield the empty default.
    pub fn str_field(&self, field: &str) -> String {
        match self.0.get(field) {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::Bool(b)) => b.to_string(),
            _ => String::new(),
        }
    }

    /// Number of elements in a list-valued field; zero when absent or not a
    /// list.
    pub fn list_len(&self, field: &str) -> usize {
        match self.0.get(field) {
            Some(Value::Array(items)) => items.len(),
            _ => 0,
        }
    }

    /// String elements of a list-valued field joined with the separator;
    /// empty string when absent. Non-string elements are skipped.
    pub fn joined_str_list(&self, field: &str, separator: &str) -> String {
        match self.0.get(field) {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(separator),
            _ => String::new(),
        }
    }

    /// A numeric member of a nested object field, stringified; empty string
    /// when the object or the member is absent or not a number.
    pub fn nested_number(&self, field: &str, member: &str) -> String {
        match self.0.get(field) {
            Some(Value::Object(obj)) => match obj.get(member) {
                Some(Value::Number(n)) => n.to_string(),
                _ => String::new(),
            },
            _ => String::new(),
        }
    }
}

impl From<Map<String, Value>> for RawIssue {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}
