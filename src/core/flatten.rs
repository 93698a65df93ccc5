//! Issue flattening
//!
//! Converts one nested issue record into a flat row with a fixed column
//! schema. The flattening is pure and total: any field an issue lacks gets
//! a defined default (empty string, or zero for the count columns), so the
//! column set is identical for every record regardless of which optional
//! fields it carries.

use crate::domain::issue::RawIssue;

/// Column names of the flat schema, in output order.
///
/// The location columns `startLine`/`endLine`/`startOffset`/`endOffset` come
/// from the nested `textRange` object; `comments` and `flows` are element
/// counts; `tags`/`transitions`/`actions` are comma-joined; `impacts` is a
/// semicolon-separated list of `quality:severity` pairs.
pub const COLUMNS: [&str; 30] = [
    "key",
    "rule",
    "severity",
    "component",
    "project",
    "line",
    "hash",
    "startLine",
    "endLine",
    "startOffset",
    "endOffset",
    "status",
    "resolution",
    "issueStatus",
    "type",
    "scope",
    "message",
    "effort",
    "debt",
    "author",
    "creationDate",
    "updateDate",
    "closeDate",
    "tags",
    "transitions",
    "actions",
    "comments",
    "flows",
    "impacts",
    "quickFixAvailable",
];

/// One flattened issue row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlatIssue {
    pub key: String,
    pub rule: String,
    pub severity: String,
    pub component: String,
    pub project: String,
    pub line: String,
    pub hash: String,
    pub start_line: String,
    pub end_line: String,
    pub start_offset: String,
    pub end_offset: String,
    pub status: String,
    pub resolution: String,
    pub issue_status: String,
    pub issue_type: String,
    pub scope: String,
    pub message: String,
    pub effort: String,
    pub debt: String,
    pub author: String,
    pub creation_date: String,
    pub update_date: String,
    pub close_date: String,
    pub tags: String,
    pub transitions: String,
    pub actions: String,
    pub comments: usize,
    pub flows: usize,
    pub impacts: String,
    pub quick_fix_available: String,
}

impl FlatIssue {
    /// The row's values in `COLUMNS` order, ready for the CSV writer.
    pub fn to_record(&self) -> Vec<String> {
        vec![
            self.key.clone(),
            self.rule.clone(),
            self.severity.clone(),
            self.component.clone(),
            self.project.clone(),
            self.line.clone(),
            self.hash.clone(),
            self.start_line.clone(),
            self.end_line.clone(),
            self.start_offset.clone(),
            self.end_offset.clone(),
            self.status.clone(),
            self.resolution.clone(),
            self.issue_status.clone(),
            self.issue_type.clone(),
            self.scope.clone(),
            self.message.clone(),
            self.effort.clone(),
            self.debt.clone(),
            self.author.clone(),
            self.creation_date.clone(),
            self.update_date.clone(),
            self.close_date.clone(),
            self.tags.clone(),
            self.transitions.clone(),
            self.actions.clone(),
            self.comments.to_string(),
            self.flows.to_string(),
            self.impacts.clone(),
            self.quick_fix_available.clone(),
        ]
    }
}

/// Flatten one raw issue into the fixed schema. Pure and total.
pub fn flatten_issue(issue: &RawIssue) -> FlatIssue {
    FlatIssue {
        key: issue.str_field("key"),
        rule: issue.str_field("rule"),
        severity: issue.str_field("severity"),
        component: issue.str_field("component"),
        project: issue.str_field("project"),
        line: issue.str_field("line"),
        hash: issue.str_field("hash"),
        start_line: issue.nested_number("textRange", "startLine"),
        end_line: issue.nested_number("textRange", "endLine"),
        start_offset: issue.nested_number("textRange", "startOffset"),
        end_offset: issue.nested_number("textRange", "endOffset"),
        status: issue.str_field("status"),
        resolution: issue.str_field("resolution"),
        issue_status: issue.str_field("issueStatus"),
        issue_type: issue.str_field("type"),
        scope: issue.str_field("scope"),
        message: issue.str_field("message"),
        effort: issue.str_field("effort"),
        debt: issue.str_field("debt"),
        author: issue.str_field("author"),
        creation_date: issue.str_field("creationDate"),
        update_date: issue.str_field("updateDate"),
        close_date: issue.str_field("closeDate"),
        tags: issue.joined_str_list("tags", ","),
        transitions: issue.joined_str_list("transitions", ","),
        actions: issue.joined_str_list("actions", ","),
        comments: issue.list_len("comments"),
        flows: issue.list_len("flows"),
        impacts: render_impacts(issue),
        quick_fix_available: issue.str_field("quickFixAvailable"),
    }
}

/// Render the `impacts` list as `quality:severity` pairs joined by `"; "`.
fn render_impacts(issue: &RawIssue) -> String {
    let Some(serde_json::Value::Array(impacts)) = issue.get("impacts") else {
        return String::new();
    };

    impacts
        .iter()
        .filter_map(|impact| impact.as_object())
        .map(|impact| {
            let quality = impact
                .get("softwareQuality")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            let severity = impact
                .get("severity")
                .and_then(|v| v.as_str())
                .unwrap_or("");
            format!("{quality}:{severity}")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn issue_from(value: serde_json::Value) -> RawIssue {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flatten_issue_basic() {
        let issue = issue_from(json!({
            "key": "TEST-123",
            "rule": "typescript:S1234",
            "severity": "MAJOR",
            "component": "test:src/file.ts",
            "message": "Test issue message",
            "tags": ["bug", "security"],
            "comments": [{"text": "comment1"}, {"text": "comment2"}],
            "flows": [],
            "textRange": {
                "startLine": 10,
                "endLine": 15,
                "startOffset": 5,
                "endOffset": 20
            },
            "impacts": [
                {"softwareQuality": "MAINTAINABILITY", "severity": "MEDIUM"},
                {"softwareQuality": "SECURITY", "severity": "HIGH"}
            ]
        }));

        let flat = flatten_issue(&issue);

        assert_eq!(flat.key, "TEST-123");
        assert_eq!(flat.rule, "typescript:S1234");
        assert_eq!(flat.severity, "MAJOR");
        assert_eq!(flat.start_line, "10");
        assert_eq!(flat.end_line, "15");
        assert_eq!(flat.start_offset, "5");
        assert_eq!(flat.end_offset, "20");
        assert_eq!(flat.tags, "bug,security");
        assert_eq!(flat.comments, 2);
        assert_eq!(flat.flows, 0);
        assert_eq!(flat.impacts, "MAINTAINABILITY:MEDIUM; SECURITY:HIGH");
    }

    #[test]
    fn test_flatten_issue_missing_fields() {
        let issue = issue_from(json!({
            "key": "TEST-456",
            "rule": "typescript:S5678"
        }));

        let flat = flatten_issue(&issue);

        assert_eq!(flat.key, "TEST-456");
        assert_eq!(flat.rule, "typescript:S5678");
        assert_eq!(flat.severity, "");
        assert_eq!(flat.start_line, "");
        assert_eq!(flat.tags, "");
        assert_eq!(flat.comments, 0);
        assert_eq!(flat.impacts, "");
    }

    #[test]
    fn test_flatten_empty_issue_is_total() {
        let flat = flatten_issue(&RawIssue::empty());
        let record = flat.to_record();

        assert_eq!(record.len(), COLUMNS.len());
        // count columns default to zero, everything else to empty
        assert_eq!(flat.comments, 0);
        assert_eq!(flat.flows, 0);
        for (column, value) in COLUMNS.iter().zip(&record) {
            match *column {
                "comments" | "flows" => assert_eq!(value, "0"),
                _ => assert_eq!(value, "", "column {column} should default to empty"),
            }
        }
    }

    #[test]
    fn test_flatten_malformed_text_range() {
        // textRange present but not an object
        let issue = issue_from(json!({
            "key": "TEST-789",
            "textRange": "10-15"
        }));

        let flat = flatten_issue(&issue);
        assert_eq!(flat.start_line, "");
        assert_eq!(flat.end_line, "");
    }

    #[test]
    fn test_flatten_partial_impacts() {
        let issue = issue_from(json!({
            "impacts": [
                {"softwareQuality": "RELIABILITY"},
                {"severity": "LOW"}
            ]
        }));

        let flat = flatten_issue(&issue);
        assert_eq!(flat.impacts, "RELIABILITY:; :LOW");
    }

    #[test]
    fn test_record_matches_column_order() {
        let issue = issue_from(json!({
            "key": "K",
            "quickFixAvailable": true
        }));
        let record = flatten_issue(&issue).to_record();

        assert_eq!(record[0], "K");
        let qfa_index = COLUMNS.iter().position(|c| *c == "quickFixAvailable").unwrap();
        assert_eq!(record[qfa_index], "true");
    }
}
