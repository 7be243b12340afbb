//! Serde-deserializable types matching Jira and dev-status proxy responses.
//!
//! These types are separate from domain types to allow clean deserialization
//! while keeping domain types focused on application needs.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;

use super::types::{BoardIssue, DevStatus, PullRequest, PullRequestStatus, TicketMetadata};
use crate::config::FieldsConfig;

/// Jira sends `null` for some empty list fields; treat it as empty.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ============================================================================
// Common nested field types
// ============================================================================

/// Any Jira object identified by name (status, issue type, version, ...)
#[derive(Debug, Deserialize)]
pub struct ApiNamed {
  #[serde(default)]
  pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiIssueRef {
  pub key: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct ApiWorklog {
  #[serde(default, deserialize_with = "null_as_default")]
  pub worklogs: Vec<Value>,
}

// ============================================================================
// Issue endpoint response
// ============================================================================

#[derive(Debug, Deserialize, Default)]
pub struct ApiIssueFields {
  #[serde(default)]
  pub summary: String,
  pub status: Option<ApiNamed>,
  #[serde(rename = "issuetype")]
  pub issue_type: Option<ApiNamed>,
  pub resolution: Option<ApiNamed>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub labels: Vec<String>,
  pub worklog: Option<ApiWorklog>,
  #[serde(
    rename = "fixVersions",
    default,
    deserialize_with = "null_as_default"
  )]
  pub fix_versions: Vec<ApiNamed>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub components: Vec<ApiNamed>,
  pub parent: Option<ApiIssueRef>,
  // Catch-all for custom fields (publication, epic link, ...)
  #[serde(flatten)]
  pub extra: HashMap<String, Value>,
}

#[derive(Debug, Deserialize)]
pub struct ApiIssue {
  #[serde(default)]
  pub id: String,
  pub key: String,
  #[serde(default)]
  pub fields: ApiIssueFields,
}

// ============================================================================
// Board issues endpoint response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiBoardIssuesResponse {
  #[serde(default)]
  pub issues: Vec<ApiIssue>,
  #[serde(default)]
  pub total: u64,
}

// ============================================================================
// Dev-status proxy response
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ApiPullRequest {
  #[serde(default)]
  pub status: String,
  pub reviewers: Option<Vec<Value>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiDevStatusDetail {
  #[serde(rename = "pullRequests")]
  pub pull_requests: Option<Vec<ApiPullRequest>>,
}

#[derive(Debug, Deserialize)]
pub struct ApiDevStatusResponse {
  /// Either strings or objects with an `error` message
  #[serde(default, deserialize_with = "null_as_default")]
  pub errors: Vec<Value>,
  #[serde(default, deserialize_with = "null_as_default")]
  pub detail: Vec<ApiDevStatusDetail>,
}

// ============================================================================
// Conversions to domain types
// ============================================================================

impl ApiIssue {
  pub fn into_metadata(self, fields: &FieldsConfig) -> TicketMetadata {
    let f = self.fields;
    TicketMetadata {
      key: self.key,
      id: self.id,
      issue_type: f.issue_type.map(|t| t.name),
      status: f.status.map(|s| s.name),
      resolution: f.resolution.map(|r| r.name),
      labels: f.labels,
      worklog_count: f.worklog.map(|w| w.worklogs.len()).unwrap_or(0),
      fix_versions: f.fix_versions.into_iter().map(|v| v.name).collect(),
      components: f.components.into_iter().map(|c| c.name).collect(),
      publication: extract_select_value(f.extra.get(&fields.publication)),
      public_description: f
        .extra
        .get(&fields.public_description)
        .and_then(extract_description),
    }
  }

  pub fn into_board_issue(self, epic_field: Option<&str>) -> BoardIssue {
    let f = self.fields;
    let parent = f.parent.map(|p| p.key).or_else(|| {
      epic_field.and_then(|field_name| extract_epic_value(f.extra.get(field_name)))
    });
    BoardIssue {
      key: self.key,
      summary: f.summary,
      status: f.status.map(|s| s.name).unwrap_or_default(),
      parent,
    }
  }
}

impl From<ApiPullRequest> for PullRequest {
  fn from(pr: ApiPullRequest) -> Self {
    PullRequest {
      status: PullRequestStatus::from(pr.status.as_str()),
      reviewer_count: pr.reviewers.map(|r| r.len()).unwrap_or(0),
    }
  }
}

impl From<ApiDevStatusResponse> for DevStatus {
  fn from(resp: ApiDevStatusResponse) -> Self {
    DevStatus {
      errors: resp.errors.iter().map(extract_error_message).collect(),
      pull_requests: resp
        .detail
        .into_iter()
        .next()
        .and_then(|d| d.pull_requests)
        .map(|prs| prs.into_iter().map(PullRequest::from).collect()),
    }
  }
}

// ============================================================================
// Helpers
// ============================================================================

/// Extract the chosen option of a select custom field.
/// Select fields are objects with a "value" key; plain strings pass through.
fn extract_select_value(value: Option<&Value>) -> Option<String> {
  let value = value?;
  if let Some(s) = value.as_str() {
    return Some(s.to_string());
  }
  value
    .get("value")
    .and_then(|v| v.as_str())
    .map(str::to_string)
}

/// Extract epic value from a custom field
/// Epic fields can be:
/// - A string (epic key like "PROJ-123")
/// - An object with "key" field
/// - null
fn extract_epic_value(value: Option<&Value>) -> Option<String> {
  let value = value?;

  if let Some(s) = value.as_str() {
    return Some(s.to_string());
  }

  value
    .get("key")
    .and_then(|v| v.as_str())
    .map(str::to_string)
}

fn extract_error_message(value: &Value) -> String {
  if let Some(s) = value.as_str() {
    return s.to_string();
  }
  match value.get("error").and_then(|v| v.as_str()) {
    Some(message) => message.to_string(),
    None => value.to_string(),
  }
}

/// Extract plain text from a text field in either plain or ADF format
fn extract_description(value: &Value) -> Option<String> {
  // If it's a string, return it directly (API v2)
  if let Some(s) = value.as_str() {
    return Some(s.to_string());
  }

  // If it's an ADF document (API v3), extract text content
  let content = value.get("content").and_then(|v| v.as_array())?;
  let mut text = String::new();
  extract_adf_text(content, &mut text);
  (!text.is_empty()).then_some(text)
}

/// Recursively extract text from ADF content
fn extract_adf_text(content: &[Value], output: &mut String) {
  for node in content {
    if let Some(text) = node.get("text").and_then(|v| v.as_str()) {
      output.push_str(text);
    }
    if let Some(children) = node.get("content").and_then(|v| v.as_array()) {
      extract_adf_text(children, output);
    }
    if node.get("type").and_then(|v| v.as_str()) == Some("paragraph") {
      output.push('\n');
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  #[test]
  fn test_issue_into_metadata() {
    let issue: ApiIssue = serde_json::from_value(json!({
      "id": "123456",
      "key": "MEM-1234",
      "fields": {
        "issuetype": { "name": "Bug" },
        "status": { "name": "Resolved" },
        "resolution": { "name": "Fixed" },
        "labels": ["blocked"],
        "worklog": { "worklogs": [{ "timeSpent": "1h" }] },
        "fixVersions": [],
        "components": [{ "name": "Core" }],
        "customfield_10055": { "value": "Publicise" },
        "customfield_10051": "Crash on login fixed"
      }
    }))
    .unwrap();

    let meta = issue.into_metadata(&FieldsConfig::default());
    assert_eq!(meta.id, "123456");
    assert_eq!(meta.issue_type.as_deref(), Some("Bug"));
    assert_eq!(meta.resolution.as_deref(), Some("Fixed"));
    assert_eq!(meta.worklog_count, 1);
    assert!(meta.fix_versions.is_empty());
    assert_eq!(meta.components, vec!["Core"]);
    assert_eq!(meta.publication.as_deref(), Some("Publicise"));
    assert_eq!(
      meta.public_description.as_deref(),
      Some("Crash on login fixed")
    );
  }

  #[test]
  fn test_nulls_and_missing_fields() {
    let issue: ApiIssue = serde_json::from_value(json!({
      "key": "MEM-2",
      "fields": {
        "resolution": null,
        "fixVersions": null,
        "customfield_10055": null
      }
    }))
    .unwrap();

    let meta = issue.into_metadata(&FieldsConfig::default());
    assert_eq!(meta.resolution, None);
    assert_eq!(meta.worklog_count, 0);
    assert!(meta.labels.is_empty());
    assert_eq!(meta.publication, None);
    assert_eq!(meta.public_description, None);
  }

  #[test]
  fn test_adf_public_description() {
    let value = json!({
      "type": "doc",
      "content": [{
        "type": "paragraph",
        "content": [{ "type": "text", "text": "Fixed it" }]
      }]
    });
    assert_eq!(extract_description(&value).as_deref(), Some("Fixed it\n"));
    assert_eq!(extract_description(&json!({ "content": [] })), None);
  }

  #[test]
  fn test_board_issue_parent_from_epic_field() {
    let issue: ApiIssue = serde_json::from_value(json!({
      "key": "MEM-3",
      "fields": {
        "summary": "Add badges",
        "status": { "name": "In Progress" },
        "customfield_10014": "MEM-100"
      }
    }))
    .unwrap();

    let board_issue = issue.into_board_issue(Some("customfield_10014"));
    assert_eq!(board_issue.parent.as_deref(), Some("MEM-100"));
    assert_eq!(board_issue.status, "In Progress");
  }

  #[test]
  fn test_board_issue_prefers_parent_field() {
    let issue: ApiIssue = serde_json::from_value(json!({
      "key": "MEM-4",
      "fields": {
        "parent": { "key": "MEM-200" },
        "customfield_10014": "MEM-100"
      }
    }))
    .unwrap();

    let board_issue = issue.into_board_issue(Some("customfield_10014"));
    assert_eq!(board_issue.parent.as_deref(), Some("MEM-200"));
  }

  #[test]
  fn test_dev_status_pull_requests() {
    let resp: ApiDevStatusResponse = serde_json::from_value(json!({
      "errors": [],
      "detail": [{
        "pullRequests": [
          { "status": "OPEN", "reviewers": [] },
          { "status": "OPEN", "reviewers": [{ "name": "alice" }] },
          { "status": "MERGED" }
        ]
      }]
    }))
    .unwrap();

    let dev = DevStatus::from(resp);
    assert!(dev.errors.is_empty());
    let prs = dev.pull_requests.unwrap();
    assert_eq!(prs.len(), 3);
    assert_eq!(prs[0].reviewer_count, 0);
    assert_eq!(prs[1].reviewer_count, 1);
    assert_eq!(prs[2].status, PullRequestStatus::Merged);
  }

  #[test]
  fn test_dev_status_errors() {
    let resp: ApiDevStatusResponse = serde_json::from_value(json!({
      "errors": [{ "error": "Stash is down" }, "timeout"]
    }))
    .unwrap();

    let dev = DevStatus::from(resp);
    assert_eq!(dev.errors, vec!["Stash is down", "timeout"]);
    assert!(dev.pull_requests.is_none());
  }
}
