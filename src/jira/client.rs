use crate::config::{Config, FieldsConfig};
use crate::jira::api_types::{ApiBoardIssuesResponse, ApiIssue};
use crate::jira::types::{BoardIssue, TicketMetadata};
use color_eyre::{eyre::eyre, Result};
use tracing::debug;

/// Fields requested when listing board issues
const BOARD_ISSUE_FIELDS: &str = "summary,status,parent";

/// Jira API client wrapper
#[derive(Clone)]
pub struct JiraClient {
  client: gouqi::r#async::Jira,
  fields: FieldsConfig,
  epic_field: Option<String>,
}

impl JiraClient {
  pub fn new(config: &Config) -> Result<Self> {
    let token = Config::get_api_token()?;

    let credentials = gouqi::Credentials::Basic(config.jira.email.clone(), token);

    let client = gouqi::r#async::Jira::new(&config.jira.url, credentials)
      .map_err(|e| eyre!("Failed to create Jira client: {}", e))?;

    Ok(Self {
      client,
      fields: config.fields.clone(),
      epic_field: config.jira.epic_field.clone(),
    })
  }

  /// Get the fields of a single issue that badge rules look at
  pub async fn get_ticket_metadata(&self, key: &str) -> Result<TicketMetadata> {
    let endpoint = format!("/issue/{}", key);

    let issue: ApiIssue = self
      .client
      .get("api", &endpoint)
      .await
      .map_err(|e| eyre!("Failed to get issue {}: {}", key, e))?;

    Ok(issue.into_metadata(&self.fields))
  }

  /// Get issues for a specific board, optionally narrowed by JQL
  pub async fn get_board_issues(&self, board_id: u64, jql: Option<&str>) -> Result<Vec<BoardIssue>> {
    let mut all_issues = Vec::new();
    let mut start_at = 0u64;
    let max_results = 50u64;

    let fields = match &self.epic_field {
      Some(epic) => format!("{},{}", BOARD_ISSUE_FIELDS, epic),
      None => BOARD_ISSUE_FIELDS.to_string(),
    };

    loop {
      let mut endpoint = format!(
        "/board/{}/issue?startAt={}&maxResults={}&fields={}",
        board_id, start_at, max_results, fields
      );
      if let Some(jql) = jql {
        endpoint.push_str("&jql=");
        endpoint.extend(url::form_urlencoded::byte_serialize(jql.as_bytes()));
      }

      let response: ApiBoardIssuesResponse = self
        .client
        .get("agile", &endpoint)
        .await
        .map_err(|e| eyre!("Failed to get board issues: {}", e))?;

      let issues_count = response.issues.len() as u64;
      let epic_field = self.epic_field.as_deref();
      all_issues.extend(
        response
          .issues
          .into_iter()
          .map(|issue| issue.into_board_issue(epic_field)),
      );

      // Check if we've fetched all issues
      if issues_count == 0 || start_at + issues_count >= response.total {
        break;
      }
      start_at += max_results;
    }

    debug!(board_id, count = all_issues.len(), "board issues loaded");
    Ok(all_issues)
  }
}
