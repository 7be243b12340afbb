pub mod api_types;
pub mod client;
pub mod pull_requests;
pub mod types;

use color_eyre::Result;

use crate::config::Config;
use crate::fetch::TicketSource;
use client::JiraClient;
use pull_requests::PullRequestClient;
use types::{DevStatus, TicketMetadata};

/// Live ticket source: metadata from Jira, pull requests from the dev-status proxy.
#[derive(Clone)]
pub struct JiraSource {
  jira: JiraClient,
  pull_requests: PullRequestClient,
}

impl JiraSource {
  pub fn new(config: &Config) -> Result<Self> {
    Ok(Self {
      jira: JiraClient::new(config)?,
      pull_requests: PullRequestClient::new(&config.pull_requests)?,
    })
  }

  pub fn jira(&self) -> &JiraClient {
    &self.jira
  }
}

impl TicketSource for JiraSource {
  async fn ticket_metadata(&self, key: &str) -> Result<TicketMetadata> {
    self.jira.get_ticket_metadata(key).await
  }

  async fn dev_status(&self, key: &str) -> Result<DevStatus> {
    self.pull_requests.get_dev_status(key).await
  }
}
