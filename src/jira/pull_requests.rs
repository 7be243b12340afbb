//! Client for the dev-status proxy that reports a ticket's pull requests.

use color_eyre::{eyre::eyre, Result};
use reqwest::Client;
use url::Url;

use super::api_types::ApiDevStatusResponse;
use super::types::DevStatus;
use crate::config::PullRequestsConfig;

#[derive(Clone)]
pub struct PullRequestClient {
  client: Client,
  base: Url,
}

impl PullRequestClient {
  pub fn new(config: &PullRequestsConfig) -> Result<Self> {
    let client = Client::builder()
      .user_agent(concat!("jira-badges/", env!("CARGO_PKG_VERSION")))
      .build()
      .map_err(|e| eyre!("Failed to create pull request client: {}", e))?;

    Ok(Self {
      client,
      base: base_url(&config.url)?,
    })
  }

  /// Get pull request status for a ticket.
  ///
  /// The body is parsed whatever the HTTP status, since the proxy reports
  /// failures in an `errors` list.
  pub async fn get_dev_status(&self, key: &str) -> Result<DevStatus> {
    let url = endpoint(&self.base, key)?;

    let response = self
      .client
      .get(url)
      .send()
      .await
      .map_err(|e| eyre!("Failed to get pull requests for {}: {}", key, e))?;

    let status = response.status();
    let body = response
      .bytes()
      .await
      .map_err(|e| eyre!("Failed to read pull requests for {}: {}", key, e))?;

    let parsed: ApiDevStatusResponse = serde_json::from_slice(&body)
      .map_err(|e| eyre!("Failed to parse pull requests for {} ({}): {}", key, status, e))?;

    Ok(parsed.into())
  }
}

/// Parse the proxy URL so that ticket keys join as a trailing path segment.
fn base_url(raw: &str) -> Result<Url> {
  let mut raw = raw.to_string();
  if !raw.ends_with('/') {
    raw.push('/');
  }
  Url::parse(&raw).map_err(|e| eyre!("Invalid pull request proxy URL {}: {}", raw, e))
}

fn endpoint(base: &Url, key: &str) -> Result<Url> {
  base
    .join(key)
    .map_err(|e| eyre!("Invalid ticket key {}: {}", key, e))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_endpoint_appends_key() {
    let base = base_url("https://build.example.com:3143").unwrap();
    assert_eq!(
      endpoint(&base, "MEM-1234").unwrap().as_str(),
      "https://build.example.com:3143/MEM-1234"
    );
  }

  #[test]
  fn test_endpoint_keeps_base_path() {
    let base = base_url("https://proxy.example.com/dev-status").unwrap();
    assert_eq!(
      endpoint(&base, "MEM-1").unwrap().as_str(),
      "https://proxy.example.com/dev-status/MEM-1"
    );
  }

  #[test]
  fn test_invalid_base_url() {
    assert!(base_url("not a url").is_err());
  }
}
