use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
  pub jira: JiraConfig,
  pub board: BoardConfig,
  pub pull_requests: PullRequestsConfig,
  /// Custom title for header (defaults to Jira domain if not set)
  pub title: Option<String>,
  #[serde(default)]
  pub fields: FieldsConfig,
  #[serde(default)]
  pub poll: PollConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JiraConfig {
  pub url: String,
  pub email: String,
  /// Custom field name for epic link (e.g., "customfield_10014")
  pub epic_field: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BoardConfig {
  /// Agile board id (the `rapidView` parameter in board URLs)
  pub id: u64,
  /// Extra JQL to narrow the board issues (e.g. "sprint in openSprints()")
  pub jql: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PullRequestsConfig {
  /// Base URL of the dev-status proxy; ticket keys are appended as a path segment
  pub url: String,
}

/// Custom field ids used by the publication rule
#[derive(Debug, Clone, Deserialize)]
pub struct FieldsConfig {
  #[serde(default = "default_publication_field")]
  pub publication: String,
  #[serde(default = "default_public_description_field")]
  pub public_description: String,
}

fn default_publication_field() -> String {
  "customfield_10055".to_string()
}

fn default_public_description_field() -> String {
  "customfield_10051".to_string()
}

impl Default for FieldsConfig {
  fn default() -> Self {
    Self {
      publication: default_publication_field(),
      public_description: default_public_description_field(),
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollConfig {
  pub interval_secs: u64,
  pub max_concurrent_requests: usize,
  /// Failed fetches after which polling stops for the session
  pub error_limit: usize,
  pub cache_expiry_mins: u64,
}

impl Default for PollConfig {
  fn default() -> Self {
    Self {
      interval_secs: 2,
      max_concurrent_requests: 10,
      error_limit: 20,
      cache_expiry_mins: 30,
    }
  }
}

impl PollConfig {
  pub fn interval(&self) -> Duration {
    Duration::from_secs(self.interval_secs)
  }

  pub fn cache_expiry(&self) -> Duration {
    Duration::from_secs(self.cache_expiry_mins * 60)
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./jira-badges.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/jira-badges/config.yaml
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    match path {
      Some(p) => Self::load_from_path(&p),
      None => Err(eyre!(
        "No configuration file found. Create one at ~/.config/jira-badges/config.yaml\n\
                 See config.example.yaml for the format."
      )),
    }
  }

  fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from("jira-badges.yaml");
    if local.exists() {
      return Some(local);
    }

    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("jira-badges").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    Self::parse(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))
  }

  fn parse(contents: &str) -> Result<Self> {
    let config: Config = serde_yaml::from_str(contents)?;

    if config.poll.max_concurrent_requests == 0 {
      return Err(eyre!("poll.max_concurrent_requests must be at least 1"));
    }
    if config.poll.interval_secs == 0 {
      return Err(eyre!("poll.interval_secs must be at least 1"));
    }

    Ok(config)
  }

  /// Get the Jira API token from environment variables.
  ///
  /// Checks JIRA_BADGES_TOKEN first, then JIRA_API_TOKEN as fallback.
  pub fn get_api_token() -> Result<String> {
    std::env::var("JIRA_BADGES_TOKEN")
      .or_else(|_| std::env::var("JIRA_API_TOKEN"))
      .map_err(|_| {
        eyre!(
          "Jira API token not found. Set JIRA_BADGES_TOKEN or JIRA_API_TOKEN environment variable."
        )
      })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const MINIMAL: &str = r#"
jira:
  url: https://jira.example.com
  email: dev@example.com
board:
  id: 3198
pull_requests:
  url: https://build.example.com:3143
"#;

  #[test]
  fn test_defaults() {
    let config = Config::parse(MINIMAL).unwrap();
    assert_eq!(config.board.id, 3198);
    assert_eq!(config.fields.publication, "customfield_10055");
    assert_eq!(config.fields.public_description, "customfield_10051");
    assert_eq!(config.poll.interval(), Duration::from_secs(2));
    assert_eq!(config.poll.max_concurrent_requests, 10);
    assert_eq!(config.poll.error_limit, 20);
    assert_eq!(config.poll.cache_expiry(), Duration::from_secs(1800));
  }

  #[test]
  fn test_partial_poll_section() {
    let yaml = format!("{}poll:\n  error_limit: 5\n", MINIMAL);
    let config = Config::parse(&yaml).unwrap();
    assert_eq!(config.poll.error_limit, 5);
    assert_eq!(config.poll.max_concurrent_requests, 10);
  }

  #[test]
  fn test_zero_concurrency_rejected() {
    let yaml = format!("{}poll:\n  max_concurrent_requests: 0\n", MINIMAL);
    assert!(Config::parse(&yaml).is_err());
  }

  #[test]
  fn test_missing_board_rejected() {
    let yaml = "jira:\n  url: https://jira.example.com\n  email: a@b.c\n";
    assert!(Config::parse(yaml).is_err());
  }
}
