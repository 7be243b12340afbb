/// Ticket fields that badge classification looks at
#[derive(Debug, Clone, Default)]
pub struct TicketMetadata {
  pub key: String,
  pub id: String,
  pub issue_type: Option<String>,
  pub status: Option<String>,
  pub resolution: Option<String>,
  pub labels: Vec<String>,
  /// Number of worklog entries recorded against the ticket
  pub worklog_count: usize,
  pub fix_versions: Vec<String>,
  pub components: Vec<String>,
  /// Value of the publication select field (e.g. "Publicise")
  pub publication: Option<String>,
  /// Text of the public description field
  pub public_description: Option<String>,
}

/// Pull request state as reported by the dev-status proxy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PullRequestStatus {
  Open,
  Merged,
  /// Anything else, e.g. "DECLINED"
  Other(String),
}

impl From<&str> for PullRequestStatus {
  fn from(s: &str) -> Self {
    match s {
      "OPEN" => PullRequestStatus::Open,
      "MERGED" => PullRequestStatus::Merged,
      other => PullRequestStatus::Other(other.to_string()),
    }
  }
}

/// A pull request linked to a ticket
#[derive(Debug, Clone)]
pub struct PullRequest {
  pub status: PullRequestStatus,
  pub reviewer_count: usize,
}

/// Response of the dev-status proxy for one ticket
#[derive(Debug, Clone, Default)]
pub struct DevStatus {
  /// Error messages carried in the response payload
  pub errors: Vec<String>,
  /// Pull requests of the first detail entry, None if the response had no detail
  pub pull_requests: Option<Vec<PullRequest>>,
}

/// Issue on a board, as shown on a card
#[derive(Debug, Clone)]
pub struct BoardIssue {
  pub key: String,
  pub summary: String,
  pub status: String,
  /// Parent or epic key, if any
  pub parent: Option<String>,
}
