//! Badge classification from ticket metadata and pull requests.
//!
//! Each rule is evaluated independently and contributes to a single set.
//! Missing optional fields take the "false" branch of a rule.

use super::badge::{Badge, BadgeSet};
use crate::jira::types::{PullRequest, PullRequestStatus, TicketMetadata};

const NEEDS_WORK_LOGGED: &[&str] = &["Bug", "Improvement", "Support Request"];
const NEEDS_FIX_VERSION: &[&str] = &["Bug", "Improvement", "Story"];
const NEEDS_COMPONENT: &[&str] = &["Bug", "Improvement", "Story"];

const FINISHED_STATUSES: &[&str] = &["Resolved", "Closed"];
const DONE_RESOLUTIONS: &[&str] = &["Fixed", "Done"];

const PUBLICATION_NOT_SPECIFIED: &str = "Not Specified";
const PUBLICATION_NEEDS_DESCRIPTION: &[&str] = &["Publicise", "Publicise in Detail"];

const BLOCKED_LABEL: &str = "blocked";

fn is_one_of(value: Option<&str>, candidates: &[&str]) -> bool {
  value.is_some_and(|v| candidates.contains(&v))
}

/// Compute the badges for a ticket.
pub fn classify(ticket: &TicketMetadata, pull_requests: &[PullRequest]) -> BadgeSet {
  let mut badges = BadgeSet::new();

  let issue_type = ticket.issue_type.as_deref();
  let finished = is_one_of(ticket.status.as_deref(), FINISHED_STATUSES);
  let done = is_one_of(ticket.resolution.as_deref(), DONE_RESOLUTIONS);

  if is_one_of(issue_type, NEEDS_WORK_LOGGED) && ticket.worklog_count == 0 && finished {
    badges.insert(Badge::LogWork);
  }

  if issue_type == Some("Bug") && finished && publication_incomplete(ticket) {
    badges.insert(Badge::Publication);
  }

  if is_one_of(issue_type, NEEDS_FIX_VERSION) && finished && done && ticket.fix_versions.is_empty()
  {
    badges.insert(Badge::FixVersion);
  }

  // Independent of status
  if is_one_of(issue_type, NEEDS_COMPONENT) && ticket.components.is_empty() {
    badges.insert(Badge::NoComponent);
  }

  if ticket.labels.iter().any(|l| l == BLOCKED_LABEL) {
    badges.insert(Badge::Blocked);
  }

  for pr in pull_requests {
    match pr.status {
      PullRequestStatus::Open if pr.reviewer_count == 0 => {
        badges.insert(Badge::Open);
      }
      PullRequestStatus::Open => {
        badges.insert(Badge::InProgress);
      }
      PullRequestStatus::Merged => {
        badges.insert(Badge::Merged);
      }
      PullRequestStatus::Other(_) => {}
    }
  }

  badges
}

fn publication_incomplete(ticket: &TicketMetadata) -> bool {
  let publication = ticket.publication.as_deref();
  let has_description = ticket
    .public_description
    .as_deref()
    .is_some_and(|d| !d.is_empty());

  publication == Some(PUBLICATION_NOT_SPECIFIED)
    || (is_one_of(publication, PUBLICATION_NEEDS_DESCRIPTION) && !has_description)
}
