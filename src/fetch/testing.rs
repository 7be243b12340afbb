//! Test doubles for the fetch pipeline.

use color_eyre::{eyre::eyre, Result};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

use super::TicketSource;
use crate::jira::types::{DevStatus, PullRequest, PullRequestStatus, TicketMetadata};

/// In-memory ticket source that counts calls and can hold fetches at a gate.
#[derive(Default)]
pub struct FakeSource {
  pub tickets: Mutex<HashMap<String, TicketMetadata>>,
  pub dev: Mutex<HashMap<String, DevStatus>>,
  pub metadata_calls: AtomicUsize,
  pub gate: Option<Arc<Semaphore>>,
}

impl FakeSource {
  pub fn with_ticket(self, ticket: TicketMetadata, dev: DevStatus) -> Self {
    self.dev.lock().unwrap().insert(ticket.key.clone(), dev);
    self.tickets.lock().unwrap().insert(ticket.key.clone(), ticket);
    self
  }
}

impl TicketSource for FakeSource {
  async fn ticket_metadata(&self, key: &str) -> Result<TicketMetadata> {
    self.metadata_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(gate) = &self.gate {
      gate.acquire().await?.forget();
    }
    self
      .tickets
      .lock()
      .unwrap()
      .get(key)
      .cloned()
      .ok_or_else(|| eyre!("Failed to get issue {}: not found", key))
  }

  async fn dev_status(&self, key: &str) -> Result<DevStatus> {
    Ok(self.dev.lock().unwrap().get(key).cloned().unwrap_or(DevStatus {
      errors: Vec::new(),
      pull_requests: Some(Vec::new()),
    }))
  }
}

pub fn ticket(key: &str) -> TicketMetadata {
  TicketMetadata {
    key: key.to_string(),
    id: "1".to_string(),
    issue_type: Some("Task".to_string()),
    status: Some("To Do".to_string()),
    ..Default::default()
  }
}

pub fn open_pr(reviewers: usize) -> DevStatus {
  DevStatus {
    errors: Vec::new(),
    pull_requests: Some(vec![PullRequest {
      status: PullRequestStatus::Open,
      reviewer_count: reviewers,
    }]),
  }
}

