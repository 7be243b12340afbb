//! Throttled badge fetching.
//!
//! At most `max_in_flight` fetches run at once; anything over the limit is
//! skipped and picked up again on a later scan. A fetch writes a pending
//! placeholder first so the same key is never fetched twice concurrently,
//! and evicts it again on failure so the next scan retries.

use color_eyre::{eyre::eyre, Result};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, error};

use super::context::BadgeContext;
use crate::badges::{classify, BadgeSet};
use crate::jira::types::{DevStatus, TicketMetadata};

/// Where ticket metadata and pull request status come from.
pub trait TicketSource: Send + Sync + 'static {
  fn ticket_metadata(&self, key: &str) -> impl Future<Output = Result<TicketMetadata>> + Send;

  fn dev_status(&self, key: &str) -> impl Future<Output = Result<DevStatus>> + Send;
}

/// One unit of the concurrency budget, held for the duration of a fetch.
///
/// Dropping the permit returns the unit, whichever way the fetch ends.
#[derive(Debug)]
pub struct FetchPermit {
  ctx: Arc<BadgeContext>,
  key: String,
}

impl FetchPermit {
  pub fn key(&self) -> &str {
    &self.key
  }
}

impl Drop for FetchPermit {
  fn drop(&mut self) {
    self.ctx.release();
  }
}

pub struct Fetcher<S> {
  source: Arc<S>,
  ctx: Arc<BadgeContext>,
}

impl<S> Clone for Fetcher<S> {
  fn clone(&self) -> Self {
    Self {
      source: Arc::clone(&self.source),
      ctx: Arc::clone(&self.ctx),
    }
  }
}

impl<S: TicketSource> Fetcher<S> {
  pub fn new(source: S, ctx: Arc<BadgeContext>) -> Self {
    Self {
      source: Arc::new(source),
      ctx,
    }
  }

  pub fn context(&self) -> &Arc<BadgeContext> {
    &self.ctx
  }

  #[cfg(test)]
  pub fn source(&self) -> &S {
    &self.source
  }

  /// Reserve a fetch slot for `key` and mark it pending in the cache.
  ///
  /// Returns None, leaving the cache untouched, when the in-flight limit is reached.
  pub fn try_begin(&self, key: &str) -> Option<FetchPermit> {
    if !self.ctx.try_acquire() {
      debug!(ticket = key, in_flight = self.ctx.in_flight(), "fetch limit reached, skipping");
      return None;
    }

    self.ctx.cache().mark_pending(key);

    Some(FetchPermit {
      ctx: Arc::clone(&self.ctx),
      key: key.to_string(),
    })
  }

  /// Run a reserved fetch to completion and cache its result.
  ///
  /// Failures are logged and counted; the caller always gets a badge set,
  /// empty when the fetch failed.
  pub async fn complete(&self, permit: FetchPermit) -> BadgeSet {
    let key = permit.key();

    match self.fetch(key).await {
      Ok(badges) => {
        debug!(ticket = key, count = badges.len(), "badges fetched");
        self.ctx.cache().put(key, badges.clone());
        badges
      }
      Err(e) => {
        self.ctx.cache().evict(key);
        let errors = self.ctx.record_error();
        error!(ticket = key, errors, "{:#}", e);
        BadgeSet::new()
      }
    }
  }

  /// Fetch badges for `key` unless the in-flight limit is reached.
  pub async fn fetch_and_cache(&self, key: &str) -> BadgeSet {
    match self.try_begin(key) {
      Some(permit) => self.complete(permit).await,
      None => BadgeSet::new(),
    }
  }

  /// Cached badges for `key`, fetching them on a miss.
  ///
  /// A pending entry yields an empty set without starting another fetch.
  #[allow(dead_code)]
  pub async fn resolve(&self, key: &str) -> BadgeSet {
    match self.ctx.cached(key) {
      Some(entry) => entry.badges(),
      None => self.fetch_and_cache(key).await,
    }
  }

  async fn fetch(&self, key: &str) -> Result<BadgeSet> {
    let ticket = self.source.ticket_metadata(key).await?;
    let dev_status = self.source.dev_status(key).await?;

    if !dev_status.errors.is_empty() {
      return Err(eyre!(
        "Errors detected in response for {}. Will retry. The errors are: {}",
        key,
        dev_status.errors.join(", ")
      ));
    }

    let pull_requests = dev_status
      .pull_requests
      .ok_or_else(|| eyre!("No pull request detail in response for {}", key))?;

    Ok(classify(&ticket, &pull_requests))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::badges::Badge;
  use crate::cache::CacheEntry;
  use crate::fetch::testing::{open_pr, ticket, FakeSource};
  use crate::fetch::Limits;
  use std::sync::atomic::Ordering;
  use std::time::Duration;
  use tokio::sync::Semaphore;

  fn fetcher(source: FakeSource) -> Fetcher<FakeSource> {
    Fetcher::new(source, Arc::new(BadgeContext::default()))
  }

  #[tokio::test]
  async fn test_fetch_classifies_and_caches() {
    let f = fetcher(FakeSource::default().with_ticket(ticket("MEM-1"), open_pr(0)));

    let badges = f.fetch_and_cache("MEM-1").await;
    assert_eq!(badges, [Badge::Open].into_iter().collect());
    assert_eq!(
      f.context().cached("MEM-1"),
      Some(CacheEntry::Ready(badges))
    );
    assert_eq!(f.context().in_flight(), 0);
  }

  #[tokio::test]
  async fn test_resolve_twice_fetches_once() {
    let f = fetcher(FakeSource::default().with_ticket(ticket("MEM-1"), open_pr(1)));

    let first = f.resolve("MEM-1").await;
    let second = f.resolve("MEM-1").await;
    assert_eq!(first, second);
    assert_eq!(f.source.metadata_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_pending_key_is_not_fetched_again() {
    let f = fetcher(FakeSource::default().with_ticket(ticket("MEM-1"), open_pr(1)));

    let permit = f.try_begin("MEM-1").unwrap();
    assert_eq!(f.context().cached("MEM-1"), Some(CacheEntry::Pending));
    assert!(f.resolve("MEM-1").await.is_empty());
    assert_eq!(f.source.metadata_calls.load(Ordering::SeqCst), 0);

    f.complete(permit).await;
    assert_eq!(f.source.metadata_calls.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_error_payload_evicts_and_counts() {
    let dev = DevStatus {
      errors: vec!["stash unavailable".to_string()],
      pull_requests: None,
    };
    let f = fetcher(FakeSource::default().with_ticket(ticket("MEM-1"), dev));

    assert!(f.fetch_and_cache("MEM-1").await.is_empty());
    assert_eq!(f.context().cached("MEM-1"), None);
    assert_eq!(f.context().errors(), 1);
    assert_eq!(f.context().in_flight(), 0);
  }

  #[tokio::test]
  async fn test_missing_pull_request_detail_is_an_error() {
    let dev = DevStatus {
      errors: Vec::new(),
      pull_requests: None,
    };
    let f = fetcher(FakeSource::default().with_ticket(ticket("MEM-1"), dev));

    f.fetch_and_cache("MEM-1").await;
    assert_eq!(f.context().errors(), 1);
  }

  #[tokio::test]
  async fn test_metadata_failure_allows_retry() {
    let f = fetcher(FakeSource::default());

    assert!(f.resolve("GONE-1").await.is_empty());
    assert_eq!(f.context().errors(), 1);

    f.resolve("GONE-1").await;
    assert_eq!(f.source.metadata_calls.load(Ordering::SeqCst), 2);
    assert_eq!(f.context().errors(), 2);
  }

  #[test]
  fn test_try_begin_over_limit_leaves_cache_alone() {
    let f = Fetcher::new(
      FakeSource::default(),
      Arc::new(BadgeContext::new(Limits {
        max_in_flight: 10,
        ..Limits::default()
      })),
    );

    let keys: Vec<String> = (1..=15).map(|i| format!("MEM-{}", i)).collect();
    let permits: Vec<_> = keys.iter().filter_map(|k| f.try_begin(k)).collect();

    assert_eq!(permits.len(), 10);
    assert_eq!(f.context().in_flight(), 10);
    assert_eq!(f.context().cache().len(), 10);
    assert!(f.context().cached("MEM-15").is_none());

    drop(permits);
    assert_eq!(f.context().in_flight(), 0);
  }

  #[tokio::test]
  async fn test_concurrent_fetches_respect_limit() {
    let gate = Arc::new(Semaphore::new(0));
    let mut source = FakeSource {
      gate: Some(Arc::clone(&gate)),
      ..Default::default()
    };
    for i in 1..=15 {
      source = source.with_ticket(ticket(&format!("MEM-{}", i)), open_pr(0));
    }
    let f = fetcher(source);

    let handles: Vec<_> = (1..=15)
      .map(|i| {
        let f = f.clone();
        tokio::spawn(async move { f.fetch_and_cache(&format!("MEM-{}", i)).await })
      })
      .collect();

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(f.context().in_flight(), 10);
    assert_eq!(handles.iter().filter(|h| h.is_finished()).count(), 5);

    gate.add_permits(15);
    let mut fetched = 0;
    for handle in handles {
      if !handle.await.unwrap().is_empty() {
        fetched += 1;
      }
    }
    assert_eq!(fetched, 10);
    assert_eq!(f.context().in_flight(), 0);
  }
}
