//! Shared state for one board session: cache, counters and limits.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::badges::Badge;
use crate::cache::{BadgeCache, CacheEntry};
use crate::config::PollConfig;

/// Tunable limits for fetching and polling.
#[derive(Debug, Clone, Copy)]
pub struct Limits {
  /// Fetches allowed in flight at once
  pub max_in_flight: usize,
  /// Failed fetches after which polling stops
  pub error_limit: usize,
  /// Time after the last cache write before the cache is dropped
  pub cache_expiry: Duration,
}

impl Default for Limits {
  fn default() -> Self {
    Self {
      max_in_flight: 10,
      error_limit: 20,
      cache_expiry: crate::cache::DEFAULT_EXPIRY,
    }
  }
}

impl From<&PollConfig> for Limits {
  fn from(poll: &PollConfig) -> Self {
    Self {
      max_in_flight: poll.max_concurrent_requests,
      error_limit: poll.error_limit,
      cache_expiry: poll.cache_expiry(),
    }
  }
}

/// Cache plus the in-flight and error counters.
///
/// Passed around as `Arc<BadgeContext>` so fetch tasks and the scanner see
/// the same state.
#[derive(Debug)]
pub struct BadgeContext {
  cache: Mutex<BadgeCache>,
  in_flight: AtomicUsize,
  errors: AtomicUsize,
  limits: Limits,
}

impl BadgeContext {
  pub fn new(limits: Limits) -> Self {
    Self {
      cache: Mutex::new(BadgeCache::new(limits.cache_expiry)),
      in_flight: AtomicUsize::new(0),
      errors: AtomicUsize::new(0),
      limits,
    }
  }

  /// Lock the cache. A poisoned lock still holds a usable map.
  pub fn cache(&self) -> MutexGuard<'_, BadgeCache> {
    self.cache.lock().unwrap_or_else(PoisonError::into_inner)
  }

  pub fn cached(&self, key: &str) -> Option<CacheEntry> {
    self.cache().get(key).cloned()
  }

  pub fn clear_cache_if_expired(&self) -> bool {
    self.cache().clear_if_expired()
  }

  pub fn badge_counts(&self) -> HashMap<Badge, usize> {
    self.cache().badge_counts()
  }

  pub fn in_flight(&self) -> usize {
    self.in_flight.load(Ordering::SeqCst)
  }

  /// Take one unit of the concurrency budget, if any is left.
  pub(super) fn try_acquire(&self) -> bool {
    self
      .in_flight
      .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
        (n < self.limits.max_in_flight).then_some(n + 1)
      })
      .is_ok()
  }

  pub(super) fn release(&self) {
    self.in_flight.fetch_sub(1, Ordering::SeqCst);
  }

  pub fn errors(&self) -> usize {
    self.errors.load(Ordering::SeqCst)
  }

  /// Record a failed fetch, returning the new total.
  pub fn record_error(&self) -> usize {
    self.errors.fetch_add(1, Ordering::SeqCst) + 1
  }
}

impl Default for BadgeContext {
  fn default() -> Self {
    Self::new(Limits::default())
  }
}
