//! In-memory badge store with a single shared expiry clock.

use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;

use crate::badges::{Badge, BadgeSet};

/// Default time after the last write before the whole cache is dropped.
pub const DEFAULT_EXPIRY: Duration = Duration::from_secs(30 * 60);

/// A cached value for one ticket key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheEntry {
  /// A fetch is in flight. Callers must not start another one for this key.
  Pending,
  /// Badges from a completed fetch (possibly empty)
  Ready(BadgeSet),
}

impl CacheEntry {
  /// Badges to show for this entry; a pending entry shows none.
  pub fn badges(&self) -> BadgeSet {
    match self {
      CacheEntry::Pending => BadgeSet::new(),
      CacheEntry::Ready(badges) => badges.clone(),
    }
  }
}

/// Ticket key to badge set store.
///
/// Expiry is not tracked per key: any write refreshes the single
/// `last_updated` instant, and once that instant is older than the expiry
/// window every entry is dropped together.
#[derive(Debug)]
pub struct BadgeCache {
  entries: HashMap<String, CacheEntry>,
  last_updated: Option<Instant>,
  expiry: Duration,
}

impl Default for BadgeCache {
  fn default() -> Self {
    Self::new(DEFAULT_EXPIRY)
  }
}

impl BadgeCache {
  pub fn new(expiry: Duration) -> Self {
    Self {
      entries: HashMap::new(),
      last_updated: None,
      expiry,
    }
  }

  pub fn get(&self, key: &str) -> Option<&CacheEntry> {
    self.entries.get(key)
  }

  pub fn contains(&self, key: &str) -> bool {
    self.entries.contains_key(key)
  }

  pub fn put(&mut self, key: &str, badges: BadgeSet) {
    self.write(key, Some(CacheEntry::Ready(badges)));
  }

  /// Record that a fetch for `key` has started.
  pub fn mark_pending(&mut self, key: &str) {
    self.write(key, Some(CacheEntry::Pending));
  }

  /// Forget `key` so the next scan fetches it again. Counts as a write.
  pub fn evict(&mut self, key: &str) {
    self.write(key, None);
  }

  fn write(&mut self, key: &str, entry: Option<CacheEntry>) {
    match entry {
      Some(entry) => {
        self.entries.insert(key.to_string(), entry);
      }
      None => {
        self.entries.remove(key);
      }
    }
    self.last_updated = Some(Instant::now());
  }

  /// Drop every entry if the expiry window has passed since the last write.
  ///
  /// Returns true if the cache was cleared.
  pub fn clear_if_expired(&mut self) -> bool {
    let expired = match self.last_updated {
      Some(at) => at.elapsed() > self.expiry,
      None => true,
    };
    if expired && !self.entries.is_empty() {
      self.entries.clear();
      return true;
    }
    false
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Count how many cached tickets carry each badge.
  pub fn badge_counts(&self) -> HashMap<Badge, usize> {
    let mut counts = HashMap::new();
    for entry in self.entries.values() {
      if let CacheEntry::Ready(badges) = entry {
        for badge in badges {
          *counts.entry(*badge).or_insert(0) += 1;
        }
      }
    }
    counts
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn badges(list: &[Badge]) -> BadgeSet {
    list.iter().copied().collect()
  }

  #[test]
  fn test_absent_pending_and_ready() {
    let mut cache = BadgeCache::default();
    assert!(cache.get("MEM-1").is_none());

    cache.mark_pending("MEM-1");
    assert_eq!(cache.get("MEM-1"), Some(&CacheEntry::Pending));
    assert!(cache.get("MEM-1").map(CacheEntry::badges).unwrap().is_empty());

    cache.put("MEM-1", badges(&[Badge::Merged]));
    assert_eq!(
      cache.get("MEM-1"),
      Some(&CacheEntry::Ready(badges(&[Badge::Merged])))
    );
  }

  #[test]
  fn test_empty_result_is_still_cached() {
    let mut cache = BadgeCache::default();
    cache.put("MEM-2", BadgeSet::new());
    assert!(cache.contains("MEM-2"));
  }

  #[test]
  fn test_evict_removes_entry() {
    let mut cache = BadgeCache::default();
    cache.mark_pending("MEM-3");
    cache.evict("MEM-3");
    assert!(!cache.contains("MEM-3"));
  }

  #[tokio::test(start_paused = true)]
  async fn test_clear_after_expiry() {
    let mut cache = BadgeCache::new(Duration::from_secs(60));
    cache.put("MEM-1", badges(&[Badge::Open]));

    tokio::time::advance(Duration::from_secs(60)).await;
    assert!(!cache.clear_if_expired());
    assert_eq!(cache.len(), 1);

    tokio::time::advance(Duration::from_secs(1)).await;
    assert!(cache.clear_if_expired());
    assert!(cache.is_empty());
  }

  #[tokio::test(start_paused = true)]
  async fn test_any_write_resets_shared_clock() {
    let mut cache = BadgeCache::new(Duration::from_secs(60));
    cache.put("OLD-1", badges(&[Badge::Open]));

    tokio::time::advance(Duration::from_secs(45)).await;
    cache.put("NEW-1", badges(&[Badge::Merged]));

    // OLD-1 is 90s old but the last write was 45s ago
    tokio::time::advance(Duration::from_secs(45)).await;
    assert!(!cache.clear_if_expired());
    assert!(cache.contains("OLD-1"));

    tokio::time::advance(Duration::from_secs(16)).await;
    assert!(cache.clear_if_expired());
    assert!(!cache.contains("OLD-1"));
    assert!(!cache.contains("NEW-1"));
  }

  #[test]
  fn test_badge_counts_skip_pending() {
    let mut cache = BadgeCache::default();
    cache.put("A-1", badges(&[Badge::Open, Badge::LogWork]));
    cache.put("A-2", badges(&[Badge::Open]));
    cache.mark_pending("A-3");

    let counts = cache.badge_counts();
    assert_eq!(counts.get(&Badge::Open), Some(&2));
    assert_eq!(counts.get(&Badge::LogWork), Some(&1));
    assert_eq!(counts.get(&Badge::Merged), None);
  }
}
