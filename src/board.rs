//! The board the scanner renders into: ticket cards plus header banners.

use std::collections::{HashMap, HashSet};

use crate::badges::{descriptors, Badge, BadgeDescriptor, BadgeSet, SUMMARY_BADGES};
use crate::jira::types::BoardIssue;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardKind {
  Ticket,
  /// Heading for a parent or epic of tickets on the board
  Parent,
}

#[derive(Debug, Clone)]
pub struct Card {
  pub key: String,
  pub kind: CardKind,
  pub summary: String,
  pub status: String,
  badges: Vec<BadgeDescriptor>,
}

impl Card {
  pub fn new(key: impl Into<String>, kind: CardKind) -> Self {
    Self {
      key: key.into(),
      kind,
      summary: String::new(),
      status: String::new(),
      badges: Vec::new(),
    }
  }

  pub fn badges(&self) -> &[BadgeDescriptor] {
    &self.badges
  }

  pub fn has_badges(&self) -> bool {
    !self.badges.is_empty()
  }
}

/// One lozenge in the summary banner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryEntry {
  pub badge: BadgeDescriptor,
  pub count: usize,
}

/// Summary banner content: summary badge types with a non-zero count, in display order.
pub fn summary_entries(counts: &HashMap<Badge, usize>) -> Vec<SummaryEntry> {
  SUMMARY_BADGES
    .iter()
    .filter_map(|badge| {
      let count = counts.get(badge).copied().unwrap_or(0);
      (count > 0).then(|| SummaryEntry {
        badge: badge.descriptor(),
        count,
      })
    })
    .collect()
}

#[derive(Debug, Default)]
pub struct Board {
  cards: Vec<Card>,
  metadata: Option<String>,
  summary: Vec<SummaryEntry>,
  error_shown: bool,
}

impl Board {
  pub fn cards(&self) -> &[Card] {
    &self.cards
  }

  /// Replace the cards with tickets followed by one heading per distinct parent.
  pub fn set_issues(&mut self, issues: Vec<BoardIssue>) {
    let mut parents = Vec::new();
    let mut seen = HashSet::new();
    for issue in &issues {
      if let Some(parent) = &issue.parent {
        if seen.insert(parent.clone()) {
          parents.push(Card::new(parent.clone(), CardKind::Parent));
        }
      }
    }

    self.cards = issues
      .into_iter()
      .map(|issue| Card {
        key: issue.key,
        kind: CardKind::Ticket,
        summary: issue.summary,
        status: issue.status,
        badges: Vec::new(),
      })
      .chain(parents)
      .collect();
  }

  /// Replace the badges of every card with `key`. Returns how many cards were updated.
  pub fn render_badges(&mut self, key: &str, badges: &BadgeSet) -> usize {
    let rendered = descriptors(badges);
    let mut updated = 0;
    for card in self.cards.iter_mut().filter(|c| c.key == key) {
      card.badges.clone_from(&rendered);
      updated += 1;
    }
    updated
  }

  pub fn metadata(&self) -> Option<&str> {
    self.metadata.as_deref()
  }

  /// Show the version banner. Later calls keep the first banner.
  pub fn show_metadata(&mut self, version: &str) {
    if self.metadata.is_none() {
      self.metadata = Some(format!("Jira Badges™ {}", version));
    }
  }

  pub fn summary(&self) -> &[SummaryEntry] {
    &self.summary
  }

  pub fn set_summary(&mut self, summary: Vec<SummaryEntry>) {
    self.summary = summary;
  }

  pub fn error_shown(&self) -> bool {
    self.error_shown
  }

  /// Show the error banner. Returns false if it was already shown.
  pub fn show_error(&mut self) -> bool {
    !std::mem::replace(&mut self.error_shown, true)
  }
}
