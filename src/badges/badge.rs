//! Badge types and their static display table.

use ratatui::prelude::Color;
use std::collections::BTreeSet;

/// A status marker rendered on a ticket card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Badge {
  /// Open pull request without reviewers
  Open,
  /// Open pull request that has reviewers
  InProgress,
  /// Merged pull request
  Merged,
  /// Finished ticket with no work logged
  LogWork,
  /// Finished bug whose publication details are incomplete
  Publication,
  /// Fixed ticket with no fix version
  FixVersion,
  /// Ticket with no component
  NoComponent,
  /// Ticket labelled "blocked"
  Blocked,
}

/// Badges for a single ticket.
pub type BadgeSet = BTreeSet<Badge>;

/// Badge types counted in the board summary, in display order.
pub const SUMMARY_BADGES: &[Badge] = &[
  Badge::Open,
  Badge::FixVersion,
  Badge::LogWork,
  Badge::NoComponent,
  Badge::Publication,
];

/// Visual style of a lozenge, named after the AUI lozenge variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lozenge {
  Current,
  Complete,
  Success,
  Error,
}

impl Lozenge {
  /// AUI class name for this style
  #[allow(dead_code)]
  pub fn class_name(self) -> &'static str {
    match self {
      Lozenge::Current => "aui-lozenge-current",
      Lozenge::Complete => "aui-lozenge-complete",
      Lozenge::Success => "aui-lozenge-success",
      Lozenge::Error => "aui-lozenge-error",
    }
  }

  /// Terminal colour used when drawing this style
  pub fn color(self) -> Color {
    match self {
      Lozenge::Current => Color::Yellow,
      Lozenge::Complete => Color::Blue,
      Lozenge::Success => Color::Green,
      Lozenge::Error => Color::Red,
    }
  }
}

impl Badge {
  pub fn label(self) -> &'static str {
    match self {
      Badge::Open => "OPEN",
      Badge::InProgress => "IN PROGRESS",
      Badge::Merged => "MERGED",
      Badge::LogWork => "LOG WORK",
      Badge::Publication => "PUBLICATION",
      Badge::FixVersion => "FIX VERSION",
      Badge::NoComponent => "NO COMPONENT",
      Badge::Blocked => "BLOCKED",
    }
  }

  pub fn lozenge(self) -> Lozenge {
    match self {
      Badge::Open => Lozenge::Current,
      Badge::InProgress => Lozenge::Complete,
      Badge::Merged => Lozenge::Success,
      Badge::LogWork
      | Badge::Publication
      | Badge::FixVersion
      | Badge::NoComponent
      | Badge::Blocked => Lozenge::Error,
    }
  }

  pub fn descriptor(self) -> BadgeDescriptor {
    BadgeDescriptor {
      badge: self,
      label: self.label(),
      lozenge: self.lozenge(),
    }
  }
}

/// Everything a renderer needs to draw one badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeDescriptor {
  pub badge: Badge,
  pub label: &'static str,
  pub lozenge: Lozenge,
}

/// Convert a badge set into descriptors, in badge order.
pub fn descriptors(badges: &BadgeSet) -> Vec<BadgeDescriptor> {
  badges.iter().map(|b| b.descriptor()).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_pull_request_badges_have_distinct_styles() {
    assert_eq!(Badge::Open.lozenge().class_name(), "aui-lozenge-current");
    assert_eq!(
      Badge::InProgress.lozenge().class_name(),
      "aui-lozenge-complete"
    );
    assert_eq!(Badge::Merged.lozenge().class_name(), "aui-lozenge-success");
  }

  #[test]
  fn test_hygiene_badges_are_errors() {
    for badge in [
      Badge::LogWork,
      Badge::Publication,
      Badge::FixVersion,
      Badge::NoComponent,
      Badge::Blocked,
    ] {
      assert_eq!(badge.lozenge(), Lozenge::Error);
    }
  }

  #[test]
  fn test_labels_use_spaces() {
    assert_eq!(Badge::InProgress.label(), "IN PROGRESS");
    assert_eq!(Badge::NoComponent.label(), "NO COMPONENT");
  }

  #[test]
  fn test_descriptors_follow_badge_order() {
    let badges: BadgeSet = [Badge::Blocked, Badge::Open].into_iter().collect();
    let labels: Vec<_> = descriptors(&badges).iter().map(|d| d.label).collect();
    assert_eq!(labels, vec!["OPEN", "BLOCKED"]);
  }
}
