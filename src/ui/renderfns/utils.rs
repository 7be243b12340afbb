use ratatui::prelude::*;

use crate::badges::BadgeDescriptor;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.chars().count() <= max_len {
    s.to_string()
  } else {
    let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
    format!("{}...", kept)
  }
}

/// Get the display color for a Jira issue status
pub fn status_color(status: &str) -> Color {
  match status {
    "Done" | "Closed" | "Resolved" => Color::Green,
    "In Progress" | "In Review" => Color::Yellow,
    _ => Color::White,
  }
}

/// A badge drawn as a lozenge, optionally followed by a count
pub fn lozenge_span(badge: &BadgeDescriptor, count: Option<usize>) -> Span<'static> {
  let text = match count {
    Some(n) => format!(" {} {} ", badge.label, n),
    None => format!(" {} ", badge.label),
  };
  Span::styled(
    text,
    Style::default()
      .fg(Color::Black)
      .bg(badge.lozenge.color())
      .bold(),
  )
}
