use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use super::utils::lozenge_span;
use crate::board::Board;

/// Draw the header bar: title and board on the left, banners on the right
pub fn draw_header(frame: &mut Frame, area: Rect, title: &str, board_id: u64, board: &Board) {
  let left = Line::from(vec![
    Span::styled(" jira-badges ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(format!(" {} ", title), Style::default().fg(Color::White)),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" board {} ", board_id),
      Style::default().fg(Color::Yellow).bold(),
    ),
  ]);

  let paragraph = Paragraph::new(left).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);

  let banners = Paragraph::new(banner_line(board))
    .alignment(Alignment::Right)
    .style(Style::default().bg(Color::Black));
  frame.render_widget(banners, area);
}

/// Error banner, summary lozenges and version, right to left as on the board page
fn banner_line(board: &Board) -> Line<'static> {
  let mut spans = Vec::new();

  if board.error_shown() {
    spans.push(Span::styled("Error", Style::default().fg(Color::Red).bold()));
    spans.push(Span::raw("  "));
  }

  for entry in board.summary() {
    spans.push(lozenge_span(&entry.badge, Some(entry.count)));
    spans.push(Span::raw(" "));
  }

  if let Some(metadata) = board.metadata() {
    spans.push(Span::styled(
      format!(" {} ", metadata),
      Style::default().fg(Color::DarkGray).italic(),
    ));
  }

  Line::from(spans)
}

/// Extract domain from Jira URL
pub fn extract_domain(url: &str) -> &str {
  url
    .strip_prefix("https://")
    .or_else(|| url.strip_prefix("http://"))
    .unwrap_or(url)
    .split('/')
    .next()
    .unwrap_or(url)
}
