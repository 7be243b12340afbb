mod renderfns;
mod views;

use crate::app::App;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Board
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  let title = app
    .title()
    .unwrap_or_else(|| renderfns::extract_domain(app.jira_url()));
  renderfns::draw_header(frame, chunks[0], title, app.board_id(), app.board());

  views::board::draw_board(
    frame,
    chunks[1],
    app.board().cards(),
    app.selected(),
    app.is_loading(),
  );

  draw_status_bar(frame, chunks[2], app);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, app: &App) {
  let status = app.status();

  let mut spans = vec![Span::styled(
    " j/k:nav  r:reload  q:quit",
    Style::default().fg(Color::DarkGray),
  )];

  if let Some(at) = status.last_cycle {
    spans.push(Span::styled(
      format!("  │ scanned {}", at.format("%H:%M:%S")),
      Style::default().fg(Color::DarkGray),
    ));
  }
  spans.push(Span::styled(
    format!("  │ in flight {}  errors {}", status.in_flight, status.errors),
    Style::default().fg(Color::DarkGray),
  ));
  if !status.polling {
    spans.push(Span::styled(
      "  │ polling stopped",
      Style::default().fg(Color::Red),
    ));
  }
  if let Some(message) = status.last_error {
    spans.push(Span::styled(
      format!("  │ {}", message),
      Style::default().fg(Color::Red),
    ));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
