use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};

use crate::board::{Card, CardKind};
use crate::ui::renderfns::{lozenge_span, status_color, truncate};

pub fn draw_board(frame: &mut Frame, area: Rect, cards: &[Card], selected: usize, loading: bool) {
  let title = if loading {
    " Tickets (loading...) ".to_string()
  } else {
    format!(" Tickets ({}) ", cards.len())
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Blue));

  if cards.is_empty() && !loading {
    let paragraph = Paragraph::new("No issues on this board.")
      .block(block)
      .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(paragraph, area);
    return;
  }

  let items: Vec<ListItem> = cards.iter().map(|card| ListItem::new(card_line(card))).collect();

  let list = List::new(items)
    .block(block)
    .highlight_style(
      Style::default()
        .bg(Color::DarkGray)
        .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("> ");

  let mut state = ListState::default();
  state.select(Some(selected));

  frame.render_stateful_widget(list, area, &mut state);
}

fn card_line(card: &Card) -> Line<'static> {
  let mut spans = match card.kind {
    CardKind::Ticket => vec![
      Span::styled(format!("{:<12}", card.key), Style::default().fg(Color::Cyan)),
      Span::raw(" "),
      Span::styled(
        format!("{:<12}", truncate(&card.status, 12)),
        Style::default().fg(status_color(&card.status)),
      ),
      Span::raw(" "),
      Span::raw(format!("{:<50}", truncate(&card.summary, 50))),
    ],
    CardKind::Parent => vec![
      Span::styled(
        format!("{:<12}", card.key),
        Style::default().fg(Color::Magenta).bold(),
      ),
      Span::raw(" "),
      Span::styled(format!("{:<63}", "parent"), Style::default().fg(Color::DarkGray)),
    ],
  };

  for badge in card.badges() {
    spans.push(Span::raw(" "));
    spans.push(lozenge_span(badge, None));
  }

  Line::from(spans)
}
