use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Draw the status bar: the last error if there is one, else the key hints
pub fn draw_status_bar(frame: &mut Frame, area: Rect, error: Option<&str>, loading: bool) {
  let line = match error {
    Some(msg) => Line::from(vec![
      Span::styled(" error: ", Style::default().fg(Color::Red).bold()),
      Span::styled(msg.to_string(), Style::default().fg(Color::Red)),
      Span::styled("  (esc to dismiss)", Style::default().fg(Color::DarkGray)),
    ]),
    None => {
      let mut spans = vec![Span::styled(
        " j/k:nav  space:approve  f:filter  m:view more  r:refresh  q:quit",
        Style::default().fg(Color::DarkGray),
      )];
      if loading {
        spans.push(Span::styled("  loading...", Style::default().fg(Color::Yellow)));
      }
      Line::from(spans)
    }
  };

  let paragraph = Paragraph::new(line).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}
